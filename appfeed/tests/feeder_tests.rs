// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Flow-control scenarios for the feeder.
//!
//! Each test drives a [`Feeder`] through an [`IdleQueue`] and a recording
//! sink, so scheduling is fully deterministic and no media framework is
//! involved.

use std::ops::ControlFlow;

use appfeed::{
    AudioChunk, BufferSink, CHUNK_SIZE, Feeder, FeederConfig, FlowError, IdleHandle, IdleQueue,
    NSEC_PER_SEC, SAMPLE_RATE,
};
use tracing::info;

/// Ensures logging is initialized only once across all tests.
static LOG_ONCE: std::sync::Once = std::sync::Once::new();

const CHUNK_SAMPLES: u64 = (CHUNK_SIZE / 2) as u64;

/// Sink that keeps every chunk and can refuse the n-th push.
#[derive(Default)]
struct RecordingSink {
    chunks: Vec<AudioChunk>,
    pushes: usize,
    fail_on_push: Option<(usize, FlowError)>,
}

impl RecordingSink {
    fn failing_on(push: usize, error: FlowError) -> Self {
        RecordingSink {
            fail_on_push: Some((push, error)),
            ..Default::default()
        }
    }
}

impl BufferSink for RecordingSink {
    fn push_buffer(&mut self, chunk: AudioChunk) -> Result<(), FlowError> {
        self.pushes += 1;
        if let Some((push, error)) = self.fail_on_push {
            if push == self.pushes {
                return Err(error);
            }
        }
        self.chunks.push(chunk);
        Ok(())
    }
}

fn setup_test() -> (Feeder<IdleHandle>, IdleQueue, RecordingSink) {
    LOG_ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::builder()
                    .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .with_test_writer()
            .init();
    });

    (
        Feeder::new(FeederConfig::default()).unwrap(),
        IdleQueue::default(),
        RecordingSink::default(),
    )
}

/// Runs one idle iteration of the queue against the feeder.
fn run_idle(feeder: &mut Feeder<IdleHandle>, idle: &mut IdleQueue, sink: &mut RecordingSink) {
    idle.dispatch(|task| feeder.generate_and_push(task, &mut *sink));
}

fn assert_invariant(feeder: &Feeder<IdleHandle>, idle: &IdleQueue) {
    assert_eq!(feeder.state().scheduled.is_some(), feeder.is_feeding());
    assert_eq!(feeder.is_feeding(), feeder.scheduled_task().is_some());
    assert_eq!(idle.len(), usize::from(feeder.is_feeding()));
    if let Some(task) = &feeder.state().scheduled {
        assert!(idle.contains(task.handle));
    }
}

#[test]
fn need_data_twice_schedules_one_task() {
    let (mut feeder, mut idle, _sink) = setup_test();

    feeder.on_need_data(4096, &mut idle);
    assert_invariant(&feeder, &idle);
    let task = feeder.scheduled_task();

    feeder.on_need_data(4096, &mut idle);
    assert_invariant(&feeder, &idle);
    assert_eq!(idle.len(), 1);
    assert_eq!(feeder.scheduled_task(), task);
}

#[test]
fn enough_data_while_idle_is_a_no_op() {
    let (mut feeder, mut idle, _sink) = setup_test();

    feeder.on_enough_data(&mut idle);
    assert!(!feeder.is_feeding());
    assert_invariant(&feeder, &idle);

    feeder.on_need_data(0, &mut idle);
    feeder.on_enough_data(&mut idle);
    feeder.on_enough_data(&mut idle);
    assert!(!feeder.is_feeding());
    assert_invariant(&feeder, &idle);
}

#[test]
fn every_chunk_advances_by_half_the_chunk_size() {
    let (mut feeder, mut idle, mut sink) = setup_test();

    feeder.on_need_data(0, &mut idle);
    for n in 1..=4 {
        run_idle(&mut feeder, &mut idle, &mut sink);
        assert_eq!(feeder.total_samples_emitted(), n * CHUNK_SAMPLES);
        assert_invariant(&feeder, &idle);
    }

    for chunk in &sink.chunks {
        assert_eq!(chunk.data().len(), CHUNK_SIZE);
        assert_eq!(chunk.num_samples() as u64, CHUNK_SAMPLES);
    }
}

#[test]
fn timestamps_follow_the_prior_sample_count() {
    let (mut feeder, mut idle, mut sink) = setup_test();

    feeder.on_need_data(0, &mut idle);
    for _ in 0..8 {
        run_idle(&mut feeder, &mut idle, &mut sink);
    }

    let expected_duration = CHUNK_SAMPLES * NSEC_PER_SEC / SAMPLE_RATE as u64;
    let mut previous = 0;
    for (n, chunk) in sink.chunks.iter().enumerate() {
        let prior_total = n as u64 * CHUNK_SAMPLES;
        assert_eq!(chunk.pts(), prior_total * NSEC_PER_SEC / SAMPLE_RATE as u64);
        assert_eq!(chunk.duration(), expected_duration);
        assert!(chunk.pts() >= previous);
        previous = chunk.pts();
    }
    info!("Checked {} chunk timestamps", sink.chunks.len());
}

#[test]
fn first_sample_is_deterministic() {
    let (mut feeder, mut idle, mut sink) = setup_test();

    feeder.on_need_data(0, &mut idle);
    run_idle(&mut feeder, &mut idle, &mut sink);

    let first = sink.chunks[0].samples().next().unwrap();
    assert_eq!(first, 500);
    assert_eq!(&sink.chunks[0].data()[..2], &[0xf4, 0x01]);
}

#[test]
fn enough_data_stops_generation_immediately() {
    let (mut feeder, mut idle, mut sink) = setup_test();

    feeder.on_need_data(0, &mut idle);
    for _ in 0..5 {
        run_idle(&mut feeder, &mut idle, &mut sink);
    }
    assert_eq!(sink.chunks.len(), 5);
    let stale = feeder.scheduled_task().unwrap();

    feeder.on_enough_data(&mut idle);
    assert_invariant(&feeder, &idle);

    for _ in 0..3 {
        run_idle(&mut feeder, &mut idle, &mut sink);
    }
    // A dispatch already in flight for the cancelled task must not generate either.
    assert_eq!(
        feeder.generate_and_push(stale, &mut sink),
        ControlFlow::Break(())
    );

    assert_eq!(sink.pushes, 5);
    assert_eq!(feeder.total_samples_emitted(), 5 * CHUNK_SAMPLES);
}

#[test]
fn failed_push_halts_feeding_without_enough_data() {
    let (mut feeder, mut idle, _) = setup_test();
    let mut sink = RecordingSink::failing_on(3, FlowError::Flushing);

    feeder.on_need_data(0, &mut idle);
    for _ in 0..6 {
        run_idle(&mut feeder, &mut idle, &mut sink);
        assert_invariant(&feeder, &idle);
    }

    assert!(!feeder.is_feeding());
    assert!(idle.is_empty());
    assert_eq!(sink.pushes, 3);
    assert_eq!(sink.chunks.len(), 2);
}

#[test]
fn feeding_resumes_where_it_stopped() {
    let (mut feeder, mut idle, _) = setup_test();
    let mut sink = RecordingSink::failing_on(2, FlowError::Eos);

    feeder.on_need_data(0, &mut idle);
    run_idle(&mut feeder, &mut idle, &mut sink);
    run_idle(&mut feeder, &mut idle, &mut sink);
    assert!(!feeder.is_feeding());
    let oscillator = feeder.state().oscillator;

    feeder.on_need_data(0, &mut idle);
    run_idle(&mut feeder, &mut idle, &mut sink);

    assert_eq!(sink.chunks.len(), 2);
    assert_eq!(sink.chunks[1].pts(), 2 * CHUNK_SAMPLES * NSEC_PER_SEC / SAMPLE_RATE as u64);
    assert_ne!(feeder.state().oscillator, oscillator);

    // Restarting from the remembered oscillator state reproduces the resumed chunk.
    let mut replay = Feeder::<IdleHandle>::with_oscillator(FeederConfig::default(), oscillator)
        .unwrap();
    let mut replay_idle = IdleQueue::default();
    let mut replay_sink = RecordingSink::default();
    replay.on_need_data(0, &mut replay_idle);
    run_idle(&mut replay, &mut replay_idle, &mut replay_sink);
    assert_eq!(replay_sink.chunks[0].data(), sink.chunks[1].data());
}

#[test]
fn custom_configuration_changes_chunk_layout() {
    let config = FeederConfig {
        chunk_size: 96,
        sample_rate: 48_000,
    };
    let mut feeder = Feeder::<IdleHandle>::new(config).unwrap();
    let mut idle = IdleQueue::default();
    let mut sink = RecordingSink::default();

    feeder.on_need_data(0, &mut idle);
    run_idle(&mut feeder, &mut idle, &mut sink);
    run_idle(&mut feeder, &mut idle, &mut sink);

    assert_eq!(sink.chunks[0].num_samples(), 48);
    assert_eq!(sink.chunks[0].duration(), 1_000_000);
    assert_eq!(sink.chunks[1].pts(), 1_000_000);
}

#[test]
fn invalid_configuration_is_rejected() {
    let config = FeederConfig {
        chunk_size: 3,
        ..Default::default()
    };
    assert!(matches!(
        Feeder::<IdleHandle>::new(config),
        Err(appfeed::Error::InvalidChunkSize(3))
    ));
}

#[test]
fn oversized_chunk_is_rejected_before_allocating() {
    let config = FeederConfig {
        chunk_size: usize::MAX - 1,
        ..Default::default()
    };
    assert!(matches!(
        Feeder::<IdleHandle>::new(config),
        Err(appfeed::Error::InvalidChunkSize(size)) if size == usize::MAX - 1
    ));
}
