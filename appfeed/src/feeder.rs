// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Streaming feeder.
//!
//! The feeder reacts to the sink's flow-control signals:
//!
//! - **need-data**: register the feed task with the idle scheduler
//! - **enough-data**: remove it again
//!
//! While registered, every idle dispatch generates one chunk, stamps it and
//! pushes it. A failed push stops feeding on the spot; the next need-data
//! resumes from the current oscillator and sample count.

use std::ops::ControlFlow;

use tracing::{debug, info, trace};

use crate::{
    AudioChunk, BufferSink, FeederConfig, IdleScheduler, Oscillator, Result, TaskId,
};

/// A registered feed task and the scheduler handle that owns it.
#[derive(Debug)]
pub struct ScheduledTask<H> {
    pub id: TaskId,
    pub handle: H,
}

/// Mutable feeder state.
///
/// Feeding is active exactly when `scheduled` holds a task, so the handle
/// can never exist without feeding or the other way round.
#[derive(Debug)]
pub struct FeederState<H> {
    /// Samples pushed so far (drives timestamps)
    pub total_samples_emitted: u64,

    /// Waveform generator
    pub oscillator: Oscillator,

    /// Pending feed task, present while feeding
    pub scheduled: Option<ScheduledTask<H>>,
}

impl<H> Default for FeederState<H> {
    fn default() -> Self {
        FeederState {
            total_samples_emitted: 0,
            oscillator: Oscillator::default(),
            scheduled: None,
        }
    }
}

/// Generates audio chunks on demand for a flow-controlled sink.
///
/// `H` is the handle type of the [`IdleScheduler`] driving the feeder.
#[derive(Debug)]
pub struct Feeder<H> {
    config: FeederConfig,
    state: FeederState<H>,
    next_task: u64,
    scratch: Vec<u16>,
}

impl<H> Feeder<H> {
    /// Creates a feeder with the default oscillator state.
    pub fn new(config: FeederConfig) -> Result<Self> {
        Self::with_oscillator(config, Oscillator::default())
    }

    pub fn with_oscillator(config: FeederConfig, oscillator: Oscillator) -> Result<Self> {
        let config = config.validate()?;
        Ok(Feeder {
            config,
            state: FeederState {
                oscillator,
                ..Default::default()
            },
            next_task: 0,
            scratch: vec![0; config.samples_per_chunk()],
        })
    }

    pub fn config(&self) -> &FeederConfig {
        &self.config
    }

    pub fn state(&self) -> &FeederState<H> {
        &self.state
    }

    pub fn total_samples_emitted(&self) -> u64 {
        self.state.total_samples_emitted
    }

    /// True while a feed task is registered.
    pub fn is_feeding(&self) -> bool {
        self.state.scheduled.is_some()
    }

    /// Id of the registered feed task, if any.
    pub fn scheduled_task(&self) -> Option<TaskId> {
        self.state.scheduled.as_ref().map(|task| task.id)
    }

    /// The sink's queue dropped below its low-water mark.
    ///
    /// Registers the feed task unless one is already registered.
    pub fn on_need_data<S>(&mut self, size_hint: u32, scheduler: &mut S)
    where
        S: IdleScheduler<Handle = H>,
    {
        if self.state.scheduled.is_some() {
            trace!("need-data ({size_hint} bytes) while already feeding");
            return;
        }

        info!("Start feeding");
        let id = TaskId(self.next_task);
        self.next_task += 1;
        let handle = scheduler.add_idle(id);
        self.state.scheduled = Some(ScheduledTask { id, handle });
        debug!("Scheduled feed task {} (size hint {size_hint})", id.as_u64());
    }

    /// The sink's queue reached its high-water mark.
    ///
    /// Removes the feed task, if any, before returning.
    pub fn on_enough_data<S>(&mut self, scheduler: &mut S)
    where
        S: IdleScheduler<Handle = H>,
    {
        if let Some(task) = self.state.scheduled.take() {
            info!("Stop feeding");
            scheduler.remove(task.handle);
            debug!("Removed feed task {}", task.id.as_u64());
        }
    }

    /// One idle dispatch of the feed task `task`.
    ///
    /// Returns `Continue` to stay scheduled. Returns `Break` when `task` is no
    /// longer the registered task, or when the sink refused the chunk; in the
    /// latter case feeding stops as if enough-data had been received.
    pub fn generate_and_push<K>(&mut self, task: TaskId, sink: &mut K) -> ControlFlow<()>
    where
        K: BufferSink + ?Sized,
    {
        if self.scheduled_task() != Some(task) {
            trace!("Dropping stale dispatch of feed task {}", task.as_u64());
            return ControlFlow::Break(());
        }

        let chunk = self.next_chunk();
        match sink.push_buffer(chunk) {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => {
                debug!("Push failed ({err}), halting feed task {}", task.as_u64());
                // The scheduler drops the task itself once we return Break.
                self.state.scheduled = None;
                ControlFlow::Break(())
            }
        }
    }

    /// Generates, packs and stamps the next chunk, advancing the sample count.
    fn next_chunk(&mut self) -> AudioChunk {
        self.state.oscillator.fill(&mut self.scratch);
        let chunk = AudioChunk::from_samples(
            &self.scratch,
            self.state.total_samples_emitted,
            self.config.sample_rate,
        );
        self.state.total_samples_emitted += self.scratch.len() as u64;
        trace!(
            "Generated {} samples, pts {} ns, duration {} ns",
            chunk.num_samples(),
            chunk.pts(),
            chunk.duration()
        );
        chunk
    }
}
