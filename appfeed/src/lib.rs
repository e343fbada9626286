// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! # appfeed - application-fed audio streaming
//!
//! Toolkit-independent core of an application-fed media source: a chirped
//! oscillator produces fixed-size chunks of 16-bit mono audio, each chunk is
//! timestamped from a running sample counter, and delivery to a downstream
//! push sink is throttled by the sink's need-data / enough-data signals.
//!
//! ## Key Concepts
//!
//! - **Feeder**: owns the oscillator, the sample counter and the scheduled
//!   feed task ([`Feeder`])
//! - **Idle task**: a unit of work registered with a cooperative scheduler
//!   and re-run whenever the loop is idle ([`IdleScheduler`])
//! - **Sink**: where finished chunks are pushed ([`BufferSink`])
//! - **Bus dispatcher**: maps pipeline bus messages to play-state changes
//!   ([`playback::PlaybackController`])
//!
//! ## Flow Control
//!
//! ```text
//!   sink ── need-data ───► Feeder::on_need_data   ──► scheduler.add_idle
//!   sink ── enough-data ─► Feeder::on_enough_data ──► scheduler.remove
//!   scheduler (idle) ────► Feeder::generate_and_push ──► sink.push_buffer
//! ```
//!
//! ## Example
//!
//! ```
//! use appfeed::{AudioChunk, BufferSink, Feeder, FeederConfig, FlowError, IdleQueue};
//!
//! struct Collect(Vec<AudioChunk>);
//!
//! impl BufferSink for Collect {
//!     fn push_buffer(&mut self, chunk: AudioChunk) -> Result<(), FlowError> {
//!         self.0.push(chunk);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), appfeed::Error> {
//! let mut feeder = Feeder::new(FeederConfig::default())?;
//! let mut idle = IdleQueue::default();
//! let mut sink = Collect(Vec::new());
//!
//! feeder.on_need_data(4096, &mut idle);
//! idle.dispatch(|task| feeder.generate_and_push(task, &mut sink));
//! feeder.on_enough_data(&mut idle);
//!
//! assert_eq!(sink.0.len(), 1);
//! assert_eq!(sink.0[0].pts(), 0);
//! # Ok(())
//! # }
//! ```

mod chunk;
mod config;
mod error;
mod feeder;
mod oscillator;
mod scheduler;
mod sink;

pub mod playback;

pub use chunk::{AudioChunk, NSEC_PER_SEC, samples_to_nseconds};
pub use config::{BYTES_PER_SAMPLE, CHUNK_SIZE, FeederConfig, MAX_CHUNK_SIZE, SAMPLE_RATE};
pub use error::{Error, FlowError, Result};
pub use feeder::{Feeder, FeederState, ScheduledTask};
pub use oscillator::Oscillator;
pub use scheduler::{IdleHandle, IdleQueue, IdleScheduler, TaskId};
pub use sink::BufferSink;
