//! GStreamer glue for the appfeed tutorials
//!
//! This crate binds the toolkit-independent [`appfeed`] core to GStreamer
//! and provides the two tutorial programs:
//!
//! - **shortcut**: `appsrc → tee → {audio sink, wavescope, appsink}`. The
//!   oscillator feeder fills `appsrc` from a GLib idle source, throttled by
//!   the element's need-data / enough-data signals, and `appsink` pulls the
//!   samples back into the application.
//! - **streaming**: a `playbin` pipeline whose bus messages (buffering,
//!   clock lost, error, end-of-stream) are routed through
//!   [`appfeed::playback::PlaybackController`].
//!
//! ## GStreamer Concepts (for non-GStreamer developers)
//! - **appsrc**: Source element fed by the application with `push_buffer`
//! - **appsink**: Sink element from which the application pulls samples
//! - **tee**: Duplicates its input onto any number of request pads
//! - **Bus**: Channel carrying state and error messages to the application
//! - **Idle source**: Main-loop callback run when nothing else is pending

// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

/// Setup errors (element creation, linking, state changes)
mod error;

/// appsrc adapter and GLib idle scheduler for the feeder
pub mod feed;

/// Debug category and tracing subscriber setup
mod logging;

/// playbin construction and bus dispatch
pub mod playback;

/// Hand-built appsrc/tee/appsink pipeline
pub mod pipeline;


pub use error::SetupError;
pub use logging::setup_logging;
