// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Bus message dispatch for a playback pipeline.
//!
//! Each message kind maps to one plain handler function that drives the
//! pipeline through a [`PlaybackControl`]:
//!
//! | Message        | Reaction                                              |
//! |----------------|-------------------------------------------------------|
//! | `Error`        | report, go to `Ready`, quit the loop                  |
//! | `EndOfStream`  | go to `Ready`, quit the loop                          |
//! | `Buffering`    | non-live only: `Paused` if percent < 0, else `Playing` |
//! | `ClockLost`    | `Paused` then `Playing` to pick a new clock           |

use tracing::{debug, error};

/// Pipeline states the dispatcher can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Null,
    Ready,
    Paused,
    Playing,
}

/// Toolkit-independent view of a bus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusMessage {
    Error {
        /// Path of the posting element, if known
        source: Option<String>,
        error: String,
        debug: Option<String>,
    },
    EndOfStream,
    Buffering {
        percent: i32,
    },
    ClockLost,
    /// Anything the dispatcher does not react to
    Other,
}

/// The pipeline and loop the dispatcher acts on.
pub trait PlaybackControl {
    fn set_state(&mut self, state: PlayState);

    /// Stops the event loop.
    fn quit(&mut self);

    /// Shows buffering progress to the user.
    fn show_buffering(&mut self, _percent: i32) {}
}

/// Routes bus messages to their handlers.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaybackController {
    is_live: bool,
}

impl PlaybackController {
    pub fn new(is_live: bool) -> Self {
        PlaybackController { is_live }
    }

    /// True when the pipeline reported no preroll (live source).
    pub fn is_live(&self) -> bool {
        self.is_live
    }

    pub fn set_live(&mut self, is_live: bool) {
        self.is_live = is_live;
    }

    pub fn handle<C: PlaybackControl + ?Sized>(&self, msg: &BusMessage, control: &mut C) {
        match msg {
            BusMessage::Error {
                source,
                error,
                debug,
            } => on_error(source.as_deref(), error, debug.as_deref(), control),
            BusMessage::EndOfStream => on_eos(control),
            BusMessage::Buffering { percent } => on_buffering(self.is_live, *percent, control),
            BusMessage::ClockLost => on_clock_lost(control),
            BusMessage::Other => {}
        }
    }
}

/// Reports an error, resets the pipeline to `Ready` and quits.
pub fn on_error<C: PlaybackControl + ?Sized>(
    source: Option<&str>,
    error: &str,
    debug_info: Option<&str>,
    control: &mut C,
) {
    error!(
        "Error received from element {}: {}",
        source.unwrap_or("<unknown>"),
        error
    );
    error!("Debugging information: {}", debug_info.unwrap_or("none"));
    control.set_state(PlayState::Ready);
    control.quit();
}

pub fn on_eos<C: PlaybackControl + ?Sized>(control: &mut C) {
    debug!("End of stream");
    control.set_state(PlayState::Ready);
    control.quit();
}

/// Live streams never wait for buffering.
pub fn on_buffering<C: PlaybackControl + ?Sized>(is_live: bool, percent: i32, control: &mut C) {
    if is_live {
        return;
    }

    control.show_buffering(percent);
    if percent < 0 {
        control.set_state(PlayState::Paused);
    } else {
        control.set_state(PlayState::Playing);
    }
}

pub fn on_clock_lost<C: PlaybackControl + ?Sized>(control: &mut C) {
    debug!("Clock lost, selecting a new one");
    control.set_state(PlayState::Paused);
    control.set_state(PlayState::Playing);
}
