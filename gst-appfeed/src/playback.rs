//! playbin streaming
//!
//! Launches `playbin` on a URI and drives it from its bus through
//! [`appfeed::playback::PlaybackController`]. A stream whose transition to
//! `Playing` reports no preroll is live, and the controller then ignores
//! buffering messages.

// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use appfeed::playback::{BusMessage, PlayState, PlaybackControl, PlaybackController};
use gst::MessageView;
use gst::prelude::*;
use gstreamer as gst;
use tracing::info;

use crate::SetupError;
use crate::logging::CAT;

/// Media played when no URI is given.
pub const DEFAULT_URI: &str = "https://gstreamer.freedesktop.org/data/media/sintel_trailer-480p.webm";

pub fn gst_state(state: PlayState) -> gst::State {
    match state {
        PlayState::Null => gst::State::Null,
        PlayState::Ready => gst::State::Ready,
        PlayState::Paused => gst::State::Paused,
        PlayState::Playing => gst::State::Playing,
    }
}

/// Translates a GStreamer bus message for the dispatcher.
pub fn bus_message(msg: &gst::Message) -> BusMessage {
    match msg.view() {
        MessageView::Error(err) => BusMessage::Error {
            source: err.src().map(|src| src.path_string().to_string()),
            error: err.error().to_string(),
            debug: err.debug().map(|debug| debug.to_string()),
        },
        MessageView::Eos(..) => BusMessage::EndOfStream,
        MessageView::Buffering(buffering) => BusMessage::Buffering {
            percent: buffering.percent(),
        },
        MessageView::ClockLost(..) => BusMessage::ClockLost,
        _ => BusMessage::Other,
    }
}

/// [`PlaybackControl`] over a GStreamer pipeline and a GLib main loop.
pub struct PipelineControl {
    pipeline: glib::WeakRef<gst::Element>,
    main_loop: glib::MainLoop,
}

impl PipelineControl {
    pub fn new(pipeline: &gst::Element, main_loop: &glib::MainLoop) -> Self {
        PipelineControl {
            pipeline: pipeline.downgrade(),
            main_loop: main_loop.clone(),
        }
    }
}

impl PlaybackControl for PipelineControl {
    fn set_state(&mut self, state: PlayState) {
        let Some(pipeline) = self.pipeline.upgrade() else {
            return;
        };
        if let Err(err) = pipeline.set_state(gst_state(state)) {
            gst::warning!(CAT, obj = pipeline, "Failed to set state {:?}: {}", state, err);
        }
    }

    fn quit(&mut self) {
        self.main_loop.quit();
    }

    fn show_buffering(&mut self, percent: i32) {
        print!("\rBuffering ({percent}%)");
        let _ = std::io::stdout().flush();
    }
}

/// A started playbin and its bus dispatcher.
pub struct Playback {
    pipeline: gst::Element,
    controller: PlaybackController,
}

impl Playback {
    /// Builds `playbin uri=<uri>` and sets it to `Playing`.
    pub fn launch(uri: &str) -> Result<Self, SetupError> {
        let mut playback = Playback {
            pipeline: gst::parse::launch(&format!("playbin uri={uri}"))?,
            controller: PlaybackController::default(),
        };

        // On failure the pipeline is shut down again when `playback` drops.
        match playback.pipeline.set_state(gst::State::Playing)? {
            gst::StateChangeSuccess::NoPreroll => {
                info!("Live stream, buffering messages will be ignored");
                playback.controller.set_live(true);
            }
            success => gst::debug!(CAT, obj = playback.pipeline, "Playing: {:?}", success),
        }

        Ok(playback)
    }

    pub fn is_live(&self) -> bool {
        self.controller.is_live()
    }

    /// Dispatches bus messages until an error or end of stream quits the loop,
    /// then shuts the pipeline down.
    pub fn run(self) -> Result<(), SetupError> {
        let main_loop = glib::MainLoop::new(None, false);
        let bus = self.pipeline.bus().ok_or(SetupError::NoBus)?;

        let controller = self.controller;
        let mut control = PipelineControl::new(&self.pipeline, &main_loop);
        let _watch = bus.add_watch(move |_, msg| {
            controller.handle(&bus_message(msg), &mut control);
            glib::ControlFlow::Continue
        })?;

        main_loop.run();

        self.pipeline.set_state(gst::State::Null)?;
        Ok(())
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        let _ = self.pipeline.set_state(gst::State::Null);
    }
}
