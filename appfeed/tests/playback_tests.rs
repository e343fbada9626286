// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Bus dispatch tests against a recording pipeline control.

use appfeed::playback::{BusMessage, PlayState, PlaybackControl, PlaybackController};

#[derive(Debug, Default)]
struct Recorder {
    states: Vec<PlayState>,
    quit: bool,
    progress: Vec<i32>,
}

impl PlaybackControl for Recorder {
    fn set_state(&mut self, state: PlayState) {
        self.states.push(state);
    }

    fn quit(&mut self) {
        self.quit = true;
    }

    fn show_buffering(&mut self, percent: i32) {
        self.progress.push(percent);
    }
}

fn dispatch(controller: PlaybackController, msg: BusMessage) -> Recorder {
    let mut recorder = Recorder::default();
    controller.handle(&msg, &mut recorder);
    recorder
}

#[test]
fn error_resets_to_ready_and_quits() {
    let recorder = dispatch(
        PlaybackController::default(),
        BusMessage::Error {
            source: Some("/GstPlayBin:playbin0/GstURIDecodeBin:uridecodebin0".into()),
            error: "Could not resolve server name.".into(),
            debug: None,
        },
    );
    assert_eq!(recorder.states, [PlayState::Ready]);
    assert!(recorder.quit);
}

#[test]
fn end_of_stream_resets_to_ready_and_quits() {
    let recorder = dispatch(PlaybackController::default(), BusMessage::EndOfStream);
    assert_eq!(recorder.states, [PlayState::Ready]);
    assert!(recorder.quit);
}

#[test]
fn buffering_resumes_playback_for_non_negative_percent() {
    for percent in [0, 42, 100] {
        let recorder = dispatch(
            PlaybackController::default(),
            BusMessage::Buffering { percent },
        );
        assert_eq!(recorder.states, [PlayState::Playing]);
        assert_eq!(recorder.progress, [percent]);
        assert!(!recorder.quit);
    }
}

#[test]
fn buffering_pauses_for_negative_percent() {
    let recorder = dispatch(
        PlaybackController::default(),
        BusMessage::Buffering { percent: -1 },
    );
    assert_eq!(recorder.states, [PlayState::Paused]);
}

#[test]
fn buffering_is_ignored_for_live_streams() {
    let mut controller = PlaybackController::default();
    controller.set_live(true);
    assert!(controller.is_live());

    let recorder = dispatch(controller, BusMessage::Buffering { percent: 10 });
    assert!(recorder.states.is_empty());
    assert!(recorder.progress.is_empty());
}

#[test]
fn clock_lost_cycles_through_paused() {
    let recorder = dispatch(PlaybackController::new(true), BusMessage::ClockLost);
    assert_eq!(recorder.states, [PlayState::Paused, PlayState::Playing]);
    assert!(!recorder.quit);
}

#[test]
fn other_messages_are_ignored() {
    let recorder = dispatch(PlaybackController::default(), BusMessage::Other);
    assert!(recorder.states.is_empty());
    assert!(!recorder.quit);
}
