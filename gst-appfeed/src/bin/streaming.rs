// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Streaming playback with buffering and clock-loss handling.

use std::process::ExitCode;

use clap::Parser;
use gstappfeed::SetupError;
use gstappfeed::playback::{DEFAULT_URI, Playback};
use gstreamer as gst;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(version, about = "Play a network stream with playbin")]
struct Args {
    /// Media URI to play
    #[arg(long, default_value = DEFAULT_URI)]
    uri: String,
}

fn run(args: Args) -> Result<(), SetupError> {
    gst::init()?;

    let playback = Playback::launch(&args.uri)?;
    info!(
        "Playing {} ({})",
        args.uri,
        if playback.is_live() { "live" } else { "buffered" }
    );
    playback.run()
}

fn main() -> ExitCode {
    gstappfeed::setup_logging();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
