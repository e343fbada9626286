// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Short-cutting the pipeline.
//!
//! Feeds an oscillator into `appsrc`, plays it, draws it with `wavescope`
//! and pulls every sample back out of `appsink`.
//!
//! ```bash
//! shortcut --sample-rate 48000 --chunk-size 2048
//! shortcut --config feeder.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use appfeed::{Feeder, FeederConfig};
use clap::Parser;
use gst::prelude::*;
use gstappfeed::SetupError;
use gstappfeed::feed;
use gstappfeed::pipeline::ShortcutPipeline;
use gstreamer as gst;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(version, about = "Feed appsrc from an oscillator and pull samples from appsink")]
struct Args {
    /// JSON feeder configuration ({"chunk-size": .., "sample-rate": ..})
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bytes per pushed buffer (overrides the configuration file)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Samples per second (overrides the configuration file)
    #[arg(long)]
    sample_rate: Option<u32>,
}

impl Args {
    fn feeder_config(&self) -> Result<FeederConfig, appfeed::Error> {
        let mut config = match &self.config {
            Some(path) => FeederConfig::from_json_file(path)?,
            None => FeederConfig::default(),
        };
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(sample_rate) = self.sample_rate {
            config.sample_rate = sample_rate;
        }
        config.validate()
    }
}

fn run(args: Args) -> Result<(), SetupError> {
    let config = args.feeder_config()?;
    gst::init()?;

    let shortcut = ShortcutPipeline::build(&config)?;
    let feeder = Arc::new(Mutex::new(Feeder::new(config)?));
    feed::attach(&shortcut.app_source, &feeder);
    let received = shortcut.count_samples();

    let main_loop = glib::MainLoop::new(None, false);
    let _watch = shortcut.watch_errors(&main_loop)?;

    info!(
        "Feeding {} byte chunks at {} Hz",
        config.chunk_size, config.sample_rate
    );
    if let Err(err) = shortcut.pipeline.set_state(gst::State::Playing) {
        let _ = shortcut.pipeline.set_state(gst::State::Null);
        return Err(err.into());
    }

    main_loop.run();

    shortcut.pipeline.set_state(gst::State::Null)?;
    info!(
        "Received {} samples",
        received.load(Ordering::Relaxed)
    );
    Ok(())
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
