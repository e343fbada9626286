//! Hand-built short-cut pipeline
//!
//! ```text
//!                 ┌─► queue ─► audioconvert ─► audioresample ─► autoaudiosink
//! appsrc ─► tee ──┼─► queue ─► audioconvert ─► wavescope ─► videoconvert ─► autovideosink
//!                 └─► queue ─► appsink
//! ```
//!
//! `appsrc` and `appsink` share the same S16LE mono caps, so the samples the
//! application pulls back are exactly the ones the feeder pushed.

// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use appfeed::FeederConfig;
use appfeed::playback::{self, BusMessage};
use gst::prelude::*;
use gst_audio::AudioInfo;
use gstreamer as gst;
use gstreamer_app as gst_app;
use gstreamer_audio as gst_audio;
use tracing::trace;

use crate::SetupError;
use crate::logging::CAT;
use crate::playback::{PipelineControl, bus_message};

/// The short-cut pipeline and the two elements the application talks to.
pub struct ShortcutPipeline {
    pub pipeline: gst::Pipeline,
    pub app_source: gst_app::AppSrc,
    pub app_sink: gst_app::AppSink,
}

/// Creates element `name` from `factory`.
fn make(factory: &str, name: &str) -> Result<gst::Element, SetupError> {
    gst::ElementFactory::make(factory)
        .name(name)
        .build()
        .map_err(|_| SetupError::MissingElement(factory.to_owned()))
}

/// S16LE mono caps at the configured rate.
pub fn audio_caps(config: &FeederConfig) -> Result<gst::Caps, SetupError> {
    let info = AudioInfo::builder(gst_audio::AudioFormat::S16le, config.sample_rate, 1).build()?;
    Ok(info.to_caps()?)
}

/// Links a new tee request pad to the sink pad of `queue`.
fn link_tee_branch(tee: &gst::Element, queue: &gst::Element) -> Result<(), SetupError> {
    let tee_pad = tee
        .request_pad_simple("src_%u")
        .ok_or_else(|| SetupError::MissingPad(format!("{}:src_%u", tee.name())))?;
    let queue_pad = queue
        .static_pad("sink")
        .ok_or_else(|| SetupError::MissingPad(format!("{}:sink", queue.name())))?;
    tee_pad.link(&queue_pad)?;
    gst::info!(
        CAT,
        "Obtained request pad {} for {} branch",
        tee_pad.name(),
        queue.name()
    );
    Ok(())
}

fn link(elements: &[&gst::Element]) -> Result<(), SetupError> {
    gst::Element::link_many(elements.iter().copied()).map_err(|_| {
        let names: Vec<_> = elements.iter().map(|e| e.name().to_string()).collect();
        SetupError::Link(names.join(" ! "))
    })
}

impl ShortcutPipeline {
    /// Creates, configures and links every element. The pipeline is left in `Null`.
    pub fn build(config: &FeederConfig) -> Result<Self, SetupError> {
        let app_source = make("appsrc", "app_source")?
            .downcast::<gst_app::AppSrc>()
            .map_err(|_| SetupError::Cast("app_source"))?;
        let tee = make("tee", "tee")?;
        let audio_queue = make("queue", "audio_queue")?;
        let audio_convert1 = make("audioconvert", "audio_convert1")?;
        let audio_resample = make("audioresample", "audio_resample")?;
        let audio_sink = make("autoaudiosink", "audio_sink")?;
        let video_queue = make("queue", "video_queue")?;
        let audio_convert2 = make("audioconvert", "audio_convert2")?;
        let visual = make("wavescope", "visual")?;
        let video_convert = make("videoconvert", "csp")?;
        let video_sink = make("autovideosink", "video_sink")?;
        let app_queue = make("queue", "app_queue")?;
        let app_sink = make("appsink", "app_sink")?
            .downcast::<gst_app::AppSink>()
            .map_err(|_| SetupError::Cast("app_sink"))?;

        let pipeline = gst::Pipeline::with_name("test-pipeline");

        visual.set_property_from_str("shader", "none");
        visual.set_property_from_str("style", "lines");

        let caps = audio_caps(config)?;
        app_source.set_caps(Some(&caps));
        app_source.set_format(gst::Format::Time);
        app_sink.set_caps(Some(&caps));

        pipeline.add_many([
            app_source.upcast_ref(),
            &tee,
            &audio_queue,
            &audio_convert1,
            &audio_resample,
            &audio_sink,
            &video_queue,
            &audio_convert2,
            &visual,
            &video_convert,
            &video_sink,
            &app_queue,
            app_sink.upcast_ref(),
        ])?;

        link(&[app_source.upcast_ref(), &tee])?;
        link(&[&audio_queue, &audio_convert1, &audio_resample, &audio_sink])?;
        link(&[
            &video_queue,
            &audio_convert2,
            &visual,
            &video_convert,
            &video_sink,
        ])?;
        link(&[&app_queue, app_sink.upcast_ref()])?;

        for queue in [&audio_queue, &video_queue, &app_queue] {
            link_tee_branch(&tee, queue)?;
        }

        gst::debug!(CAT, obj = pipeline, "Short-cut pipeline built with caps {}", caps);

        Ok(ShortcutPipeline {
            pipeline,
            app_source,
            app_sink,
        })
    }

    /// Counts and acknowledges every sample reaching the appsink.
    ///
    /// Prints a `*` per received sample, like the tutorial.
    pub fn count_samples(&self) -> Arc<AtomicU64> {
        let received = Arc::new(AtomicU64::new(0));
        let counter = received.clone();

        self.app_sink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let sample = appsink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
                    trace!(
                        "Received sample {} ({} bytes)",
                        n,
                        sample.buffer().map_or(0, |buffer| buffer.size())
                    );
                    print!("* ");
                    let _ = std::io::stdout().flush();
                    Ok(gst::FlowSuccess::Ok)
                })
                .build(),
        );

        received
    }

    /// Reports bus errors, resets the pipeline to `Ready` and quits `main_loop`.
    ///
    /// The watch lives as long as the returned guard.
    pub fn watch_errors(
        &self,
        main_loop: &glib::MainLoop,
    ) -> Result<gst::bus::BusWatchGuard, SetupError> {
        let bus = self.pipeline.bus().ok_or(SetupError::NoBus)?;
        let mut control = PipelineControl::new(self.pipeline.upcast_ref(), main_loop);

        let guard = bus.add_watch(move |_, msg| {
            if let BusMessage::Error {
                source,
                error,
                debug,
            } = bus_message(msg)
            {
                playback::on_error(
                    source.as_deref(),
                    &error,
                    debug.as_deref(),
                    &mut control,
                );
            }
            glib::ControlFlow::Continue
        })?;

        Ok(guard)
    }
}
