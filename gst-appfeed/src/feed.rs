//! Feeding appsrc from the GLib main loop
//!
//! This module connects an [`appfeed::Feeder`] to a `gst_app::AppSrc`:
//!
//! - need-data / enough-data are emitted on GStreamer streaming threads, and
//!   enough-data may even be emitted from inside `push_buffer`. Both are
//!   re-posted onto the default main context, so every feeder operation runs
//!   on the main loop thread.
//! - The feed task is a GLib idle source ([`GlibIdleScheduler`]). Re-posted
//!   signals run at default priority, ahead of the idle source.
//! - Each idle dispatch converts the generated chunk to a `gst::Buffer` and
//!   pushes it with `AppSrc::push_buffer` ([`AppSrcSink`]).

// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, Weak};

use appfeed::{AudioChunk, BufferSink, Feeder, FlowError, IdleScheduler, TaskId};
use gst::prelude::*;
use gstreamer as gst;
use gstreamer_app as gst_app;
use tracing::trace;

use crate::logging::CAT;

/// Feeder scheduled by GLib idle sources.
pub type GlibFeeder = Feeder<glib::SourceId>;

/// Feeder shared between appsrc callbacks and the idle source.
///
/// Only the main loop thread ever locks it.
pub type SharedFeeder = Arc<Mutex<GlibFeeder>>;

/// Flow-control signal re-posted from a streaming thread.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FeedSignal {
    NeedData(u32),
    EnoughData,
}

/// Wraps a chunk as a timestamped `gst::Buffer` without copying the samples.
pub fn chunk_to_buffer(chunk: AudioChunk) -> gst::Buffer {
    let pts = gst::ClockTime::from_nseconds(chunk.pts());
    let duration = gst::ClockTime::from_nseconds(chunk.duration());

    let mut buffer = gst::Buffer::from_mut_slice(chunk.into_data());
    {
        let buffer = buffer.make_mut();
        buffer.set_pts(pts);
        buffer.set_duration(duration);
    }
    buffer
}

/// Maps GStreamer flow errors onto the feeder's flow errors.
pub fn flow_error_from_gst(err: gst::FlowError) -> FlowError {
    match err {
        gst::FlowError::Flushing => FlowError::Flushing,
        gst::FlowError::Eos => FlowError::Eos,
        gst::FlowError::NotLinked => FlowError::NotLinked,
        gst::FlowError::NotNegotiated => FlowError::NotNegotiated,
        _ => FlowError::Error,
    }
}

/// Push side of the handshake: hands each chunk to appsrc.
pub struct AppSrcSink<'a> {
    appsrc: &'a gst_app::AppSrc,
}

impl<'a> AppSrcSink<'a> {
    pub fn new(appsrc: &'a gst_app::AppSrc) -> Self {
        AppSrcSink { appsrc }
    }
}

impl BufferSink for AppSrcSink<'_> {
    fn push_buffer(&mut self, chunk: AudioChunk) -> Result<(), FlowError> {
        match self.appsrc.push_buffer(chunk_to_buffer(chunk)) {
            Ok(_) => Ok(()),
            Err(err) => {
                gst::debug!(CAT, obj = self.appsrc, "push-buffer returned {:?}", err);
                Err(flow_error_from_gst(err))
            }
        }
    }
}

/// Schedules the feed task as a GLib idle source on the default main context.
pub struct GlibIdleScheduler {
    feeder: Weak<Mutex<GlibFeeder>>,
    appsrc: glib::WeakRef<gst_app::AppSrc>,
}

impl GlibIdleScheduler {
    pub fn new(feeder: &SharedFeeder, appsrc: &gst_app::AppSrc) -> Self {
        GlibIdleScheduler {
            feeder: Arc::downgrade(feeder),
            appsrc: appsrc.downgrade(),
        }
    }
}

impl IdleScheduler for GlibIdleScheduler {
    type Handle = glib::SourceId;

    fn add_idle(&mut self, task: TaskId) -> glib::SourceId {
        let feeder = self.feeder.clone();
        let appsrc = self.appsrc.clone();
        glib::idle_add(move || feed_once(&feeder, &appsrc, task))
    }

    fn remove(&mut self, handle: glib::SourceId) {
        handle.remove();
    }
}

/// One idle dispatch: generate a chunk and push it into appsrc.
fn feed_once(
    feeder: &Weak<Mutex<GlibFeeder>>,
    appsrc: &glib::WeakRef<gst_app::AppSrc>,
    task: TaskId,
) -> glib::ControlFlow {
    let (Some(feeder), Some(appsrc)) = (feeder.upgrade(), appsrc.upgrade()) else {
        trace!("Feeder or appsrc gone, dropping feed task {}", task.as_u64());
        return glib::ControlFlow::Break;
    };
    let Ok(mut feeder) = feeder.lock() else {
        gst::error!(CAT, obj = appsrc, "Feeder mutex poisoned");
        return glib::ControlFlow::Break;
    };

    match feeder.generate_and_push(task, &mut AppSrcSink::new(&appsrc)) {
        ControlFlow::Continue(()) => glib::ControlFlow::Continue,
        ControlFlow::Break(()) => glib::ControlFlow::Break,
    }
}

/// Runs a re-posted flow-control signal on the main loop thread.
fn handle_signal(
    feeder: &Weak<Mutex<GlibFeeder>>,
    appsrc: &glib::WeakRef<gst_app::AppSrc>,
    signal: FeedSignal,
) {
    let (Some(shared), Some(appsrc)) = (feeder.upgrade(), appsrc.upgrade()) else {
        return;
    };
    let mut scheduler = GlibIdleScheduler::new(&shared, &appsrc);
    let Ok(mut feeder) = shared.lock() else {
        gst::error!(CAT, obj = appsrc, "Feeder mutex poisoned");
        return;
    };

    match signal {
        FeedSignal::NeedData(size) => feeder.on_need_data(size, &mut scheduler),
        FeedSignal::EnoughData => feeder.on_enough_data(&mut scheduler),
    }
}

/// Queues `signal` on the default main context.
pub(crate) fn post_signal(
    appsrc: &gst_app::AppSrc,
    feeder: &Weak<Mutex<GlibFeeder>>,
    signal: FeedSignal,
) {
    gst::trace!(CAT, obj = appsrc, "Posting {:?} to the main loop", signal);
    let feeder = feeder.clone();
    let appsrc = appsrc.downgrade();
    glib::MainContext::default().spawn(async move {
        handle_signal(&feeder, &appsrc, signal);
    });
}

/// Installs the need-data / enough-data callbacks driving `feeder`.
pub fn attach(appsrc: &gst_app::AppSrc, feeder: &SharedFeeder) {
    let on_need = Arc::downgrade(feeder);
    let on_enough = Arc::downgrade(feeder);

    appsrc.set_callbacks(
        gst_app::AppSrcCallbacks::builder()
            .need_data(move |appsrc, size| {
                post_signal(appsrc, &on_need, FeedSignal::NeedData(size));
            })
            .enough_data(move |appsrc| {
                post_signal(appsrc, &on_enough, FeedSignal::EnoughData);
            })
            .build(),
    );
}
