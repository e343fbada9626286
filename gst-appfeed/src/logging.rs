// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::LazyLock;

use gstreamer as gst;

/// GStreamer debug category for element-level messages (`GST_DEBUG=appfeed:5`)
pub(crate) static CAT: LazyLock<gst::DebugCategory> = LazyLock::new(|| {
    gst::DebugCategory::new(
        "appfeed",
        gst::DebugColorFlags::empty(),
        Some("Application-fed streaming"),
    )
});

/// Initializes the tracing subscriber for the binaries.
///
/// Logs to stdout with an INFO level filter, respecting the `RUST_LOG`
/// environment variable for custom log levels.
pub fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .init();
}
