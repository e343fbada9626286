// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while building or starting a pipeline.
//!
//! None of these occur once data is flowing; the binaries print them and
//! exit with a failure status.

use gstreamer as gst;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// GStreamer initialization or pipeline parsing failed.
    #[error("{0}")]
    Glib(#[from] glib::Error),

    /// Caps, property or bus operations failed.
    #[error("{0}")]
    Bool(#[from] glib::BoolError),

    /// An element factory is not installed.
    #[error("Not all elements could be created: missing '{0}'")]
    MissingElement(String),

    /// An element does not have the expected type.
    #[error("Element '{0}' has an unexpected type")]
    Cast(&'static str),

    #[error("Elements could not be linked: {0}")]
    Link(String),

    /// A tee request pad or a queue sink pad is unavailable.
    #[error("Pad '{0}' is not available")]
    MissingPad(String),

    #[error("Pads could not be linked: {0}")]
    PadLink(#[from] gst::PadLinkError),

    #[error("Unable to change the pipeline state: {0}")]
    StateChange(#[from] gst::StateChangeError),

    #[error("Pipeline has no bus")]
    NoBus,

    #[error("Invalid configuration: {0}")]
    Config(#[from] appfeed::Error),
}
