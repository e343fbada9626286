// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for feeder configuration and buffer delivery.

/// Convenience result type using [`Error`] as the error variant.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while building a [`crate::Feeder`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Chunk size must hold a whole number of 16-bit samples.
    #[error("Invalid chunk size: {0} bytes (must be a non-zero multiple of 2, at most 16 MiB)")]
    InvalidChunkSize(usize),

    /// Sample rate of zero would make every timestamp undefined.
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// The configuration file could not be read.
    #[error("Reading configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for [`crate::FeederConfig`].
    #[error("Parsing configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Non-OK status returned by a [`crate::BufferSink`] push.
///
/// Mirrors the failing flow returns of a media pipeline. The feeder never
/// propagates these: any of them stops feeding until the next need-data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The sink is flushing (seek or teardown in progress).
    #[error("Flushing")]
    Flushing,

    /// The sink has reached end of stream.
    #[error("End of stream")]
    Eos,

    /// The sink is not linked downstream.
    #[error("Not linked")]
    NotLinked,

    /// Caps negotiation failed downstream.
    #[error("Not negotiated")]
    NotNegotiated,

    /// Any other fatal error.
    #[error("Error")]
    Error,
}
