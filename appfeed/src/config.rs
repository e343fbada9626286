// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Feeder configuration.
//!
//! Both values are fixed when the [`crate::Feeder`] is constructed. They can
//! come from code, from a JSON file, or from the command line of the
//! `shortcut` binary.
//!
//! ```json
//! { "chunk-size": 2048, "sample-rate": 48000 }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Default number of bytes sent in each buffer.
pub const CHUNK_SIZE: usize = 1024;

/// Default number of samples per second.
pub const SAMPLE_RATE: u32 = 44_100;

/// Largest accepted chunk, in bytes.
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Size of one S16 mono sample.
pub const BYTES_PER_SAMPLE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FeederConfig {
    /// Bytes per pushed buffer
    pub chunk_size: usize,

    /// Samples per second, used for timestamps and caps
    pub sample_rate: u32,
}

impl Default for FeederConfig {
    fn default() -> Self {
        FeederConfig {
            chunk_size: CHUNK_SIZE,
            sample_rate: SAMPLE_RATE,
        }
    }
}

impl FeederConfig {
    /// Checks that the configuration can produce whole, timestamped chunks.
    pub fn validate(self) -> Result<Self> {
        if self.chunk_size == 0
            || self.chunk_size > MAX_CHUNK_SIZE
            || self.chunk_size % BYTES_PER_SAMPLE != 0
        {
            return Err(Error::InvalidChunkSize(self.chunk_size));
        }
        if self.sample_rate == 0 {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        Ok(self)
    }

    /// Number of samples generated per chunk.
    pub fn samples_per_chunk(&self) -> usize {
        self.chunk_size / BYTES_PER_SAMPLE
    }

    /// Parses and validates a JSON configuration. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FeederConfig = serde_json::from_str(json)?;
        config.validate()
    }

    /// Reads a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading feeder configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
