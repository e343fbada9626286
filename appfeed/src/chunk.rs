// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Timestamped chunks of S16LE mono audio.

use crate::config::BYTES_PER_SAMPLE;

/// One second in the sink's time base (nanoseconds).
pub const NSEC_PER_SEC: u64 = 1_000_000_000;

/// Converts a sample count to nanoseconds at `sample_rate`, truncating.
///
/// The product is computed in 128 bits so long-running streams cannot overflow.
pub fn samples_to_nseconds(samples: u64, sample_rate: u32) -> u64 {
    (samples as u128 * NSEC_PER_SEC as u128 / sample_rate as u128) as u64
}

/// An immutable buffer of little-endian 16-bit samples with its timing.
///
/// Ownership moves into the sink on push; the feeder keeps nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    data: Vec<u8>,
    pts: u64,
    duration: u64,
}

impl AudioChunk {
    /// Packs `samples` and stamps them as starting at sample `first_sample`.
    pub fn from_samples(samples: &[u16], first_sample: u64, sample_rate: u32) -> Self {
        let mut data = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
        for sample in samples {
            data.extend_from_slice(&sample.to_le_bytes());
        }

        AudioChunk {
            data,
            pts: samples_to_nseconds(first_sample, sample_rate),
            duration: samples_to_nseconds(samples.len() as u64, sample_rate),
        }
    }

    /// Raw sample bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Presentation timestamp in nanoseconds.
    pub fn pts(&self) -> u64 {
        self.pts
    }

    /// Duration in nanoseconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn num_samples(&self) -> usize {
        self.data.len() / BYTES_PER_SAMPLE
    }

    /// Decodes the packed samples.
    pub fn samples(&self) -> impl Iterator<Item = u16> + '_ {
        self.data
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
    }
}
