// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

use crate::{AudioChunk, FlowError};

/// Downstream consumer of generated chunks.
///
/// `push_buffer` is synchronous: it returns the flow status before the
/// feeder continues.
pub trait BufferSink {
    fn push_buffer(&mut self, chunk: AudioChunk) -> Result<(), FlowError>;
}

impl<T: BufferSink + ?Sized> BufferSink for &mut T {
    fn push_buffer(&mut self, chunk: AudioChunk) -> Result<(), FlowError> {
        (**self).push_buffer(chunk)
    }
}
