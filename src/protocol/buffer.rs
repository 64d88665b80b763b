//! Receive buffer for accumulating partial reads.
//!
//! Socket reads rarely line up with frame boundaries: one read may carry
//! half a frame, or a frame and the start of the next. The buffer keeps
//! every byte that has not yet become part of a returned frame.

use bytes::{Bytes, BytesMut};

use super::codec::decode_frame_limited;
use crate::error::Result;

/// Default initial capacity (8 KB, one socket read)
pub const DEFAULT_CAPACITY: usize = 8 * 1024;

/// Append-only accumulator with frame extraction
#[derive(Debug)]
pub struct RecvBuffer {
    buffer: BytesMut,

    /// Largest field accepted from the peer; `None` means no cap
    max_field_size: Option<usize>,
}

impl RecvBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            max_field_size: None,
        }
    }

    /// Reject frames announcing a field larger than `max` bytes
    pub fn with_max_field_size(mut self, max: Option<usize>) -> Self {
        self.max_field_size = max;
        self
    }

    /// Append bytes from a socket read
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Take the next complete frame, if one is buffered
    ///
    /// Surplus bytes after the frame stay buffered for the next call.
    pub fn next_frame(&mut self) -> Result<Option<Vec<Bytes>>> {
        decode_frame_limited(&mut self.buffer, self.max_field_size)
    }

    /// Number of buffered, unconsumed bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop everything buffered (after the stream it came from is gone)
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for RecvBuffer {
    fn default() -> Self {
        Self::new()
    }
}
