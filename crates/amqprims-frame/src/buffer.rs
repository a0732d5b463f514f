use bytes::{Buf, BytesMut};

use crate::codec::{decode_frame, try_parse, Frame, FrameConfig, Parsed};
use crate::error::Result;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Growable receive buffer that turns arbitrary byte chunks into frames.
///
/// Bytes that do not yet form a complete frame stay buffered across calls to
/// [`extend`](Self::extend); the read position only moves past frames that
/// were fully decoded.
#[derive(Debug)]
pub struct RecvBuffer {
    buf: BytesMut,
    config: FrameConfig,
}

impl RecvBuffer {
    /// Create a receive buffer with default configuration.
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    /// Create a receive buffer with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Append received bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Look at the buffered bytes without consuming anything.
    pub fn peek(&self) -> Parsed<'_> {
        try_parse(&self.buf, self.config.max_frame_size)
    }

    /// Take the next complete frame, if one is buffered.
    ///
    /// Errors leave the buffer untouched; callers that give up on the
    /// connection should [`clear`](Self::clear) it.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        decode_frame(&mut self.buf, self.config.max_frame_size)
    }

    /// Drop the first `len` buffered bytes, typically a frame returned by
    /// [`peek`](Self::peek).
    pub fn consume(&mut self, len: usize) {
        let len = len.min(self.buf.len());
        self.buf.advance(len);
    }

    /// The buffered, not yet consumed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Drop all buffered bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Update maximum frame size for subsequent decoding.
    pub fn set_max_frame_size(&mut self, max_frame_size: usize) {
        self.config.max_frame_size = max_frame_size;
    }

    /// Current buffer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Default for RecvBuffer {
    fn default() -> Self {
        Self::new()
    }
}
