//! `tokio_util` codec over the same wire format, for callers that drive a
//! `Framed` stream instead of a transport handler.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_frame, encode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Malformed};

/// Frame codec for `tokio_util::codec::Framed`.
#[derive(Debug, Clone, Default)]
pub struct AmqpFrameCodec {
    config: FrameConfig,
}

impl AmqpFrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }
}

impl Decoder for AmqpFrameCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        decode_frame(src, self.config.max_frame_size)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        match self.decode(buf)? {
            Some(frame) => Ok(Some(frame)),
            None if buf.is_empty() => Ok(None),
            None => Err(FrameError::ConnectionClosed),
        }
    }
}

impl Encoder<Frame> for AmqpFrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        if item.wire_size() > self.config.max_frame_size {
            return Err(Malformed::FrameTooLarge {
                size: item.wire_size(),
                max: self.config.max_frame_size,
            }
            .into());
        }
        encode_frame(item.frame_type, item.channel, &item.payload, dst)
    }
}
