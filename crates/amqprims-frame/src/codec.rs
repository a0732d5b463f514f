use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::{FrameError, Malformed, Result};

/// Frame header: type (1) + channel (2) + payload size (4) = 7 bytes.
pub const FRAME_HEADER_SIZE: usize = 7;

/// Marker byte terminating every frame.
pub const FRAME_END: u8 = 0xCE;

/// Bytes a frame occupies on the wire beyond its payload.
pub const FRAME_OVERHEAD: usize = FRAME_HEADER_SIZE + 1;

/// Default maximum frame size (header + payload + end marker): 128 KiB,
/// the frame-max RabbitMQ proposes by default.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 128 * 1024;

/// AMQP 0-9-1 frame types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum FrameType {
    Method = 1,
    Header = 2,
    Body = 3,
    Heartbeat = 8,
}

impl FrameType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Method),
            2 => Some(Self::Header),
            3 => Some(Self::Body),
            8 => Some(Self::Heartbeat),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Method => "METHOD",
            Self::Header => "HEADER",
            Self::Body => "BODY",
            Self::Heartbeat => "HEARTBEAT",
        }
    }
}

/// A frame whose payload borrows the buffer it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef<'a> {
    pub frame_type: FrameType,
    pub channel: u16,
    pub payload: &'a [u8],
}

impl FrameRef<'_> {
    /// The total wire size of this frame (header + payload + end marker).
    pub fn wire_size(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Copy the payload into an owned [`Frame`].
    pub fn to_frame(&self) -> Frame {
        Frame::new(
            self.frame_type,
            self.channel,
            Bytes::copy_from_slice(self.payload),
        )
    }
}

/// A frame that owns its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub frame_type: FrameType,
    pub channel: u16,
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(frame_type: FrameType, channel: u16, payload: impl Into<Bytes>) -> Self {
        Self {
            frame_type,
            channel,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + payload + end marker).
    pub fn wire_size(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Borrow this frame as a [`FrameRef`].
    pub fn as_frame_ref(&self) -> FrameRef<'_> {
        FrameRef {
            frame_type: self.frame_type,
            channel: self.channel,
            payload: self.payload.as_ref(),
        }
    }
}

/// Outcome of looking for one frame at the start of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed<'a> {
    /// More bytes are needed. Nothing was consumed.
    Incomplete,
    /// The buffer starts with 'A': the peer answered with a protocol header,
    /// which a broker does when it rejects the requested version.
    ProtocolHeaderEcho,
    /// A complete, well-formed frame.
    Frame(FrameRef<'a>),
    /// A complete frame header that cannot be accepted.
    Malformed(Malformed),
}

/// Look for a complete frame at the start of `buf`.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────────┬──────────────┬──────────────┬──────────┐
/// │ Type     │ Channel      │ Size         │ Payload      │ End      │
/// │ (1B)     │ (2B BE)      │ (4B BE)      │ (Size bytes) │ 0xCE     │
/// └──────────┴──────────────┴──────────────┴──────────────┴──────────┘
/// ```
///
/// `buf` is only read. A declared size above `max_frame_size` is rejected as
/// soon as the 7 header bytes are present.
pub fn try_parse(buf: &[u8], max_frame_size: usize) -> Parsed<'_> {
    let Some(&first) = buf.first() else {
        return Parsed::Incomplete;
    };
    if first == b'A' {
        return Parsed::ProtocolHeaderEcho;
    }
    if buf.len() < FRAME_HEADER_SIZE {
        return Parsed::Incomplete;
    }

    let channel = u16::from_be_bytes([buf[1], buf[2]]);
    let payload_size = u32::from_be_bytes([buf[3], buf[4], buf[5], buf[6]]) as usize;

    let total = payload_size.saturating_add(FRAME_OVERHEAD);
    if total > max_frame_size {
        return Parsed::Malformed(Malformed::FrameTooLarge {
            size: total,
            max: max_frame_size,
        });
    }
    if buf.len() < total {
        return Parsed::Incomplete;
    }

    let end = buf[FRAME_HEADER_SIZE + payload_size];
    if end != FRAME_END {
        return Parsed::Malformed(Malformed::BadEndMarker { found: end });
    }

    let Some(frame_type) = FrameType::from_u8(first) else {
        return Parsed::Malformed(Malformed::UnknownFrameType(first));
    };

    Parsed::Frame(FrameRef {
        frame_type,
        channel,
        payload: &buf[FRAME_HEADER_SIZE..FRAME_HEADER_SIZE + payload_size],
    })
}

/// Encode a frame into the wire format.
pub fn encode_frame(
    frame_type: FrameType,
    channel: u16,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(Malformed::FrameTooLarge {
            size: payload.len().saturating_add(FRAME_OVERHEAD),
            max: u32::MAX as usize,
        }
        .into());
    }
    dst.reserve(FRAME_OVERHEAD + payload.len());
    dst.put_u8(frame_type.as_u8());
    dst.put_u16(channel);
    dst.put_u32(payload.len() as u32);
    dst.put_slice(payload);
    dst.put_u8(FRAME_END);
    Ok(())
}

/// Decode a frame from a buffer, consuming it.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet, in
/// which case the buffer is left untouched. On success, only the frame's bytes
/// are consumed.
pub fn decode_frame(src: &mut BytesMut, max_frame_size: usize) -> Result<Option<Frame>> {
    let (frame_type, channel, payload_len) = match try_parse(src, max_frame_size) {
        Parsed::Incomplete => return Ok(None),
        Parsed::ProtocolHeaderEcho => return Err(FrameError::ProtocolHeaderEcho),
        Parsed::Malformed(reason) => return Err(reason.into()),
        Parsed::Frame(frame) => (frame.frame_type, frame.channel, frame.payload.len()),
    };

    src.advance(FRAME_HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();
    src.advance(1);

    Ok(Some(Frame {
        frame_type,
        channel,
        payload,
    }))
}

/// Configuration for frame decoding.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum frame size in bytes, including header and end marker.
    /// Default: 128 KiB.
    pub max_frame_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}
