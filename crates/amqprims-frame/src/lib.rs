//! AMQP 0-9-1 frame delineation for client handshakes.
//!
//! Every frame on the wire is:
//! - a 1-byte frame type (method, header, body, heartbeat)
//! - a 2-byte big-endian channel
//! - a 4-byte big-endian payload size
//! - the payload, then the frame-end marker `0xCE`
//!
//! [`try_parse`] finds frame boundaries in a byte slice without consuming it;
//! [`RecvBuffer`] keeps partial frames across reads. [`ConnectionStart`]
//! decodes the first method a broker sends.

pub mod buffer;
pub mod codec;
pub mod error;
pub mod header;
pub mod method;

#[cfg(feature = "async")]
pub mod async_codec;

#[cfg(feature = "async")]
pub use async_codec::AmqpFrameCodec;
pub use buffer::RecvBuffer;
pub use codec::{
    decode_frame, encode_frame, try_parse, Frame, FrameConfig, FrameRef, FrameType, Parsed,
    DEFAULT_MAX_FRAME_SIZE, FRAME_END, FRAME_HEADER_SIZE, FRAME_OVERHEAD,
};
pub use error::{DecodeError, FrameError, Malformed, Result};
pub use header::{ProtocolVersion, PROTOCOL_HEADER, PROTOCOL_HEADER_LEN};
pub use method::{CommandId, ConnectionStart, FieldTable, FieldValue, MAX_FIELD_NESTING};
