/// Why a complete frame header could not be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Malformed {
    /// The byte after the payload is not the frame-end marker.
    #[error("bad frame end marker 0x{found:02X} (expected 0xCE)")]
    BadEndMarker { found: u8 },

    /// The declared frame size exceeds the configured maximum.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The frame type byte is not a known AMQP 0-9-1 frame type.
    #[error("unknown frame type {0}")]
    UnknownFrameType(u8),

    /// A method frame payload is too short to carry a class/method id.
    #[error("method payload too short ({0} bytes, need 4)")]
    MethodTooShort(usize),
}

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The peer sent a protocol header where a frame was expected.
    #[error("peer sent a protocol header instead of a frame")]
    ProtocolHeaderEcho,

    /// A frame header was complete but invalid.
    #[error("malformed frame: {0}")]
    Malformed(#[from] Malformed),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

/// Errors from decoding method arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The argument data ended before a field was complete.
    #[error("truncated method arguments (need {needed} bytes, {remaining} left)")]
    Truncated { needed: usize, remaining: usize },

    /// A field table carried a value type tag this decoder does not know.
    #[error("unknown field value type 0x{0:02X}")]
    UnknownFieldType(u8),

    /// A short string was not valid UTF-8.
    #[error("short string is not valid UTF-8")]
    InvalidUtf8,

    /// Field tables or arrays were nested deeper than the decoder allows.
    #[error("field tables nested deeper than {max} levels")]
    NestingTooDeep { max: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
