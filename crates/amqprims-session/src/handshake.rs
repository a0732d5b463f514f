//! Classification of the first inbound frame of a connection.

use amqprims_frame::{CommandId, ConnectionStart, Frame, FrameType, Parsed, RecvBuffer};
use serde::Serialize;

use crate::decoder::CommandDecoder;
use crate::error::{Result, SessionError};

/// Where a session is in the connection handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeState {
    /// No connection, or the last one failed.
    Disconnected,
    /// Protocol header sent; waiting for the broker's first frame.
    AwaitHandshake,
    /// `connection.start` was received on the current connection.
    StartReceived,
}

impl HandshakeState {
    pub fn as_str(self) -> &'static str {
        match self {
            HandshakeState::Disconnected => "disconnected",
            HandshakeState::AwaitHandshake => "await_handshake",
            HandshakeState::StartReceived => "start_received",
        }
    }
}

/// Try to complete the handshake from the buffered bytes.
///
/// `Ok(None)` means more bytes are needed. On error the offending bytes stay
/// buffered.
pub fn advance(
    buffer: &mut RecvBuffer,
    decoder: &dyn CommandDecoder,
) -> Result<Option<ConnectionStart>> {
    let frame = match buffer.peek() {
        Parsed::Incomplete => return Ok(None),
        Parsed::ProtocolHeaderEcho => {
            return Err(SessionError::version_mismatch(buffer.as_bytes()))
        }
        Parsed::Malformed(reason) => return Err(SessionError::MalformedFrame(reason)),
        Parsed::Frame(frame) => frame.to_frame(),
    };
    buffer.consume(frame.wire_size());
    dispatch_first_frame(&frame, decoder).map(Some)
}

/// The first frame must be a method frame on channel 0 carrying
/// `connection.start`.
pub fn dispatch_first_frame(
    frame: &Frame,
    decoder: &dyn CommandDecoder,
) -> Result<ConnectionStart> {
    if frame.frame_type != FrameType::Method || frame.channel != 0 {
        return Err(SessionError::UnexpectedFrame {
            frame_type: frame.frame_type,
            channel: frame.channel,
        });
    }

    let (command, args) =
        CommandId::split_payload(&frame.payload).map_err(SessionError::MalformedFrame)?;
    if command != CommandId::CONNECTION_START {
        return Err(SessionError::UnexpectedCommand { command });
    }

    Ok(decoder.decode_connection_start(args)?)
}
