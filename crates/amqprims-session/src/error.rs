use std::time::Duration;

use amqprims_frame::{CommandId, DecodeError, FrameType, Malformed, ProtocolVersion};
use amqprims_transport::TransportError;
use serde::Serialize;

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The broker answered the protocol header with its own header.
    #[error("protocol version mismatch: broker offered {}", describe_version(.server))]
    HandshakeVersionMismatch { server: Option<ProtocolVersion> },

    /// The first frame could not be delineated.
    #[error("malformed frame: {0}")]
    MalformedFrame(Malformed),

    /// The first frame was not a method frame on channel 0.
    #[error("unexpected {} frame on channel {} during handshake", .frame_type.name(), .channel)]
    UnexpectedFrame { frame_type: FrameType, channel: u16 },

    /// The first method was not `connection.start`.
    #[error("unexpected command {command} (expected connection.start)")]
    UnexpectedCommand { command: CommandId },

    /// The `connection.start` arguments could not be decoded.
    #[error("failed to decode connection.start: {0}")]
    Decode(#[from] DecodeError),

    /// The transport did not finish disconnecting in time.
    #[error("disconnect did not complete within {0:?}")]
    StopTimeout(Duration),

    /// The session was stopped and will not connect again.
    #[error("session stopped")]
    Stopped,
}

/// Category of a failed handshake, carried in diagnostic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    VersionMismatch,
    MalformedFrame,
    UnexpectedFrame,
    UnexpectedCommand,
    Decode,
}

impl SessionError {
    /// The handshake failure category, or `None` for errors that do not end
    /// a handshake.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            SessionError::HandshakeVersionMismatch { .. } => Some(FailureKind::VersionMismatch),
            SessionError::MalformedFrame(_) => Some(FailureKind::MalformedFrame),
            SessionError::UnexpectedFrame { .. } => Some(FailureKind::UnexpectedFrame),
            SessionError::UnexpectedCommand { .. } => Some(FailureKind::UnexpectedCommand),
            SessionError::Decode(_) => Some(FailureKind::Decode),
            _ => None,
        }
    }

    /// Version mismatch for an echoed header, naming the offered version
    /// once all 8 header bytes are buffered.
    pub(crate) fn version_mismatch(buffered: &[u8]) -> Self {
        SessionError::HandshakeVersionMismatch {
            server: ProtocolVersion::parse_header(buffered),
        }
    }
}

fn describe_version(version: &Option<ProtocolVersion>) -> String {
    match version {
        Some(version) => format!("AMQP {version}"),
        None => "an incomplete header".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_mismatch_names_offered_version() {
        let err = SessionError::version_mismatch(b"AMQP\x00\x01\x00\x00");
        assert_eq!(
            err.to_string(),
            "protocol version mismatch: broker offered AMQP 1-0-0"
        );
        assert_eq!(err.failure_kind(), Some(FailureKind::VersionMismatch));

        let partial = SessionError::version_mismatch(b"AMQ");
        assert!(matches!(
            partial,
            SessionError::HandshakeVersionMismatch { server: None }
        ));
    }

    #[test]
    fn malformed_and_transport_errors_classify() {
        let err = SessionError::MalformedFrame(Malformed::BadEndMarker { found: 0 });
        assert_eq!(err.failure_kind(), Some(FailureKind::MalformedFrame));
        assert_eq!(
            SessionError::Transport(TransportError::NotConnected).failure_kind(),
            None
        );
    }

    #[test]
    fn unexpected_frame_message() {
        let err = SessionError::UnexpectedFrame {
            frame_type: FrameType::Heartbeat,
            channel: 0,
        };
        assert_eq!(
            err.to_string(),
            "unexpected HEARTBEAT frame on channel 0 during handshake"
        );
    }
}
