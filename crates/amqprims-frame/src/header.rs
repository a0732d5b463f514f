//! The protocol header that opens every AMQP connection.

use std::fmt;

use serde::Serialize;

/// Length of the protocol header on the wire.
pub const PROTOCOL_HEADER_LEN: usize = 8;

/// Protocol header sent by the client: "AMQP" 0 0 9 1.
pub const PROTOCOL_HEADER: [u8; PROTOCOL_HEADER_LEN] = *b"AMQP\x00\x00\x09\x01";

/// Version carried in bytes 4..8 of a protocol header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProtocolVersion {
    pub protocol_id: u8,
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

impl ProtocolVersion {
    /// The version this crate speaks.
    pub const AMQP_0_9_1: Self = Self {
        protocol_id: 0,
        major: 0,
        minor: 9,
        revision: 1,
    };

    /// Parse a full protocol header, as a broker echoes it on version mismatch.
    ///
    /// Returns `None` unless `buf` starts with "AMQP" and holds all 8 bytes.
    pub fn parse_header(buf: &[u8]) -> Option<Self> {
        match buf {
            [b'A', b'M', b'Q', b'P', protocol_id, major, minor, revision, ..] => Some(Self {
                protocol_id: *protocol_id,
                major: *major,
                minor: *minor,
                revision: *revision,
            }),
            _ => None,
        }
    }

    /// Encode this version as a protocol header.
    pub fn to_header(self) -> [u8; PROTOCOL_HEADER_LEN] {
        [
            b'A',
            b'M',
            b'Q',
            b'P',
            self.protocol_id,
            self.major,
            self.minor,
            self.revision,
        ]
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.major, self.minor, self.revision)?;
        if self.protocol_id != 0 {
            write!(f, " (protocol id {})", self.protocol_id)?;
        }
        Ok(())
    }
}
