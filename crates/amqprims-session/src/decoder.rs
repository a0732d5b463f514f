use amqprims_frame::{ConnectionStart, DecodeError};

/// Decodes method arguments for the session.
///
/// The session only ever asks for `connection.start`; a substitute decoder
/// can be injected with [`Session::with_decoder`](crate::Session::with_decoder).
pub trait CommandDecoder: Send + Sync {
    /// Decode `connection.start` from the bytes that follow the command id.
    fn decode_connection_start(&self, args: &[u8]) -> Result<ConnectionStart, DecodeError>;
}

/// Decoder backed by the field-table codec in `amqprims-frame`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MethodDecoder;

impl CommandDecoder for MethodDecoder {
    fn decode_connection_start(&self, args: &[u8]) -> Result<ConnectionStart, DecodeError> {
        ConnectionStart::decode(args)
    }
}
