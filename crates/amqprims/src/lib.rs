//! AMQP 0-9-1 client handshake primitives.
//!
//! amqprims opens a connection to an AMQP broker, sends the protocol header,
//! and waits for the broker's `connection.start`, reconnecting on failure.
//!
//! # Crate Structure
//!
//! - [`transport`]: byte-stream transport abstraction and a TCP implementation
//! - [`frame`]: frame delineation, the protocol header, and `connection.start` decoding
//! - [`session`]: handshake state machine with reconnect (behind `session` feature)

/// Re-export transport types.
pub mod transport {
    pub use amqprims_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use amqprims_frame::*;
}

/// Re-export session types (requires `session` feature).
#[cfg(feature = "session")]
pub mod session {
    pub use amqprims_session::*;
}
