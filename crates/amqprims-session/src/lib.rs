//! Client-side AMQP 0-9-1 connection handshake.
//!
//! A [`Session`] drives one [`Transport`](amqprims_transport::Transport):
//! it sends the protocol header on connect, waits for the broker's
//! `connection.start`, and reconnects after a fixed backoff whenever the
//! connection drops, until asked to stop.

pub mod config;
pub mod decoder;
pub mod error;
pub mod event;
pub mod handshake;
pub mod session;

pub use config::SessionConfig;
pub use decoder::{CommandDecoder, MethodDecoder};
pub use error::{FailureKind, Result, SessionError};
pub use event::SessionEvent;
pub use handshake::HandshakeState;
pub use session::Session;
