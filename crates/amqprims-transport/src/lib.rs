//! Byte-stream transport abstraction for AMQP clients.
//!
//! The transport is the lowest layer of amqprims: it connects, moves bytes,
//! and reports what happened through [`TransportHandler`] events. Protocol
//! state lives above it, in whatever implements the handler.
//!
//! [`TcpTransport`] is the provided implementation over `std::net`.

pub mod error;
pub mod tcp;
pub mod traits;

pub use error::{Result, TransportError};
pub use tcp::{TcpTransport, TransportConfig};
pub use traits::{Transport, TransportHandler};
