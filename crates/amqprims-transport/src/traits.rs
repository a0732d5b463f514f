use std::sync::Weak;

use uuid::Uuid;

use crate::error::{Result, TransportError};

/// Capability set a byte-stream transport exposes to its owner.
///
/// Calls are non-blocking requests: completion is reported through the
/// attached [`TransportHandler`], usually from the transport's own I/O thread.
/// Implementations must not invoke the handler from inside these calls; a
/// handler may hold its own locks while calling into the transport.
pub trait Transport: Send + Sync {
    /// Stable identity of this transport, used to tag diagnostics.
    fn id(&self) -> Uuid;

    /// Register the receiver of transport events.
    ///
    /// The handler is held weakly so a handler that owns the transport does
    /// not form a reference cycle.
    fn attach(&self, handler: Weak<dyn TransportHandler>);

    /// Start connecting. Reports `on_connected` on success, or `on_error`
    /// followed by `on_disconnected` on failure.
    fn connect_async(&self) -> Result<()>;

    /// Start disconnecting. Reports `on_disconnected` once the connection is gone.
    fn disconnect_async(&self) -> Result<()>;

    /// Write all bytes to the connected peer.
    fn send(&self, bytes: &[u8]) -> Result<()>;

    /// Whether a connection is currently established.
    fn is_connected(&self) -> bool;
}

/// Receiver of transport events.
///
/// Events for one connection are delivered in order from a single thread.
pub trait TransportHandler: Send + Sync {
    fn on_connected(&self);

    fn on_disconnected(&self);

    /// Inbound bytes. The slice is only valid for the duration of the call.
    fn on_received(&self, buffer: &[u8]);

    fn on_error(&self, error: &TransportError);
}
