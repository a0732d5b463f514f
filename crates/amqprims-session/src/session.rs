use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, Weak};
use std::time::Duration;

use amqprims_frame::{ConnectionStart, FrameConfig, ProtocolVersion, RecvBuffer, PROTOCOL_HEADER};
use amqprims_transport::{Transport, TransportError, TransportHandler};
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::decoder::{CommandDecoder, MethodDecoder};
use crate::error::{Result, SessionError};
use crate::event::{EventBus, SessionEvent};
use crate::handshake::{self, HandshakeState};

struct Inner {
    state: HandshakeState,
    stopped: bool,
    buffer: RecvBuffer,
    connection_start: Option<ConnectionStart>,
    reconnects: u64,
}

/// Client side of an AMQP 0-9-1 connection handshake with automatic reconnect.
///
/// A session owns its transport and receives the transport's events. Every
/// event is processed while holding one lock, so the handshake state is only
/// ever touched by one thread at a time.
///
/// On connect the session sends the protocol header and waits for the
/// broker's `connection.start`. Any failure closes the connection; a closed
/// connection is reopened after [`SessionConfig::reconnect_backoff`] unless
/// [`request_stop_and_disconnect`](Self::request_stop_and_disconnect) was
/// called.
pub struct Session<T: Transport, D: CommandDecoder = MethodDecoder> {
    id: Uuid,
    transport: Arc<T>,
    decoder: D,
    config: SessionConfig,
    inner: Mutex<Inner>,
    changed: Condvar,
    events: EventBus,
}

impl<T: Transport + 'static> Session<T> {
    /// Create a session using the default method decoder.
    pub fn new(transport: Arc<T>, config: SessionConfig) -> Arc<Self> {
        Self::with_decoder(transport, MethodDecoder, config)
    }
}

impl<T: Transport + 'static, D: CommandDecoder + 'static> Session<T, D> {
    /// Create a session with a substitute decoder and attach it to `transport`.
    pub fn with_decoder(transport: Arc<T>, decoder: D, config: SessionConfig) -> Arc<Self> {
        let buffer = RecvBuffer::with_config(FrameConfig {
            max_frame_size: config.max_frame_size,
        });
        let session = Arc::new(Self {
            id: transport.id(),
            transport,
            decoder,
            config,
            inner: Mutex::new(Inner {
                state: HandshakeState::Disconnected,
                stopped: false,
                buffer,
                connection_start: None,
                reconnects: 0,
            }),
            changed: Condvar::new(),
            events: EventBus::default(),
        });

        let weak: Weak<Self> = Arc::downgrade(&session);
        let handler: Weak<dyn TransportHandler> = weak;
        session.transport.attach(handler);
        session
    }
}

impl<T: Transport, D: CommandDecoder> Session<T, D> {
    /// Ask the transport to connect.
    pub fn connect(&self) -> Result<()> {
        if self.lock().stopped {
            return Err(SessionError::Stopped);
        }
        debug!(session_id = %self.id, "connecting");
        self.transport.connect_async()?;
        Ok(())
    }

    /// Stop reconnecting, disconnect, and wait for the transport to report
    /// that it is no longer connected.
    ///
    /// Returns [`SessionError::StopTimeout`] if that takes longer than
    /// [`SessionConfig::stop_timeout`]. Calling this again is harmless.
    pub fn request_stop_and_disconnect(&self) -> Result<()> {
        {
            let mut inner = self.lock();
            if !inner.stopped {
                inner.stopped = true;
                info!(session_id = %self.id, "stop requested");
            }
            // Wake a reconnect that is waiting out its backoff.
            self.changed.notify_all();
        }

        match self.transport.disconnect_async() {
            Ok(()) | Err(TransportError::NotConnected) => {}
            Err(err) => {
                warn!(session_id = %self.id, error = %err, "disconnect request failed");
                return Err(err.into());
            }
        }

        let inner = self.lock();
        let (_inner, waited) = self
            .changed
            .wait_timeout_while(inner, self.config.stop_timeout, |_| {
                self.transport.is_connected()
            })
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if waited.timed_out() && self.transport.is_connected() {
            warn!(
                session_id = %self.id,
                timeout = ?self.config.stop_timeout,
                "transport still connected after stop timeout"
            );
            return Err(SessionError::StopTimeout(self.config.stop_timeout));
        }
        Ok(())
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.events.subscribe(tx);
        rx
    }

    pub fn state(&self) -> HandshakeState {
        self.lock().state
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// The `connection.start` received on the current connection, if any.
    pub fn connection_start(&self) -> Option<ConnectionStart> {
        self.lock().connection_start.clone()
    }

    /// Number of reconnect attempts made so far.
    pub fn reconnects(&self) -> u64 {
        self.lock().reconnects
    }

    /// Identity of the underlying transport.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn fail_handshake(&self, inner: &mut Inner, err: SessionError) {
        error!(session_id = %self.id, error = %err, "handshake failed");
        inner.buffer.clear();
        inner.state = HandshakeState::Disconnected;

        if let Some(kind) = err.failure_kind() {
            self.events.emit(SessionEvent::HandshakeFailed {
                session_id: self.id,
                kind,
                reason: err.to_string(),
            });
        }
        self.close_connection();
    }

    fn close_connection(&self) {
        match self.transport.disconnect_async() {
            Ok(()) | Err(TransportError::NotConnected) => {}
            Err(err) => warn!(session_id = %self.id, error = %err, "disconnect request failed"),
        }
    }
}

impl<T: Transport, D: CommandDecoder> TransportHandler for Session<T, D> {
    fn on_connected(&self) {
        let mut inner = self.lock();
        if inner.stopped {
            drop(inner);
            info!(session_id = %self.id, "connected after stop was requested; disconnecting");
            self.close_connection();
            return;
        }

        inner.buffer.clear();
        inner.connection_start = None;
        inner.state = HandshakeState::AwaitHandshake;
        info!(session_id = %self.id, "connected, sending protocol header");
        self.events.emit(SessionEvent::Connected {
            session_id: self.id,
        });

        match self.transport.send(&PROTOCOL_HEADER) {
            Ok(()) => self.events.emit(SessionEvent::HeaderSent {
                session_id: self.id,
                version: ProtocolVersion::AMQP_0_9_1,
            }),
            Err(err) => {
                warn!(session_id = %self.id, error = %err, "failed to send protocol header");
                self.events.emit(SessionEvent::TransportError {
                    session_id: self.id,
                    reason: err.to_string(),
                });
            }
        }
    }

    fn on_disconnected(&self) {
        let mut inner = self.lock();
        inner.state = HandshakeState::Disconnected;
        inner.buffer.clear();
        self.changed.notify_all();

        if inner.stopped {
            info!(session_id = %self.id, "disconnected; session stopped");
            self.events.emit(SessionEvent::Disconnected {
                session_id: self.id,
                reconnect_in_ms: None,
            });
            self.events.emit(SessionEvent::Stopped {
                session_id: self.id,
            });
            return;
        }

        let backoff = self.config.reconnect_backoff;
        info!(session_id = %self.id, ?backoff, "disconnected; reconnecting after backoff");
        self.events.emit(SessionEvent::Disconnected {
            session_id: self.id,
            reconnect_in_ms: Some(u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX)),
        });

        let (mut inner, _) = self
            .changed
            .wait_timeout_while(inner, backoff, |inner| !inner.stopped)
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // The stop flag is only consulted here, under the lock, so a stop
        // either cancels this attempt or sees the connect already issued.
        if inner.stopped {
            info!(session_id = %self.id, "stop requested during backoff; not reconnecting");
            self.events.emit(SessionEvent::Stopped {
                session_id: self.id,
            });
            return;
        }

        inner.reconnects += 1;
        let attempt = inner.reconnects;
        self.events.emit(SessionEvent::Reconnecting {
            session_id: self.id,
            attempt,
        });
        if let Err(err) = self.transport.connect_async() {
            warn!(session_id = %self.id, attempt, error = %err, "reconnect failed to start");
            self.events.emit(SessionEvent::TransportError {
                session_id: self.id,
                reason: err.to_string(),
            });
        }
    }

    fn on_received(&self, bytes: &[u8]) {
        let mut inner = self.lock();
        match inner.state {
            HandshakeState::AwaitHandshake => {}
            HandshakeState::StartReceived => {
                debug!(session_id = %self.id, len = bytes.len(), "ignoring bytes after connection.start");
                return;
            }
            HandshakeState::Disconnected => {
                debug!(session_id = %self.id, len = bytes.len(), "ignoring bytes while disconnected");
                return;
            }
        }

        inner.buffer.extend(bytes);
        trace!(
            session_id = %self.id,
            received = bytes.len(),
            buffered = inner.buffer.len(),
            "handshake bytes"
        );

        match handshake::advance(&mut inner.buffer, &self.decoder) {
            Ok(None) => {}
            Ok(Some(start)) => {
                if !inner.buffer.is_empty() {
                    debug!(
                        session_id = %self.id,
                        trailing = inner.buffer.len(),
                        "discarding bytes buffered after connection.start"
                    );
                    inner.buffer.clear();
                }
                match start.server_product() {
                    Some((product, version)) => info!(
                        session_id = %self.id,
                        product,
                        version,
                        mechanisms = %start.mechanisms,
                        "received connection.start"
                    ),
                    None => info!(session_id = %self.id, "received connection.start"),
                }
                inner.state = HandshakeState::StartReceived;
                inner.connection_start = Some(start.clone());
                self.events.emit(SessionEvent::ConnectionStart {
                    session_id: self.id,
                    start,
                });
            }
            Err(err) => self.fail_handshake(&mut inner, err),
        }
    }

    fn on_error(&self, error: &TransportError) {
        warn!(session_id = %self.id, error = %error, "transport error");
        self.events.emit(SessionEvent::TransportError {
            session_id: self.id,
            reason: error.to_string(),
        });
    }
}
