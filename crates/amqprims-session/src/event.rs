use std::sync::mpsc::Sender;
use std::sync::Mutex;

use amqprims_frame::{ConnectionStart, ProtocolVersion};
use serde::Serialize;
use uuid::Uuid;

use crate::error::FailureKind;

/// Observable session lifecycle events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Connected {
        session_id: Uuid,
    },
    HeaderSent {
        session_id: Uuid,
        version: ProtocolVersion,
    },
    ConnectionStart {
        session_id: Uuid,
        start: ConnectionStart,
    },
    HandshakeFailed {
        session_id: Uuid,
        kind: FailureKind,
        reason: String,
    },
    TransportError {
        session_id: Uuid,
        reason: String,
    },
    /// `reconnect_in_ms` is `None` once the session is stopped.
    Disconnected {
        session_id: Uuid,
        reconnect_in_ms: Option<u64>,
    },
    Reconnecting {
        session_id: Uuid,
        attempt: u64,
    },
    Stopped {
        session_id: Uuid,
    },
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Connected { .. } => "connected",
            SessionEvent::HeaderSent { .. } => "header_sent",
            SessionEvent::ConnectionStart { .. } => "connection_start",
            SessionEvent::HandshakeFailed { .. } => "handshake_failed",
            SessionEvent::TransportError { .. } => "transport_error",
            SessionEvent::Disconnected { .. } => "disconnected",
            SessionEvent::Reconnecting { .. } => "reconnecting",
            SessionEvent::Stopped { .. } => "stopped",
        }
    }
}

/// Fan-out of events to subscribers; closed receivers are pruned on send.
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    subscribers: Mutex<Vec<Sender<SessionEvent>>>,
}

impl EventBus {
    pub(crate) fn subscribe(&self, tx: Sender<SessionEvent>) {
        self.lock().push(tx);
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        self.lock().retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Sender<SessionEvent>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
