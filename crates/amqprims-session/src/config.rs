use std::time::Duration;

use amqprims_frame::DEFAULT_MAX_FRAME_SIZE;

/// Configuration for a [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Delay between losing a connection and the next connect attempt.
    pub reconnect_backoff: Duration,
    /// Largest frame payload accepted during the handshake.
    pub max_frame_size: usize,
    /// Upper bound on how long
    /// [`request_stop_and_disconnect`](crate::Session::request_stop_and_disconnect)
    /// waits for the transport to report disconnection.
    pub stop_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_backoff: Duration::from_secs(1),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            stop_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.reconnect_backoff, Duration::from_secs(1));
        assert_eq!(config.stop_timeout, Duration::from_secs(5));
        assert_eq!(config.max_frame_size, DEFAULT_MAX_FRAME_SIZE);
    }
}
