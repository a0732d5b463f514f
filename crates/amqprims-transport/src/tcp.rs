use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, TransportError};
use crate::traits::{Transport, TransportHandler};

const STATUS_IDLE: u8 = 0;
const STATUS_CONNECTING: u8 = 1;
const STATUS_CONNECTED: u8 = 2;

/// Configuration for [`TcpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Timeout for each connect attempt. Default: 5 seconds.
    pub connect_timeout: Duration,
    /// Size of the chunk handed to `on_received`. Default: 8 KiB.
    pub read_buffer_size: usize,
    /// Disable Nagle's algorithm on the socket. Default: true.
    pub nodelay: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_buffer_size: 8 * 1024,
            nodelay: true,
        }
    }
}

/// Blocking TCP client transport.
///
/// Each connect attempt runs on its own I/O thread: the thread connects,
/// reports `on_connected`, then reads until EOF or error and reports
/// `on_disconnected`. Writes go through a cloned handle of the same socket.
pub struct TcpTransport {
    id: Uuid,
    addr: String,
    config: TransportConfig,
    shared: Arc<Shared>,
}

struct Shared {
    handler: RwLock<Option<Weak<dyn TransportHandler>>>,
    status: AtomicU8,
    closing: AtomicBool,
    writer: Mutex<Option<TcpStream>>,
}

impl TcpTransport {
    /// Create a transport for `addr` (`host:port`) with default configuration.
    pub fn new(addr: impl Into<String>) -> Self {
        Self::with_config(addr, TransportConfig::default())
    }

    /// Create a transport with explicit configuration.
    pub fn with_config(addr: impl Into<String>, config: TransportConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            addr: addr.into(),
            config,
            shared: Arc::new(Shared {
                handler: RwLock::new(None),
                status: AtomicU8::new(STATUS_IDLE),
                closing: AtomicBool::new(false),
                writer: Mutex::new(None),
            }),
        }
    }

    /// The broker address this transport connects to.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Transport for TcpTransport {
    fn id(&self) -> Uuid {
        self.id
    }

    fn attach(&self, handler: Weak<dyn TransportHandler>) {
        let mut slot = self
            .shared
            .handler
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(handler);
    }

    fn connect_async(&self) -> Result<()> {
        self.shared
            .status
            .compare_exchange(
                STATUS_IDLE,
                STATUS_CONNECTING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| TransportError::AlreadyConnected)?;
        self.shared.closing.store(false, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        let addr = self.addr.clone();
        let config = self.config.clone();
        let id = self.id;

        let spawned = std::thread::Builder::new()
            .name("amqprims-tcp-io".to_string())
            .spawn(move || run_connection(shared, id, addr, config));

        if let Err(err) = spawned {
            self.shared.status.store(STATUS_IDLE, Ordering::Release);
            return Err(TransportError::Io(err));
        }

        debug!(id = %self.id, addr = %self.addr, "connect started");
        Ok(())
    }

    fn disconnect_async(&self) -> Result<()> {
        let writer = self.shared.lock_writer();
        let stream = writer.as_ref().ok_or(TransportError::NotConnected)?;
        self.shared.closing.store(true, Ordering::Release);
        match stream.shutdown(Shutdown::Both) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotConnected => {}
            Err(err) => return Err(TransportError::Io(err)),
        }
        debug!(id = %self.id, "disconnect requested");
        Ok(())
    }

    fn send(&self, bytes: &[u8]) -> Result<()> {
        let writer = self.shared.lock_writer();
        let mut stream = writer.as_ref().ok_or(TransportError::NotConnected)?;
        stream.write_all(bytes)?;
        stream.flush()?;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.shared.status.load(Ordering::Acquire) == STATUS_CONNECTED
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if let Some(stream) = self.shared.lock_writer().as_ref() {
            self.shared.closing.store(true, Ordering::Release);
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("id", &self.id)
            .field("addr", &self.addr)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Shared {
    fn lock_writer(&self) -> std::sync::MutexGuard<'_, Option<TcpStream>> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, event: impl FnOnce(&dyn TransportHandler)) {
        let handler = self
            .handler
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .and_then(Weak::upgrade);
        match handler {
            Some(handler) => event(handler.as_ref()),
            None => debug!("transport event dropped: no handler attached"),
        }
    }

    fn fail_connect(&self, err: TransportError) {
        warn!(error = %err, "connect failed");
        self.status.store(STATUS_IDLE, Ordering::Release);
        self.notify(|h| h.on_error(&err));
        self.notify(|h| h.on_disconnected());
    }
}

fn run_connection(shared: Arc<Shared>, id: Uuid, addr: String, config: TransportConfig) {
    let mut stream = match open_stream(&addr, &config) {
        Ok(stream) => stream,
        Err(err) => return shared.fail_connect(err),
    };

    match stream.try_clone() {
        Ok(writer) => *shared.lock_writer() = Some(writer),
        Err(err) => return shared.fail_connect(TransportError::Io(err)),
    }

    shared.status.store(STATUS_CONNECTED, Ordering::Release);
    info!(%id, %addr, "connected");
    shared.notify(|h| h.on_connected());

    let mut chunk = vec![0u8; config.read_buffer_size.max(1)];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => shared.notify(|h| h.on_received(&chunk[..n])),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                if !shared.closing.load(Ordering::Acquire) {
                    let err = TransportError::Io(err);
                    warn!(%id, error = %err, "read failed");
                    shared.notify(|h| h.on_error(&err));
                }
                break;
            }
        }
    }

    shared.lock_writer().take();
    shared.status.store(STATUS_IDLE, Ordering::Release);
    info!(%id, %addr, "disconnected");
    shared.notify(|h| h.on_disconnected());
}

fn open_stream(addr: &str, config: &TransportConfig) -> Result<TcpStream> {
    let candidates = addr
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolve {
            addr: addr.to_string(),
            source,
        })?;

    let mut last_err = std::io::Error::new(ErrorKind::AddrNotAvailable, "no addresses resolved");
    for candidate in candidates {
        match TcpStream::connect_timeout(&candidate, config.connect_timeout) {
            Ok(stream) => {
                stream.set_nodelay(config.nodelay)?;
                return Ok(stream);
            }
            Err(err) => {
                debug!(%candidate, error = %err, "connect attempt failed");
                last_err = err;
            }
        }
    }

    Err(TransportError::Connect {
        addr: addr.to_string(),
        source: last_err,
    })
}
