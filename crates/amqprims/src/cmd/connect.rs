use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use amqprims_frame::ConnectionStart;
use amqprims_session::{Session, SessionConfig, SessionEvent};
use amqprims_transport::{TcpTransport, TransportConfig};

use crate::cmd::{parse_duration, ConnectArgs};
use crate::exit::{session_error, CliError, CliResult, FAILURE, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_connection_start, print_event, OutputFormat};

/// How often the wait loop checks for Ctrl-C.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(args: ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let run_for = parse_duration(&args.run_for)?;
    let backoff = parse_duration(&args.backoff)?;
    let connect_timeout = parse_duration(&args.connect_timeout)?;
    let stop_timeout = parse_duration(&args.stop_timeout)?;
    if args.max_frame_size == 0 {
        return Err(CliError::new(USAGE, "max frame size must be greater than zero"));
    }

    let broker = broker_addr(&args.address, args.port);
    let transport = Arc::new(TcpTransport::with_config(
        broker.clone(),
        TransportConfig {
            connect_timeout,
            ..TransportConfig::default()
        },
    ));
    let session = Session::new(
        transport,
        SessionConfig {
            reconnect_backoff: backoff,
            max_frame_size: args.max_frame_size,
            stop_timeout,
        },
    );
    let events = session.subscribe();

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    tracing::info!(%broker, ?run_for, "connecting");
    session
        .connect()
        .map_err(|err| session_error("connect failed", err))?;

    let start = wait_for_start(&events, &running, run_for, args.events);

    session
        .request_stop_and_disconnect()
        .map_err(|err| session_error("disconnect failed", err))?;
    if args.events {
        for event in events.try_iter() {
            print_event(&event);
        }
    }

    match start {
        Some(start) => {
            print_connection_start(&start, &broker, &session.id().to_string(), format);
            Ok(SUCCESS)
        }
        None if !running.load(Ordering::SeqCst) => Err(CliError::new(
            FAILURE,
            "interrupted before connection.start was received",
        )),
        None => Err(CliError::new(
            FAILURE,
            format!("no connection.start from {broker} within {run_for:?}"),
        )),
    }
}

fn wait_for_start(
    events: &std::sync::mpsc::Receiver<SessionEvent>,
    running: &AtomicBool,
    run_for: Duration,
    print_events: bool,
) -> Option<ConnectionStart> {
    let deadline = Instant::now() + run_for;

    while running.load(Ordering::SeqCst) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        match events.recv_timeout(remaining.min(POLL_INTERVAL)) {
            Ok(event) => {
                if print_events {
                    print_event(&event);
                }
                if let SessionEvent::ConnectionStart { start, .. } = event {
                    return Some(start);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    None
}

/// `host:port`, bracketing bare IPv6 literals.
fn broker_addr(address: &str, port: u16) -> String {
    if address.contains(':') && !address.starts_with('[') {
        format!("[{address}]:{port}")
    } else {
        format!("{address}:{port}")
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use amqprims_frame::FieldTable;

    use super::*;

    #[test]
    fn brackets_ipv6_literals() {
        assert_eq!(broker_addr("127.0.0.1", 5672), "127.0.0.1:5672");
        assert_eq!(broker_addr("::1", 5672), "[::1]:5672");
        assert_eq!(broker_addr("[::1]", 5672), "[::1]:5672");
    }

    #[test]
    fn wait_returns_first_connection_start() {
        let (tx, rx) = mpsc::channel();
        let start = ConnectionStart {
            version_major: 0,
            version_minor: 9,
            server_properties: FieldTable::new(),
            mechanisms: "PLAIN".to_string(),
            locales: "en_US".to_string(),
        };
        tx.send(SessionEvent::Connected {
            session_id: Default::default(),
        })
        .unwrap();
        tx.send(SessionEvent::ConnectionStart {
            session_id: Default::default(),
            start: start.clone(),
        })
        .unwrap();

        let running = AtomicBool::new(true);
        let got = wait_for_start(&rx, &running, Duration::from_secs(1), false);
        assert_eq!(got, Some(start));
    }

    #[test]
    fn wait_gives_up_after_run_for() {
        let (_tx, rx) = mpsc::channel::<SessionEvent>();
        let running = AtomicBool::new(true);
        let started = Instant::now();

        assert!(wait_for_start(&rx, &running, Duration::from_millis(150), false).is_none());
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn wait_stops_when_interrupted() {
        let (_tx, rx) = mpsc::channel::<SessionEvent>();
        let running = AtomicBool::new(false);
        assert!(wait_for_start(&rx, &running, Duration::from_secs(30), false).is_none());
    }
}
