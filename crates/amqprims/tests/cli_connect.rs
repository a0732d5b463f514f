#![cfg(feature = "cli")]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Command, Output};
use std::thread;
use std::time::{Duration, Instant};

use amqprims_frame::{encode_frame, ConnectionStart, FieldTable, FrameType, PROTOCOL_HEADER};
use bytes::BytesMut;

fn start_frame() -> Vec<u8> {
    let mut capabilities = FieldTable::new();
    capabilities.insert("publisher_confirms", true);
    let mut server_properties = FieldTable::new();
    server_properties.insert("product", "RabbitMQ");
    server_properties.insert("version", "3.13.0");
    server_properties.insert("capabilities", capabilities);
    let start = ConnectionStart {
        version_major: 0,
        version_minor: 9,
        server_properties,
        mechanisms: "PLAIN AMQPLAIN".to_string(),
        locales: "en_US".to_string(),
    };
    let mut payload = BytesMut::new();
    start.encode(&mut payload);
    let mut wire = BytesMut::new();
    encode_frame(FrameType::Method, 0, &payload, &mut wire).expect("frame should encode");
    wire.to_vec()
}

/// Accepts connections forever, answering each protocol header with `reply`.
fn spawn_broker(reply: Vec<u8>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let port = listener.local_addr().expect("local addr").port();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            let reply = reply.clone();
            thread::spawn(move || serve(stream, &reply));
        }
    });
    port
}

fn serve(mut stream: TcpStream, reply: &[u8]) {
    let mut header = [0u8; 8];
    if stream.read_exact(&mut header).is_err() || header != PROTOCOL_HEADER {
        return;
    }
    let _ = stream.write_all(reply);
    let mut rest = Vec::new();
    let _ = stream.read_to_end(&mut rest);
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_amqprims"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("amqprims should run")
}

#[test]
fn connect_prints_connection_start_as_json() {
    let port = spawn_broker(start_frame());
    let port = port.to_string();

    let output = run_cli(&["--format", "json", "connect", "127.0.0.1", &port]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("stdout should be one JSON object");
    assert_eq!(json["product"], "RabbitMQ");
    assert_eq!(json["protocol"], "0-9");
    assert_eq!(json["mechanisms"][1], "AMQPLAIN");
    assert_eq!(
        json["server_properties"]["capabilities"]["publisher_confirms"],
        true
    );
}

#[test]
fn connect_table_output_lists_properties() {
    let port = spawn_broker(start_frame()).to_string();

    let output = run_cli(&["--format", "table", "connect", "127.0.0.1", &port]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RabbitMQ"));
    assert!(stdout.contains("publisher_confirms"));
}

#[test]
fn version_mismatch_keeps_retrying_then_fails() {
    let port = spawn_broker(b"AMQP\x00\x01\x00\x00".to_vec()).to_string();

    let started = Instant::now();
    let output = run_cli(&[
        "connect",
        "127.0.0.1",
        &port,
        "--run-for",
        "600ms",
        "--backoff",
        "100ms",
        "--events",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(started.elapsed() < Duration::from_secs(10));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let failures = stdout
        .lines()
        .filter(|line| line.contains(r#""event":"handshake_failed""#))
        .count();
    assert!(failures >= 2, "expected retries, got:\n{stdout}");
    assert!(stdout.contains(r#""kind":"version_mismatch""#));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no connection.start"));
}

#[test]
fn unreachable_broker_exits_with_failure() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
        listener.local_addr().expect("local addr").port()
    };

    let output = run_cli(&[
        "connect",
        "127.0.0.1",
        &port.to_string(),
        "--run-for",
        "300ms",
        "--backoff",
        "50ms",
    ]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn invalid_duration_is_usage_error() {
    let output = run_cli(&["connect", "--run-for", "soon"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_prints_package_version() {
    let output = run_cli(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("amqprims {}", env!("CARGO_PKG_VERSION"))
    );
}
