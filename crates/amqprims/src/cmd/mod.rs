use std::time::Duration;

use amqprims_frame::DEFAULT_MAX_FRAME_SIZE;
use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod connect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to a broker and wait for connection.start.
    Connect(ConnectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Connect(args) => connect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Broker host name or IP address.
    #[arg(default_value = "127.0.0.1")]
    pub address: String,
    /// Broker port.
    #[arg(default_value_t = 5672)]
    pub port: u16,
    /// Maximum time to wait for connection.start (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub run_for: String,
    /// Delay before reconnecting after a failed attempt.
    #[arg(long, default_value = "1s")]
    pub backoff: String,
    /// Connect timeout for each attempt.
    #[arg(long, default_value = "5s")]
    pub connect_timeout: String,
    /// Maximum time to wait for the disconnect on shutdown.
    #[arg(long, default_value = "5s")]
    pub stop_timeout: String,
    /// Largest frame payload accepted from the broker, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_SIZE)]
    pub max_frame_size: usize,
    /// Print every session event as a JSON line on stdout.
    #[arg(long)]
    pub events: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert_eq!(parse_duration("0s").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("bad").unwrap_err().code, USAGE);
        assert!(parse_duration(" ").is_err());
    }
}
