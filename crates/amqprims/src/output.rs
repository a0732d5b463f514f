use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use amqprims_frame::{ConnectionStart, FieldTable, FieldValue};
use amqprims_session::SessionEvent;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ConnectionStartOutput<'a> {
    broker: &'a str,
    session_id: &'a str,
    protocol: String,
    product: Option<&'a str>,
    version: Option<&'a str>,
    mechanisms: Vec<&'a str>,
    locales: Vec<&'a str>,
    server_properties: &'a FieldTable,
    timestamp: String,
}

pub fn print_connection_start(
    start: &ConnectionStart,
    broker: &str,
    session_id: &str,
    format: OutputFormat,
) {
    let product = start.server_product();
    let protocol = format!("{}-{}", start.version_major, start.version_minor);

    match format {
        OutputFormat::Json => {
            let out = ConnectionStartOutput {
                broker,
                session_id,
                protocol,
                product: product.map(|(name, _)| name),
                version: product.map(|(_, version)| version),
                mechanisms: start.mechanisms().collect(),
                locales: start.locales().collect(),
                server_properties: &start.server_properties,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["broker".to_string(), broker.to_string()])
                .add_row(vec!["protocol".to_string(), protocol])
                .add_row(vec![
                    "mechanisms".to_string(),
                    start.mechanisms().collect::<Vec<_>>().join(" "),
                ])
                .add_row(vec![
                    "locales".to_string(),
                    start.locales().collect::<Vec<_>>().join(" "),
                ]);
            for (key, value) in start.server_properties.iter() {
                table.add_row(vec![key.to_string(), render_value(value)]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let (name, version) = product.unwrap_or(("unknown", ""));
            println!(
                "broker={broker} protocol={protocol} product={name} version={version} mechanisms=[{}] locales=[{}]",
                start.mechanisms().collect::<Vec<_>>().join(","),
                start.locales().collect::<Vec<_>>().join(","),
            );
        }
    }
}

/// One JSON object per line.
pub fn print_event(event: &SessionEvent) {
    println!(
        "{}",
        serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string())
    );
}

fn render_value(value: &FieldValue) -> String {
    match value.as_str() {
        Some(text) => text.to_string(),
        None => serde_json::to_string(value).unwrap_or_else(|_| "<unprintable>".to_string()),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_values_as_json() {
        let mut capabilities = FieldTable::new();
        capabilities.insert("publisher_confirms", true);
        assert_eq!(
            render_value(&FieldValue::from(capabilities)),
            r#"{"publisher_confirms":true}"#
        );
        assert_eq!(render_value(&FieldValue::from("RabbitMQ")), "RabbitMQ");
    }
}
