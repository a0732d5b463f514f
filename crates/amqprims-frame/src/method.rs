//! Method identifiers and the `connection.start` arguments.
//!
//! A method frame payload starts with a big-endian class id and method id.
//! The arguments that follow use the AMQP 0-9-1 field encoding: octets,
//! big-endian integers, short strings (u8 length), long strings (u32 length)
//! and field tables.

use std::borrow::Cow;
use std::fmt;

use bytes::{Buf, BufMut, BytesMut};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::{DecodeError, Malformed};

/// Deepest nesting of field tables and arrays accepted inside a table.
pub const MAX_FIELD_NESTING: usize = 64;

/// Class id and method id packed as `class << 16 | method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CommandId(u32);

impl CommandId {
    pub const CONNECTION_START: Self = Self::new(10, 10);
    pub const CONNECTION_START_OK: Self = Self::new(10, 11);
    pub const CONNECTION_SECURE: Self = Self::new(10, 20);
    pub const CONNECTION_SECURE_OK: Self = Self::new(10, 21);
    pub const CONNECTION_TUNE: Self = Self::new(10, 30);
    pub const CONNECTION_TUNE_OK: Self = Self::new(10, 31);
    pub const CONNECTION_OPEN: Self = Self::new(10, 40);
    pub const CONNECTION_OPEN_OK: Self = Self::new(10, 41);
    pub const CONNECTION_CLOSE: Self = Self::new(10, 50);
    pub const CONNECTION_CLOSE_OK: Self = Self::new(10, 51);
    pub const CONNECTION_BLOCKED: Self = Self::new(10, 60);
    pub const CONNECTION_UNBLOCKED: Self = Self::new(10, 61);

    pub const fn new(class_id: u16, method_id: u16) -> Self {
        Self(((class_id as u32) << 16) | method_id as u32)
    }

    pub const fn from_u32(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub const fn class_id(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn method_id(self) -> u16 {
        self.0 as u16
    }

    /// Split a method frame payload into its command id and arguments.
    pub fn split_payload(payload: &[u8]) -> Result<(Self, &[u8]), Malformed> {
        match payload {
            [a, b, c, d, args @ ..] => Ok((Self(u32::from_be_bytes([*a, *b, *c, *d])), args)),
            _ => Err(Malformed::MethodTooShort(payload.len())),
        }
    }

    /// Name of the method, for the `connection` class.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::CONNECTION_START => "connection.start",
            Self::CONNECTION_START_OK => "connection.start-ok",
            Self::CONNECTION_SECURE => "connection.secure",
            Self::CONNECTION_SECURE_OK => "connection.secure-ok",
            Self::CONNECTION_TUNE => "connection.tune",
            Self::CONNECTION_TUNE_OK => "connection.tune-ok",
            Self::CONNECTION_OPEN => "connection.open",
            Self::CONNECTION_OPEN_OK => "connection.open-ok",
            Self::CONNECTION_CLOSE => "connection.close",
            Self::CONNECTION_CLOSE_OK => "connection.close-ok",
            Self::CONNECTION_BLOCKED => "connection.blocked",
            Self::CONNECTION_UNBLOCKED => "connection.unblocked",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({}/{})", self.class_id(), self.method_id()),
            None => write!(f, "class {} method {}", self.class_id(), self.method_id()),
        }
    }
}

/// A value in a field table or field array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    F32(f32),
    F64(f64),
    Decimal { scale: u8, value: u32 },
    LongString(String),
    Array(Vec<FieldValue>),
    Timestamp(u64),
    Table(FieldTable),
    Void,
    ByteArray(Vec<u8>),
}

impl FieldValue {
    fn tag(&self) -> u8 {
        match self {
            Self::Bool(_) => b't',
            Self::I8(_) => b'b',
            Self::U8(_) => b'B',
            Self::I16(_) => b's',
            Self::U16(_) => b'u',
            Self::I32(_) => b'I',
            Self::U32(_) => b'i',
            Self::I64(_) => b'l',
            Self::F32(_) => b'f',
            Self::F64(_) => b'd',
            Self::Decimal { .. } => b'D',
            Self::LongString(_) => b'S',
            Self::Array(_) => b'A',
            Self::Timestamp(_) => b'T',
            Self::Table(_) => b'F',
            Self::Void => b'V',
            Self::ByteArray(_) => b'x',
        }
    }

    /// The string content, for long-string values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::LongString(s) => Some(s),
            _ => None,
        }
    }

    /// The nested table, for table values.
    pub fn as_table(&self) -> Option<&FieldTable> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    fn encode(&self, dst: &mut BytesMut) {
        dst.put_u8(self.tag());
        match self {
            Self::Bool(v) => dst.put_u8(u8::from(*v)),
            Self::I8(v) => dst.put_i8(*v),
            Self::U8(v) => dst.put_u8(*v),
            Self::I16(v) => dst.put_i16(*v),
            Self::U16(v) => dst.put_u16(*v),
            Self::I32(v) => dst.put_i32(*v),
            Self::U32(v) => dst.put_u32(*v),
            Self::I64(v) => dst.put_i64(*v),
            Self::F32(v) => dst.put_f32(*v),
            Self::F64(v) => dst.put_f64(*v),
            Self::Decimal { scale, value } => {
                dst.put_u8(*scale);
                dst.put_u32(*value);
            }
            Self::LongString(s) => put_long_bytes(dst, s.as_bytes()),
            Self::Array(values) => {
                let mut body = BytesMut::new();
                for value in values {
                    value.encode(&mut body);
                }
                put_long_bytes(dst, &body);
            }
            Self::Timestamp(v) => dst.put_u64(*v),
            Self::Table(table) => table.encode(dst),
            Self::Void => {}
            Self::ByteArray(bytes) => put_long_bytes(dst, bytes),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::LongString(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<FieldTable> for FieldValue {
    fn from(value: FieldTable) -> Self {
        Self::Table(value)
    }
}

/// An AMQP field table. Entry order is preserved as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTable {
    entries: Vec<(String, FieldValue)>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Existing keys are not replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode a table including its u32 length prefix.
    ///
    /// Nested tables and arrays deeper than [`MAX_FIELD_NESTING`] are rejected.
    pub fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        Self::decode_at(input, 0)
    }

    fn decode_at(input: &mut &[u8], depth: usize) -> Result<Self, DecodeError> {
        let mut body = read_long_bytes(input)?;
        let mut entries = Vec::new();
        while body.has_remaining() {
            let key = read_short_str(&mut body)?;
            let value = read_field_value(&mut body, depth)?;
            entries.push((key, value));
        }
        Ok(Self { entries })
    }

    /// Encode the table including its u32 length prefix.
    pub fn encode(&self, dst: &mut BytesMut) {
        let mut body = BytesMut::new();
        for (key, value) in &self.entries {
            put_short_str(&mut body, key);
            value.encode(&mut body);
        }
        put_long_bytes(dst, &body);
    }
}

impl Serialize for FieldTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Arguments of `connection.start`, the first method a broker sends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStart {
    pub version_major: u8,
    pub version_minor: u8,
    pub server_properties: FieldTable,
    /// Space-separated SASL mechanisms.
    pub mechanisms: String,
    /// Space-separated message locales.
    pub locales: String,
}

impl ConnectionStart {
    /// Decode from the method arguments (the payload after the command id).
    pub fn decode(args: &[u8]) -> Result<Self, DecodeError> {
        let mut input = args;
        let version_major = read_u8(&mut input)?;
        let version_minor = read_u8(&mut input)?;
        let server_properties = FieldTable::decode(&mut input)?;
        let mechanisms = read_long_string(&mut input)?;
        let locales = read_long_string(&mut input)?;

        if input.has_remaining() {
            tracing::debug!(
                trailing = input.remaining(),
                "ignoring trailing bytes after connection.start arguments"
            );
        }

        Ok(Self {
            version_major,
            version_minor,
            server_properties,
            mechanisms,
            locales,
        })
    }

    /// Encode the full method payload, command id included.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_u32(CommandId::CONNECTION_START.as_u32());
        dst.put_u8(self.version_major);
        dst.put_u8(self.version_minor);
        self.server_properties.encode(dst);
        put_long_bytes(dst, self.mechanisms.as_bytes());
        put_long_bytes(dst, self.locales.as_bytes());
    }

    pub fn mechanisms(&self) -> impl Iterator<Item = &str> {
        self.mechanisms.split_whitespace()
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.split_whitespace()
    }

    /// `product` and `version` from the server properties, when present.
    pub fn server_product(&self) -> Option<(&str, &str)> {
        let product = self.server_properties.get("product")?.as_str()?;
        let version = self
            .server_properties
            .get("version")
            .and_then(FieldValue::as_str)
            .unwrap_or("");
        Some((product, version))
    }
}

fn need(input: &[u8], needed: usize) -> Result<(), DecodeError> {
    if input.len() < needed {
        return Err(DecodeError::Truncated {
            needed,
            remaining: input.len(),
        });
    }
    Ok(())
}

fn read_u8(input: &mut &[u8]) -> Result<u8, DecodeError> {
    need(input, 1)?;
    Ok(input.get_u8())
}

fn read_bytes<'a>(input: &mut &'a [u8], len: usize) -> Result<&'a [u8], DecodeError> {
    need(input, len)?;
    let slice: &'a [u8] = *input;
    let (head, tail) = slice.split_at(len);
    *input = tail;
    Ok(head)
}

fn read_long_bytes<'a>(input: &mut &'a [u8]) -> Result<&'a [u8], DecodeError> {
    need(input, 4)?;
    let len = input.get_u32() as usize;
    read_bytes(input, len)
}

fn read_short_str(input: &mut &[u8]) -> Result<String, DecodeError> {
    let len = read_u8(input)? as usize;
    let raw = read_bytes(input, len)?;
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Long strings are free-form bytes on the wire; invalid UTF-8 is replaced.
fn read_long_string(input: &mut &[u8]) -> Result<String, DecodeError> {
    let raw = read_long_bytes(input)?;
    match String::from_utf8_lossy(raw) {
        Cow::Borrowed(text) => Ok(text.to_string()),
        Cow::Owned(text) => {
            tracing::debug!(len = raw.len(), "replaced invalid UTF-8 in long string");
            Ok(text)
        }
    }
}

/// `depth` counts the tables and arrays enclosing this value.
fn read_field_value(input: &mut &[u8], depth: usize) -> Result<FieldValue, DecodeError> {
    let tag = read_u8(input)?;
    if matches!(tag, b'A' | b'F') && depth >= MAX_FIELD_NESTING {
        return Err(DecodeError::NestingTooDeep {
            max: MAX_FIELD_NESTING,
        });
    }
    let value = match tag {
        b't' => FieldValue::Bool(read_u8(input)? != 0),
        b'b' => {
            need(input, 1)?;
            FieldValue::I8(input.get_i8())
        }
        b'B' => FieldValue::U8(read_u8(input)?),
        b's' => {
            need(input, 2)?;
            FieldValue::I16(input.get_i16())
        }
        b'u' => {
            need(input, 2)?;
            FieldValue::U16(input.get_u16())
        }
        b'I' => {
            need(input, 4)?;
            FieldValue::I32(input.get_i32())
        }
        b'i' => {
            need(input, 4)?;
            FieldValue::U32(input.get_u32())
        }
        b'l' => {
            need(input, 8)?;
            FieldValue::I64(input.get_i64())
        }
        b'f' => {
            need(input, 4)?;
            FieldValue::F32(input.get_f32())
        }
        b'd' => {
            need(input, 8)?;
            FieldValue::F64(input.get_f64())
        }
        b'D' => {
            need(input, 5)?;
            let scale = input.get_u8();
            let value = input.get_u32();
            FieldValue::Decimal { scale, value }
        }
        b'S' => FieldValue::LongString(read_long_string(input)?),
        b'A' => {
            let mut body = read_long_bytes(input)?;
            let mut values = Vec::new();
            while body.has_remaining() {
                values.push(read_field_value(&mut body, depth + 1)?);
            }
            FieldValue::Array(values)
        }
        b'T' => {
            need(input, 8)?;
            FieldValue::Timestamp(input.get_u64())
        }
        b'F' => FieldValue::Table(FieldTable::decode_at(input, depth + 1)?),
        b'V' => FieldValue::Void,
        b'x' => FieldValue::ByteArray(read_long_bytes(input)?.to_vec()),
        other => return Err(DecodeError::UnknownFieldType(other)),
    };
    Ok(value)
}

/// Keys longer than 255 bytes are cut at the last char boundary that fits.
fn put_short_str(dst: &mut BytesMut, value: &str) {
    let mut len = value.len().min(u8::MAX as usize);
    while !value.is_char_boundary(len) {
        len -= 1;
    }
    dst.put_u8(len as u8);
    dst.put_slice(&value.as_bytes()[..len]);
}

fn put_long_bytes(dst: &mut BytesMut, bytes: &[u8]) {
    dst.put_u32(bytes.len() as u32);
    dst.put_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rabbitmq_start() -> ConnectionStart {
        let mut capabilities = FieldTable::new();
        capabilities.insert("publisher_confirms", true);
        capabilities.insert("consumer_cancel_notify", true);

        let mut props = FieldTable::new();
        props.insert("capabilities", capabilities);
        props.insert("cluster_name", "rabbit@broker");
        props.insert("product", "RabbitMQ");
        props.insert("version", "3.13.7");

        ConnectionStart {
            version_major: 0,
            version_minor: 9,
            server_properties: props,
            mechanisms: "PLAIN AMQPLAIN".to_string(),
            locales: "en_US".to_string(),
        }
    }

    #[test]
    fn command_id_packs_class_and_method() {
        let id = CommandId::CONNECTION_START;
        assert_eq!(id.as_u32(), 0x000A_000A);
        assert_eq!(id.class_id(), 10);
        assert_eq!(id.method_id(), 10);
        assert_eq!(id.to_string(), "connection.start (10/10)");
        assert_eq!(CommandId::new(60, 40).to_string(), "class 60 method 40");
    }

    #[test]
    fn split_payload_reads_big_endian_id() {
        let (id, args) = CommandId::split_payload(&[0, 10, 0, 30, 0xAA]).unwrap();
        assert_eq!(id, CommandId::CONNECTION_TUNE);
        assert_eq!(args, [0xAA]);

        let (fixture, rest) = CommandId::split_payload(&[0, 0, 0, 10]).unwrap();
        assert_eq!(fixture.as_u32(), 10);
        assert!(rest.is_empty());
    }

    #[test]
    fn split_payload_rejects_short_payload() {
        assert_eq!(
            CommandId::split_payload(&[0, 10, 0]),
            Err(Malformed::MethodTooShort(3))
        );
    }

    #[test]
    fn connection_start_decodes_broker_payload() {
        let start = rabbitmq_start();
        let mut payload = BytesMut::new();
        start.encode(&mut payload);

        let (id, args) = CommandId::split_payload(&payload).unwrap();
        assert_eq!(id, CommandId::CONNECTION_START);

        let decoded = ConnectionStart::decode(args).unwrap();
        assert_eq!(decoded, start);
        assert_eq!(decoded.server_product(), Some(("RabbitMQ", "3.13.7")));
        assert_eq!(
            decoded.mechanisms().collect::<Vec<_>>(),
            ["PLAIN", "AMQPLAIN"]
        );
        let caps = decoded
            .server_properties
            .get("capabilities")
            .and_then(FieldValue::as_table)
            .unwrap();
        assert_eq!(caps.get("publisher_confirms"), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn decodes_every_field_value_type() {
        let mut nested = FieldTable::new();
        nested.insert("inner", FieldValue::U8(1));

        let mut table = FieldTable::new();
        table.insert("t", FieldValue::Bool(false));
        table.insert("b", FieldValue::I8(-3));
        table.insert("B", FieldValue::U8(200));
        table.insert("s", FieldValue::I16(-300));
        table.insert("u", FieldValue::U16(60000));
        table.insert("I", FieldValue::I32(-70000));
        table.insert("i", FieldValue::U32(4_000_000_000));
        table.insert("l", FieldValue::I64(-5_000_000_000));
        table.insert("f", FieldValue::F32(1.5));
        table.insert("d", FieldValue::F64(-2.25));
        table.insert("D", FieldValue::Decimal { scale: 2, value: 1234 });
        table.insert("S", "text");
        table.insert(
            "A",
            FieldValue::Array(vec![FieldValue::I32(1), FieldValue::from("two")]),
        );
        table.insert("T", FieldValue::Timestamp(1_700_000_000));
        table.insert("F", nested);
        table.insert("V", FieldValue::Void);
        table.insert("x", FieldValue::ByteArray(vec![0xDE, 0xAD]));

        let mut encoded = BytesMut::new();
        table.encode(&mut encoded);
        let mut input: &[u8] = &encoded;
        let decoded = FieldTable::decode(&mut input).unwrap();

        assert!(input.is_empty());
        assert_eq!(decoded.len(), 17);
        assert_eq!(decoded, table);
    }

    #[test]
    fn truncated_arguments_are_reported() {
        let mut payload = BytesMut::new();
        rabbitmq_start().encode(&mut payload);
        let args = &payload[4..payload.len() - 2];

        assert!(matches!(
            ConnectionStart::decode(args),
            Err(DecodeError::Truncated { .. })
        ));
        assert_eq!(
            ConnectionStart::decode(&[0]),
            Err(DecodeError::Truncated {
                needed: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn unknown_field_type_is_reported() {
        let mut body = BytesMut::new();
        put_short_str(&mut body, "k");
        body.put_u8(b'Z');
        let mut encoded = BytesMut::new();
        put_long_bytes(&mut encoded, &body);

        let mut input: &[u8] = &encoded;
        assert_eq!(
            FieldTable::decode(&mut input),
            Err(DecodeError::UnknownFieldType(b'Z'))
        );
    }

    fn start_args_with_property(key: &str, value: &[u8]) -> Vec<u8> {
        let mut body = BytesMut::new();
        put_short_str(&mut body, key);
        body.put_slice(value);
        let mut args = BytesMut::new();
        args.put_u8(0);
        args.put_u8(9);
        put_long_bytes(&mut args, &body);
        put_long_bytes(&mut args, b"PLAIN");
        put_long_bytes(&mut args, b"en_US");
        args.to_vec()
    }

    /// `depth` arrays, each holding only the next one.
    fn nested_arrays(depth: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(depth * 5);
        for level in 0..depth {
            out.push(b'A');
            out.extend_from_slice(&((5 * (depth - level - 1)) as u32).to_be_bytes());
        }
        out
    }

    /// `depth` tables, each holding the next one under key "k".
    fn nested_tables(depth: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(depth * 7);
        for level in 0..depth {
            out.push(b'F');
            out.extend_from_slice(&((7 * (depth - level - 1)) as u32).to_be_bytes());
            if level + 1 < depth {
                out.extend_from_slice(&[1, b'k']);
            }
        }
        out
    }

    #[test]
    fn deeply_nested_arrays_are_rejected_without_recursing() {
        let args = start_args_with_property("deep", &nested_arrays(20_000));
        assert!(args.len() < crate::codec::DEFAULT_MAX_FRAME_SIZE);

        assert_eq!(
            ConnectionStart::decode(&args),
            Err(DecodeError::NestingTooDeep {
                max: MAX_FIELD_NESTING
            })
        );
    }

    #[test]
    fn nesting_limit_is_inclusive() {
        let at_limit = start_args_with_property("deep", &nested_arrays(MAX_FIELD_NESTING));
        let start = ConnectionStart::decode(&at_limit).unwrap();
        assert!(matches!(
            start.server_properties.get("deep"),
            Some(FieldValue::Array(_))
        ));

        let past_limit = start_args_with_property("deep", &nested_arrays(MAX_FIELD_NESTING + 1));
        assert!(matches!(
            ConnectionStart::decode(&past_limit),
            Err(DecodeError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn deeply_nested_tables_are_rejected() {
        let ok = start_args_with_property("t", &nested_tables(MAX_FIELD_NESTING));
        assert!(ConnectionStart::decode(&ok).is_ok());

        let deep = start_args_with_property("t", &nested_tables(10_000));
        assert!(matches!(
            ConnectionStart::decode(&deep),
            Err(DecodeError::NestingTooDeep { max: MAX_FIELD_NESTING })
        ));
    }

    #[test]
    fn long_keys_are_cut_on_char_boundary() {
        let key = "\u{e9}".repeat(200);
        let mut table = FieldTable::new();
        table.insert(key.clone(), true);
        let mut wire = BytesMut::new();
        table.encode(&mut wire);

        let decoded = FieldTable::decode(&mut &wire[..]).unwrap();
        let (name, _) = decoded.iter().next().unwrap();
        assert_eq!(name.len(), 254);
        assert!(key.starts_with(name));
    }

    #[test]
    fn invalid_utf8_in_long_string_is_replaced() {
        let mut args = BytesMut::new();
        args.put_u8(0);
        args.put_u8(9);
        FieldTable::new().encode(&mut args);
        put_long_bytes(&mut args, b"PLAIN \xFF");
        put_long_bytes(&mut args, b"en_US");

        let start = ConnectionStart::decode(&args).unwrap();
        assert_eq!(start.mechanisms, "PLAIN \u{FFFD}");
    }

    #[test]
    fn serializes_as_plain_json() {
        let json = serde_json::to_value(rabbitmq_start()).unwrap();
        assert_eq!(json["version_major"], 0);
        assert_eq!(json["version_minor"], 9);
        assert_eq!(json["server_properties"]["product"], "RabbitMQ");
        assert_eq!(
            json["server_properties"]["capabilities"]["publisher_confirms"],
            true
        );
        assert_eq!(json["mechanisms"], "PLAIN AMQPLAIN");
    }
}
