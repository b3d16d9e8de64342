use super::model::{ConversionError, Value};
use super::timestamp::TimestampLayout;

/// What an explicitly empty bracket section (`{}` or `[]`) means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyList {
    /// Keep the empty pair as its literal text
    Preserve,
    /// Treat the empty pair like a section that was never captured
    Absent,
}

/// Semantic type of a captured field.
///
/// Each variant owns one conversion and one absence policy:
///
/// | type         | absent when                      | value                 |
/// |--------------|----------------------------------|-----------------------|
/// | `String`     | `-`, empty, or `""`              | text                  |
/// | `Integer`    | `-`                              | integer               |
/// | `Duration`   | `-1`                             | seconds (ms / 1000)   |
/// | `HttpStatus` | never                            | integer               |
/// | `ByteCount`  | never                            | integer               |
/// | `Timestamp`  | never                            | `YYYYMMDDHHMMSS`      |
/// | `OpaqueList` | empty pair, per [`EmptyList`]    | text, verbatim        |
/// | `Raw`        | never                            | text, verbatim        |
///
/// Every type is absent when its capture group did not take part in the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Duration,
    HttpStatus,
    ByteCount,
    Timestamp(TimestampLayout),
    OpaqueList(EmptyList),
    Raw,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Duration => "duration",
            FieldType::HttpStatus => "http_status",
            FieldType::ByteCount => "byte_count",
            FieldType::Timestamp(_) => "timestamp",
            FieldType::OpaqueList(_) => "opaque_list",
            FieldType::Raw => "raw",
        }
    }
}

/// Convert one captured token.
///
/// `None` means the capture group did not participate in the match.
/// `Ok(Value::Absent)` is a token that correctly encodes "no value";
/// `Err` is a token that cannot be read as `field_type` at all.
pub fn convert(token: Option<&str>, field_type: FieldType) -> Result<Value, ConversionError> {
    let token = match token {
        Some(t) => t,
        None => return Ok(Value::Absent),
    };

    match field_type {
        FieldType::String => Ok(convert_string(token)),
        FieldType::Integer => convert_integer(token),
        FieldType::Duration => convert_duration(token),
        FieldType::HttpStatus => convert_status(token),
        FieldType::ByteCount => convert_byte_count(token),
        FieldType::Timestamp(layout) => layout.canonical(token).map(Value::Timestamp),
        FieldType::OpaqueList(policy) => Ok(convert_list(token, policy)),
        FieldType::Raw => Ok(Value::Text(token.to_string())),
    }
}

/// Strip a leading `+` saturation marker. The number after it is still
/// the best known value.
fn strip_saturation(token: &str) -> &str {
    token.strip_prefix('+').unwrap_or(token)
}

fn convert_string(token: &str) -> Value {
    match token {
        "-" | "" | "\"\"" => Value::Absent,
        _ => Value::Text(token.to_string()),
    }
}

fn convert_integer(token: &str) -> Result<Value, ConversionError> {
    if token == "-" {
        return Ok(Value::Absent);
    }
    token
        .parse::<i64>()
        .map(Value::Integer)
        .map_err(|_| ConversionError::InvalidInteger(token.to_string()))
}

fn convert_byte_count(token: &str) -> Result<Value, ConversionError> {
    let count = strip_saturation(token)
        .parse::<i64>()
        .map_err(|_| ConversionError::InvalidInteger(token.to_string()))?;
    if count < 0 {
        return Err(ConversionError::NegativeCount(token.to_string()));
    }
    Ok(Value::Integer(count))
}

fn convert_duration(token: &str) -> Result<Value, ConversionError> {
    // -1: the stage was never reached
    if token == "-1" {
        return Ok(Value::Absent);
    }
    let millis = strip_saturation(token)
        .parse::<i64>()
        .map_err(|_| ConversionError::InvalidDuration(token.to_string()))?;
    if millis < 0 {
        return Err(ConversionError::InvalidDuration(token.to_string()));
    }
    Ok(Value::Decimal(millis as f64 / 1000.0))
}

fn convert_status(token: &str) -> Result<Value, ConversionError> {
    if token.len() != 3 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConversionError::InvalidStatus(token.to_string()));
    }
    token
        .parse::<i64>()
        .map(Value::Integer)
        .map_err(|_| ConversionError::InvalidStatus(token.to_string()))
}

fn convert_list(token: &str, policy: EmptyList) -> Value {
    let is_empty_pair = matches!(token.trim(), "{}" | "[]");
    match (policy, is_empty_pair) {
        (EmptyList::Absent, true) => Value::Absent,
        _ => Value::Text(token.to_string()),
    }
}
