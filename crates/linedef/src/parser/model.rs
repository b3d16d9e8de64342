use std::fmt;
use thiserror::Error;
use serde::Serialize;
use super::serde_utils::serialize_fields_as_map;

/// A typed field value produced by conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// No value: the capture was missing or carried an absence sentinel
    Absent,
    Integer(i64),
    /// Decimal seconds (durations)
    Decimal(f64),
    Text(String),
    /// Canonical `YYYYMMDDHHMMSS` timestamp
    Timestamp(u64),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<u64> {
        match self {
            Value::Timestamp(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("-"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{:.3}", v),
            Value::Text(s) => f.write_str(s),
            Value::Timestamp(v) => write!(f, "{}", v),
        }
    }
}

/// Raised when a captured token cannot be read as its declared field type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Not an integer: {0:?}")]
    InvalidInteger(String),

    #[error("Negative count: {0:?}")]
    NegativeCount(String),

    #[error("Invalid millisecond duration: {0:?}")]
    InvalidDuration(String),

    #[error("Invalid HTTP status: {0:?}")]
    InvalidStatus(String),

    #[error("Unrecognized timestamp layout: {0:?}")]
    UnrecognizedTimestamp(String),

    #[error("Date out of range: {0:?}")]
    InvalidDate(String),
}

/// Raised when a format definition is internally inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Shape {shape}: pattern has {captures} capture groups but {declared} fields are declared")]
    FieldCountMismatch {
        shape: String,
        declared: usize,
        captures: usize,
    },

    #[error("Shape {shape}: field {field} is declared more than once")]
    DuplicateField { shape: String, field: String },

    #[error("Shape {shape}: capture group {position} is named {group} but the field is {field}")]
    GroupNameMismatch {
        shape: String,
        position: usize,
        group: String,
        field: String,
    },

    #[error("Shape {shape}: invalid pattern: {message}")]
    InvalidPattern { shape: String, message: String },

    #[error("Format {0} declares no line shapes")]
    EmptyFormat(String),
}

/// A conversion failure localized to one field of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldAnomaly {
    pub field: String,
    pub token: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: ConversionError,
}

fn serialize_display<S>(error: &ConversionError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(error)
}

/// A successfully matched and converted log line.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Name of the format definition that produced this record
    pub format: String,

    /// Name of the line shape that matched
    pub shape: String,

    /// 1-based position of the line in its source
    pub line_number: usize,

    /// Converted fields, in the shape's declaration order
    #[serde(serialize_with = "serialize_fields_as_map")]
    pub fields: Vec<(String, Value)>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<FieldAnomaly>,
}

impl Request {
    /// Look up a field. `None` means the shape has no such field;
    /// `Some(Value::Absent)` means it has one without a value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn decimal(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn timestamp(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_timestamp)
    }

    /// True when the field exists in the record but holds no value
    pub fn is_absent(&self, name: &str) -> bool {
        self.get(name).map(Value::is_absent).unwrap_or(false)
    }

    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedReason {
    /// No shape of the format matched the line
    NoShape,
    /// The line exceeded the configured size limit and was not examined
    TooLong,
}

/// A line that no shape recognized, carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unmatched {
    pub line_number: usize,
    pub raw: String,
    pub reason: UnmatchedReason,
}

/// Result of feeding one line to the parser.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseOutcome {
    Request(Request),
    Unmatched(Unmatched),
}

impl ParseOutcome {
    pub fn line_number(&self) -> usize {
        match self {
            ParseOutcome::Request(r) => r.line_number,
            ParseOutcome::Unmatched(u) => u.line_number,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, ParseOutcome::Request(_))
    }

    pub fn as_request(&self) -> Option<&Request> {
        match self {
            ParseOutcome::Request(r) => Some(r),
            ParseOutcome::Unmatched(_) => None,
        }
    }

    pub fn into_request(self) -> Option<Request> {
        match self {
            ParseOutcome::Request(r) => Some(r),
            ParseOutcome::Unmatched(_) => None,
        }
    }

    pub fn into_unmatched(self) -> Option<Unmatched> {
        match self {
            ParseOutcome::Request(_) => None,
            ParseOutcome::Unmatched(u) => Some(u),
        }
    }
}
