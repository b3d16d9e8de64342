//! HAProxy HTTP access log (`option httplog`).
//!
//! ```text
//! Feb  6 12:14:14 localhost haproxy[14389]: 10.0.1.2:33317 [06/Feb/2009:12:14:14.655] http-in \
//!   static/srv1 10/0/30/69/109 200 2750 - - ---- 1/1/1/1/0 0/0 {1wt.eu} {} "GET /index.html HTTP/1.1"
//! ```
//!
//! The syslog header and the `haproxy[pid]:` tag are optional so that
//! lines written to a file by the proxy itself parse as well.

use crate::parser::convert::{EmptyList, FieldType};
use crate::parser::model::SchemaError;
use crate::parser::shape::{FormatDefinition, LineShape};
use crate::parser::timestamp::TimestampLayout;

pub const NAME: &str = "haproxy";

const ACCEPT_DATE: FieldType = FieldType::Timestamp(TimestampLayout::Apache);
const HEADERS: FieldType = FieldType::OpaqueList(EmptyList::Absent);

// "Feb  6 12:14:14 localhost " and "haproxy[14389]: "
macro_rules! syslog_prefix {
    () => {
        r"(?:[A-Z][a-z]{2}\s+\d{1,2}\s\d{2}:\d{2}:\d{2}\s\S+\s)?(?:[\w.-]+\[\d+\]:\s)?"
    };
}

const HAPROXY13: &str = concat!(
    syslog_prefix!(),
    r"(\S+):\d+\s",                                          // client_ip:port
    r"\[(\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2}\.\d{3})\]\s", // accept_date
    r"(\S+)\s",                                              // frontend_name
    r"([^\s/]+)/(\S+)\s",                                    // backend_name/server_name
    r"(-1|\d+)/(-1|\d+)/(-1|\d+)/(-1|\d+)/(\+?\d+)\s",       // Tq/Tw/Tc/Tr/Tt
    r"(\d{3})\s",                                            // status_code
    r"(\+?\d+)\s",                                           // bytes_read
    r"(\S+)\s(\S+)\s",                                       // request/response cookie
    r"([\w-])([\w-])([\w-])([\w-])\s",                       // termination state
    r"(\d+)/(\d+)/(\d+)/(\d+)/(\+?\d+)\s",                   // actconn/feconn/beconn/srv_conn/retries
    r"(\d+)/(\d+)\s",                                        // srv_queue/backend_queue
    r"(?:(\{[^}]*\})\s)?(?:(\{[^}]*\})\s)?",                 // captured headers
    r#""(.*)"\s*"#,                                          // http_request
);

const HAPROXY12: &str = concat!(
    syslog_prefix!(),
    r"(\S+):\d+\s",
    r"\[(\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2}\.\d{3})\]\s",
    r"(\S+)\s",                                              // frontend_name
    r"(\S+)\s",                                              // server_name
    r"(-1|\d+)/(-1|\d+)/(-1|\d+)/(-1|\d+)/(\+?\d+)\s",
    r"(\d{3})\s",
    r"(\+?\d+)\s",
    r"(\S+)\s(\S+)\s",
    r"([\w-])([\w-])([\w-])([\w-])\s",
    r"(\d+)/(\d+)/(\d+)\s",                                  // srv_conn/listener_conn/process_conn
    r"(\d+)/(\d+)\s",
    r"(?:(\{[^}]*\})\s)?(?:(\{[^}]*\})\s)?",
    r#""(.*)"\s*"#,
);

const HAPROXY11: &str = concat!(
    syslog_prefix!(),
    r"(\S+):\d+\s",
    r"\[(\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2}\.\d{3})\]\s",
    r"(\S+)\s",
    r"([^\s/]+)/(\S+)\s",
    r"(-1|\d+)/(-1|\d+)/(-1|\d+)/(\+?\d+)\s",                // Tq/Tc/Tr/Tt
    r"(\d{3})\s",
    r"(\+?\d+)\s",
    r"(\S+)\s(\S+)\s",
    r"([\w-])([\w-])([\w-])([\w-])\s",
    r"(\d+)/(\d+)\s",                                        // listener_conn/process_conn
    r"(?:(\{[^}]*\})\s)?(?:(\{[^}]*\})\s)?",
    r#""(.*)"\s*"#,
);

const TEASER_WITH_BACKEND: &str = r"\.\d{3}\]\s\S+\s[^\s/]+/\S+\s";
const TEASER_SERVER_ONLY: &str = r"\.\d{3}\]\s\S+\s[^\s/]+\s";

/// Build the haproxy format: 1.3 layout first, then the older 1.2 and 1.1 layouts.
pub fn definition() -> Result<FormatDefinition, SchemaError> {
    let haproxy13 = LineShape::new(
        "haproxy13",
        HAPROXY13,
        &[
            ("client_ip", FieldType::String),
            ("accept_date", ACCEPT_DATE),
            ("frontend_name", FieldType::String),
            ("backend_name", FieldType::String),
            ("server_name", FieldType::String),
            ("tq", FieldType::Duration),
            ("tw", FieldType::Duration),
            ("tc", FieldType::Duration),
            ("tr", FieldType::Duration),
            ("tt", FieldType::Duration),
            ("status_code", FieldType::HttpStatus),
            ("bytes_read", FieldType::ByteCount),
            ("captured_request_cookie", FieldType::String),
            ("captured_response_cookie", FieldType::String),
            ("termination_event_code", FieldType::String),
            ("terminated_session_state", FieldType::String),
            ("clientside_persistence_cookie", FieldType::String),
            ("serverside_persistence_cookie", FieldType::String),
            ("actconn", FieldType::Integer),
            ("feconn", FieldType::Integer),
            ("beconn", FieldType::Integer),
            ("srv_conn", FieldType::Integer),
            ("retries", FieldType::Integer),
            ("srv_queue", FieldType::Integer),
            ("backend_queue", FieldType::Integer),
            ("captured_request_headers", HEADERS),
            ("captured_response_headers", HEADERS),
            ("http_request", FieldType::String),
        ],
    )?
    .with_teaser(TEASER_WITH_BACKEND)?;

    let haproxy12 = LineShape::new(
        "haproxy12",
        HAPROXY12,
        &[
            ("client_ip", FieldType::String),
            ("accept_date", ACCEPT_DATE),
            ("frontend_name", FieldType::String),
            ("server_name", FieldType::String),
            ("tq", FieldType::Duration),
            ("tw", FieldType::Duration),
            ("tc", FieldType::Duration),
            ("tr", FieldType::Duration),
            ("tt", FieldType::Duration),
            ("status_code", FieldType::HttpStatus),
            ("bytes_read", FieldType::ByteCount),
            ("captured_request_cookie", FieldType::String),
            ("captured_response_cookie", FieldType::String),
            ("termination_event_code", FieldType::String),
            ("terminated_session_state", FieldType::String),
            ("clientside_persistence_cookie", FieldType::String),
            ("serverside_persistence_cookie", FieldType::String),
            ("srv_conn", FieldType::Integer),
            ("listener_conn", FieldType::Integer),
            ("process_conn", FieldType::Integer),
            ("srv_queue", FieldType::Integer),
            ("backend_queue", FieldType::Integer),
            ("captured_request_headers", HEADERS),
            ("captured_response_headers", HEADERS),
            ("http_request", FieldType::String),
        ],
    )?
    .with_teaser(TEASER_SERVER_ONLY)?;

    let haproxy11 = LineShape::new(
        "haproxy11",
        HAPROXY11,
        &[
            ("client_ip", FieldType::String),
            ("accept_date", ACCEPT_DATE),
            ("frontend_name", FieldType::String),
            ("backend_name", FieldType::String),
            ("server_name", FieldType::String),
            ("tq", FieldType::Duration),
            ("tc", FieldType::Duration),
            ("tr", FieldType::Duration),
            ("tt", FieldType::Duration),
            ("status_code", FieldType::HttpStatus),
            ("bytes_read", FieldType::ByteCount),
            ("captured_request_cookie", FieldType::String),
            ("captured_response_cookie", FieldType::String),
            ("termination_event_code", FieldType::String),
            ("terminated_session_state", FieldType::String),
            ("clientside_persistence_cookie", FieldType::String),
            ("serverside_persistence_cookie", FieldType::String),
            ("listener_conn", FieldType::Integer),
            ("process_conn", FieldType::Integer),
            ("captured_request_headers", HEADERS),
            ("captured_response_headers", HEADERS),
            ("http_request", FieldType::String),
        ],
    )?
    .with_teaser(TEASER_WITH_BACKEND)?;

    FormatDefinition::new(NAME, vec![haproxy13, haproxy12, haproxy11])
}
