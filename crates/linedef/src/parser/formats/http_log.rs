//! Apache/NCSA access logs (Combined Log Format and Common Log Format).
//!
//! ```text
//! 127.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326 "http://example.com/" "Mozilla/4.08"
//! ```

use crate::parser::convert::FieldType;
use crate::parser::model::SchemaError;
use crate::parser::shape::{FormatDefinition, LineShape};
use crate::parser::timestamp::TimestampLayout;

pub const NAME: &str = "apache";

// host ident authuser [date] "request" status bytes
macro_rules! common_log {
    () => {
        concat!(
            r"(\S+)\s(\S+)\s(\S+)\s",
            r"\[([^\]]+)\]\s",
            r#""((?:[^"\\]|\\.)*)"\s"#,
            r"(\d{3})\s",
            r"(\d+|-)",
        )
    };
}

const COMBINED: &str = concat!(
    common_log!(),
    r#"\s"((?:[^"\\]|\\.)*)"\s"((?:[^"\\]|\\.)*)"\s*"#,
);

const COMMON: &str = concat!(common_log!(), r"\s*");

const COMMON_FIELDS: [(&str, FieldType); 7] = [
    ("remote_host", FieldType::String),
    ("remote_logname", FieldType::String),
    ("user", FieldType::String),
    ("timestamp", FieldType::Timestamp(TimestampLayout::Apache)),
    ("http_request", FieldType::String),
    ("http_status", FieldType::HttpStatus),
    ("bytes_sent", FieldType::Integer),
];

/// Build the apache format: combined first, then common.
pub fn definition() -> Result<FormatDefinition, SchemaError> {
    let mut combined_fields = COMMON_FIELDS.to_vec();
    combined_fields.push(("referer", FieldType::String));
    combined_fields.push(("user_agent", FieldType::String));

    let combined = LineShape::new("combined", COMBINED, &combined_fields)?;
    let common = LineShape::new("common", COMMON, &COMMON_FIELDS)?;

    FormatDefinition::new(NAME, vec![combined, common])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::line_parser::LineParser;
    use crate::parser::model::{ConversionError, Request};
    use std::sync::Arc;

    fn parse(line: &str) -> Request {
        let parser = LineParser::new(Arc::new(definition().unwrap()));
        parser
            .parse_next(line, 1)
            .into_request()
            .unwrap_or_else(|| panic!("Expected line to parse: {}", line))
    }

    #[test]
    fn test_definition_is_valid() {
        let def = definition().unwrap();
        assert!(def.is_valid());
        assert_eq!(def.shape("combined").unwrap().fields().len(), 9);
        assert_eq!(def.shape("common").unwrap().fields().len(), 7);
    }

    #[test]
    fn test_combined_log_format() {
        let req = parse(r#"127.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326 "http://www.example.com/start.html" "Mozilla/4.08 [en] (Win98; I ;Nav)""#);
        assert_eq!(req.shape, "combined");
        assert_eq!(req.text("remote_host"), Some("127.0.0.1"));
        assert!(req.is_absent("remote_logname"));
        assert_eq!(req.text("user"), Some("frank"));
        assert_eq!(req.timestamp("timestamp"), Some(20001010135536));
        assert_eq!(req.text("http_request"), Some("GET /apache_pb.gif HTTP/1.0"));
        assert_eq!(req.integer("http_status"), Some(200));
        assert_eq!(req.integer("bytes_sent"), Some(2326));
        assert_eq!(req.text("referer"), Some("http://www.example.com/start.html"));
        assert_eq!(req.text("user_agent"), Some("Mozilla/4.08 [en] (Win98; I ;Nav)"));
    }

    #[test]
    fn test_common_log_format() {
        let req = parse(r#"192.168.1.1 - - [10/Oct/2000:13:55:36 -0700] "POST /api/users HTTP/1.1" 201 -"#);
        assert_eq!(req.shape, "common");
        assert!(req.is_absent("user"));
        assert_eq!(req.integer("http_status"), Some(201));
        assert!(req.is_absent("bytes_sent"));
        assert_eq!(req.get("referer"), None);
    }

    #[test]
    fn test_escaped_quote_in_request() {
        let req = parse(r#"10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] "GET /q?x=\"y\" HTTP/1.1" 200 5 "-" "curl/8.0""#);
        assert_eq!(req.shape, "combined");
        assert_eq!(req.text("http_request"), Some(r#"GET /q?x=\"y\" HTTP/1.1"#));
        assert!(req.is_absent("referer"));
        assert_eq!(req.text("user_agent"), Some("curl/8.0"));
    }

    #[test]
    fn test_bad_timestamp_is_an_anomaly() {
        let req = parse(r#"10.0.0.1 - - [sometime] "GET / HTTP/1.1" 200 5"#);
        assert!(req.is_absent("timestamp"));
        assert_eq!(req.anomalies.len(), 1);
        assert_eq!(
            req.anomalies[0].error,
            ConversionError::UnrecognizedTimestamp("sometime".to_string())
        );
    }

    #[test]
    fn test_haproxy_line_is_not_apache() {
        let parser = LineParser::new(Arc::new(definition().unwrap()));
        let line = "10.0.1.2:33317 [06/Feb/2009:12:14:14.655] http-in static/srv1 10/0/30/69/109 200 2750 - - ---- 1/1/1/1/0 0/0 {1wt.eu} {} \"GET /index.html HTTP/1.1\"";
        assert!(!parser.parse_next(line, 1).is_match());
    }
}
