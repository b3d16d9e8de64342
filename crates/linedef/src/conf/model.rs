//! Model: ParserConfig and related types.

use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::parser::{BuiltinFormat, DETECTION_SAMPLE_SIZE, MAX_LINE_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub format: FormatSelection,
    pub max_line_size: usize,
    pub detection_sample_size: usize,
    pub report_anomalies: bool,
    pub emit_unmatched: bool,
}

/// Which dialect to parse with: a fixed built-in, or detected from the
/// first lines of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatSelection {
    #[default]
    Auto,
    Haproxy,
    Apache,
}

impl FormatSelection {
    /// The fixed built-in format, or `None` for auto-detection
    pub fn builtin(&self) -> Option<BuiltinFormat> {
        match self {
            FormatSelection::Auto => None,
            FormatSelection::Haproxy => Some(BuiltinFormat::Haproxy),
            FormatSelection::Apache => Some(BuiltinFormat::Apache),
        }
    }
}

impl FromStr for FormatSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(FormatSelection::Auto);
        }
        match s.parse::<BuiltinFormat>()? {
            BuiltinFormat::Haproxy => Ok(FormatSelection::Haproxy),
            BuiltinFormat::Apache => Ok(FormatSelection::Apache),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            format: FormatSelection::Auto,
            max_line_size: MAX_LINE_SIZE,
            detection_sample_size: DETECTION_SAMPLE_SIZE,
            report_anomalies: false,
            emit_unmatched: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ParserConfig Defaults ────────────────────────────────────

    #[test]
    fn test_parser_config_defaults() {
        let cfg = ParserConfig::default();
        assert_eq!(cfg.format, FormatSelection::Auto);
        assert_eq!(cfg.max_line_size, 1_048_576);
        assert_eq!(cfg.detection_sample_size, 5);
        assert!(!cfg.report_anomalies);
        assert!(!cfg.emit_unmatched);
    }

    // ── FormatSelection ──────────────────────────────────────────

    #[test]
    fn test_format_selection_from_str() {
        assert_eq!("auto".parse::<FormatSelection>(), Ok(FormatSelection::Auto));
        assert_eq!("HAPROXY".parse::<FormatSelection>(), Ok(FormatSelection::Haproxy));
        assert_eq!("apache".parse::<FormatSelection>(), Ok(FormatSelection::Apache));
        let err = "nginx".parse::<FormatSelection>().unwrap_err();
        assert!(err.contains("nginx"), "Error should name the format: {}", err);
    }

    #[test]
    fn test_format_selection_builtin() {
        assert_eq!(FormatSelection::Auto.builtin(), None);
        assert_eq!(FormatSelection::Apache.builtin(), Some(BuiltinFormat::Apache));
    }

    // ── Validation ───────────────────────────────────────────────

    #[test]
    fn test_validate_default_passes() {
        assert!(ParserConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_max_line_size() {
        let cfg = ParserConfig {
            max_line_size: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("max_line_size"), "Error should mention max_line_size: {}", err);
    }

    #[test]
    fn test_validate_rejects_zero_sample_size_only_for_auto() {
        let auto = ParserConfig {
            detection_sample_size: 0,
            ..Default::default()
        };
        let err = auto.validate().unwrap_err();
        assert!(err.contains("detection_sample_size"), "Error should mention detection_sample_size: {}", err);

        let fixed = ParserConfig {
            format: FormatSelection::Haproxy,
            detection_sample_size: 0,
            ..Default::default()
        };
        assert!(fixed.validate().is_ok(), "A fixed format never samples");
    }

    // ── Serialization Round-trip ─────────────────────────────────

    #[test]
    fn test_parser_config_toml_round_trip() {
        let cfg = ParserConfig {
            format: FormatSelection::Apache,
            emit_unmatched: true,
            ..Default::default()
        };
        let toml_str = toml::to_string(&cfg).expect("Should serialize to TOML");
        let deserialized: ParserConfig = toml::from_str(&toml_str).expect("Should deserialize from TOML");
        assert_eq!(deserialized.format, FormatSelection::Apache);
        assert!(deserialized.emit_unmatched);
        assert_eq!(deserialized.max_line_size, cfg.max_line_size);
    }

    #[test]
    fn test_parser_config_deserialize_partial_toml() {
        // Only set format; rest should use defaults via #[serde(default)]
        let toml_str = r#"format = "haproxy""#;
        let cfg: ParserConfig = toml::from_str(toml_str).expect("Should accept partial TOML");
        assert_eq!(cfg.format, FormatSelection::Haproxy);
        assert_eq!(cfg.max_line_size, 1_048_576); // default
        assert_eq!(cfg.detection_sample_size, 5); // default
    }

    #[test]
    fn test_parser_config_rejects_unknown_format() {
        let result: Result<ParserConfig, _> = toml::from_str(r#"format = "nginx""#);
        assert!(result.is_err());
    }
}
