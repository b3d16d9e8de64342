//! Load: config loading from file and environment variables.

use std::path::Path;
use std::fs::File;
use std::io::Read;

use super::model::{FormatSelection, ParserConfig};

impl ParserConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("LINEDEF_CONFIG_FILE")
            .unwrap_or_else(|_| "linedef.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::from_env()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: ParserConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            format: std::env::var("LINEDEF_FORMAT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.format),
            max_line_size: std::env::var("LINEDEF_MAX_LINE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_line_size),
            detection_sample_size: std::env::var("LINEDEF_DETECTION_SAMPLE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.detection_sample_size),
            report_anomalies: std::env::var("LINEDEF_REPORT_ANOMALIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.report_anomalies),
            emit_unmatched: std::env::var("LINEDEF_EMIT_UNMATCHED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.emit_unmatched),
        }
    }

    /// Environment variables override file config. A set but unparsable
    /// `LINEDEF_FORMAT` is an error; other malformed values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup("LINEDEF_FORMAT") {
            self.format = format.parse::<FormatSelection>()?;
        }
        if let Some(size) = lookup("LINEDEF_MAX_LINE_SIZE").and_then(|s| s.parse().ok()) {
            self.max_line_size = size;
        }
        if let Some(flag) = lookup("LINEDEF_REPORT_ANOMALIES").and_then(|s| s.parse().ok()) {
            self.report_anomalies = flag;
        }
        if let Some(flag) = lookup("LINEDEF_EMIT_UNMATCHED").and_then(|s| s.parse().ok()) {
            self.emit_unmatched = flag;
        }
        Ok(())
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), String> {
        if self.max_line_size == 0 {
            return Err("max_line_size must be > 0".to_string());
        }
        if self.format == FormatSelection::Auto && self.detection_sample_size == 0 {
            return Err("detection_sample_size must be > 0 when format is auto".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut cfg = ParserConfig::default();
        cfg.apply_overrides(lookup(&[
            ("LINEDEF_FORMAT", "apache"),
            ("LINEDEF_MAX_LINE_SIZE", "4096"),
            ("LINEDEF_REPORT_ANOMALIES", "true"),
            ("LINEDEF_EMIT_UNMATCHED", "true"),
        ]))
        .unwrap();

        assert_eq!(cfg.format, FormatSelection::Apache);
        assert_eq!(cfg.max_line_size, 4096);
        assert!(cfg.report_anomalies);
        assert!(cfg.emit_unmatched);
    }

    #[test]
    fn test_no_overrides_keeps_values() {
        let mut cfg = ParserConfig {
            format: FormatSelection::Haproxy,
            ..Default::default()
        };
        cfg.apply_overrides(lookup(&[])).unwrap();
        assert_eq!(cfg.format, FormatSelection::Haproxy);
        assert_eq!(cfg.max_line_size, 1_048_576);
    }

    #[test]
    fn test_malformed_numeric_override_is_ignored() {
        let mut cfg = ParserConfig::default();
        cfg.apply_overrides(lookup(&[("LINEDEF_MAX_LINE_SIZE", "lots")])).unwrap();
        assert_eq!(cfg.max_line_size, 1_048_576);
    }

    #[test]
    fn test_unknown_format_override_is_an_error() {
        let mut cfg = ParserConfig::default();
        let err = cfg.apply_overrides(lookup(&[("LINEDEF_FORMAT", "nginx")])).unwrap_err();
        assert!(err.contains("nginx"));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("linedef-test-{}.toml", std::process::id()));
        std::fs::write(&path, "format = \"apache\"\nemit_unmatched = true\n").unwrap();

        let cfg = ParserConfig::from_file(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cfg.format, FormatSelection::Apache);
        assert!(cfg.emit_unmatched);
        assert!(!cfg.report_anomalies);
    }

    #[test]
    fn test_from_file_missing() {
        assert!(ParserConfig::from_file("/nonexistent/linedef.toml").is_err());
    }
}
