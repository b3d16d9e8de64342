/// Built-in access log dialects

pub mod haproxy;
pub mod http_log;

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use super::model::SchemaError;
use super::shape::FormatDefinition;

/// The format definitions shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinFormat {
    Haproxy,
    Apache,
}

impl BuiltinFormat {
    /// Every built-in format, in detection preference order
    pub const ALL: [BuiltinFormat; 2] = [BuiltinFormat::Haproxy, BuiltinFormat::Apache];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinFormat::Haproxy => haproxy::NAME,
            BuiltinFormat::Apache => http_log::NAME,
        }
    }

    pub fn definition(&self) -> Result<FormatDefinition, SchemaError> {
        match self {
            BuiltinFormat::Haproxy => haproxy::definition(),
            BuiltinFormat::Apache => http_log::definition(),
        }
    }

    /// Build all definitions, in the order of [`BuiltinFormat::ALL`].
    pub fn all_definitions() -> Result<Vec<FormatDefinition>, SchemaError> {
        Self::ALL.iter().map(BuiltinFormat::definition).collect()
    }
}

impl fmt::Display for BuiltinFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuiltinFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "haproxy" => Ok(BuiltinFormat::Haproxy),
            "apache" | "http_log" => Ok(BuiltinFormat::Apache),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_is_valid() {
        for format in BuiltinFormat::ALL {
            let def = format.definition().unwrap();
            assert_eq!(def.name(), format.as_str());
            assert!(def.is_valid(), "{} should be valid", format);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("haproxy".parse::<BuiltinFormat>(), Ok(BuiltinFormat::Haproxy));
        assert_eq!("Apache".parse::<BuiltinFormat>(), Ok(BuiltinFormat::Apache));
        assert!("nginx".parse::<BuiltinFormat>().is_err());
    }

    #[test]
    fn test_all_definitions_keeps_order() {
        let names: Vec<String> = BuiltinFormat::all_definitions()
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["haproxy", "apache"]);
    }
}
