// File: src/config.rs
// Purpose: Engine configuration, loadable from the [validation] table of a TOML file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Placeholder replaced by the field name in `default_message`
pub const FIELD_PLACEHOLDER: &str = "{field}";

/// Validation engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Message template used when a field has no explicit message
    #[serde(default = "default_message")]
    pub default_message: String,

    /// Upper bound for a single check, in milliseconds (none = unbounded)
    #[serde(default)]
    pub check_timeout_ms: Option<u64>,
}

/// File layout: the engine settings live under `[validation]`
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    validation: ValidationConfig,
}

fn default_message() -> String {
    "invalid value for {field}".to_string()
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            default_message: default_message(),
            check_timeout_ms: None,
        }
    }
}

impl ValidationConfig {
    /// Load from the `[validation]` table of a TOML file.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Parse from TOML text containing an optional `[validation]` table
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.validation)
    }

    /// Default message for `field`
    pub fn message_for(&self, field: &str) -> String {
        self.default_message.replace(FIELD_PLACEHOLDER, field)
    }

    pub fn check_timeout(&self) -> Option<Duration> {
        self.check_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.message_for("email"), "invalid value for email");
        assert_eq!(config.check_timeout(), None);
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(ValidationConfig::from_toml_str("").unwrap(), ValidationConfig::default());
        assert_eq!(
            ValidationConfig::from_toml_str("[server]\nport = 8080\n").unwrap(),
            ValidationConfig::default()
        );
    }

    #[test]
    fn test_custom_values() {
        let toml = r#"
            [validation]
            default_message = "{field} is not valid"
            check_timeout_ms = 250
        "#;
        let config = ValidationConfig::from_toml_str(toml).unwrap();

        assert_eq!(config.message_for("age"), "age is not valid");
        assert_eq!(config.check_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ValidationConfig::load("does-not-exist/checkchain.toml").unwrap();
        assert_eq!(config, ValidationConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(ValidationConfig::from_toml_str("[validation]\ncheck_timeout_ms = \"soon\"").is_err());
    }
}
