//! Configuration for the complete flatten pipeline
//!
//! Settings can come from a TOML file:
//!
//! ```toml
//! scale = 0.75
//! unit = "dp"
//! output_suffix = "_flat"
//! ```
//!
//! Keys that are absent keep their defaults.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::LayoutConfig;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration for reading, flattening and writing a document
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenConfig {
    /// Engine configuration
    pub layout: LayoutConfig,
    /// Unit suffix stripped from and appended to dimensions
    pub unit: String,
    /// Appended to the input file stem to name the output file
    pub output_suffix: String,
    /// Dump positioning trees while flattening
    pub debug: bool,
}

/// TOML structure for deserializing configuration files
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    scale: Option<f64>,
    unit: Option<String>,
    output_suffix: Option<String>,
    debug: Option<bool>,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            unit: "dp".to_string(),
            output_suffix: "_flat".to_string(),
            debug: false,
        }
    }
}

impl FlattenConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(scale) = parsed.scale {
            config.layout.scale = scale;
        }
        if let Some(unit) = parsed.unit {
            config.unit = unit;
        }
        if let Some(suffix) = parsed.output_suffix {
            config.output_suffix = suffix;
        }
        if let Some(debug) = parsed.debug {
            config.debug = debug;
        }
        Ok(config)
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the horizontal scale factor
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.layout.scale = scale;
        self
    }

    /// Set the dimension unit suffix
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Set the output file suffix
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    /// Enable or disable tree dumps
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FlattenConfig::default();
        assert_eq!(config.layout.scale, 1.0);
        assert_eq!(config.unit, "dp");
        assert_eq!(config.output_suffix, "_flat");
        assert!(!config.debug);
    }

    #[test]
    fn test_builder_pattern() {
        let config = FlattenConfig::new()
            .with_scale(0.5)
            .with_unit("px")
            .with_output_suffix("-abs")
            .with_debug(true);

        assert_eq!(config.layout.scale, 0.5);
        assert_eq!(config.unit, "px");
        assert_eq!(config.output_suffix, "-abs");
        assert!(config.debug);
    }

    #[test]
    fn test_from_str_keeps_defaults_for_missing_keys() {
        let config = FlattenConfig::from_str("scale = 0.75").unwrap();
        assert_eq!(config.layout.scale, 0.75);
        assert_eq!(config.unit, "dp");
    }

    #[test]
    fn test_from_str_rejects_unknown_keys() {
        assert!(matches!(
            FlattenConfig::from_str("scael = 2.0"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
