//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::Catalog;
use crate::error::ConfigError;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Directories cut sheets may be exported into.
    #[serde(default)]
    pub allowed_paths: Vec<PathBuf>,

    /// Pricing settings.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Overrides of the built-in materials and hardware catalog.
    #[serde(default)]
    pub catalog: Catalog,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let margin = self.pricing.margin_multiplier;
        if !margin.is_finite() || margin <= 0.0 {
            return Err(ConfigError::ValidationError {
                message: format!("Invalid margin multiplier {margin}. Must be greater than 0"),
            });
        }

        self.catalog
            .validate()
            .map_err(|message| ConfigError::ValidationError { message })
    }
}

/// Pricing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// Multiplier applied to the cost estimate to quote a price.
    /// Default: 1.0
    #[serde(default = "default_margin")]
    pub margin_multiplier: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            margin_multiplier: default_margin(),
        }
    }
}

const fn default_margin() -> f64 {
    1.0
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::SlideType;

    #[test]
    fn parse_minimal_config() {
        let json = r"{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.allowed_paths.is_empty());
        assert_eq!(config.catalog, Catalog::default());
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "allowed_paths": ["/srv/cutlists"],
            "pricing": { "margin_multiplier": 1.8 },
            "catalog": {
                "slides": { "undermount": { "clearance": 12, "unit_cost": 30 } },
                "prices": { "shelf_pin": 0.08 },
                "waste": { "sheet": 1.25 }
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.allowed_paths, vec![PathBuf::from("/srv/cutlists")]);
        assert!((config.pricing.margin_multiplier - 1.8).abs() < f64::EPSILON);

        let undermount = config.catalog.slides.get(SlideType::Undermount);
        assert!((undermount.clearance - 12.0).abs() < f64::EPSILON);
        // untouched tables keep their defaults
        let telescopic = config.catalog.slides.get(SlideType::Telescopic);
        assert!((telescopic.clearance - 26.0).abs() < f64::EPSILON);
        assert!((config.catalog.prices.shelf_pin - 0.08).abs() < f64::EPSILON);
        assert!((config.catalog.prices.drawer_screw - 0.03).abs() < f64::EPSILON);
        assert!((config.catalog.waste.sheet - 1.25).abs() < f64::EPSILON);
        assert!((config.catalog.waste.edge_banding - 1.2).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn reject_zero_margin() {
        let json = r#"{ "pricing": { "margin_multiplier": 0 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_waste_below_one() {
        let json = r#"{ "catalog": { "waste": { "sheet": 0.9 } } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{
            "unknown_field": "value"
        }"#;

        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn reject_unknown_catalog_fields() {
        let json = r#"{ "catalog": { "prices": { "dowel": 0.01 } } }"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
