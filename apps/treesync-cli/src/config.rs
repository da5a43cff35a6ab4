//! CLI configuration loaded from environment variables and optional config
//! file.
//!
//! Environment variables (all prefixed with `TREESYNC_`):
//!
//! | Variable                   | Default    | Description                    |
//! |----------------------------|------------|--------------------------------|
//! | `TREESYNC_MAX_LEVEL`       | `5`        | BFS depth limit                |
//! | `TREESYNC_STRATEGY`        | `adaptive` | Threshold strategy             |
//! | `TREESYNC_BASE_THRESHOLD`  | `50`       | Base threshold (fixed strategy)|
//! | `TREESYNC_CONFIDENCE`      | `90`       | High-confidence report cutoff  |
//! | `TREESYNC_LOG_LEVEL`       | `info`     | Tracing filter                 |
//!
//! An optional config file can be placed at `treesync.toml` in the working
//! directory. Environment variables override file values; command-line
//! flags override both.

use config::{Config, Environment, File};
use serde::Deserialize;
use treesync_match::ThresholdStrategy;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// BFS depth limit (default: `5`).
    #[serde(default = "default_max_level")]
    pub max_level: u32,

    /// Threshold strategy name (default: `adaptive`).
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Base threshold used verbatim by the fixed strategy (default: `50`).
    #[serde(default = "default_base_threshold")]
    pub base_threshold: u8,

    /// High-confidence report cutoff (default: `90`).
    #[serde(default = "default_confidence")]
    pub confidence: u8,

    /// Tracing log level filter (default: `info`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_level() -> u32 {
    5
}

fn default_strategy() -> String {
    "adaptive".to_string()
}

fn default_base_threshold() -> u8 {
    50
}

fn default_confidence() -> u8 {
    90
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            max_level: default_max_level(),
            strategy: default_strategy(),
            base_threshold: default_base_threshold(),
            confidence: default_confidence(),
            log_level: default_log_level(),
        }
    }
}

impl CliConfig {
    /// Load configuration from optional `treesync.toml` file and environment
    /// variables prefixed with `TREESYNC_`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = Config::builder()
            // Optional config file (not required to exist)
            .add_source(File::with_name("treesync").required(false))
            // Environment variables: TREESYNC_MAX_LEVEL, TREESYNC_STRATEGY, ...
            .add_source(Environment::with_prefix("TREESYNC").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    /// The configured strategy as an engine value; unknown names fall back
    /// to adaptive.
    pub fn threshold_strategy(&self) -> ThresholdStrategy {
        parse_strategy(&self.strategy).unwrap_or_default()
    }
}

/// Parse a strategy name (case-insensitive).
pub fn parse_strategy(name: &str) -> Option<ThresholdStrategy> {
    match name.to_lowercase().as_str() {
        "fixed" => Some(ThresholdStrategy::Fixed),
        "adaptive" => Some(ThresholdStrategy::Adaptive),
        "aggressive" => Some(ThresholdStrategy::Aggressive),
        "conservative" => Some(ThresholdStrategy::Conservative),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = CliConfig::default();
        assert_eq!(cfg.max_level, 5);
        assert_eq!(cfg.strategy, "adaptive");
        assert_eq!(cfg.base_threshold, 50);
        assert_eq!(cfg.confidence, 90);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!(parse_strategy("fixed"), Some(ThresholdStrategy::Fixed));
        assert_eq!(
            parse_strategy("Conservative"),
            Some(ThresholdStrategy::Conservative)
        );
        assert_eq!(parse_strategy("bogus"), None);
    }
}
