//! Configuration management for ontheway.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::zone::ZoneMap;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "ontheway";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ONWAY_`)
/// 2. TOML config file at `~/.config/ontheway/config.toml`
/// 3. Default values
///
/// The database location is never embedded in code; it comes from the config
/// file, the `ONWAY_DATABASE_PATH` environment variable, or the `--database`
/// flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Retry configuration for the retrieval boundary.
    pub retry: RetryConfig,
    /// Display configuration.
    pub display: DisplayConfig,
    /// Zone ruleset configuration.
    pub zones: ZonesConfig,
}

/// Database-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the arrivals database file. The dashboard only reads it.
    pub path: Option<PathBuf>,
}

/// Retry policy for fetching the record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of fetch attempts before giving up.
    pub max_attempts: u32,
    /// Base delay between attempts in milliseconds; doubles per attempt.
    pub base_delay_ms: u64,
    /// SQLite busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width of the longest chart bar in characters.
    pub chart_width: usize,
    /// Show the bar for unclassified records. The total always includes
    /// them.
    pub show_unclassified: bool,
}

/// Zone ruleset configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZonesConfig {
    /// Path to a TOML ruleset file. Defaults to the built-in reference
    /// ruleset when unset.
    pub rules_file: Option<PathBuf>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 250,
            busy_timeout_ms: 5_000,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            chart_width: 40,
            show_unclassified: true,
        }
    }
}

impl RetryConfig {
    /// The SQLite busy timeout as a Duration.
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// The backoff delay before the next attempt.
    ///
    /// Doubles per completed attempt, starting from the base delay.
    #[must_use]
    pub fn backoff_delay(&self, completed_attempts: u32) -> Duration {
        let factor = 2_u64.saturating_pow(completed_attempts.saturating_sub(1));
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ONWAY_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(Error::config_validation(
                "retry.max_attempts must be greater than 0",
            ));
        }

        if self.display.chart_width == 0 {
            return Err(Error::config_validation(
                "display.chart_width must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Load the active zone ruleset.
    ///
    /// Uses the configured ruleset file when set, otherwise the built-in
    /// reference ruleset.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured ruleset file cannot be loaded or
    /// fails validation.
    pub fn zone_map(&self) -> Result<ZoneMap> {
        match &self.zones.rules_file {
            Some(path) => ZoneMap::load(path),
            None => Ok(ZoneMap::default()),
        }
    }
}
