//! Error types for ontheway.
//!
//! This module defines all error types used throughout the ontheway crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for ontheway operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Data Access Errors ===
    /// Failed to open the arrivals database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// No database target has been configured.
    #[error("no database configured; set one in the config file, ONWAY_DATABASE_PATH, --database, or `connect <path>`")]
    DatabaseNotConfigured,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Zone Ruleset Errors ===
    /// Failed to read a zone ruleset file.
    #[error("failed to read zone rules from {path}: {source}")]
    ZoneRulesRead {
        /// Path to the ruleset file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a zone ruleset file.
    #[error("failed to parse zone rules: {0}")]
    ZoneRulesParse(#[from] toml::de::Error),

    /// A zone ruleset failed validation.
    #[error("invalid zone rules: {message}")]
    ZoneRulesInvalid {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Terminal Errors ===
    /// The interactive line editor failed.
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// A specialized Result type for ontheway operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a new zone ruleset validation error.
    #[must_use]
    pub fn zone_rules_invalid(message: impl Into<String>) -> Self {
        Self::ZoneRulesInvalid {
            message: message.into(),
        }
    }

    /// Check if this error occurred at the data access boundary.
    ///
    /// Data access failures are surfaced to the user as a message while the
    /// session keeps whatever record set it already holds; they never
    /// terminate the dashboard.
    #[must_use]
    pub fn is_data_access(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. } | Self::DatabaseQuery(_) | Self::DatabaseNotConfigured
        )
    }
}
