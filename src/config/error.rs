//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The bind host is not an IP address or hostname.
    #[error("Invalid host '{value}': expected ip address or hostname")]
    InvalidHost {
        /// The invalid host
        value: String,
    },

    /// The bind port is out of range.
    #[error("Invalid port {value}: expected integer between 1 and 65535")]
    InvalidPort {
        /// The invalid port
        value: u16,
    },

    /// The vendor domain is not a domain name.
    #[error("Invalid domain '{value}': expected domain name, e.g. demo.webim.ru")]
    InvalidDomain {
        /// The invalid domain
        value: String,
    },

    /// The bot token cannot be sent in an HTTP header.
    #[error("Invalid token: {reason}")]
    InvalidToken {
        /// Reason for invalidity
        reason: String,
    },

    /// The forward agent id is not positive.
    #[error("Invalid agent id {value}: expected positive integer")]
    InvalidAgentId {
        /// The invalid id
        value: u64,
    },

    /// Invalid duration value (zero).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

/// Field names used in configuration errors and hints.
pub mod field {
    /// The request timeout field.
    pub const TIMEOUT: &str = "api.timeout";
    /// The shutdown grace period field.
    pub const SHUTDOWN_GRACE: &str = "server.shutdown_grace";
}
