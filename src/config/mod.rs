//! Configuration layer for extbot.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Empty strings count as unset, so `--token ""` does not enable API 2.0.
//!
//! # API 2.0
//!
//! API 2.0 is enabled only when both the domain and the token resolve to a
//! value. The forward targets are ignored otherwise.
//!
//! # TOML-Only Options
//!
//! - `api.timeout` (default: 30s) - Timeout of one vendor request
//! - `server.shutdown_grace` (default: 10s) - Time background tasks get on shutdown

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
