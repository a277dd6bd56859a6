//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Extbot: sample external bot for the Webim Bot API
///
/// Serves Bot API 1.0 webhooks, and Bot API 2.0 webhooks when a vendor
/// domain and bot token are configured.
#[derive(Debug, Parser)]
#[command(name = "extbot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Bind webhook to this host [default: localhost]
    #[arg(long)]
    pub host: Option<String>,

    /// Bind webhook to this port [default: 8000]
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// (required for API v2) Domain of the Webim instance, e.g. demo.webim.ru
    #[arg(long)]
    pub domain: Option<String>,

    /// (required for API v2) Token from the bot settings
    #[arg(long)]
    pub token: Option<String>,

    /// (API v2) Add a button forwarding the chat to this agent
    #[arg(long = "agent-id", value_parser = clap::value_parser!(u64).range(1..))]
    pub agent_id: Option<u64>,

    /// (API v2) Add a button forwarding the chat to this department
    #[arg(long = "dep-key")]
    pub dep_key: Option<String>,

    /// (API v1) Add an extra button with this text
    #[arg(long = "custom-button", value_name = "TEXT")]
    pub custom_button: Option<String>,

    /// (API v1) Respond with this text when the custom button is clicked
    #[arg(long = "custom-button-response", value_name = "TEXT")]
    pub custom_button_response: Option<String>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Print verbose messages
    #[arg(long, short)]
    pub verbose: bool,

    /// Deprecated alias of --verbose
    #[arg(long, hide = true)]
    pub debug: bool,
}

/// Subcommands for extbot
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "extbot.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Parses CLI arguments from an iterator, returning parse errors.
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid or out-of-range arguments.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }

    /// Returns true if debug logging was requested by either flag.
    #[must_use]
    pub const fn wants_verbose(&self) -> bool {
        self.verbose || self.debug
    }
}
