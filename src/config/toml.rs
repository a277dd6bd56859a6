//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Webhook server section
    #[serde(default)]
    pub server: ServerSection,

    /// Vendor Bot API 2.0 section
    #[serde(default)]
    pub api: ApiSection,

    /// Extra API 1.0 button section
    #[serde(default)]
    pub buttons: ButtonsSection,
}

/// Webhook server section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Host to bind to
    pub host: Option<String>,

    /// Port to bind to
    pub port: Option<u16>,

    /// Seconds background tasks get to finish on shutdown
    pub shutdown_grace: Option<u64>,
}

/// Vendor Bot API 2.0 section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    /// Domain of the vendor instance
    pub domain: Option<String>,

    /// Bot token
    pub token: Option<String>,

    /// Agent the forward button redirects to
    pub agent_id: Option<u64>,

    /// Department the forward button redirects to
    pub dep_key: Option<String>,

    /// Timeout of one vendor request in seconds
    pub timeout: Option<u64>,
}

/// Extra API 1.0 button section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ButtonsSection {
    /// Custom button caption
    pub custom_text: Option<String>,

    /// Text sent when the custom button is pressed
    pub custom_response: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Extbot Configuration File
# Command line options override the values below.

[server]
# Host to bind the webhook to (default: localhost)
# Accepted values: IPv4/IPv6 address or hostname
host = "localhost"

# Port to bind the webhook to (default: 8000)
port = 8000

# Seconds background tasks get to finish on shutdown (default: 10)
# shutdown_grace = 10

[api]
# Bot API 2.0 is enabled only when both domain and token are set.
# Otherwise only the legacy Bot API 1.0 is served.

# Domain of the Webim instance
# domain = "demo.webim.ru"

# Token from the bot settings
# token = "your-token-here"

# Add a button forwarding the chat to this agent (positive integer)
# agent_id = 1

# Add a button forwarding the chat to this department
# dep_key = "sales"

# Timeout of one Bot API request in seconds (default: 30)
# timeout = 30

[buttons]
# Bot API 1.0 only: an extra button is shown when either value is set.

# Custom button caption (default: "Custom button")
# custom_text = "Custom button"

# Response to the custom button
# custom_response = "Wow, you clicked my custom button. What should I do next?"
"#
    .to_string()
}
