//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::outbound::auth_header;
use crate::v1::CustomButton;
use crate::v2::HandlerConfig;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Domain name: dot-separated labels of letters, digits and inner hyphens,
/// ending in an alphabetic top-level label.
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z][A-Za-z0-9-]{0,61}[A-Za-z0-9]$")
        .expect("domain pattern is a valid regex")
});

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Host the webhook server binds to
    pub host: String,

    /// Port the webhook server binds to
    pub port: u16,

    /// API 2.0 settings, present iff both domain and token are set
    pub api_v2: Option<HandlerConfig>,

    /// Extra API 1.0 button
    pub custom_button: CustomButton,

    /// Timeout of one vendor API request
    pub request_timeout: Duration,

    /// Time background tasks get to finish on shutdown
    pub shutdown_grace: Duration,

    /// Verbose logging enabled
    pub verbose: bool,

    /// The deprecated `--debug` flag was used
    pub deprecated_debug: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_v2 = self.api_v2.as_ref().map_or_else(
            || "disabled".to_string(),
            |api| {
                format!(
                    "{} (agent: {}, department: {})",
                    api.domain,
                    api.forward_agent_id
                        .map_or_else(|| "none".to_string(), |id| id.to_string()),
                    api.forward_department_key.as_deref().unwrap_or("none"),
                )
            },
        );

        write!(
            f,
            "Config {{ listen: {}, api_v2: {}, custom_button: {}, timeout: {}s, shutdown_grace: {}s }}",
            self.index_url(),
            api_v2,
            !self.custom_button.is_empty(),
            self.request_timeout.as_secs(),
            self.shutdown_grace.as_secs(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Host, port or domain is invalid
    /// - Token is not a valid header value
    /// - Agent id is zero
    /// - Duration values are zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let host = Self::resolve_host(cli, toml)?;
        let port = Self::resolve_port(cli, toml)?;
        let api_v2 = Self::resolve_api_v2(cli, toml)?;

        let custom_button = CustomButton {
            text: non_empty(
                cli.custom_button
                    .as_deref()
                    .or_else(|| toml.and_then(|t| t.buttons.custom_text.as_deref())),
            ),
            response: non_empty(
                cli.custom_button_response
                    .as_deref()
                    .or_else(|| toml.and_then(|t| t.buttons.custom_response.as_deref())),
            ),
        };

        let request_timeout = resolve_duration(
            field::TIMEOUT,
            toml.and_then(|t| t.api.timeout),
            defaults::REQUEST_TIMEOUT_SECS,
        )?;
        let shutdown_grace = resolve_duration(
            field::SHUTDOWN_GRACE,
            toml.and_then(|t| t.server.shutdown_grace),
            defaults::SHUTDOWN_GRACE_SECS,
        )?;

        Ok(Self {
            host,
            port,
            api_v2,
            custom_button,
            request_timeout,
            shutdown_grace,
            verbose: cli.wants_verbose(),
            deprecated_debug: cli.debug,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Returns the URL the webhook is served on.
    #[must_use]
    pub fn index_url(&self) -> String {
        if self.host.contains(':') {
            format!("http://[{}]:{}/", self.host, self.port)
        } else {
            format!("http://{}:{}/", self.host, self.port)
        }
    }

    fn resolve_host(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let host = cli
            .host
            .as_deref()
            .or_else(|| toml.and_then(|t| t.server.host.as_deref()))
            .unwrap_or(defaults::HOST);

        if is_valid_host(host) {
            Ok(host.to_string())
        } else {
            Err(ConfigError::InvalidHost {
                value: host.to_string(),
            })
        }
    }

    fn resolve_port(cli: &Cli, toml: Option<&TomlConfig>) -> Result<u16, ConfigError> {
        // CLI values are range-checked by clap
        let port = cli
            .port
            .or_else(|| toml.and_then(|t| t.server.port))
            .unwrap_or(defaults::PORT);

        if port == 0 {
            return Err(ConfigError::InvalidPort { value: port });
        }

        Ok(port)
    }

    fn resolve_api_v2(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<HandlerConfig>, ConfigError> {
        let api = toml.map(|t| &t.api);

        let domain = non_empty(
            cli.domain
                .as_deref()
                .or_else(|| api.and_then(|a| a.domain.as_deref())),
        );
        let token = non_empty(
            cli.token
                .as_deref()
                .or_else(|| api.and_then(|a| a.token.as_deref())),
        );
        let forward_agent_id = cli.agent_id.or_else(|| api.and_then(|a| a.agent_id));
        let forward_department_key = non_empty(
            cli.dep_key
                .as_deref()
                .or_else(|| api.and_then(|a| a.dep_key.as_deref())),
        );

        if let Some(ref domain) = domain {
            if !is_valid_domain(domain) {
                return Err(ConfigError::InvalidDomain {
                    value: domain.clone(),
                });
            }
        }

        if let Some(ref token) = token {
            auth_header(token).map_err(|e| ConfigError::InvalidToken {
                reason: e.to_string(),
            })?;
        }

        if forward_agent_id == Some(0) {
            return Err(ConfigError::InvalidAgentId { value: 0 });
        }

        let (Some(domain), Some(token)) = (domain, token) else {
            return Ok(None);
        };

        Ok(Some(HandlerConfig {
            domain,
            token,
            forward_agent_id,
            forward_department_key,
        }))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(ToString::to_string)
}

fn resolve_duration(
    field: &'static str,
    seconds: Option<u64>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let seconds = seconds.unwrap_or(default);

    if seconds == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(Duration::from_secs(seconds))
}

fn is_valid_domain(value: &str) -> bool {
    value.len() <= 253 && DOMAIN_RE.is_match(value)
}

fn is_valid_host(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
        || is_valid_domain(value)
        || (!value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'))
}
