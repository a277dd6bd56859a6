//! Bot API dialect detection from webhook headers.

use http::HeaderMap;
use thiserror::Error;

/// Header names inspected by the router.
pub mod header {
    /// Bot API version, e.g. `2.7`.
    pub const API_VERSION: &str = "x-bot-api-version";
    /// Bot API dialect, e.g. `Webim Standard`.
    pub const API_DIALECT: &str = "x-bot-api-dialect";
    /// Version of the vendor platform sending the webhook.
    pub const WEBIM_VERSION: &str = "x-webim-version";
}

/// Webhook contract a request is handled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Bot API 1.0, answered synchronously.
    V1,
    /// Bot API 2.0, acknowledged and processed in the background.
    V2,
}

/// A request the router declines to handle. Always answered with 404.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    /// The version header is absent or empty.
    #[error("Bot API version is not specified")]
    EmptyVersion,

    /// The version header names an unknown major version.
    #[error("Unsupported Bot API version {0:?}")]
    UnsupportedVersion(String),

    /// A valid API 2.0 request arrived but API 2.0 is not configured.
    #[error("Bot API v2 is not configured")]
    V2NotConfigured,
}

/// Selects the dialect of a request posted to the auto-detecting endpoint.
///
/// # Errors
///
/// Returns a [`Rejection`] if the version is empty, unknown, or names
/// API 2.0 while it is not configured.
pub fn route(headers: &HeaderMap, v2_configured: bool) -> Result<Dialect, Rejection> {
    let version = header_str(headers, header::API_VERSION);
    let dialect = header_str(headers, header::API_DIALECT);

    tracing::debug!(
        "Routing request from Webim version {:?}, Bot API version {:?}",
        header_str(headers, header::WEBIM_VERSION),
        format!("{dialect} {version}").trim()
    );

    if version.starts_with("2.") {
        require_v2(v2_configured)
    } else if version.starts_with("1.") {
        Ok(Dialect::V1)
    } else if version.is_empty() {
        tracing::warn!(
            "Received request without Bot API version. Skipping; \
             use the /v1 or /v2 endpoint to pin the API version"
        );
        Err(Rejection::EmptyVersion)
    } else {
        tracing::warn!("Received request with unexpected Bot API version {version:?}. Skipping");
        Err(Rejection::UnsupportedVersion(version.to_string()))
    }
}

/// Admits an API 2.0 request only if API 2.0 is configured.
///
/// # Errors
///
/// Returns [`Rejection::V2NotConfigured`] otherwise.
pub fn require_v2(v2_configured: bool) -> Result<Dialect, Rejection> {
    if v2_configured {
        Ok(Dialect::V2)
    } else {
        tracing::warn!("Received request for API v2 that is not configured. Skipping");
        Err(Rejection::V2NotConfigured)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
