//! Error types for outbound vendor API calls.

use thiserror::Error;

/// Transport-level failure of a single HTTP exchange.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, refused connections
    /// and TLS handshake errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The request URL was rejected before sending.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Classified failure of a vendor API call.
///
/// Every variant is terminal for the call that produced it; the bot logs
/// it and carries on with the next scheduled call.
#[derive(Debug, Error)]
pub enum CallError {
    /// The request payload could not be serialized.
    #[error("Failed to encode request for {method}: {source}")]
    Encode {
        /// API method name
        method: &'static str,
        /// Underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// The request never produced a response.
    #[error("Request to {url} failed: {source}")]
    Transport {
        /// Request URL
        url: url::Url,
        /// Underlying transport error
        #[source]
        source: HttpError,
    },

    /// The response is not JSON.
    #[error("Unexpected content type {content_type:?} from {url} (status {status})")]
    UnexpectedContentType {
        /// Request URL
        url: url::Url,
        /// HTTP status of the response
        status: http::StatusCode,
        /// `Content-Type` header value, if any
        content_type: Option<String>,
    },

    /// The response claims to be JSON but does not parse.
    #[error("Malformed JSON from {url}: {text:?}")]
    MalformedBody {
        /// Request URL
        url: url::Url,
        /// Raw response text
        text: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The vendor answered, but reported a failure.
    #[error(
        "API error from {url} (status {status}): {code}{}",
        description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
    )]
    Application {
        /// Request URL
        url: url::Url,
        /// HTTP status of the response
        status: http::StatusCode,
        /// Error code reported by the vendor
        code: String,
        /// Human-readable description, if provided
        description: Option<String>,
    },
}

/// Error building the vendor API client from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The API domain does not form a valid base URL.
    #[error("Invalid API domain '{domain}': {source}")]
    InvalidDomain {
        /// The configured domain
        domain: String,
        /// Underlying URL parse error
        #[source]
        source: url::ParseError,
    },

    /// The token cannot be sent in an `Authorization` header.
    #[error("Invalid API token: {0}")]
    InvalidToken(#[source] http::header::InvalidHeaderValue),
}
