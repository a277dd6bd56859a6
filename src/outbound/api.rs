//! Vendor Bot API 2.0 client.

use std::fmt;

use http::header::{AUTHORIZATION, HeaderValue};
use serde::Serialize;
use url::Url;

use super::{CallError, HttpClient, HttpRequest, HttpResponse, SetupError};
use crate::json::pretty_json;

/// Methods of the vendor Bot API used by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    /// Post a message into a chat on behalf of the bot.
    SendMessage,
    /// Close the chat with the visitor.
    CloseChat,
    /// Hand the chat over to an agent or a department.
    RedirectChat,
}

impl ApiMethod {
    /// Returns the path segment of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SendMessage => "send_message",
            Self::CloseChat => "close_chat",
            Self::RedirectChat => "redirect_chat",
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the API base URL for a vendor domain, e.g. `demo.webim.ru`.
///
/// # Errors
///
/// Returns [`SetupError::InvalidDomain`] if the domain does not form a URL.
pub fn base_url_for_domain(domain: &str) -> Result<Url, SetupError> {
    Url::parse(&format!("https://{domain}/api/bot/v2/")).map_err(|source| {
        SetupError::InvalidDomain {
            domain: domain.to_string(),
            source,
        }
    })
}

/// Builds the `Authorization` header value for a bot token.
///
/// # Errors
///
/// Returns [`SetupError::InvalidToken`] if the token contains characters
/// not allowed in a header.
pub fn auth_header(token: &str) -> Result<HeaderValue, SetupError> {
    let mut value =
        HeaderValue::from_str(&format!("Token {token}")).map_err(SetupError::InvalidToken)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Client for the vendor Bot API.
///
/// Calls are best effort: [`ApiClient::call`] never fails, it logs the
/// classified [`CallError`] and returns. [`ApiClient::try_call`] exposes
/// the classification to callers that need it.
#[derive(Debug)]
pub struct ApiClient<H> {
    client: H,
    base: Url,
    auth: HeaderValue,
}

impl<H> ApiClient<H> {
    /// Creates a client for the given base URL and bot token.
    ///
    /// The base URL must end with `/` so that method names are appended.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidToken`] if the token is not a valid header value.
    pub fn new(client: H, base: Url, token: &str) -> Result<Self, SetupError> {
        Ok(Self {
            client,
            base,
            auth: auth_header(token)?,
        })
    }

    /// Creates a client for `https://{domain}/api/bot/v2/`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the domain or token is invalid.
    pub fn for_domain(client: H, domain: &str, token: &str) -> Result<Self, SetupError> {
        Self::new(client, base_url_for_domain(domain)?, token)
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }

    /// Returns the configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Returns the full URL of a method.
    #[must_use]
    pub fn method_url(&self, method: ApiMethod) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(method.as_str());
        }
        url
    }
}

impl<H: HttpClient> ApiClient<H> {
    /// Calls a vendor method and logs any failure.
    pub async fn call<P: Serialize + Sync>(&self, method: ApiMethod, payload: &P) {
        match self.try_call(method, payload).await {
            Ok(_) => tracing::debug!("API v2 {method} succeeded"),
            Err(e) => log_failure(method, &e),
        }
    }

    /// Calls a vendor method and returns the parsed response body.
    ///
    /// # Errors
    ///
    /// Returns a [`CallError`] describing which stage of the call failed.
    pub async fn try_call<P: Serialize + Sync>(
        &self,
        method: ApiMethod,
        payload: &P,
    ) -> Result<serde_json::Value, CallError> {
        let url = self.method_url(method);
        let body = serde_json::to_vec(payload).map_err(|source| CallError::Encode {
            method: method.as_str(),
            source,
        })?;

        tracing::debug!("API v2 sending {method}:\n{}", pretty_json(payload));

        let request = HttpRequest::post(url.clone())
            .with_header(AUTHORIZATION, self.auth.clone())
            .with_json_body(body);

        let response = self
            .client
            .request(request)
            .await
            .map_err(|source| CallError::Transport {
                url: url.clone(),
                source,
            })?;

        let content = parse_response(&url, &response)?;
        tracing::debug!("API v2 received response:\n{}", pretty_json(&content));

        check_application_error(url, &response, &content)?;
        Ok(content)
    }
}

fn parse_response(url: &Url, response: &HttpResponse) -> Result<serde_json::Value, CallError> {
    if !response.is_json() {
        return Err(CallError::UnexpectedContentType {
            url: url.clone(),
            status: response.status,
            content_type: response.content_type().map(ToString::to_string),
        });
    }

    serde_json::from_slice(&response.body).map_err(|source| CallError::MalformedBody {
        url: url.clone(),
        text: response.body_lossy(),
        source,
    })
}

fn check_application_error(
    url: Url,
    response: &HttpResponse,
    content: &serde_json::Value,
) -> Result<(), CallError> {
    let code = content
        .get("error")
        .filter(|value| is_reported(value))
        .map(|code| match code {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        });

    if code.is_none() && response.is_success() {
        return Ok(());
    }

    Err(CallError::Application {
        url,
        status: response.status,
        code: code.unwrap_or_else(|| "unknown".to_string()),
        description: error_description(content),
    })
}

/// Reads `desc`, falling back to `description`; non-string values are ignored.
fn error_description(content: &serde_json::Value) -> Option<String> {
    ["desc", "description"]
        .iter()
        .find_map(|key| content.get(key).and_then(serde_json::Value::as_str))
        .map(ToString::to_string)
}

/// Mirrors the vendor convention that a null, false or empty `error` means none.
fn is_reported(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => false,
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn log_failure(method: ApiMethod, error: &CallError) {
    match error {
        CallError::Encode { source, .. } => {
            tracing::error!(%method, "API v2 request could not be encoded: {source}");
        }
        CallError::Transport { url, source } => {
            tracing::error!(%method, %url, "API v2 request failed: {source}");
        }
        CallError::UnexpectedContentType {
            url,
            status,
            content_type,
        } => {
            tracing::error!(
                %method,
                %url,
                %status,
                "API v2 responded with unexpected content type {}",
                content_type.as_deref().unwrap_or("<none>")
            );
        }
        CallError::MalformedBody { url, text, source } => {
            tracing::error!(%method, %url, "API v2 responded with malformed JSON ({source}): {text}");
        }
        CallError::Application {
            url,
            status,
            code,
            description,
        } => {
            tracing::error!(
                %method,
                %url,
                %status,
                "API v2 request error: {code}: {}",
                description.as_deref().unwrap_or("no description")
            );
        }
    }
}
