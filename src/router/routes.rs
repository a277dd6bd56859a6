//! HTTP endpoints of the bot.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use http_body_util::LengthLimitError;
use thiserror::Error;

use super::dialect::{self, Dialect, Rejection};
use crate::event::ProtocolError;
use crate::outbound::HttpClient;
use crate::v1::ApiV1Bot;
use crate::v2::{ApiV2Bot, HandlerError};

/// Largest webhook body accepted, in bytes.
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Bots shared by all request handlers.
#[derive(Debug)]
pub struct AppState<H> {
    v1: Arc<ApiV1Bot>,
    v2: Option<Arc<ApiV2Bot<H>>>,
}

impl<H> AppState<H> {
    /// Creates the state. `v2` is `None` when API 2.0 is not configured.
    #[must_use]
    pub const fn new(v1: Arc<ApiV1Bot>, v2: Option<Arc<ApiV2Bot<H>>>) -> Self {
        Self { v1, v2 }
    }

    /// Returns true if API 2.0 requests are served.
    #[must_use]
    pub const fn v2_configured(&self) -> bool {
        self.v2.is_some()
    }
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            v1: Arc::clone(&self.v1),
            v2: self.v2.clone(),
        }
    }
}

/// Failure of a webhook request, mapped to an HTTP status.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The dialect is undecidable or not configured (404).
    #[error(transparent)]
    NotRouted(#[from] Rejection),

    /// The body could not be read (400).
    #[error("Failed to read request body: {0}")]
    Body(#[source] axum::Error),

    /// The body is larger than [`BODY_LIMIT`] (413).
    #[error("Request body is larger than {limit} bytes")]
    TooLarge {
        /// Limit that was exceeded
        limit: usize,
    },

    /// The body does not match the dialect (400).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The API 2.0 bot is shutting down (503).
    #[error("API v2 bot is stopped")]
    Stopped,
}

impl From<HandlerError> for WebhookError {
    fn from(error: HandlerError) -> Self {
        match error {
            HandlerError::Protocol(e) => Self::Protocol(e),
            HandlerError::Stopped => Self::Stopped,
        }
    }
}

impl WebhookError {
    /// Returns the response status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotRouted(_) => StatusCode::NOT_FOUND,
            Self::Body(_) | Self::Protocol(_) => StatusCode::BAD_REQUEST,
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Stopped => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<axum::Error> for WebhookError {
    fn from(error: axum::Error) -> Self {
        let too_large = std::iter::successors(
            Some(&error as &(dyn std::error::Error + 'static)),
            |e| e.source(),
        )
        .any(|e| e.is::<LengthLimitError>());

        if too_large {
            Self::TooLarge { limit: BODY_LIMIT }
        } else {
            Self::Body(error)
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::NotRouted(_) => {}
            Self::Body(_) | Self::TooLarge { .. } | Self::Protocol(_) => {
                tracing::warn!("Rejected webhook: {self}");
            }
            Self::Stopped => tracing::info!("Rejected webhook: {self}"),
        }
        (status, self.to_string()).into_response()
    }
}

/// Builds the router serving `POST /`, `POST /v1` and `POST /v2`.
pub fn routes<H: HttpClient + 'static>(state: AppState<H>) -> Router {
    Router::new()
        .route("/", post(auto_detect::<H>))
        .route("/v1", post(pinned_v1::<H>))
        .route("/v2", post(pinned_v2::<H>))
        .with_state(state)
}

async fn auto_detect<H: HttpClient + 'static>(
    State(state): State<AppState<H>>,
    request: Request,
) -> Result<Response, WebhookError> {
    let dialect = dialect::route(request.headers(), state.v2_configured())?;
    dispatch(&state, dialect, request.into_body()).await
}

async fn pinned_v1<H: HttpClient + 'static>(
    State(state): State<AppState<H>>,
    request: Request,
) -> Result<Response, WebhookError> {
    dispatch(&state, Dialect::V1, request.into_body()).await
}

async fn pinned_v2<H: HttpClient + 'static>(
    State(state): State<AppState<H>>,
    request: Request,
) -> Result<Response, WebhookError> {
    let dialect = dialect::require_v2(state.v2_configured())?;
    dispatch(&state, dialect, request.into_body()).await
}

async fn dispatch<H: HttpClient + 'static>(
    state: &AppState<H>,
    dialect: Dialect,
    body: Body,
) -> Result<Response, WebhookError> {
    let body = axum::body::to_bytes(body, BODY_LIMIT).await?;

    match (dialect, &state.v2) {
        (Dialect::V1, _) => Ok(Json(state.v1.webhook(&body)?).into_response()),
        (Dialect::V2, Some(v2)) => Ok(Json(v2.webhook(&body)?).into_response()),
        (Dialect::V2, None) => Err(Rejection::V2NotConfigured.into()),
    }
}
