//! Webhook routing.
//!
//! This module provides:
//! - Dialect detection from request headers ([`route`])
//! - The axum router and its error mapping ([`routes`], [`WebhookError`])

mod dialect;
mod routes;


pub use dialect::{Dialect, Rejection, header, require_v2, route};
pub use routes::{AppState, BODY_LIMIT, WebhookError, routes};
