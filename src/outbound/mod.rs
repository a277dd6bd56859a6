//! Outbound layer for calling the vendor Bot API.
//!
//! This module provides:
//! - HTTP request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The transport abstraction ([`HttpClient`]) and its reqwest implementation ([`ReqwestClient`])
//! - The vendor API client with failure classification ([`ApiClient`], [`CallError`])

mod api;
mod client;
mod error;
mod request;

#[cfg(test)]
mod api_tests;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use api::{ApiClient, ApiMethod, auth_header, base_url_for_domain};
pub use client::ReqwestClient;
pub use error::{CallError, HttpError, SetupError};
pub use request::{HttpClient, HttpRequest, HttpResponse};
