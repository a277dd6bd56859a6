//! Extbot: sample external bot for the Webim Bot API
//!
//! A library for answering Bot API 1.0 webhooks synchronously and
//! Bot API 2.0 webhooks through background calls to the vendor API.

pub mod config;
pub mod event;
pub mod json;
pub mod keyboard;
pub mod message;
pub mod outbound;
pub mod router;
pub mod v1;
pub mod v2;
