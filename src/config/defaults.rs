//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default host the webhook server binds to.
pub const HOST: &str = "localhost";

/// Default port the webhook server binds to.
pub const PORT: u16 = 8000;

/// Default timeout of one vendor API request in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default time background tasks get to finish on shutdown, in seconds.
pub const SHUTDOWN_GRACE_SECS: u64 = 10;

/// Default vendor API request timeout as Duration.
#[must_use]
pub const fn request_timeout() -> Duration {
    Duration::from_secs(REQUEST_TIMEOUT_SECS)
}

/// Default shutdown grace period as Duration.
#[must_use]
pub const fn shutdown_grace() -> Duration {
    Duration::from_secs(SHUTDOWN_GRACE_SECS)
}
