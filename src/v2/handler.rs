//! Bot API 2.0 handler.
//!
//! The webhook is acknowledged immediately; the bot's reaction is performed
//! later by a background task through the vendor API.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;

use super::dispatcher::Dispatcher;
use super::scheduler::TaskScheduler;
use super::wire::{self, Ack};
use super::ButtonId;
use crate::event::{InboundEvent, ProtocolError};
use crate::json::pretty_json;
use crate::keyboard::Keyboard;
use crate::outbound::{ApiClient, HttpClient, SetupError};

/// Time in-flight tasks get to finish on [`ApiV2Bot::stop`].
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Settings of the API 2.0 bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Vendor account domain
    pub domain: String,
    /// Bot token
    pub token: String,
    /// Agent the "Forward to agent" button redirects to
    pub forward_agent_id: Option<u64>,
    /// Department the "Forward to department" button redirects to
    pub forward_department_key: Option<String>,
}

/// Errors returned by [`ApiV2Bot::webhook`].
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The body is not a valid API 2.0 update.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The bot has been stopped.
    #[error("API v2 bot is stopped")]
    Stopped,
}

type EventScheduler = TaskScheduler<InboundEvent<ButtonId>>;

#[derive(Debug)]
enum Lifecycle {
    Idle,
    Running(EventScheduler),
    Stopped,
}

/// The API 2.0 bot.
///
/// Construction does no I/O. The background scheduler is created by
/// [`ApiV2Bot::start`] or by the first webhook, whichever comes first.
#[derive(Debug)]
pub struct ApiV2Bot<H> {
    dispatcher: Arc<Dispatcher<H>>,
    grace: Duration,
    state: Mutex<Lifecycle>,
}

impl<H> ApiV2Bot<H> {
    /// Creates the bot for the configured account.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the domain or token is invalid.
    pub fn new(config: &HandlerConfig, client: H) -> Result<Self, SetupError> {
        let api = ApiClient::for_domain(client, &config.domain, &config.token)?;
        Ok(Self::with_api(config, api))
    }

    /// Creates the bot around an existing vendor API client.
    ///
    /// `config.domain` and `config.token` are ignored.
    #[must_use]
    pub fn with_api(config: &HandlerConfig, api: ApiClient<H>) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(config, api)),
            grace: DEFAULT_SHUTDOWN_GRACE,
            state: Mutex::new(Lifecycle::Idle),
        }
    }

    /// Sets the time in-flight tasks get to finish on shutdown.
    #[must_use]
    pub const fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Returns the keyboard sent to visitors.
    #[must_use]
    pub fn keyboard(&self) -> &Keyboard<ButtonId> {
        self.dispatcher.keyboard()
    }

    /// Returns the event dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<H> {
        &self.dispatcher
    }
}

impl<H: HttpClient + 'static> ApiV2Bot<H> {
    /// Starts the background scheduler. Later calls have no effect.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, Lifecycle::Idle) {
            *state = Lifecycle::Running(self.spawn_scheduler());
        }
    }

    /// Stops accepting events and waits for queued and in-flight tasks.
    ///
    /// Tasks still running after the grace period are aborted. Calling
    /// `stop` again returns immediately.
    pub async fn stop(&self) {
        let previous = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *state, Lifecycle::Stopped)
        };

        if let Lifecycle::Running(scheduler) = previous {
            tracing::info!("Stopping API v2 background tasks");
            scheduler.shutdown().await;
        }
    }

    /// Handles a raw webhook body.
    ///
    /// The event is queued for background processing and the ack is
    /// returned without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Protocol`] if the body is not a valid update,
    /// or [`HandlerError::Stopped`] after [`ApiV2Bot::stop`].
    pub fn webhook(&self, body: &[u8]) -> Result<Ack, HandlerError> {
        let update: serde_json::Value = serde_json::from_slice(body).map_err(ProtocolError::from)?;
        tracing::debug!("API v2 received update:\n{}", pretty_json(&update));

        let event = wire::parse_update(update)?;

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, Lifecycle::Idle) {
            *state = Lifecycle::Running(self.spawn_scheduler());
        }

        match &*state {
            Lifecycle::Running(scheduler) => scheduler
                .submit(event)
                .map_err(|_| HandlerError::Stopped)?,
            Lifecycle::Idle | Lifecycle::Stopped => return Err(HandlerError::Stopped),
        }

        Ok(Ack::ok())
    }

    fn spawn_scheduler(&self) -> EventScheduler {
        tracing::debug!("Starting API v2 background scheduler");
        TaskScheduler::start(Arc::clone(&self.dispatcher), self.grace)
    }
}
