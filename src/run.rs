//! Application execution logic.
//!
//! This module builds the bots from the validated configuration and serves
//! the webhook endpoints until a shutdown signal arrives.

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;

use extbot::config::ValidatedConfig;
use extbot::outbound::{HttpError, ReqwestClient, SetupError};
use extbot::router::{AppState, routes};
use extbot::v1::ApiV1Bot;
use extbot::v2::ApiV2Bot;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to create the vendor API HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] HttpError),

    /// Failed to set up the API 2.0 bot.
    #[error("Failed to set up API v2 bot: {0}")]
    BotSetup(#[source] SetupError),

    /// Failed to bind the webhook listener.
    #[error("Error running server on {address}: {source}")]
    Bind {
        /// Address the server tried to listen on
        address: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The server failed while running.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Type alias for the production API 2.0 bot.
type ProductionV2Bot = ApiV2Bot<ReqwestClient>;

/// Executes the webhook server.
///
/// This function:
/// 1. Creates the API 1.0 bot and, if configured, the API 2.0 bot
/// 2. Starts the API 2.0 background scheduler
/// 3. Serves the webhook endpoints until Ctrl+C or SIGTERM
/// 4. Stops the API 2.0 bot, draining queued events
///
/// The API 2.0 bot is stopped on every exit path, including bind failure.
///
/// # Errors
///
/// Returns an error if the API 2.0 bot cannot be created, the listener
/// cannot be bound, or the server fails.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let v1 = Arc::new(ApiV1Bot::new(&config.custom_button));
    let v2 = create_v2_bot(&config)?;

    if let Some(ref bot) = v2 {
        bot.start();
    }

    let result = serve(&config, AppState::new(v1, v2.clone())).await;

    if let Some(bot) = v2 {
        bot.stop().await;
    }

    result
}

/// Creates the API 2.0 bot if a domain and token are configured.
fn create_v2_bot(config: &ValidatedConfig) -> Result<Option<Arc<ProductionV2Bot>>, RunError> {
    let Some(ref api) = config.api_v2 else {
        tracing::warn!(
            "Only legacy Bot API v1 will be available. If you intend to use Bot API v2, \
             see extbot --help for the required arguments"
        );
        return Ok(None);
    };

    let client =
        ReqwestClient::with_timeout(config.request_timeout).map_err(RunError::HttpClient)?;
    let bot = ApiV2Bot::new(api, client)
        .map_err(RunError::BotSetup)?
        .with_shutdown_grace(config.shutdown_grace);

    tracing::info!("Bot API v2 enabled for {}", api.domain);
    Ok(Some(Arc::new(bot)))
}

/// Binds the listener and serves requests until shutdown.
async fn serve(
    config: &ValidatedConfig,
    state: AppState<ReqwestClient>,
) -> Result<(), RunError> {
    let address = config.index_url();
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| RunError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!("Extbot is running on {address}");

    axum::serve(listener, routes(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(RunError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received, stopping...");
}
