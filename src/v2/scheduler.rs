//! Background task scheduler for webhook events.
//!
//! Events are queued on an unbounded channel and a single worker spawns one
//! task per event onto a [`JoinSet`]. Work for one event runs sequentially
//! inside its task; different events run concurrently.
//!
//! The queue has no bound, matching the webhook contract of acknowledging
//! immediately. Under sustained overload queued events accumulate in memory.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};

/// Work performed for each scheduled item.
pub trait Processor<T>: Send + Sync + 'static {
    /// Processes one item to completion. Failures must be handled inside.
    fn process(&self, item: T) -> impl Future<Output = ()> + Send;
}

/// The scheduler no longer accepts work.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Background scheduler is not running")]
pub struct SchedulerClosed;

/// Handle to a running scheduler.
///
/// Dropping the handle without [`TaskScheduler::shutdown`] closes the queue;
/// queued and in-flight tasks then finish in the background.
#[derive(Debug)]
pub struct TaskScheduler<T> {
    sender: mpsc::UnboundedSender<T>,
    worker: JoinHandle<()>,
}

impl<T: Send + 'static> TaskScheduler<T> {
    /// Spawns the worker on the current Tokio runtime.
    ///
    /// On shutdown, in-flight tasks get `grace` to finish before they are aborted.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start<P: Processor<T>>(processor: Arc<P>, grace: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(receiver, processor, grace));
        Self { sender, worker }
    }

    /// Queues an item without waiting for it to be processed.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerClosed`] if the worker has exited.
    pub fn submit(&self, item: T) -> Result<(), SchedulerClosed> {
        self.sender.send(item).map_err(|_| SchedulerClosed)
    }

    /// Closes the queue, lets queued items start, and waits for the worker.
    pub async fn shutdown(self) {
        drop(self.sender);
        if let Err(e) = self.worker.await {
            tracing::error!("Background scheduler worker failed: {e}");
        }
    }
}

async fn run_worker<T, P>(mut receiver: mpsc::UnboundedReceiver<T>, processor: Arc<P>, grace: Duration)
where
    T: Send + 'static,
    P: Processor<T>,
{
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            item = receiver.recv() => match item {
                Some(item) => {
                    let processor = Arc::clone(&processor);
                    tasks.spawn(async move { processor.process(item).await });
                }
                None => break,
            },
            Some(result) = tasks.join_next(), if !tasks.is_empty() => log_task_result(result),
        }
    }

    let drained = tokio::time::timeout(grace, async {
        while let Some(result) = tasks.join_next().await {
            log_task_result(result);
        }
    })
    .await;

    if drained.is_err() {
        tracing::warn!(
            "Aborting {} background task(s) still running after {}s",
            tasks.len(),
            grace.as_secs_f32()
        );
        tasks.shutdown().await;
    }

    tracing::debug!("Background scheduler stopped");
}

fn log_task_result(result: Result<(), JoinError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_panic() => tracing::error!("Background task panicked: {e}"),
        Err(e) => tracing::debug!("Background task cancelled: {e}"),
    }
}
