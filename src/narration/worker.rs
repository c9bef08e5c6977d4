use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use super::queue::NarrationQueue;
use crate::common::errors::{EngineError, Result};
use crate::common::traits::NarrationSink;

/// Background task draining a [`NarrationQueue`] at a fixed cadence
pub struct NarrationWorker {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl NarrationWorker {
    /// Spawn the drain loop on the current tokio runtime
    ///
    /// After shutdown is requested the backlog keeps draining for at most
    /// `flush_limit`; whatever is still pending then is dropped.
    pub fn spawn(
        queue: NarrationQueue,
        sink: Arc<dyn NarrationSink>,
        cadence: Duration,
        flush_limit: Duration,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(queue, sink, cadence, flush_limit, shutdown_rx));
        Self {
            handle,
            shutdown_tx,
        }
    }

    /// Stop the worker once the backlog has been emitted or the flush limit
    /// has passed
    ///
    /// The throttle still applies while the backlog drains.
    pub async fn shutdown(self) -> Result<()> {
        // The receiver only disappears if the task already ended
        let _ = self.shutdown_tx.send(true);
        self.handle
            .await
            .map_err(|e| EngineError::Internal(format!("narration worker failed: {}", e)))
    }
}

#[instrument(skip_all)]
async fn run(
    queue: NarrationQueue,
    sink: Arc<dyn NarrationSink>,
    cadence: Duration,
    flush_limit: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval(cadence);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut flush_deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let outcome = queue.drain(sink.as_ref());
                if outcome.emitted > 0 {
                    debug!(emitted = outcome.emitted, remaining = outcome.remaining, "Narration drained");
                }
                if let Some(deadline) = flush_deadline {
                    if outcome.remaining == 0 {
                        break;
                    }
                    if Instant::now() >= deadline {
                        let dropped = queue.discard_pending();
                        warn!(dropped, "Narration flush timed out, dropping undelivered messages");
                        break;
                    }
                }
            }
            changed = shutdown_rx.changed(), if flush_deadline.is_none() => {
                // A dropped sender counts as a shutdown request
                if changed.is_err() || *shutdown_rx.borrow() {
                    info!(pending = queue.depth(), "Narration worker flushing backlog");
                    flush_deadline = Some(Instant::now() + flush_limit);
                }
            }
        }
    }

    info!("Narration worker stopped");
}
