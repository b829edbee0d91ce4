use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    foundation::error::{VanishError, VanishResult},
    gate::classifier::Classifier,
    gate::expression::DetectionBatch,
};

pub const DEFAULT_DETECTION_INTERVAL: Duration = Duration::from_millis(100);

const CHANNEL_CAPACITY: usize = 16;

/// Periodic detection task with an explicit stop handle.
#[derive(Clone, Copy, Debug)]
pub struct DetectionPoller {
    interval: Duration,
}

impl Default for DetectionPoller {
    fn default() -> Self {
        Self {
            interval: DEFAULT_DETECTION_INTERVAL,
        }
    }
}

impl DetectionPoller {
    pub fn new(interval: Duration) -> VanishResult<Self> {
        if interval.is_zero() {
            return Err(VanishError::invalid_configuration(
                "detection interval must be > 0",
            ));
        }
        Ok(Self { interval })
    }

    /// Start polling on the current runtime. The first cycle runs immediately.
    pub fn spawn<C>(self, mut classifier: C) -> VanishResult<PollerHandle>
    where
        C: Classifier + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            VanishError::Other(anyhow::Error::new(e).context("no async runtime available"))
        })?;
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let token = cancel.clone();
        let interval = self.interval;

        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut cycle: u64 = 0;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                cycle += 1;
                let batch = match classifier.detect() {
                    Ok(Some(batch)) => batch,
                    Ok(None) => {
                        tracing::debug!(cycle, "detection stream ended");
                        break;
                    }
                    Err(err) => {
                        tracing::warn!(cycle, error = %err, "classifier failed; skipping cycle");
                        continue;
                    }
                };
                tokio::select! {
                    _ = token.cancelled() => break,
                    sent = tx.send(batch) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Ok(PollerHandle {
            cancel,
            batches: rx,
            task,
        })
    }
}

/// Receiving end of a running [`DetectionPoller`].
#[derive(Debug)]
pub struct PollerHandle {
    cancel: CancellationToken,
    batches: mpsc::Receiver<DetectionBatch>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Next batch, or `None` once the poller stopped and the queue is drained.
    pub async fn next_batch(&mut self) -> Option<DetectionBatch> {
        self.batches.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.task.is_finished()
    }

    /// Stop and wait for the task to exit.
    pub async fn join(self) -> VanishResult<()> {
        self.cancel.cancel();
        self.task
            .await
            .map_err(|e| VanishError::Other(anyhow::anyhow!("detection task failed: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gate/poller.rs"]
mod tests;
