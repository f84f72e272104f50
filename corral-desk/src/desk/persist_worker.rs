//! Persist worker - debounced flush and periodic draft backup
//!
//! Mutations mark sections dirty and nudge the worker; the flush runs once
//! a quiescence window passes, so a burst of edits costs one transaction.
//! A separate scheduler writes the unconditional draft snapshot on a fixed
//! cadence. Persistence failures are logged and retried, never surfaced to
//! the operator.

use crate::desk::manager::OrderDesk;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Debounced flusher of dirty desk sections.
///
/// Registered as `TaskKind::Worker`.
pub struct PersistWorker {
    desk: Arc<OrderDesk>,
    debounce: Duration,
    shutdown: CancellationToken,
}

impl PersistWorker {
    pub fn new(desk: Arc<OrderDesk>, debounce: Duration, shutdown: CancellationToken) -> Self {
        Self {
            desk,
            debounce,
            shutdown,
        }
    }

    pub async fn run(self) {
        tracing::info!(
            debounce_ms = self.debounce.as_millis() as u64,
            "Persist worker started"
        );

        let mut deadline = Instant::now();
        let mut armed = false;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    if let Err(e) = self.desk.flush_dirty() {
                        tracing::error!(error = %e, "Final flush on shutdown failed");
                    }
                    break;
                }
                _ = self.desk.persist_notified() => {
                    // Every nudge re-opens the quiescence window.
                    deadline = Instant::now() + self.debounce;
                    armed = true;
                }
                _ = tokio::time::sleep_until(deadline), if armed => {
                    armed = false;
                    if let Err(e) = self.desk.flush_dirty() {
                        // Flags were re-merged; the next change retries.
                        tracing::warn!(error = %e, "Flush failed, will retry");
                    }
                }
            }
        }

        tracing::info!("Persist worker stopped");
    }
}

/// Fixed-cadence writer of the draft recovery snapshot.
///
/// Registered as `TaskKind::Periodic`. Runs independently of the debounced
/// flush so an operator parked mid-draft still gets covered.
pub struct BackupScheduler {
    desk: Arc<OrderDesk>,
    every: Duration,
    shutdown: CancellationToken,
}

impl BackupScheduler {
    pub fn new(desk: Arc<OrderDesk>, every: Duration, shutdown: CancellationToken) -> Self {
        Self {
            desk,
            every,
            shutdown,
        }
    }

    pub async fn run(self) {
        tracing::info!(
            every_secs = self.every.as_secs(),
            "Draft backup scheduler started"
        );

        let mut interval = tokio::time::interval(self.every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                // The first tick completes immediately, so a snapshot is
                // also written at startup.
                _ = interval.tick() => {
                    if let Err(e) = self.desk.write_draft_backup() {
                        tracing::warn!(error = %e, "Draft backup failed");
                    }
                }
            }
        }

        tracing::info!("Draft backup scheduler stopped");
    }
}
