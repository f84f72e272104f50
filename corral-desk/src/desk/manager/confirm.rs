//! Confirmation - flatten the queue into immutable records
//!
//! Confirmation is the only exit from the pipeline. The queue is sorted by
//! (base_priority, sub_number), flattened line by line into
//! `ConfirmedOrderRecord`s and handed to the store as one batch. Only a
//! store success clears the desk.

use super::{DeskError, DeskResult, DirtySections, OrderDesk};
use crate::desk::resolve;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use shared::order::ConfirmedOrderRecord;
use std::sync::atomic::{AtomicBool, Ordering};

/// Destination for confirmed batches.
///
/// The batch is all-or-nothing from the desk's perspective: an `Err` leaves
/// the queue and drafts untouched for a later retry.
#[async_trait]
pub trait ConfirmedOrderStore: Send + Sync {
    async fn add_confirmed_batch(&self, records: &[ConfirmedOrderRecord]) -> anyhow::Result<()>;
}

/// In-memory confirmed-order store.
///
/// Deliberately public rather than test-gated: embedders with no downstream
/// system wired up run the confirmation pipeline against it. The desk's own
/// tests use it too.
#[derive(Debug, Default)]
pub struct MemoryConfirmedStore {
    records: Mutex<Vec<ConfirmedOrderRecord>>,
    rejecting: AtomicBool,
}

impl MemoryConfirmedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything confirmed so far.
    pub fn records(&self) -> Vec<ConfirmedOrderRecord> {
        self.records.lock().clone()
    }

    /// Make subsequent batches fail, for rejection paths.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConfirmedOrderStore for MemoryConfirmedStore {
    async fn add_confirmed_batch(&self, records: &[ConfirmedOrderRecord]) -> anyhow::Result<()> {
        if self.rejecting.load(Ordering::SeqCst) {
            anyhow::bail!("store rejected the batch");
        }
        self.records.lock().extend_from_slice(records);
        Ok(())
    }
}

impl OrderDesk {
    /// Confirm the whole queue.
    ///
    /// Orders are sorted by (base_priority, sub_number) ascending; the sort
    /// is stable, so equal keys keep insertion order. Each line becomes one
    /// record numbered `code.position` by its place within the client's
    /// batch. On store success the queue and the draft board are cleared,
    /// in memory and in storage; on rejection nothing changes.
    ///
    /// A single operator drives the pipeline, so no queue mutation
    /// interleaves with the in-flight store call.
    pub async fn confirm_all(
        &self,
        store: &dyn ConfirmedOrderStore,
    ) -> DeskResult<Vec<ConfirmedOrderRecord>> {
        let sorted = {
            let state = self.state.read();
            if state.queue.is_empty() {
                return Err(DeskError::EmptyQueue);
            }
            let mut sorted = state.queue.clone();
            sorted.sort_by_key(|o| (o.base_priority, o.sub_number));
            sorted
        };

        let stamp = Utc::now().with_timezone(&self.tz);
        let date_created = stamp.format("%Y-%m-%d").to_string();
        let time_created = stamp.format("%H:%M:%S").to_string();

        let mut records = Vec::new();
        for order in &sorted {
            for (line_index, line) in order.line_items.iter().enumerate() {
                let resolved = resolve::resolve(line);
                records.push(ConfirmedOrderRecord {
                    id: uuid::Uuid::new_v4().to_string(),
                    order_number: format!("{}.{}", order.client_code, line_index + 1),
                    client_code: order.client_code.clone(),
                    client: order.client.clone(),
                    product: line.product.clone(),
                    variety: line.variety.clone(),
                    presentation: line.presentation.clone(),
                    final_quantity: resolved.final_quantity,
                    crate_count: resolved.crate_count,
                    units_per_crate: resolved.units_per_crate,
                    priority: order.base_priority,
                    date_created: date_created.clone(),
                    time_created: time_created.clone(),
                });
            }
        }

        store
            .add_confirmed_batch(&records)
            .await
            .map_err(|e| DeskError::StoreRejected(e.to_string()))?;

        // Store accepted: clear the pipeline. Memory first, then the
        // persisted sections synchronously so a crash cannot resurrect a
        // confirmed order. The sequencer dirty flag survives; minted codes
        // still need their flush.
        {
            let mut state = self.state.write();
            state.queue.clear();
            for slot in &mut state.slots {
                slot.reset();
            }
            state.dirty.drafts = false;
            state.dirty.queue = false;
        }
        if let Err(e) = self.storage.clear_pipeline_state() {
            tracing::error!(error = %e, "Failed to clear persisted pipeline state");
            let mut state = self.state.write();
            self.mark_dirty(
                &mut state,
                DirtySections {
                    drafts: true,
                    queue: true,
                    ..Default::default()
                },
            );
        }

        tracing::info!(
            orders = sorted.len(),
            records = records.len(),
            "Queue confirmed"
        );
        Ok(records)
    }
}
