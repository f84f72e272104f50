//! OrderDesk - draft composition, queueing and confirmation
//!
//! # Pipeline
//!
//! ```text
//! draft slots ──enqueue_ready_drafts──▶ queue ──confirm_all──▶ confirmed store
//!     ▲                                   │
//!     │ field edits / dependent resets    │ add / edit / remove line
//!     │ catalog lookups                   ▼
//!     └─ reset on queueing      (base_priority, sub_number) sort
//! ```
//!
//! Every mutation takes the writer lock, applies the in-memory transition,
//! marks the touched sections dirty and nudges the persist worker. The
//! in-memory state is the source of truth; persistence never gates a
//! user action.

mod error;
pub use error::*;

mod confirm;
pub use confirm::{ConfirmedOrderStore, MemoryConfirmedStore};

mod drafts;
mod queue;
mod sequencer;

#[cfg(test)]
mod tests;

use crate::core::DeskConfig;
use crate::desk::catalog::DeskCatalog;
use crate::desk::storage::{DeskStorage, StorageError, StorageStats};
use chrono_tz::Tz;
use parking_lot::RwLock;
use shared::order::{ClientSequenceEntry, DraftSlot, QueuedOrder};
use tokio::sync::Notify;

/// Sections of desk state with independent persistence.
#[derive(Debug, Default, Clone, Copy)]
struct DirtySections {
    sequencer: bool,
    drafts: bool,
    queue: bool,
}

impl DirtySections {
    fn any(&self) -> bool {
        self.sequencer || self.drafts || self.queue
    }

    fn merge(&mut self, other: DirtySections) {
        self.sequencer |= other.sequencer;
        self.drafts |= other.drafts;
        self.queue |= other.queue;
    }
}

/// In-memory desk state, guarded by the desk's writer lock.
struct DeskState {
    /// Sequencer entries in first-seen order
    entries: Vec<ClientSequenceEntry>,
    /// Counter behind the next minted client code
    next_client_number: u64,
    /// Fixed-size draft board, position i holds slot_id i
    slots: Vec<DraftSlot>,
    /// Queued orders in insertion order
    queue: Vec<QueuedOrder>,
    /// Sections awaiting a flush
    dirty: DirtySections,
}

/// The order desk.
///
/// Owns the draft board, the order queue and the client sequencer, backed
/// by redb storage. All state transitions go through `&self` methods so the
/// desk can sit behind an `Arc` shared between the UI shell and the persist
/// worker.
pub struct OrderDesk {
    storage: DeskStorage,
    state: RwLock<DeskState>,
    catalog: DeskCatalog,
    /// Wakes the persist worker after a mutation
    persist_nudge: Notify,
    /// Business timezone stamped onto confirmed records
    tz: Tz,
}

impl std::fmt::Debug for OrderDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("OrderDesk")
            .field("clients", &state.entries.len())
            .field("slots", &state.slots.len())
            .field("queued", &state.queue.len())
            .field("tz", &self.tz)
            .finish()
    }
}

impl OrderDesk {
    /// Open the desk under the configured work directory and restore the
    /// sequencer, draft board and queue from storage.
    pub fn open(config: &DeskConfig, catalog: DeskCatalog) -> DeskResult<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| DeskError::Internal(format!("Failed to create work dir: {}", e)))?;
        let storage = DeskStorage::open(config.storage_path())?;
        Self::with_storage(storage, config, catalog)
    }

    /// Build a desk on already-open storage, restoring persisted state.
    pub fn with_storage(
        storage: DeskStorage,
        config: &DeskConfig,
        catalog: DeskCatalog,
    ) -> DeskResult<Self> {
        let (mut entries, next_client_number) = storage.load_sequencer()?;
        // The sequencer table iterates by client name; mint order comes
        // back from the code suffix.
        entries.sort_by_key(|e| e.client_code.trim_start_matches('C').parse::<u64>().unwrap_or(0));
        let stored_slots = storage.load_drafts()?;
        let queue = storage.load_queue()?;

        // Rebuild the fixed-size board. Stored slots land at their slot_id;
        // anything past the configured board size is dropped.
        let mut slots: Vec<DraftSlot> = (0..config.slot_count as u64).map(DraftSlot::empty).collect();
        let mut dropped = 0usize;
        for slot in stored_slots {
            match slots.get_mut(slot.slot_id as usize) {
                Some(target) => *target = slot,
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::warn!(
                dropped,
                slot_count = config.slot_count,
                "Stored drafts beyond the board size were dropped"
            );
        }

        tracing::info!(
            clients = entries.len(),
            drafts = slots.iter().filter(|s| !s.is_empty()).count(),
            queued = queue.len(),
            next_client_number,
            "Desk state restored"
        );

        Ok(Self {
            storage,
            state: RwLock::new(DeskState {
                entries,
                next_client_number,
                slots,
                queue,
                dirty: DirtySections::default(),
            }),
            catalog,
            persist_nudge: Notify::new(),
            tz: config.tz,
        })
    }

    // ========================================================================
    // Read accessors
    // ========================================================================

    /// Snapshot of the draft board.
    pub fn slots(&self) -> Vec<DraftSlot> {
        self.state.read().slots.clone()
    }

    /// Snapshot of one draft slot.
    pub fn slot(&self, slot_id: u64) -> DeskResult<DraftSlot> {
        self.state
            .read()
            .slots
            .iter()
            .find(|s| s.slot_id == slot_id)
            .cloned()
            .ok_or(DeskError::SlotNotFound(slot_id))
    }

    /// Snapshot of the order queue, in insertion order.
    pub fn queue(&self) -> Vec<QueuedOrder> {
        self.state.read().queue.clone()
    }

    /// Snapshot of the client sequencer, in first-seen order.
    pub fn sequencer_entries(&self) -> Vec<ClientSequenceEntry> {
        self.state.read().entries.clone()
    }

    /// The catalog this desk validates against.
    pub fn catalog(&self) -> &DeskCatalog {
        &self.catalog
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Row counts straight from storage (not the in-memory state).
    pub fn stats(&self) -> DeskResult<StorageStats> {
        Ok(self.storage.get_stats()?)
    }

    // ========================================================================
    // Persistence plumbing
    // ========================================================================

    /// Merge `sections` into the dirty set and wake the persist worker.
    ///
    /// Called with the write lock held so the mutation and its mark are one
    /// transition.
    fn mark_dirty(&self, state: &mut DeskState, sections: DirtySections) {
        state.dirty.merge(sections);
        self.persist_nudge.notify_one();
    }

    /// Resolves when a mutation has nudged the persist worker. Nudges
    /// arriving while nobody waits are held as a single permit.
    pub(crate) async fn persist_notified(&self) {
        self.persist_nudge.notified().await;
    }

    /// Flush dirty sections to storage in one transaction.
    ///
    /// The flags are taken and the dirty sections cloned under the write
    /// lock; the transaction itself runs without it. On failure the flags
    /// are merged back so the next flush retries. Returns whether a write
    /// happened.
    pub fn flush_dirty(&self) -> DeskResult<bool> {
        let (taken, snapshot) = {
            let mut state = self.state.write();
            if !state.dirty.any() {
                return Ok(false);
            }
            let taken = std::mem::take(&mut state.dirty);
            let snapshot = SectionSnapshot {
                sequencer: taken
                    .sequencer
                    .then(|| (state.entries.clone(), state.next_client_number)),
                drafts: taken.drafts.then(|| state.slots.clone()),
                queue: taken.queue.then(|| state.queue.clone()),
            };
            (taken, snapshot)
        };

        if let Err(e) = self.write_sections(&snapshot) {
            self.state.write().dirty.merge(taken);
            return Err(e);
        }

        tracing::debug!(
            sequencer = taken.sequencer,
            drafts = taken.drafts,
            queue = taken.queue,
            "Desk state flushed"
        );
        Ok(true)
    }

    fn write_sections(&self, snapshot: &SectionSnapshot) -> DeskResult<()> {
        let txn = self.storage.begin_write()?;
        if let Some((entries, next)) = &snapshot.sequencer {
            self.storage.save_sequencer(&txn, entries, *next)?;
        }
        if let Some(slots) = &snapshot.drafts {
            self.storage.save_drafts(&txn, slots)?;
        }
        if let Some(queue) = &snapshot.queue {
            self.storage.save_queue(&txn, queue)?;
        }
        txn.commit().map_err(StorageError::from)?;
        Ok(())
    }

    /// Write the independent draft recovery snapshot.
    pub fn write_draft_backup(&self) -> DeskResult<()> {
        let slots = self.state.read().slots.clone();
        self.storage.save_draft_backup(&slots)?;
        Ok(())
    }

    /// Final synchronous flush for shutdown paths. Errors are logged, not
    /// returned; there is nobody left to retry.
    pub fn shutdown(&self) {
        match self.flush_dirty() {
            Ok(flushed) => {
                if flushed {
                    tracing::info!("Final desk flush complete");
                }
            }
            Err(e) => tracing::error!(error = %e, "Final desk flush failed"),
        }
        if let Err(e) = self.write_draft_backup() {
            tracing::error!(error = %e, "Final draft backup failed");
        }
    }
}

/// Cloned dirty sections handed to the storage transaction.
struct SectionSnapshot {
    sequencer: Option<(Vec<ClientSequenceEntry>, u64)>,
    drafts: Option<Vec<DraftSlot>>,
    queue: Option<Vec<QueuedOrder>>,
}
