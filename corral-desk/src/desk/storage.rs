//! redb-based storage layer for desk state
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `client_sequencer` | `client_name` | `ClientSequenceEntry` | Code + sub-number state per client |
//! | `draft_slots` | `slot_id` | `DraftSlot` | Live draft board contents |
//! | `queued_orders` | `position` | `QueuedOrder` | Queue in insertion order |
//! | `draft_backup` | `slot_id` | `DraftSlot` | Periodic recovery snapshot of drafts |
//! | `counters` | name | `u64` | Running client-code counter |
//!
//! Sections are rewritten whole: a save replaces the table's previous
//! contents inside one write transaction. Values are plain JSON, no framing.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`, so a section is persistent as
//! soon as the transaction commits and the file stays consistent across
//! power loss. The draft backup is written on its own transaction and its
//! own cadence, independent of the debounced live sections.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::order::{ClientSequenceEntry, DraftSlot, QueuedOrder};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for the client sequencer: key = client_name, value = JSON-serialized ClientSequenceEntry
const SEQUENCER_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("client_sequencer");

/// Table for the draft board: key = slot_id, value = JSON-serialized DraftSlot
const DRAFT_SLOTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("draft_slots");

/// Table for the queue: key = insertion position, value = JSON-serialized QueuedOrder
const QUEUE_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("queued_orders");

/// Table for the periodic draft recovery snapshot: key = slot_id, value = JSON-serialized DraftSlot
const DRAFT_BACKUP_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("draft_backup");

/// Table for counters: key = counter name, value = u64
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const CLIENT_NUMBER_KEY: &str = "next_client_number";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Desk state storage backed by redb
#[derive(Clone)]
pub struct DeskStorage {
    db: Arc<Database>,
}

impl DeskStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SEQUENCER_TABLE)?;
            let _ = write_txn.open_table(DRAFT_SLOTS_TABLE)?;
            let _ = write_txn.open_table(QUEUE_TABLE)?;
            let _ = write_txn.open_table(DRAFT_BACKUP_TABLE)?;

            // Initialize the client-code counter if not exists
            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            if counters.get(CLIENT_NUMBER_KEY)?.is_none() {
                counters.insert(CLIENT_NUMBER_KEY, 1u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SEQUENCER_TABLE)?;
            let _ = write_txn.open_table(DRAFT_SLOTS_TABLE)?;
            let _ = write_txn.open_table(QUEUE_TABLE)?;
            let _ = write_txn.open_table(DRAFT_BACKUP_TABLE)?;
            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            counters.insert(CLIENT_NUMBER_KEY, 1u64)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequencer Section ==========

    /// Rewrite the sequencer table and the client-code counter (within transaction)
    pub fn save_sequencer(
        &self,
        txn: &WriteTransaction,
        entries: &[ClientSequenceEntry],
        next_client_number: u64,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(SEQUENCER_TABLE)?;

        let mut stale: Vec<String> = Vec::new();
        for result in table.iter()? {
            let (key, _value) = result?;
            stale.push(key.value().to_string());
        }
        for key in &stale {
            table.remove(key.as_str())?;
        }

        for entry in entries {
            let value = serde_json::to_vec(entry)?;
            table.insert(entry.client_name.as_str(), value.as_slice())?;
        }
        drop(table);

        let mut counters = txn.open_table(COUNTERS_TABLE)?;
        counters.insert(CLIENT_NUMBER_KEY, next_client_number)?;
        Ok(())
    }

    /// Load all sequencer entries and the client-code counter
    pub fn load_sequencer(&self) -> StorageResult<(Vec<ClientSequenceEntry>, u64)> {
        let read_txn = self.db.begin_read()?;

        let table = read_txn.open_table(SEQUENCER_TABLE)?;
        let mut entries = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let entry: ClientSequenceEntry = serde_json::from_slice(value.value())?;
            entries.push(entry);
        }

        let counters = read_txn.open_table(COUNTERS_TABLE)?;
        let next_client_number = counters
            .get(CLIENT_NUMBER_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(1);

        Ok((entries, next_client_number))
    }

    // ========== Draft Section ==========

    /// Rewrite the live draft board (within transaction)
    pub fn save_drafts(&self, txn: &WriteTransaction, slots: &[DraftSlot]) -> StorageResult<()> {
        let mut table = txn.open_table(DRAFT_SLOTS_TABLE)?;

        let mut stale: Vec<u64> = Vec::new();
        for result in table.iter()? {
            let (key, _value) = result?;
            stale.push(key.value());
        }
        for key in stale {
            table.remove(key)?;
        }

        for slot in slots {
            let value = serde_json::to_vec(slot)?;
            table.insert(slot.slot_id, value.as_slice())?;
        }
        Ok(())
    }

    /// Load the live draft board, ordered by slot_id
    pub fn load_drafts(&self) -> StorageResult<Vec<DraftSlot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRAFT_SLOTS_TABLE)?;

        let mut slots = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let slot: DraftSlot = serde_json::from_slice(value.value())?;
            slots.push(slot);
        }
        Ok(slots)
    }

    // ========== Queue Section ==========

    /// Rewrite the queue (within transaction)
    ///
    /// Keys are insertion positions so a saved queue loads back in order.
    pub fn save_queue(&self, txn: &WriteTransaction, orders: &[QueuedOrder]) -> StorageResult<()> {
        let mut table = txn.open_table(QUEUE_TABLE)?;

        let mut stale: Vec<u64> = Vec::new();
        for result in table.iter()? {
            let (key, _value) = result?;
            stale.push(key.value());
        }
        for key in stale {
            table.remove(key)?;
        }

        for (position, order) in orders.iter().enumerate() {
            let value = serde_json::to_vec(order)?;
            table.insert(position as u64, value.as_slice())?;
        }
        Ok(())
    }

    /// Load the queue in insertion order
    pub fn load_queue(&self) -> StorageResult<Vec<QueuedOrder>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(QUEUE_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: QueuedOrder = serde_json::from_slice(value.value())?;
            orders.push(order);
        }
        Ok(orders)
    }

    // ========== Draft Backup ==========

    /// Write the periodic draft recovery snapshot (own transaction)
    pub fn save_draft_backup(&self, slots: &[DraftSlot]) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(DRAFT_BACKUP_TABLE)?;

            let mut stale: Vec<u64> = Vec::new();
            for result in table.iter()? {
                let (key, _value) = result?;
                stale.push(key.value());
            }
            for key in stale {
                table.remove(key)?;
            }

            for slot in slots {
                let value = serde_json::to_vec(slot)?;
                table.insert(slot.slot_id, value.as_slice())?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Load the draft recovery snapshot, ordered by slot_id
    pub fn load_draft_backup(&self) -> StorageResult<Vec<DraftSlot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRAFT_BACKUP_TABLE)?;

        let mut slots = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let slot: DraftSlot = serde_json::from_slice(value.value())?;
            slots.push(slot);
        }
        Ok(slots)
    }

    // ========== Confirmation Cleanup ==========

    /// Clear queue, drafts and draft backup in one commit
    ///
    /// Runs synchronously on confirmation success so a crash cannot
    /// resurrect an already-confirmed queue. The sequencer section is
    /// left untouched.
    pub fn clear_pipeline_state(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut drafts = txn.open_table(DRAFT_SLOTS_TABLE)?;
            let mut stale: Vec<u64> = Vec::new();
            for result in drafts.iter()? {
                let (key, _value) = result?;
                stale.push(key.value());
            }
            for key in stale {
                drafts.remove(key)?;
            }
        }
        {
            let mut queue = txn.open_table(QUEUE_TABLE)?;
            let mut stale: Vec<u64> = Vec::new();
            for result in queue.iter()? {
                let (key, _value) = result?;
                stale.push(key.value());
            }
            for key in stale {
                queue.remove(key)?;
            }
        }
        {
            let mut backup = txn.open_table(DRAFT_BACKUP_TABLE)?;
            let mut stale: Vec<u64> = Vec::new();
            for result in backup.iter()? {
                let (key, _value) = result?;
                stale.push(key.value());
            }
            for key in stale {
                backup.remove(key)?;
            }
        }
        txn.commit()?;
        tracing::debug!("pipeline state cleared after confirmation");
        Ok(())
    }

    // ========== Statistics ==========

    /// Get storage statistics
    pub fn get_stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;

        let sequencer_table = read_txn.open_table(SEQUENCER_TABLE)?;
        let drafts_table = read_txn.open_table(DRAFT_SLOTS_TABLE)?;
        let queue_table = read_txn.open_table(QUEUE_TABLE)?;
        let backup_table = read_txn.open_table(DRAFT_BACKUP_TABLE)?;
        let counters = read_txn.open_table(COUNTERS_TABLE)?;

        Ok(StorageStats {
            sequencer_entry_count: sequencer_table.len()?,
            draft_slot_count: drafts_table.len()?,
            queued_order_count: queue_table.len()?,
            draft_backup_count: backup_table.len()?,
            next_client_number: counters
                .get(CLIENT_NUMBER_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(1),
        })
    }
}

/// Storage statistics
#[derive(Debug, Clone)]
pub struct StorageStats {
    pub sequencer_entry_count: u64,
    pub draft_slot_count: u64,
    pub queued_order_count: u64,
    pub draft_backup_count: u64,
    pub next_client_number: u64,
}
