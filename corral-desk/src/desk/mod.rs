//! Order Desk Module
//!
//! The draft-to-confirmation pipeline behind the order console:
//!
//! - **manager**: Core OrderDesk for slot edits, queueing and confirmation
//! - **storage**: redb-based persistence for sequencer, drafts and queue
//! - **catalog**: read-only product / presentation / client collections
//! - **resolve**: quantity resolution for confirmed lines
//! - **persist_worker**: debounced flush and periodic draft backup
//!
//! # Architecture
//!
//! ```text
//! Field edit → OrderDesk → in-memory state → dirty mark
//!                  │                             │
//!             catalog lookup              persist worker
//!                                               │
//!                                        Storage (redb)
//! ```
//!
//! # Data flow
//!
//! 1. The operator edits draft slots; each edit is validated against the
//!    catalog and applied under the writer lock
//! 2. Ready drafts are queued, grouped by client, numbered by the sequencer
//! 3. Mutations mark their sections dirty; the persist worker flushes them
//!    after a quiescence window
//! 4. Confirmation sorts, flattens and hands the queue to the confirmed
//!    store, then clears the pipeline

pub mod catalog;
pub mod manager;
pub mod persist_worker;
pub mod resolve;
pub mod storage;

// Re-exports
pub use catalog::DeskCatalog;
pub use manager::{
    ConfirmedOrderStore, DeskError, DeskResult, MemoryConfirmedStore, OrderDesk,
};
pub use persist_worker::{BackupScheduler, PersistWorker};
pub use resolve::{resolve, ResolvedQuantity};
pub use storage::{DeskStorage, StorageError, StorageStats};

// Re-export shared types for convenience
pub use shared::order::{
    ClientSequenceEntry, ConfirmedOrderRecord, DeskFault, DeskFaultCode, DraftSlot, LineInput,
    OrderLine, QuantityEntry, QueuedOrder,
};
