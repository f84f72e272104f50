//! Corral Desk - order numbering and confirmation pipeline
//!
//! The working core of a poultry distributor's order console: a fixed
//! board of draft slots, a client-grouped order queue, a monotonic client
//! sequencer and a confirmation step that flattens everything into
//! immutable records for an external store.
//!
//! # Module structure
//!
//! ```text
//! corral-desk/src/
//! ├── core/          # Configuration, background tasks
//! ├── desk/          # OrderDesk, storage, catalog, resolution, workers
//! └── utils/         # Logging setup
//! ```

pub mod core;
pub mod desk;
pub mod utils;

// Re-export public types
pub use core::{BackgroundTasks, DeskConfig, TaskKind};
pub use desk::{
    BackupScheduler, ConfirmedOrderStore, DeskCatalog, DeskError, DeskResult, DeskStorage,
    MemoryConfirmedStore, OrderDesk, PersistWorker,
};
pub use utils::{init_logger, init_logger_with_file};
