//! Desk configuration

use chrono_tz::Tz;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Desk configuration, read once at startup.
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | `CORRAL_WORK_DIR` | `./data` | Directory for the database, catalogs and logs |
/// | `CORRAL_SLOT_COUNT` | `5` | Number of slots on the draft board |
/// | `CORRAL_DEBOUNCE_MS` | `500` | Quiescence window before a state flush |
/// | `CORRAL_BACKUP_SECS` | `10` | Cadence of the draft recovery snapshot |
/// | `CORRAL_TIMEZONE` | `America/Santiago` | Business timezone (IANA name) |
/// | `CORRAL_LOG_LEVEL` | `info` | Log level |
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// Working directory for storage, catalogs and logs
    pub work_dir: String,
    /// Fixed size of the draft board
    pub slot_count: usize,
    /// Quiescence window before dirty sections are flushed, in milliseconds
    pub debounce_ms: u64,
    /// Cadence of the unconditional draft snapshot, in seconds
    pub backup_secs: u64,
    /// Business timezone stamped onto confirmed records
    pub tz: Tz,
    /// Log level
    pub log_level: String,
}

impl DeskConfig {
    /// Load configuration from environment variables. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_env() -> Self {
        let tz = std::env::var("CORRAL_TIMEZONE")
            .ok()
            .and_then(|name| name.parse().ok())
            .unwrap_or(chrono_tz::America::Santiago);

        Self {
            work_dir: std::env::var("CORRAL_WORK_DIR").unwrap_or_else(|_| "./data".to_string()),
            slot_count: std::env::var("CORRAL_SLOT_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            debounce_ms: std::env::var("CORRAL_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            backup_secs: std::env::var("CORRAL_BACKUP_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            tz,
            log_level: std::env::var("CORRAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Environment config with the volatile parts overridden, for tests.
    pub fn with_overrides(work_dir: impl Into<String>, slot_count: usize) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.slot_count = slot_count;
        config
    }

    /// Path of the redb database file.
    pub fn storage_path(&self) -> PathBuf {
        Path::new(&self.work_dir).join("corral-desk.redb")
    }

    /// Directory holding the external catalog JSON files.
    pub fn catalog_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("catalog")
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn backup_every(&self) -> Duration {
        Duration::from_secs(self.backup_secs)
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
