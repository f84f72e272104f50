//! Core module - configuration and background task management

pub mod config;
pub mod tasks;

pub use config::DeskConfig;
pub use tasks::{BackgroundTasks, TaskKind};
