//! Core state management for the checklist app.
//! This crate is the single source of truth for checklist invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod transfer;

pub use config::{ChecklistConfig, ConfigError};
pub use logging::{init_logging, logging_status, LogLevel};
pub use model::checklist::{Checklist, EditMode, StagingBuffer};
pub use model::id_source::{ClockIdSource, IdSource, SequentialIdSource};
pub use model::item::{Item, ItemId};
pub use repo::snapshot_repo::{
    MemorySnapshotStore, SnapshotError, SnapshotResult, SnapshotStore, SqliteSnapshotStore,
};
pub use service::checklist_service::ChecklistService;
pub use transfer::{export_items, parse_items, ExportFile, ImportError};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
