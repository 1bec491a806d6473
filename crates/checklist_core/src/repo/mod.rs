//! Persistence contracts for checklist snapshots.
//!
//! # Responsibility
//! - Define the key-value snapshot store the service persists through.
//! - Isolate SQLite details from the checklist service.
//!
//! # Invariants
//! - Stores hold opaque serialized snapshots; validation happens on load in
//!   the service, not in the store.

pub mod snapshot_repo;
