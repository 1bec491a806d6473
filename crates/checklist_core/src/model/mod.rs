//! Checklist domain model.
//!
//! # Responsibility
//! - Define the item record and the ordered checklist state machine.
//! - Keep id allocation behind an injectable source.
//!
//! # Invariants
//! - Every item is identified by a stable integer `ItemId`.
//! - List order is user-controlled; only explicit operations reorder it.

pub mod checklist;
pub mod id_source;
pub mod item;
