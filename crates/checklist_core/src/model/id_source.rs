//! Item id allocation.
//!
//! # Responsibility
//! - Provide fresh candidate ids for newly added items.
//! - Keep clock access behind an injectable seam so state transitions stay
//!   deterministic under test.
//!
//! # Invariants
//! - Every source yields strictly increasing ids within one process.
//! - Final uniqueness against the current list is enforced by the caller
//!   (see `Checklist::add`), since imported lists may hold arbitrary ids.

use crate::model::item::ItemId;
use std::time::{SystemTime, UNIX_EPOCH};

/// Supplier of candidate ids for new items.
pub trait IdSource {
    fn next_id(&mut self) -> ItemId;
}

impl<T: IdSource + ?Sized> IdSource for &mut T {
    fn next_id(&mut self) -> ItemId {
        (**self).next_id()
    }
}

/// Epoch-millisecond id source.
///
/// Two adds within the same millisecond still get distinct ids because the
/// source never returns a value lower than `last + 1`.
#[derive(Debug, Default)]
pub struct ClockIdSource {
    last: Option<ItemId>,
}

impl ClockIdSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for ClockIdSource {
    fn next_id(&mut self) -> ItemId {
        let now = now_epoch_ms();
        let id = match self.last {
            Some(last) if now <= last => last.saturating_add(1),
            _ => now,
        };
        self.last = Some(id);
        id
    }
}

/// Counter-based id source, starting at a caller-chosen value.
#[derive(Debug, Clone)]
pub struct SequentialIdSource {
    next: ItemId,
}

impl SequentialIdSource {
    pub fn starting_at(first: ItemId) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIdSource {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdSource for SequentialIdSource {
    fn next_id(&mut self) -> ItemId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }
}

fn now_epoch_ms() -> ItemId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| ItemId::try_from(elapsed.as_millis()).unwrap_or(ItemId::MAX))
        .unwrap_or(0)
}
