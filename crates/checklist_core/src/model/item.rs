//! Checklist item domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by the committed list, the snapshot
//!   store and the export/import file format.
//! - Normalize user-submitted item text.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reassigned.
//! - Items created through [`Item::create`] carry non-empty trimmed text.
//! - The wire shape is exactly `{ id, text, checked }`; unknown fields are
//!   rejected on deserialization.

use serde::{Deserialize, Serialize};

/// Stable identifier for one checklist entry.
///
/// Integer to stay compatible with exported files, where ids are epoch
/// milliseconds taken at creation time.
pub type ItemId = i64;

/// One checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub checked: bool,
}

impl Item {
    /// Creates an unchecked item from raw user input.
    ///
    /// Returns `None` when the input is empty after trimming.
    pub fn create(id: ItemId, raw_text: &str) -> Option<Self> {
        let text = normalize_item_text(raw_text)?;
        Some(Self {
            id,
            text,
            checked: false,
        })
    }

    /// Returns a copy with `checked` flipped.
    pub fn toggled(&self) -> Self {
        Self {
            checked: !self.checked,
            ..self.clone()
        }
    }
}

/// Trims item text and rejects whitespace-only input.
pub fn normalize_item_text(raw_text: &str) -> Option<String> {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
