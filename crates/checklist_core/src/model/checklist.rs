//! Checklist state machine.
//!
//! # Responsibility
//! - Own the ordered committed item list and the edit-mode staging buffer.
//! - Express every user intent as a consuming transition returning the next
//!   state, so callers decide when to persist and render.
//!
//! # Invariants
//! - Item order only changes through `add`, `move_up`, `move_down`,
//!   `delete_item`, `delete_all` and `replace_items`.
//! - A staging buffer exists only inside `EditMode::Editing`.
//! - Invalid arguments (blank text, unknown id, out-of-range index) leave the
//!   state unchanged instead of failing.
//! - Ids produced by `add` never collide with ids already in the list.

use crate::model::id_source::IdSource;
use crate::model::item::{Item, ItemId};
use std::collections::BTreeMap;

/// Pending text edits keyed by item id.
pub type StagingBuffer = BTreeMap<ItemId, String>;

/// Interaction mode of a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Normal mode: items can be toggled; changes persist immediately.
    #[default]
    Viewing,
    /// Batch edit session: text edits are staged, toggling is disabled and
    /// persistence is deferred until the session is saved or cancelled.
    Editing { buffer: StagingBuffer },
}

/// Committed checklist plus its current interaction mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Checklist {
    items: Vec<Item>,
    mode: EditMode,
}

impl Checklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrates a checklist in viewing mode from an existing item list.
    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            items,
            mode: EditMode::Viewing,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditMode::Editing { .. })
    }

    /// Returns the staging buffer while an edit session is active.
    pub fn staged_edits(&self) -> Option<&StagingBuffer> {
        match &self.mode {
            EditMode::Editing { buffer } => Some(buffer),
            EditMode::Viewing => None,
        }
    }

    /// Returns the committed item with `id` (first match).
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns the text an edit field should show for `id`.
    ///
    /// Buffered text wins while editing; otherwise the committed text.
    pub fn edit_text(&self, id: ItemId) -> Option<&str> {
        if let Some(text) = self.staged_edits().and_then(|buffer| buffer.get(&id)) {
            return Some(text.as_str());
        }
        self.get(id).map(|item| item.text.as_str())
    }

    /// Appends a new unchecked item with trimmed text and a fresh id.
    ///
    /// Blank input is ignored.
    #[must_use]
    pub fn add(mut self, raw_text: &str, ids: &mut impl IdSource) -> Self {
        let mut id = ids.next_id();
        while self.items.iter().any(|item| item.id == id) {
            id = id.wrapping_add(1);
        }
        if let Some(item) = Item::create(id, raw_text) {
            self.items.push(item);
        }
        self
    }

    /// Flips `checked` on the first item matching `id`.
    ///
    /// Ignored while editing.
    #[must_use]
    pub fn toggle(mut self, id: ItemId) -> Self {
        if self.is_editing() {
            return self;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            *item = item.toggled();
        }
        self
    }

    /// Clears `checked` on every item, keeping order.
    ///
    /// Ignored while editing, like `toggle`.
    #[must_use]
    pub fn uncheck_all(mut self) -> Self {
        if self.is_editing() {
            return self;
        }
        for item in &mut self.items {
            item.checked = false;
        }
        self
    }

    /// Swaps the item at `index` with its predecessor.
    #[must_use]
    pub fn move_up(mut self, index: usize) -> Self {
        if index == 0 || index >= self.items.len() {
            return self;
        }
        self.items.swap(index - 1, index);
        self
    }

    /// Swaps the item at `index` with its successor.
    #[must_use]
    pub fn move_down(mut self, index: usize) -> Self {
        match index.checked_add(1) {
            Some(next) if next < self.items.len() => self.items.swap(index, next),
            _ => {}
        }
        self
    }

    /// Starts an edit session with the buffer seeded from committed texts.
    ///
    /// Calling this while already editing keeps the pending buffer.
    #[must_use]
    pub fn enter_edit_mode(mut self) -> Self {
        if self.is_editing() {
            return self;
        }
        let buffer = self
            .items
            .iter()
            .map(|item| (item.id, item.text.clone()))
            .collect();
        self.mode = EditMode::Editing { buffer };
        self
    }

    /// Overwrites the buffered text for `id` without touching the item.
    ///
    /// Text is stored as given (untrimmed). Ids absent from the buffer and
    /// calls outside an edit session are ignored.
    #[must_use]
    pub fn update_edit_text(mut self, id: ItemId, text: impl Into<String>) -> Self {
        if let EditMode::Editing { buffer } = &mut self.mode {
            if let Some(slot) = buffer.get_mut(&id) {
                *slot = text.into();
            }
        }
        self
    }

    /// Commits buffered texts and leaves edit mode.
    ///
    /// Items without a buffer entry keep their committed text. Buffered text
    /// is committed verbatim, including blank values.
    #[must_use]
    pub fn save_all_edits(mut self) -> Self {
        let EditMode::Editing { mut buffer } = std::mem::take(&mut self.mode) else {
            return self;
        };
        for item in &mut self.items {
            if let Some(text) = buffer.remove(&item.id) {
                item.text = text;
            }
        }
        self
    }

    /// Discards buffered texts and leaves edit mode.
    #[must_use]
    pub fn cancel_all_edits(mut self) -> Self {
        self.mode = EditMode::Viewing;
        self
    }

    /// Removes the first item matching `id`, in any mode.
    #[must_use]
    pub fn delete_item(mut self, id: ItemId) -> Self {
        if let Some(position) = self.items.iter().position(|item| item.id == id) {
            self.items.remove(position);
        }
        self
    }

    /// Empties the list and ends any edit session.
    #[must_use]
    pub fn delete_all(mut self) -> Self {
        self.items.clear();
        self.mode = EditMode::Viewing;
        self
    }

    /// Replaces the committed list wholesale, keeping the current mode.
    ///
    /// Used by import; buffered edits for ids that no longer exist are
    /// ignored on save.
    #[must_use]
    pub fn replace_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Checklist, EditMode};
    use crate::model::id_source::SequentialIdSource;
    use crate::model::item::Item;

    fn abc() -> Checklist {
        let mut ids = SequentialIdSource::default();
        Checklist::new()
            .add("A", &mut ids)
            .add("B", &mut ids)
            .add("C", &mut ids)
    }

    fn texts(list: &Checklist) -> Vec<&str> {
        list.items().iter().map(|item| item.text.as_str()).collect()
    }

    #[test]
    fn add_skips_ids_already_in_list() {
        let imported = Checklist::from_items(vec![Item {
            id: 1,
            text: "imported".to_string(),
            checked: true,
        }]);
        let list = imported.add("new", &mut SequentialIdSource::default());
        assert_eq!(list.items()[1].id, 2);
    }

    #[test]
    fn toggle_is_ignored_while_editing() {
        let list = abc().enter_edit_mode().toggle(1);
        assert!(!list.items()[0].checked);
        let list = list.cancel_all_edits().toggle(1);
        assert!(list.items()[0].checked);
    }

    #[test]
    fn uncheck_all_is_ignored_while_editing() {
        let list = abc().toggle(1).enter_edit_mode().uncheck_all();
        assert!(list.items()[0].checked);
        let list = list.cancel_all_edits().uncheck_all();
        assert!(!list.items()[0].checked);
    }

    #[test]
    fn move_out_of_range_is_noop() {
        let list = abc();
        assert_eq!(list.clone().move_up(3), list);
        assert_eq!(list.clone().move_up(usize::MAX), list);
        assert_eq!(list.clone().move_down(2), list);
        assert_eq!(list.clone().move_down(usize::MAX), list);
    }

    #[test]
    fn enter_edit_mode_seeds_buffer_from_committed_texts() {
        let list = abc().enter_edit_mode();
        let buffer = list.staged_edits().expect("editing");
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.get(&2).map(String::as_str), Some("B"));
    }

    #[test]
    fn enter_edit_mode_twice_keeps_pending_edits() {
        let list = abc()
            .enter_edit_mode()
            .update_edit_text(1, "changed")
            .enter_edit_mode();
        assert_eq!(list.edit_text(1), Some("changed"));
    }

    #[test]
    fn update_edit_text_ignores_unknown_id_and_viewing_mode() {
        let list = abc().enter_edit_mode().update_edit_text(99, "ghost");
        assert!(!list.staged_edits().unwrap().contains_key(&99));

        let viewing = abc();
        assert_eq!(viewing.clone().update_edit_text(1, "x"), viewing);
    }

    #[test]
    fn save_commits_blank_text_verbatim() {
        let list = abc()
            .enter_edit_mode()
            .update_edit_text(2, "   ")
            .save_all_edits();
        assert_eq!(texts(&list), vec!["A", "   ", "C"]);
        assert_eq!(list.mode(), &EditMode::Viewing);
    }

    #[test]
    fn save_keeps_committed_text_for_items_added_during_session() {
        let mut ids = SequentialIdSource::starting_at(10);
        let list = abc()
            .enter_edit_mode()
            .add("D", &mut ids)
            .update_edit_text(10, "ignored")
            .update_edit_text(1, "A2")
            .save_all_edits();
        assert_eq!(texts(&list), vec!["A2", "B", "C", "D"]);
    }

    #[test]
    fn delete_and_reorder_during_edit_commit_immediately() {
        let list = abc().enter_edit_mode().move_down(0).delete_item(3);
        assert_eq!(texts(&list), vec!["B", "A"]);
        let list = list.cancel_all_edits();
        assert_eq!(texts(&list), vec!["B", "A"]);
    }

    #[test]
    fn delete_item_removes_first_match_only() {
        let duplicate = |text: &str| Item {
            id: 5,
            text: text.to_string(),
            checked: false,
        };
        let list = Checklist::from_items(vec![duplicate("first"), duplicate("second")]);
        let list = list.delete_item(5);
        assert_eq!(texts(&list), vec!["second"]);
    }

    #[test]
    fn delete_all_exits_edit_mode() {
        let list = abc().enter_edit_mode().delete_all();
        assert!(list.is_empty());
        assert!(!list.is_editing());
        assert!(list.staged_edits().is_none());
    }

    #[test]
    fn edit_text_falls_back_to_committed_text() {
        let list = abc();
        assert_eq!(list.edit_text(2), Some("B"));
        assert_eq!(list.edit_text(42), None);
    }

    #[test]
    fn replace_items_keeps_mode() {
        let list = abc().enter_edit_mode().replace_items(Vec::new());
        assert!(list.is_empty());
        assert!(list.is_editing());
    }
}
