//! Checklist use-case service.
//!
//! # Responsibility
//! - Hydrate the committed list from the snapshot store at startup.
//! - Route user intents through `Checklist` transitions.
//! - Persist the committed list after every change outside edit mode.
//! - Export and import the committed list.
//!
//! # Invariants
//! - Staged (buffered) edit text is never persisted.
//! - Leaving edit mode always writes the committed list.
//! - Snapshot failures are logged and never block in-memory mutation.
//! - A rejected import leaves the committed list unchanged.

use crate::config::ChecklistConfig;
use crate::model::checklist::Checklist;
use crate::model::id_source::IdSource;
use crate::model::item::{Item, ItemId};
use crate::repo::snapshot_repo::SnapshotStore;
use crate::transfer::{export_items, parse_items, ExportFile, ImportError, EXPORT_MIME_TYPE};
use log::{debug, info, warn};

/// Stateful facade owning the current checklist and its collaborators.
pub struct ChecklistService<S: SnapshotStore, I: IdSource> {
    store: S,
    ids: I,
    config: ChecklistConfig,
    state: Checklist,
}

impl<S: SnapshotStore, I: IdSource> ChecklistService<S, I> {
    /// Creates a service hydrated from the snapshot stored under
    /// `config.storage_key`.
    ///
    /// Absent, unreadable or invalid snapshots yield an empty list.
    pub fn open(store: S, ids: I, config: ChecklistConfig) -> Self {
        let items = load_snapshot(&store, config.storage_key.as_str());
        Self {
            store,
            ids,
            config,
            state: Checklist::from_items(items),
        }
    }

    pub fn checklist(&self) -> &Checklist {
        &self.state
    }

    pub fn items(&self) -> &[Item] {
        self.state.items()
    }

    pub fn config(&self) -> &ChecklistConfig {
        &self.config
    }

    pub fn add(&mut self, raw_text: &str) -> &Checklist {
        self.apply("item_add", |state, ids| state.add(raw_text, ids))
    }

    pub fn toggle(&mut self, id: ItemId) -> &Checklist {
        self.apply("item_toggle", |state, _| state.toggle(id))
    }

    pub fn uncheck_all(&mut self) -> &Checklist {
        self.apply("uncheck_all", |state, _| state.uncheck_all())
    }

    pub fn move_up(&mut self, index: usize) -> &Checklist {
        self.apply("item_move_up", |state, _| state.move_up(index))
    }

    pub fn move_down(&mut self, index: usize) -> &Checklist {
        self.apply("item_move_down", |state, _| state.move_down(index))
    }

    pub fn enter_edit_mode(&mut self) -> &Checklist {
        self.apply("edit_enter", |state, _| state.enter_edit_mode())
    }

    pub fn update_edit_text(&mut self, id: ItemId, text: impl Into<String>) -> &Checklist {
        self.apply("edit_update", |state, _| state.update_edit_text(id, text))
    }

    pub fn save_all_edits(&mut self) -> &Checklist {
        self.apply("edit_save", |state, _| state.save_all_edits())
    }

    pub fn cancel_all_edits(&mut self) -> &Checklist {
        self.apply("edit_cancel", |state, _| state.cancel_all_edits())
    }

    /// Removes one item. Confirmation is the caller's responsibility.
    pub fn delete_item(&mut self, id: ItemId) -> &Checklist {
        self.apply("item_delete", |state, _| state.delete_item(id))
    }

    /// Removes every item and ends any edit session. Confirmation is the
    /// caller's responsibility.
    pub fn delete_all(&mut self) -> &Checklist {
        self.apply("delete_all", |state, _| state.delete_all())
    }

    /// Serializes the committed list; staged edits are not included.
    pub fn export(&self) -> String {
        export_items(self.state.items())
    }

    /// Export text plus the download descriptor for a file collaborator.
    pub fn export_file(&self) -> ExportFile {
        let contents = self.export();
        info!(
            "event=export module=service status=ok items={} bytes={}",
            self.state.len(),
            contents.len()
        );
        ExportFile {
            file_name: self.config.export_file_name.clone(),
            mime_type: EXPORT_MIME_TYPE,
            contents,
        }
    }

    /// Replaces the committed list with validated import text.
    ///
    /// # Errors
    /// Returns `ImportError` when the text is malformed or mismatches the
    /// schema; the committed list is left unchanged.
    pub fn import(&mut self, raw_text: &str) -> Result<&Checklist, ImportError> {
        let items = parse_items(raw_text).map_err(|err| {
            warn!(
                "event=import module=service status=error error_code={} bytes={}",
                err.code(),
                raw_text.len()
            );
            err
        })?;
        Ok(self.apply("import", |state, _| state.replace_items(items)))
    }

    fn apply(
        &mut self,
        event: &'static str,
        transition: impl FnOnce(Checklist, &mut I) -> Checklist,
    ) -> &Checklist {
        let previous = self.state.clone();
        self.state = transition(std::mem::take(&mut self.state), &mut self.ids);

        if self.state == previous {
            debug!("event={event} module=service status=noop");
            return &self.state;
        }

        debug!(
            "event={event} module=service status=ok items={} editing={}",
            self.state.len(),
            self.state.is_editing()
        );

        // A changed viewing-mode state means new items or a finished edit
        // session; both must reach the snapshot store.
        if !self.state.is_editing() {
            self.persist();
        }
        &self.state
    }

    fn persist(&self) {
        let payload = export_items(self.state.items());
        match self.store.save(self.config.storage_key.as_str(), payload.as_str()) {
            Ok(()) => debug!(
                "event=snapshot_save module=service status=ok items={}",
                self.state.len()
            ),
            Err(err) => warn!("event=snapshot_save module=service status=error error={err}"),
        }
    }
}

fn load_snapshot(store: &impl SnapshotStore, key: &str) -> Vec<Item> {
    let raw = match store.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=snapshot_load module=service status=ok items=0 source=absent");
            return Vec::new();
        }
        Err(err) => {
            warn!("event=snapshot_load module=service status=error error={err}");
            return Vec::new();
        }
    };

    match parse_items(raw.as_str()) {
        Ok(items) => {
            info!(
                "event=snapshot_load module=service status=ok items={}",
                items.len()
            );
            items
        }
        Err(err) => {
            warn!(
                "event=snapshot_load module=service status=error error_code={}",
                err.code()
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChecklistService;
    use crate::config::ChecklistConfig;
    use crate::model::id_source::SequentialIdSource;
    use crate::repo::snapshot_repo::{MemorySnapshotStore, SnapshotStore};

    fn service(
        store: &MemorySnapshotStore,
    ) -> ChecklistService<&MemorySnapshotStore, SequentialIdSource> {
        ChecklistService::open(
            store,
            SequentialIdSource::default(),
            ChecklistConfig::default(),
        )
    }

    fn stored(store: &MemorySnapshotStore) -> Option<String> {
        store.load("travel-checklist-items").unwrap()
    }

    #[test]
    fn noop_add_does_not_write_snapshot() {
        let store = MemorySnapshotStore::new();
        let mut service = service(&store);
        service.add("   ");
        assert_eq!(stored(&store), None);
    }

    #[test]
    fn edit_session_defers_persistence_until_save() {
        let store = MemorySnapshotStore::new();
        let mut service = service(&store);
        service.add("Passport");
        let before = stored(&store);

        service.enter_edit_mode();
        service.update_edit_text(1, "Visa");
        service.move_down(0);
        assert_eq!(stored(&store), before);

        service.save_all_edits();
        assert!(stored(&store).unwrap().contains("Visa"));
    }

    #[test]
    fn check_state_is_frozen_during_edit_session() {
        let store = MemorySnapshotStore::new();
        let mut service = service(&store);
        service.add("Passport");
        service.toggle(1);
        service.enter_edit_mode();

        service.toggle(1);
        assert!(service.items()[0].checked);
        service.uncheck_all();
        assert!(service.items()[0].checked);

        service.cancel_all_edits();
        service.uncheck_all();
        assert!(!service.items()[0].checked);
    }

    #[test]
    fn cancel_writes_committed_list_without_buffered_text() {
        let store = MemorySnapshotStore::new();
        let mut service = service(&store);
        service.add("Passport");
        service.enter_edit_mode();
        service.update_edit_text(1, "Visa");
        service.delete_item(1);
        service.cancel_all_edits();
        assert_eq!(stored(&store).as_deref(), Some("[]"));
    }
}
