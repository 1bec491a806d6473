//! FFI checklist API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one process-wide checklist to the presentation layer.
//! - Translate user intents into `ChecklistService` calls and return the
//!   resulting state as plain data.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every mutation returns the full post-operation state.
//! - Destructive calls (`checklist_delete_item`, `checklist_delete_all`) are
//!   unconditional; confirmation dialogs belong to the host UI.

use checklist_core::config::DEFAULT_DB_FILE_NAME;
use checklist_core::db::open_db;
use checklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Checklist, ChecklistConfig, ChecklistService, ClockIdSource, LogLevel, SqliteSnapshotStore,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const DB_PATH_ENV: &str = "CHECKLIST_DB_PATH";

type HostService = ChecklistService<SqliteSnapshotStore, ClockIdSource>;

static CHECKLIST: OnceCell<HostChecklist> = OnceCell::new();

struct HostChecklist {
    db_path: PathBuf,
    service: Mutex<HostService>,
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// A blank `level` selects the build default (`debug` or `info`).
/// Returns an empty string on success and an error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = match level.trim() {
        "" => LogLevel::build_default().as_str(),
        explicit => explicit,
    };
    match init_logging_inner(level, log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the process-wide checklist under `data_dir`.
///
/// Input semantics:
/// - `data_dir`: directory holding the snapshot database; created if needed.
/// - `config_json`: optional `ChecklistConfig` JSON; defaults when `None`.
///
/// # FFI contract
/// - Safe to call repeatedly with the same resolved database path and config.
/// - Switching to a different path or config after the first open returns
///   an error.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_checklist(data_dir: String, config_json: Option<String>) -> String {
    match open_checklist(data_dir.trim(), config_json.as_deref()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the rendered checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItemView {
    pub id: i64,
    /// Committed text.
    pub text: String,
    pub checked: bool,
    /// Text for the edit field; set only during an edit session.
    pub edit_text: Option<String>,
}

/// Full checklist state returned by every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistResponse {
    /// Whether the call was applied (no-ops still report `true`).
    pub ok: bool,
    pub items: Vec<ChecklistItemView>,
    pub editing: bool,
    /// Human-readable message; empty on success.
    pub message: String,
}

impl ChecklistResponse {
    fn from_checklist(checklist: &Checklist) -> Self {
        let items = checklist
            .items()
            .iter()
            .map(|item| ChecklistItemView {
                id: item.id,
                text: item.text.clone(),
                checked: item.checked,
                edit_text: checklist
                    .staged_edits()
                    .and_then(|_| checklist.edit_text(item.id))
                    .map(str::to_owned),
            })
            .collect();
        Self {
            ok: true,
            items,
            editing: checklist.is_editing(),
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            editing: false,
            message: message.into(),
        }
    }
}

/// Export payload for the host download flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistExportResponse {
    pub ok: bool,
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
    pub message: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_get() -> ChecklistResponse {
    respond(|service| ChecklistResponse::from_checklist(service.checklist()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_add(text: String) -> ChecklistResponse {
    respond(|service| ChecklistResponse::from_checklist(service.add(text.as_str())))
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_toggle(id: i64) -> ChecklistResponse {
    respond(|service| ChecklistResponse::from_checklist(service.toggle(id)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_uncheck_all() -> ChecklistResponse {
    respond(|service| ChecklistResponse::from_checklist(service.uncheck_all()))
}

/// Moves the item at `index` one position up; negative indexes are no-ops.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_move_up(index: i64) -> ChecklistResponse {
    respond(|service| match usize::try_from(index) {
        Ok(index) => ChecklistResponse::from_checklist(service.move_up(index)),
        Err(_) => ChecklistResponse::from_checklist(service.checklist()),
    })
}

/// Moves the item at `index` one position down; negative indexes are no-ops.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_move_down(index: i64) -> ChecklistResponse {
    respond(|service| match usize::try_from(index) {
        Ok(index) => ChecklistResponse::from_checklist(service.move_down(index)),
        Err(_) => ChecklistResponse::from_checklist(service.checklist()),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_enter_edit_mode() -> ChecklistResponse {
    respond(|service| ChecklistResponse::from_checklist(service.enter_edit_mode()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_update_edit_text(id: i64, text: String) -> ChecklistResponse {
    respond(|service| ChecklistResponse::from_checklist(service.update_edit_text(id, text)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_save_all_edits() -> ChecklistResponse {
    respond(|service| ChecklistResponse::from_checklist(service.save_all_edits()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_cancel_all_edits() -> ChecklistResponse {
    respond(|service| ChecklistResponse::from_checklist(service.cancel_all_edits()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_delete_item(id: i64) -> ChecklistResponse {
    respond(|service| ChecklistResponse::from_checklist(service.delete_item(id)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_delete_all() -> ChecklistResponse {
    respond(|service| ChecklistResponse::from_checklist(service.delete_all()))
}

/// Exports the committed list.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_export() -> ChecklistExportResponse {
    match with_service(|service| service.export_file()) {
        Ok(file) => ChecklistExportResponse {
            ok: true,
            file_name: file.file_name,
            mime_type: file.mime_type.to_string(),
            contents: file.contents,
            message: String::new(),
        },
        Err(err) => ChecklistExportResponse {
            ok: false,
            file_name: String::new(),
            mime_type: String::new(),
            contents: String::new(),
            message: format!("checklist_export failed: {err}"),
        },
    }
}

/// Replaces the checklist with the contents of an imported file.
///
/// On rejection, `ok` is false, `message` carries the user-facing reason and
/// `items` reflects the unchanged committed list.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_import(contents: String) -> ChecklistResponse {
    respond(|service| {
        let rejection = service
            .import(contents.as_str())
            .err()
            .map(|err| err.user_message());
        let mut response = ChecklistResponse::from_checklist(service.checklist());
        if let Some(message) = rejection {
            response.ok = false;
            response.message = message.to_string();
        }
        response
    })
}

fn respond(f: impl FnOnce(&mut HostService) -> ChecklistResponse) -> ChecklistResponse {
    with_service(f).unwrap_or_else(ChecklistResponse::failure)
}

fn with_service<T>(f: impl FnOnce(&mut HostService) -> T) -> Result<T, String> {
    let host = match CHECKLIST.get() {
        Some(host) => host,
        None => {
            let path = default_db_path();
            CHECKLIST.get_or_try_init(|| open_host(path, ChecklistConfig::default()))?
        }
    };
    let mut service = host
        .service
        .lock()
        .map_err(|_| "checklist state lock poisoned".to_string())?;
    Ok(f(&mut service))
}

fn open_checklist(data_dir: &str, config_json: Option<&str>) -> Result<(), String> {
    if data_dir.is_empty() {
        return Err("data_dir cannot be empty".to_string());
    }
    let config = match config_json {
        Some(raw) => ChecklistConfig::from_json(raw).map_err(|err| err.to_string())?,
        None => ChecklistConfig::default(),
    };
    std::fs::create_dir_all(data_dir)
        .map_err(|err| format!("failed to create data directory `{data_dir}`: {err}"))?;
    let path = Path::new(data_dir).join(config.db_file_name.as_str());

    let requested = config.clone();
    let host = CHECKLIST.get_or_try_init(|| open_host(path.clone(), config))?;
    if host.db_path != path {
        return Err(format!(
            "checklist already initialized at `{}`; refusing to switch to `{}`",
            host.db_path.display(),
            path.display()
        ));
    }

    let service = host
        .service
        .lock()
        .map_err(|_| "checklist state lock poisoned".to_string())?;
    if service.config() != &requested {
        return Err(format!(
            "checklist already initialized with {:?}; refusing to switch to {:?}",
            service.config(),
            requested
        ));
    }
    Ok(())
}

fn open_host(db_path: PathBuf, config: ChecklistConfig) -> Result<HostChecklist, String> {
    let conn = open_db(&db_path).map_err(|err| {
        error!("event=checklist_open module=ffi status=error error={err}");
        format!("checklist DB open failed: {err}")
    })?;
    let service = ChecklistService::open(
        SqliteSnapshotStore::new(conn),
        ClockIdSource::new(),
        config,
    );
    info!(
        "event=checklist_open module=ffi status=ok items={}",
        service.checklist().len()
    );
    Ok(HostChecklist {
        db_path,
        service: Mutex::new(service),
    })
}

fn default_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::{
        checklist_add, checklist_cancel_all_edits, checklist_delete_all, checklist_delete_item,
        checklist_enter_edit_mode, checklist_export, checklist_get, checklist_import,
        checklist_move_down, checklist_move_up, checklist_save_all_edits, checklist_toggle,
        checklist_uncheck_all, checklist_update_edit_text, core_version, init_checklist,
        init_logging, ping,
    };
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use tempfile::TempDir;

    static SERIAL: Mutex<()> = Mutex::new(());
    static DATA_DIR: OnceLock<TempDir> = OnceLock::new();

    /// Serializes tests over the process-wide checklist and resets it.
    fn fresh_checklist() -> MutexGuard<'static, ()> {
        let guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let error = init_checklist(data_dir(), None);
        assert!(error.is_empty(), "{error}");
        checklist_cancel_all_edits();
        assert!(checklist_delete_all().items.is_empty());
        guard
    }

    fn data_dir() -> String {
        let dir = DATA_DIR.get_or_init(|| tempfile::tempdir().unwrap());
        dir.path().to_str().unwrap().to_string()
    }

    fn texts(items: &[super::ChecklistItemView]) -> Vec<&str> {
        items.iter().map(|item| item.text.as_str()).collect()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level_and_empty_dir() {
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_checklist_rejects_empty_dir_and_path_switch() {
        let _guard = fresh_checklist();
        assert!(!init_checklist("  ".to_string(), None).is_empty());

        let other = tempfile::tempdir().unwrap();
        let error = init_checklist(other.path().to_str().unwrap().to_string(), None);
        assert!(error.contains("refusing to switch"));
    }

    #[test]
    fn init_checklist_rejects_config_switch_on_same_path() {
        let _guard = fresh_checklist();
        assert!(init_checklist(data_dir(), Some("{}".to_string())).is_empty());

        let error = init_checklist(
            data_dir(),
            Some(r#"{"storage_key":"other-key"}"#.to_string()),
        );
        assert!(error.contains("refusing to switch"), "{error}");
        assert_eq!(checklist_export().file_name, "travel-checklist.json");
    }

    #[test]
    fn init_logging_blank_level_uses_build_default() {
        let error = init_logging("  ".to_string(), "relative/logs".to_string());
        assert!(error.contains("absolute"), "{error}");
    }

    #[test]
    fn add_toggle_and_reorder_flow() {
        let _guard = fresh_checklist();
        checklist_add("Passport".to_string());
        checklist_add("   ".to_string());
        let response = checklist_add("Charger".to_string());
        assert!(response.ok);
        assert_eq!(texts(&response.items), vec!["Passport", "Charger"]);

        let charger = response.items[1].id;
        let response = checklist_toggle(charger);
        assert!(response.items[1].checked);

        let response = checklist_move_up(1);
        assert_eq!(texts(&response.items), vec!["Charger", "Passport"]);
        let response = checklist_move_down(-1);
        assert_eq!(texts(&response.items), vec!["Charger", "Passport"]);

        let response = checklist_uncheck_all();
        assert!(response.items.iter().all(|item| !item.checked));
    }

    #[test]
    fn edit_session_exposes_edit_text_until_saved() {
        let _guard = fresh_checklist();
        let id = checklist_add("Passport".to_string()).items[0].id;
        assert_eq!(checklist_get().items[0].edit_text, None);

        let response = checklist_enter_edit_mode();
        assert!(response.editing);
        assert_eq!(response.items[0].edit_text.as_deref(), Some("Passport"));

        let response = checklist_update_edit_text(id, "Visa".to_string());
        assert_eq!(response.items[0].text, "Passport");
        assert_eq!(response.items[0].edit_text.as_deref(), Some("Visa"));

        let response = checklist_save_all_edits();
        assert!(!response.editing);
        assert_eq!(response.items[0].text, "Visa");

        let response = checklist_delete_item(id);
        assert!(response.items.is_empty());
    }

    #[test]
    fn export_then_import_round_trips() {
        let _guard = fresh_checklist();
        checklist_add("Passport".to_string());
        let exported = checklist_export();
        assert!(exported.ok);
        assert_eq!(exported.file_name, "travel-checklist.json");

        checklist_delete_all();
        let response = checklist_import(exported.contents);
        assert!(response.ok, "{}", response.message);
        assert_eq!(texts(&response.items), vec!["Passport"]);
    }

    #[test]
    fn rejected_import_reports_message_and_keeps_items() {
        let _guard = fresh_checklist();
        checklist_add("Passport".to_string());

        let response = checklist_import(r#"[{"id":1,"text":"x"}]"#.to_string());
        assert!(!response.ok);
        assert!(response.message.contains("Invalid file format"));
        assert_eq!(texts(&response.items), vec!["Passport"]);

        let response = checklist_import("{".to_string());
        assert!(response.message.contains("valid JSON file"));
    }
}
