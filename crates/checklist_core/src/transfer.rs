//! Export/import file format for checklists.
//!
//! # Responsibility
//! - Serialize the committed list into the canonical JSON export shape.
//! - Validate untrusted import text against that same shape.
//!
//! # Invariants
//! - Export and import share one schema: a JSON array of
//!   `{ "id": integer, "text": string, "checked": boolean }` records.
//! - Import is all-or-nothing; one malformed element rejects the whole file.
//! - `parse_items(&export_items(items)) == Ok(items)` for every list.
//! - Duplicate ids inside an imported array are accepted as-is.

use crate::model::item::Item;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default download name for exported checklists.
pub const EXPORT_FILE_NAME: &str = "travel-checklist.json";
/// MIME type of exported checklists.
pub const EXPORT_MIME_TYPE: &str = "application/json";

/// Import validation failure.
#[derive(Debug)]
pub enum ImportError {
    /// Text is not parseable as JSON.
    Malformed(serde_json::Error),
    /// JSON parsed, but does not match the checklist schema.
    SchemaMismatch(String),
}

impl ImportError {
    /// Returns the rejection message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "Error reading file. Please make sure it's a valid JSON file.",
            Self::SchemaMismatch(_) => {
                "Invalid file format. Please select a valid travel checklist export file."
            }
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "import_malformed",
            Self::SchemaMismatch(_) => "import_schema_mismatch",
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed checklist data: {err}"),
            Self::SchemaMismatch(details) => {
                write!(f, "checklist data does not match schema: {details}")
            }
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::SchemaMismatch(_) => None,
        }
    }
}

/// Export payload handed to a download collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Serializes items in list order as pretty-printed JSON.
pub fn export_items(items: &[Item]) -> String {
    // Serializing plain structs of integers, strings and booleans is
    // infallible, so the fallback is unreachable in practice.
    serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
}

/// Parses and validates checklist JSON.
///
/// # Errors
/// - `Malformed` when the text is not valid JSON.
/// - `SchemaMismatch` when the top-level value is not an array, or any
///   element has missing, extra or mistyped fields.
pub fn parse_items(raw_text: &str) -> Result<Vec<Item>, ImportError> {
    let value: Value = serde_json::from_str(raw_text).map_err(ImportError::Malformed)?;
    let elements = match value {
        Value::Array(elements) => elements,
        other => {
            return Err(ImportError::SchemaMismatch(format!(
                "expected top-level array, got {}",
                json_kind(&other)
            )));
        }
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            serde_json::from_value::<Item>(element)
                .map_err(|err| ImportError::SchemaMismatch(format!("element {index}: {err}")))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
