//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note use-cases (create, list, toggle, delete) to Dart via FRB.
//! - Convert every core error into a response envelope.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens its own `Storage` and closes it before returning.

use checknote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Note, NoteFilter, NoteId, NoteService, NoteServiceError, SqliteNoteRepository, Storage,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
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
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Note projection passed to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    /// Stable note ID in string form.
    pub note_id: String,
    pub description: String,
    pub completed: bool,
}

impl From<Note> for NoteItem {
    fn from(note: Note) -> Self {
        Self {
            note_id: note.uuid.to_string(),
            description: note.description,
            completed: note.completed,
        }
    }
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResponse {
    pub ok: bool,
    /// Empty on failure.
    pub items: Vec<NoteItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected note, when the action has one and succeeded.
    pub note: Option<NoteItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note: Option<NoteItem>) -> Self {
        Self {
            ok: true,
            note,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note: None,
            message: message.into(),
        }
    }
}

/// Opens the database once so the schema exists before the first screen.
///
/// # FFI contract
/// - Idempotent; safe on every app start.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_init() -> NoteActionResponse {
    match with_note_service(|_| Ok(())) {
        Ok(()) => NoteActionResponse::success("Storage ready.", None),
        Err(err) => NoteActionResponse::failure(format!("notes_init failed: {err}")),
    }
}

/// Creates a pending note from the input box text.
///
/// # FFI contract
/// - Blank input is rejected with `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create(description: String) -> NoteActionResponse {
    match with_note_service(|service| service.create_note(description)) {
        Ok(note) => NoteActionResponse::success("Note created.", Some(note.into())),
        Err(err) => NoteActionResponse::failure(format!("note_create failed: {err}")),
    }
}

/// Lists notes; `completed = None` returns all of them.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(completed: Option<bool>) -> NotesListResponse {
    let filter = NoteFilter { completed };
    match with_note_service(|service| Ok(service.list_notes(&filter)?)) {
        Ok(notes) => {
            let items = notes.into_iter().map(NoteItem::from).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No notes.".to_string()
            } else {
                format!("Found {} note(s).", items.len())
            };
            NotesListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => NotesListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("notes_list failed: {err}"),
        },
    }
}

/// Sets the completion flag of one note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_set_completed(note_id: String, completed: bool) -> NoteActionResponse {
    let id = match parse_note_id(&note_id) {
        Ok(id) => id,
        Err(message) => return NoteActionResponse::failure(message),
    };
    match with_note_service(|service| service.set_completed(id, completed)) {
        Ok(note) => NoteActionResponse::success("Note updated.", Some(note.into())),
        Err(err) => NoteActionResponse::failure(format!("note_set_completed failed: {err}")),
    }
}

/// Deletes one note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(note_id: String) -> NoteActionResponse {
    let id = match parse_note_id(&note_id) {
        Ok(id) => id,
        Err(message) => return NoteActionResponse::failure(message),
    };
    match with_note_service(|service| service.delete_note(id)) {
        Ok(()) => NoteActionResponse::success("Note deleted.", None),
        Err(err) => NoteActionResponse::failure(format!("note_delete failed: {err}")),
    }
}

fn parse_note_id(raw: &str) -> Result<NoteId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid note id `{}`", raw.trim()))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH.get_or_init(default_db_path).clone()
}

#[cfg(not(test))]
fn default_db_path() -> PathBuf {
    checknote_core::CoreConfig::from_env().db_path
}

// Tests must never write into the user's database file.
#[cfg(test)]
fn default_db_path() -> PathBuf {
    tests::scratch_db_path()
}

fn with_note_service<T>(
    f: impl FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, NoteServiceError>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let storage = Storage::open(&db_path).map_err(|err| format!("DB open failed: {err}"))?;

    let result = {
        let repo = SqliteNoteRepository::try_new(storage.conn())
            .map_err(|err| format!("repo init failed: {err}"))?;
        let service = NoteService::new(repo);
        f(&service).map_err(|err| err.to_string())
    };

    if let Err(err) = storage.close() {
        warn!("event=ffi_call module=ffi status=error error_code=db_close_failed error={err}");
    }
    result
}
