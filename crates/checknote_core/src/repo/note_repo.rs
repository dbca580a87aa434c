//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own every SQL statement that touches the `notes` table.
//! - Translate `completed` between `bool` and its stored `0`/`1` form.
//! - Provide the instance-level note operations (`mark_completed`, ...).
//!
//! # Invariants
//! - Write paths call `Note::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Each mutation is a single statement completed before returning.

use crate::db::DbError;
use crate::model::note::{Note, NoteId, NoteValidationError};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    completed,
    description
FROM notes";

const REQUIRED_COLUMNS: &[&str] = &["uuid", "completed", "description"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    /// Engine failure, carried unchanged.
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Optional predicate for list/count queries.
///
/// `completed: None` matches every note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoteFilter {
    pub completed: Option<bool>,
}

impl NoteFilter {
    pub fn all() -> Self {
        Self { completed: None }
    }

    pub fn completed() -> Self {
        Self {
            completed: Some(true),
        }
    }

    pub fn pending() -> Self {
        Self {
            completed: Some(false),
        }
    }

    /// Returns whether `note` would be selected by this filter.
    pub fn matches(&self, note: &Note) -> bool {
        self.completed.map_or(true, |flag| note.completed == flag)
    }
}

/// Repository interface for note operations.
pub trait NoteRepository {
    /// Inserts a pending note; `note.completed` is ignored and stored as `0`.
    /// Returns whether a row was actually written.
    fn create_note(&self, note: &Note) -> RepoResult<bool>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists notes in insertion order, narrowed by `filter`.
    fn list_notes(&self, filter: &NoteFilter) -> RepoResult<Vec<Note>>;
    fn count_notes(&self, filter: &NoteFilter) -> RepoResult<u64>;
    /// Writes the completion flag for one note by primary key.
    fn set_completed(&self, id: NoteId, completed: bool) -> RepoResult<()>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   initializer has not run on this connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<bool> {
        note.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO notes (uuid, completed, description)
             VALUES (?1, 0, ?2);",
            params![note.uuid.to_string(), note.description.as_str()],
        )?;

        debug!(
            "event=note_insert module=repo status=ok note_id={} rows={inserted}",
            note.uuid
        );
        Ok(inserted == 1)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn list_notes(&self, filter: &NoteFilter) -> RepoResult<Vec<Note>> {
        let mut sql = format!("{NOTE_SELECT_SQL} WHERE 1 = 1");
        let bind_values = push_filter(&mut sql, filter);
        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn count_notes(&self, filter: &NoteFilter) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM notes WHERE 1 = 1");
        let bind_values = push_filter(&mut sql, filter);
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{count}`")))
    }

    fn set_completed(&self, id: NoteId, completed: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET completed = ?1
             WHERE uuid = ?2;",
            params![bool_to_int(completed), id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=note_mark module=repo status=ok note_id={id} completed={completed}");
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=note_delete module=repo status=ok note_id={id}");
        Ok(())
    }
}

/// Instance-level operations. The in-memory value changes only after the
/// statement succeeds.
impl Note {
    /// Builds a pending note and inserts it.
    ///
    /// Returns `None` when the insert reported no written row.
    pub fn create<R: NoteRepository + ?Sized>(
        repo: &R,
        description: impl Into<String>,
    ) -> RepoResult<Option<Note>> {
        let note = Note::new(description);
        if repo.create_note(&note)? {
            Ok(Some(note))
        } else {
            Ok(None)
        }
    }

    pub fn mark_completed<R: NoteRepository + ?Sized>(&mut self, repo: &R) -> RepoResult<()> {
        repo.set_completed(self.uuid, true)?;
        self.completed = true;
        Ok(())
    }

    pub fn mark_incompleted<R: NoteRepository + ?Sized>(&mut self, repo: &R) -> RepoResult<()> {
        repo.set_completed(self.uuid, false)?;
        self.completed = false;
        Ok(())
    }

    /// Deletes the stored row and consumes the instance.
    pub fn delete<R: NoteRepository + ?Sized>(self, repo: &R) -> RepoResult<()> {
        repo.delete_note(self.uuid)
    }
}

// Rows written outside this repository may hold NULL; those read as pending,
// so the completed/pending filters treat NULL the same way.
fn push_filter(sql: &mut String, filter: &NoteFilter) -> Vec<Value> {
    let mut bind_values = Vec::new();
    if let Some(completed) = filter.completed {
        sql.push_str(" AND COALESCE(completed, 0) = ?");
        bind_values.push(Value::Integer(bool_to_int(completed)));
    }
    bind_values
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let completed = match row.get::<_, Option<i64>>("completed")? {
        None | Some(0) => false,
        Some(1) => true,
        Some(other) => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in notes.completed"
            )));
        }
    };

    let description = row
        .get::<_, Option<String>>("description")?
        .ok_or_else(|| {
            RepoError::InvalidData(format!("missing description for note `{uuid}`"))
        })?;

    Ok(Note {
        uuid,
        description,
        completed,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for column in REQUIRED_COLUMNS.iter().copied() {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
