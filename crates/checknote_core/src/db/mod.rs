//! SQLite storage context and schema bootstrap.
//!
//! # Responsibility
//! - Open and configure the embedded database used by every other component.
//! - Ensure the `notes` table exists before any repository runs.
//!
//! # Invariants
//! - No process-wide handle exists; callers own a `Storage` and pass it on.
//! - Core code must not read/write notes before the schema bootstrap succeeds.
//! - Engine errors are carried unchanged inside `DbError::Sqlite`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::Storage;
pub use schema::ensure_tables_exist;

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure.
///
/// Every failed statement surfaces as `Sqlite`, whatever the engine reason
/// (constraint, I/O, malformed SQL).
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Explicit close failed; the handle could not be released cleanly.
    Close(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Close(err) => write!(f, "failed to close database: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Close(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
