//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/list/toggle/delete entry points for UI callers.
//! - Emit metadata-only `note_*` events; descriptions are never logged.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Returned notes reflect the state persisted by the same call.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteFilter, NoteRepository, RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrow the repository, e.g. to drive a `NotesFeed`.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Creates one pending note from user input.
    ///
    /// Blank input is rejected by `Note::validate()` before any SQL runs.
    pub fn create_note(&self, description: impl Into<String>) -> Result<Note, NoteServiceError> {
        match Note::create(&self.repo, description) {
            Ok(Some(note)) => {
                info!(
                    "event=note_create module=service status=ok note_id={}",
                    note.uuid
                );
                Ok(note)
            }
            Ok(None) => {
                warn!("event=note_create module=service status=error error_code=no_row_inserted");
                Err(NoteServiceError::InconsistentState(
                    "insert reported no written row",
                ))
            }
            Err(err) => {
                warn!("event=note_create module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    pub fn list_notes(&self, filter: &NoteFilter) -> RepoResult<Vec<Note>> {
        self.repo.list_notes(filter)
    }

    pub fn count_notes(&self, filter: &NoteFilter) -> RepoResult<u64> {
        self.repo.count_notes(filter)
    }

    /// Sets the completion flag and returns the updated note.
    pub fn set_completed(&self, id: NoteId, completed: bool) -> Result<Note, NoteServiceError> {
        let mut note = self.load(id)?;
        if completed {
            note.mark_completed(&self.repo)?;
        } else {
            note.mark_incompleted(&self.repo)?;
        }
        info!("event=note_mark module=service status=ok note_id={id} completed={completed}");
        Ok(note)
    }

    /// Flips the completion flag, as a checkbox press does.
    pub fn toggle_completed(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        let current = self.load(id)?;
        self.set_completed(id, !current.completed)
    }

    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.load(id)?.delete(&self.repo)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    fn load(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }
}
