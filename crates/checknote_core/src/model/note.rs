//! Note domain model.
//!
//! # Invariants
//! - `uuid` is generated once and never reused for another note.
//! - `description` holds at least one non-whitespace character.
//! - A fresh note starts with `completed = false`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a note.
pub type NoteId = Uuid;

/// One user-created to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub uuid: NoteId,
    /// Free-form text as typed by the user. Never edited after creation.
    pub description: String,
    pub completed: bool,
}

/// Validation failures for `Note` invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Description is empty or whitespace-only.
    EmptyDescription,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "note description cannot be empty"),
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Creates a pending note with a freshly generated id.
    pub fn new(description: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), description)
    }

    /// Creates a pending note with a caller-provided id.
    ///
    /// Does not validate; write paths call `validate()` before persistence.
    pub fn with_id(uuid: NoteId, description: impl Into<String>) -> Self {
        Self {
            uuid,
            description: description.into(),
            completed: false,
        }
    }

    /// Checks entity invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.description.trim().is_empty() {
            return Err(NoteValidationError::EmptyDescription);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteValidationError};

    #[test]
    fn new_note_is_pending_with_unique_id() {
        let first = Note::new("Buy milk");
        let second = Note::new("Buy milk");
        assert!(!first.completed);
        assert_ne!(first.uuid, second.uuid);
        assert_eq!(first.description, "Buy milk");
    }

    #[test]
    fn validate_rejects_whitespace_description() {
        assert_eq!(
            Note::new(" \t\n").validate(),
            Err(NoteValidationError::EmptyDescription)
        );
        assert_eq!(Note::new("").validate(), Err(NoteValidationError::EmptyDescription));
        assert!(Note::new("  padded  ").validate().is_ok());
    }
}
