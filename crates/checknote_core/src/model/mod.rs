//! Domain model for the note list.
//!
//! # Responsibility
//! - Define the note record shared by repository, service and feed.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` generated at creation.
//! - `completed` is a plain boolean; there is no third state.

pub mod note;
