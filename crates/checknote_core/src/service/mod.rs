//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Hold the UI-facing note snapshot (`NotesFeed`).
//! - Keep UI/FFI layers decoupled from storage details.

pub mod note_service;
pub mod notes_feed;
