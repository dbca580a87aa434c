//! UI-facing snapshot of the filtered note list.
//!
//! # Responsibility
//! - Hold the current notes, loading flag and last fetch error for a view.
//! - Re-fetch on demand and whenever the filter changes.
//! - Turn fetch failures into state instead of propagating them.
//!
//! # Invariants
//! - Only the most recently issued fetch may replace the snapshot; results of
//!   older fetches are dropped.
//! - `is_loading` is true exactly while the latest fetch is outstanding.
//! - A failed fetch keeps the previous notes.

use crate::model::note::Note;
use crate::repo::note_repo::{NoteFilter, NoteRepository, RepoError, RepoResult};
use log::{debug, warn};

/// Token for one in-flight fetch.
///
/// Not `Clone`: each ticket completes at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    filter: NoteFilter,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Filter in force when the fetch was issued.
    pub fn filter(&self) -> NoteFilter {
        self.filter
    }
}

/// What `complete_fetch` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Notes replaced; any previous error cleared.
    Applied,
    /// Error recorded; notes left as they were.
    Failed,
    /// A newer fetch was issued meanwhile; result dropped.
    Stale,
}

/// In-memory note list bound to one filter.
#[derive(Debug, Default)]
pub struct NotesFeed {
    filter: NoteFilter,
    notes: Vec<Note>,
    error: Option<RepoError>,
    issued_seq: u64,
    settled_seq: u64,
}

impl NotesFeed {
    /// Creates an empty, idle feed without fetching.
    pub fn new(filter: NoteFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Creates a feed and runs the initial fetch.
    pub fn mount<R: NoteRepository + ?Sized>(repo: &R, filter: NoteFilter) -> Self {
        let mut feed = Self::new(filter);
        feed.revalidate(repo);
        feed
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Last fetch failure, cleared by the next successful fetch.
    pub fn error(&self) -> Option<&RepoError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.settled_seq < self.issued_seq
    }

    pub fn filter(&self) -> NoteFilter {
        self.filter
    }

    /// Fetches the list for the current filter and applies it.
    pub fn revalidate<R: NoteRepository + ?Sized>(&mut self, repo: &R) -> FetchOutcome {
        let ticket = self.begin_fetch();
        let result = repo.list_notes(&ticket.filter);
        self.complete_fetch(ticket, result)
    }

    /// Switches the filter and re-fetches when it actually changed.
    ///
    /// Returns `None` when the filter is unchanged and nothing was fetched.
    pub fn set_filter<R: NoteRepository + ?Sized>(
        &mut self,
        repo: &R,
        filter: NoteFilter,
    ) -> Option<FetchOutcome> {
        let ticket = self.change_filter(filter)?;
        let result = repo.list_notes(&ticket.filter);
        Some(self.complete_fetch(ticket, result))
    }

    /// Switches the filter and issues a ticket for the caller to fetch with.
    pub fn change_filter(&mut self, filter: NoteFilter) -> Option<FetchTicket> {
        if self.filter == filter {
            return None;
        }
        self.filter = filter;
        Some(self.begin_fetch())
    }

    /// Marks the feed loading and issues a ticket newer than all earlier ones.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        debug!(
            "event=feed_fetch module=feed status=start seq={} completed={:?}",
            self.issued_seq, self.filter.completed
        );
        FetchTicket {
            seq: self.issued_seq,
            filter: self.filter,
        }
    }

    /// Applies a fetch result if `ticket` is still the latest one issued.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: RepoResult<Vec<Note>>,
    ) -> FetchOutcome {
        if ticket.seq != self.issued_seq {
            debug!(
                "event=feed_fetch module=feed status=stale seq={} latest={}",
                ticket.seq, self.issued_seq
            );
            return FetchOutcome::Stale;
        }

        self.settled_seq = ticket.seq;
        match result {
            Ok(notes) => {
                debug!(
                    "event=feed_fetch module=feed status=ok seq={} count={}",
                    ticket.seq,
                    notes.len()
                );
                self.notes = notes;
                self.error = None;
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!(
                    "event=feed_fetch module=feed status=error seq={} error={err}",
                    ticket.seq
                );
                self.error = Some(err);
                FetchOutcome::Failed
            }
        }
    }
}
