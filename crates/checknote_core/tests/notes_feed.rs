use checknote_core::{
    DbError, FetchOutcome, Note, NoteFilter, NoteId, NoteRepository, NotesFeed, RepoError,
    RepoResult, SqliteNoteRepository, Storage,
};
use std::cell::Cell;

/// Repository that serves a fixed list and can be switched to failing.
struct FlakyRepo {
    notes: Vec<Note>,
    fail_lists: Cell<bool>,
    list_calls: Cell<usize>,
}

impl FlakyRepo {
    fn new(notes: Vec<Note>) -> Self {
        Self {
            notes,
            fail_lists: Cell::new(false),
            list_calls: Cell::new(0),
        }
    }
}

impl NoteRepository for FlakyRepo {
    fn create_note(&self, _note: &Note) -> RepoResult<bool> {
        Ok(false)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        Ok(self.notes.iter().find(|note| note.uuid == id).cloned())
    }

    fn list_notes(&self, filter: &NoteFilter) -> RepoResult<Vec<Note>> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.fail_lists.get() {
            return Err(RepoError::Db(DbError::Sqlite(
                rusqlite::Error::InvalidQuery,
            )));
        }
        Ok(self
            .notes
            .iter()
            .filter(|note| filter.matches(note))
            .cloned()
            .collect())
    }

    fn count_notes(&self, filter: &NoteFilter) -> RepoResult<u64> {
        Ok(self.list_notes(filter)?.len() as u64)
    }

    fn set_completed(&self, id: NoteId, _completed: bool) -> RepoResult<()> {
        Err(RepoError::NotFound(id))
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        Err(RepoError::NotFound(id))
    }
}

#[test]
fn mount_fetches_once_for_initial_filter() {
    let storage = Storage::open_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(storage.conn()).unwrap();
    let created = Note::create(&repo, "Buy milk").unwrap().unwrap();

    let feed = NotesFeed::mount(&repo, NoteFilter::all());

    assert_eq!(feed.notes(), &[created]);
    assert!(!feed.is_loading());
    assert!(feed.error().is_none());
}

#[test]
fn revalidate_picks_up_mutations() {
    let storage = Storage::open_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(storage.conn()).unwrap();
    let mut feed = NotesFeed::mount(&repo, NoteFilter::pending());
    assert!(feed.notes().is_empty());

    let mut note = Note::create(&repo, "new item").unwrap().unwrap();
    assert!(feed.notes().is_empty());
    assert_eq!(feed.revalidate(&repo), FetchOutcome::Applied);
    assert_eq!(feed.notes().len(), 1);

    note.mark_completed(&repo).unwrap();
    feed.revalidate(&repo);
    assert!(feed.notes().is_empty());
}

#[test]
fn filter_change_refetches_and_same_filter_does_not() {
    let mut done = Note::new("done");
    done.completed = true;
    let open = Note::new("open");
    let repo = FlakyRepo::new(vec![done.clone(), open.clone()]);

    let mut feed = NotesFeed::mount(&repo, NoteFilter::all());
    assert_eq!(repo.list_calls.get(), 1);
    assert_eq!(feed.notes().len(), 2);

    assert_eq!(feed.set_filter(&repo, NoteFilter::all()), None);
    assert_eq!(repo.list_calls.get(), 1);

    assert_eq!(
        feed.set_filter(&repo, NoteFilter::completed()),
        Some(FetchOutcome::Applied)
    );
    assert_eq!(repo.list_calls.get(), 2);
    assert_eq!(feed.notes(), &[done]);
    assert_eq!(feed.filter(), NoteFilter::completed());

    feed.set_filter(&repo, NoteFilter::pending());
    assert_eq!(feed.notes(), &[open]);
}

#[test]
fn failed_fetch_keeps_stale_notes_and_records_error() {
    let repo = FlakyRepo::new(vec![Note::new("cached")]);
    let mut feed = NotesFeed::mount(&repo, NoteFilter::all());
    let before = feed.notes().to_vec();

    repo.fail_lists.set(true);
    assert_eq!(feed.revalidate(&repo), FetchOutcome::Failed);

    assert_eq!(feed.notes(), before.as_slice());
    assert!(matches!(feed.error(), Some(RepoError::Db(_))));
    assert!(!feed.is_loading());

    repo.fail_lists.set(false);
    assert_eq!(feed.revalidate(&repo), FetchOutcome::Applied);
    assert!(feed.error().is_none());
}

#[test]
fn late_result_from_previous_filter_is_dropped() {
    let storage = Storage::open_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(storage.conn()).unwrap();
    let mut done = Note::create(&repo, "done").unwrap().unwrap();
    done.mark_completed(&repo).unwrap();
    let open = Note::create(&repo, "open").unwrap().unwrap();

    let mut feed = NotesFeed::new(NoteFilter::all());
    let first = feed.begin_fetch();
    let second = feed
        .change_filter(NoteFilter::pending())
        .expect("filter changed");

    let pending = repo.list_notes(&second.filter()).unwrap();
    assert_eq!(feed.complete_fetch(second, Ok(pending)), FetchOutcome::Applied);

    let everything = repo.list_notes(&first.filter()).unwrap();
    assert_eq!(everything.len(), 2);
    assert_eq!(
        feed.complete_fetch(first, Ok(everything)),
        FetchOutcome::Stale
    );

    assert_eq!(feed.notes(), &[open]);
    assert!(!feed.is_loading());
}
