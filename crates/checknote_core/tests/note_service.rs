use checknote_core::{
    NoteFilter, NoteService, NoteServiceError, NotesFeed, RepoError, SqliteNoteRepository,
    Storage,
};
use uuid::Uuid;

#[test]
fn create_note_returns_persisted_pending_note() {
    let storage = Storage::open_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(storage.conn()).unwrap());

    let created = service.create_note("Buy milk").unwrap();
    assert!(!created.completed);

    let loaded = service.get_note(created.uuid).unwrap();
    assert_eq!(loaded, Some(created));
}

#[test]
fn create_note_rejects_blank_input() {
    let storage = Storage::open_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(storage.conn()).unwrap());

    let err = service.create_note("\n\t ").unwrap_err();
    assert!(matches!(err, NoteServiceError::Repo(RepoError::Validation(_))));
    assert_eq!(service.count_notes(&NoteFilter::all()).unwrap(), 0);
}

#[test]
fn toggle_flips_between_states() {
    let storage = Storage::open_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(storage.conn()).unwrap());
    let note = service.create_note("flip").unwrap();

    let toggled = service.toggle_completed(note.uuid).unwrap();
    assert!(toggled.completed);
    let toggled_back = service.toggle_completed(note.uuid).unwrap();
    assert!(!toggled_back.completed);

    let explicit = service.set_completed(note.uuid, true).unwrap();
    assert!(explicit.completed);
    assert_eq!(
        service.list_notes(&NoteFilter::completed()).unwrap(),
        vec![explicit]
    );
}

#[test]
fn missing_note_maps_to_not_found() {
    let storage = Storage::open_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(storage.conn()).unwrap());
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.toggle_completed(missing),
        Err(NoteServiceError::NoteNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.delete_note(missing),
        Err(NoteServiceError::NoteNotFound(id)) if id == missing
    ));
}

#[test]
fn delete_then_revalidate_drops_note_from_feed() {
    let storage = Storage::open_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(storage.conn()).unwrap());
    let keep = service.create_note("keep").unwrap();
    let gone = service.create_note("gone").unwrap();

    let mut feed = NotesFeed::mount(service.repo(), NoteFilter::all());
    assert_eq!(feed.notes().len(), 2);

    service.delete_note(gone.uuid).unwrap();
    feed.revalidate(service.repo());
    assert_eq!(feed.notes(), &[keep]);
}
