use slugnote_core::db::open_db_in_memory;
use slugnote_core::{
    NoteDraft, NoteError, NoteService, NotesConfig, Session, SqliteNoteRepository, UserId,
};
use std::collections::BTreeSet;

const LOGIN_PATH: &str = "/auth/login/";
const NOTE_COUNT: usize = 100;

fn session(name: &str) -> Session {
    Session::authenticated(UserId::new(name).unwrap(), LOGIN_PATH)
}

#[test]
fn author_sees_own_note_and_other_user_sees_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(
        SqliteNoteRepository::try_new(&conn).unwrap(),
        NotesConfig::default(),
    );
    let author = session("A");
    let reader = session("B");

    let created = service
        .create(
            &author,
            &NoteDraft::new("Заголовок", "Текст заметки").with_slug("note-slug"),
        )
        .unwrap();

    assert!(service.list(&reader).unwrap().is_empty());
    let listed = service.list(&author).unwrap();
    assert!(listed.contains(&created));
}

#[test]
fn author_lists_exactly_their_hundred_notes() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(
        SqliteNoteRepository::try_new(&conn).unwrap(),
        NotesConfig::default(),
    );
    let author = session("Серега Пушкин");
    let reader = session("Иван Евтушенко");

    let mut expected = BTreeSet::new();
    for idx in 0..NOTE_COUNT {
        let draft = NoteDraft::new(format!("Заметка {idx}"), format!("Текст заметки {idx}"))
            .with_slug(format!("slug_{idx}"));
        let created = service.create(&author, &draft).unwrap();
        expected.insert((created.title, created.body, created.slug));
    }
    service
        .create(&reader, &NoteDraft::new("Чужая заметка", ""))
        .unwrap();

    let listed = service.list(&author).unwrap();
    assert_eq!(listed.len(), NOTE_COUNT);
    assert!(listed.iter().all(|note| note.owner.as_str() == "Серега Пушкин"));
    let actual: BTreeSet<_> = listed
        .into_iter()
        .map(|note| (note.title, note.body, note.slug))
        .collect();
    assert_eq!(actual, expected);

    let foreign = service.list(&reader).unwrap();
    assert_eq!(foreign.len(), 1);
    assert_eq!(foreign[0].slug, "chuzhaya-zametka");
}

#[test]
fn user_without_notes_gets_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(
        SqliteNoteRepository::try_new(&conn).unwrap(),
        NotesConfig::default(),
    );

    assert!(service.list(&session("nobody")).unwrap().is_empty());
}

#[test]
fn anonymous_listing_redirects_to_login() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(
        SqliteNoteRepository::try_new(&conn).unwrap(),
        NotesConfig::default(),
    );

    let err = service.list(&Session::anonymous(LOGIN_PATH)).unwrap_err();
    assert!(
        matches!(err, NoteError::NotAuthenticated { ref redirect_to } if redirect_to == "/auth/login/?next=/notes/")
    );
}
