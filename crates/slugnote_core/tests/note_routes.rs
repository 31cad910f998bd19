use slugnote_core::db::open_db_in_memory;
use slugnote_core::{
    after_read, after_write, Navigation, NoteDraft, NoteError, NoteService, NotesConfig, Route,
    Session, SessionProvider, SqliteNoteRepository, UserId,
};

const LOGIN_PATH: &str = "/auth/login/";
const SLUG_NOTE: &str = "slug_note";

type Service<'conn> = NoteService<SqliteNoteRepository<'conn>>;

fn author() -> Session {
    Session::authenticated(UserId::new("Серега Пушкин").unwrap(), LOGIN_PATH)
}

fn reader() -> Session {
    Session::authenticated(UserId::new("Иван Евтушенко").unwrap(), LOGIN_PATH)
}

// GET handling of each page, the way a view layer would wire it.
fn open(service: &Service<'_>, session: &Session, route: &Route) -> Navigation<()> {
    let result = match route {
        route if route.is_public() => Ok(()),
        Route::Home => unreachable!("home is public"),
        Route::List => service.list(session).map(drop),
        Route::Add => service.prepare_create(session).map(drop),
        Route::Detail(slug) => service.get(session, slug).map(drop),
        Route::Edit(slug) => service.prepare_edit(session, slug).map(drop),
        Route::Delete(slug) => service.prepare_delete(session, slug).map(drop),
    };
    after_read(result).unwrap()
}

fn note_routes() -> Vec<Route> {
    vec![
        Route::Detail(SLUG_NOTE.to_string()),
        Route::Edit(SLUG_NOTE.to_string()),
        Route::Delete(SLUG_NOTE.to_string()),
    ]
}

fn seeded(conn: &rusqlite::Connection) -> Service<'_> {
    let service = NoteService::new(
        SqliteNoteRepository::try_new(conn).unwrap(),
        NotesConfig::default(),
    );
    service
        .create(
            &author(),
            &NoteDraft::new("Заголовок", "Текст").with_slug(SLUG_NOTE),
        )
        .unwrap();
    service
}

#[test]
fn anonymous_is_redirected_to_login_with_next() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded(&conn);
    let anonymous = Session::anonymous(LOGIN_PATH);

    let mut routes = vec![Route::List, Route::Add];
    routes.extend(note_routes());
    for route in routes {
        let nav = open(&service, &anonymous, &route);
        assert_eq!(nav.status_code(), 302, "route {route}");
        let expected = format!("{LOGIN_PATH}?next={}", route.path());
        assert_eq!(nav.redirect_target(), Some(expected.as_str()), "route {route}");
        assert_eq!(anonymous.login_redirect(&route.path()), expected);
    }
}

#[test]
fn malformed_slug_is_not_found_before_login_redirect() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded(&conn);
    let anonymous = Session::anonymous(LOGIN_PATH);
    let hostile = "x/?a=1&next=https://evil.example/#";

    let err = service.delete(&anonymous, hostile).unwrap_err();
    assert!(matches!(err, NoteError::NotFound), "unexpected error: {err}");

    for route in [
        Route::Detail(hostile.to_string()),
        Route::Edit(hostile.to_string()),
        Route::Delete(hostile.to_string()),
    ] {
        let nav = open(&service, &anonymous, &route);
        assert_eq!(nav, Navigation::NotFound, "route {route}");
    }

    assert!(service.get(&author(), SLUG_NOTE).is_ok());
}

#[test]
fn login_redirect_never_leaks_query_characters() {
    let anonymous = Session::anonymous(LOGIN_PATH);
    let target = anonymous.login_redirect("/delete/x/?a=1&next=https://evil.example/#/");
    assert_eq!(target.matches('?').count(), 1);
    assert!(!target.contains('&'));
    assert!(!target.contains('#'));
    assert!(target.starts_with("/auth/login/?next=/delete/x/"));
}

#[test]
fn home_is_public() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded(&conn);

    let nav = open(&service, &Session::anonymous(LOGIN_PATH), &Route::Home);
    assert_eq!(nav, Navigation::Render(()));
}

#[test]
fn authenticated_author_reaches_every_page() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded(&conn);

    let mut routes = vec![Route::Home, Route::List, Route::Add];
    routes.extend(note_routes());
    for route in routes {
        let nav = open(&service, &author(), &route);
        assert_eq!(nav.status_code(), 200, "route {route}");
    }
}

#[test]
fn note_pages_are_hidden_from_other_users() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded(&conn);

    for (session, status) in [(author(), 200), (reader(), 404)] {
        for route in note_routes() {
            let nav = open(&service, &session, &route);
            assert_eq!(nav.status_code(), status, "route {route}");
        }
    }
}

#[test]
fn writes_land_on_success_page_or_stay_on_form() {
    let conn = open_db_in_memory().unwrap();
    let service = seeded(&conn);

    let nav = after_write(
        service.create(&author(), &NoteDraft::new("Вторая", "")),
        service.success_target(),
    )
    .unwrap();
    assert_eq!(nav, Navigation::Redirect("/done/".to_string()));

    let nav = after_write(
        service.create(&author(), &NoteDraft::new("Третья", "").with_slug(SLUG_NOTE)),
        service.success_target(),
    )
    .unwrap();
    match nav {
        Navigation::Form(errors) => assert_eq!(
            errors.field("slug"),
            ["slug_note - Value already in use, please add something else!"]
        ),
        other => panic!("unexpected navigation: {other:?}"),
    }

    let nav = after_write(
        service.delete(&reader(), SLUG_NOTE),
        service.success_target(),
    )
    .unwrap();
    assert_eq!(nav, Navigation::NotFound);

    let nav = after_write(
        service.delete(&author(), SLUG_NOTE),
        service.success_target(),
    )
    .unwrap();
    assert_eq!(nav.redirect_target(), Some("/done/"));
}
