//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide slug/owner keyed lookups and note writes over `notes`.
//! - Translate the unique slug index violation into a semantic error.
//!
//! # Invariants
//! - Slug lookups are exact-match and case-sensitive.
//! - `owner` is never part of an UPDATE; it is matched, not written.
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::note::{NewNote, Note, NoteId, UserId};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    body,
    slug,
    owner
FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    /// Another row already holds this slug.
    SlugConflict(String),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::SlugConflict(slug) => write!(f, "slug already stored: `{slug}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column missing: {table}.{column}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence store for notes.
pub trait NoteRepository {
    /// Finds one note by exact slug.
    fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Note>>;
    /// Lists every note owned by `owner` in creation order.
    fn find_by_owner(&self, owner: &UserId) -> RepoResult<Vec<Note>>;
    /// Returns whether any note other than `excluding` holds `slug`.
    fn slug_in_use(&self, slug: &str, excluding: Option<NoteId>) -> RepoResult<bool>;
    /// Inserts a note under a fresh id and returns the stored record.
    fn insert(&self, note: &NewNote) -> RepoResult<Note>;
    /// Replaces title/body/slug of an existing note.
    fn update(&self, note: &Note) -> RepoResult<()>;
    /// Removes a note permanently.
    fn delete(&self, note: &Note) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails fast when the `notes` table is missing or incomplete.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE slug = ?1;"))?;
        let mut rows = stmt.query([slug])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn find_by_owner(&self, owner: &UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE owner = ?1
             ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([owner.as_str()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn slug_in_use(&self, slug: &str, excluding: Option<NoteId>) -> RepoResult<bool> {
        let holder: Option<String> = self
            .conn
            .query_row("SELECT id FROM notes WHERE slug = ?1;", [slug], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(holder) = holder else {
            return Ok(false);
        };
        match excluding {
            Some(id) => Ok(holder != id.to_string()),
            None => Ok(true),
        }
    }

    fn insert(&self, note: &NewNote) -> RepoResult<Note> {
        let id = Uuid::new_v4();
        self.conn
            .execute(
                "INSERT INTO notes (id, title, body, slug, owner)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    id.to_string(),
                    note.title.as_str(),
                    note.body.as_str(),
                    note.slug.as_str(),
                    note.owner.as_str(),
                ],
            )
            .map_err(|err| map_write_error(err, &note.slug))?;

        Ok(Note {
            id,
            title: note.title.clone(),
            body: note.body.clone(),
            slug: note.slug.clone(),
            owner: note.owner.clone(),
        })
    }

    fn update(&self, note: &Note) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE notes
                 SET
                    title = ?2,
                    body = ?3,
                    slug = ?4,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1
                   AND owner = ?5;",
                params![
                    note.id.to_string(),
                    note.title.as_str(),
                    note.body.as_str(),
                    note.slug.as_str(),
                    note.owner.as_str(),
                ],
            )
            .map_err(|err| map_write_error(err, &note.slug))?;

        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }
        Ok(())
    }

    fn delete(&self, note: &Note) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND owner = ?2;",
            params![note.id.to_string(), note.owner.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }
        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{id_text}` in notes.id")))?;

    let owner_text: String = row.get("owner")?;
    let owner = UserId::new(owner_text)
        .ok_or_else(|| RepoError::InvalidData(format!("blank owner for note {id}")))?;

    Ok(Note {
        id,
        title: row.get("title")?,
        body: row.get("body")?,
        slug: row.get("slug")?,
        owner,
    })
}

fn map_write_error(err: rusqlite::Error, slug: &str) -> RepoError {
    if is_slug_conflict(&err) {
        RepoError::SlugConflict(slug.to_string())
    } else {
        err.into()
    }
}

fn is_slug_conflict(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(message)) => {
            failure.code == ErrorCode::ConstraintViolation && message.contains("notes.slug")
        }
        _ => false,
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for column in ["id", "title", "body", "slug", "owner", "created_at"] {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
