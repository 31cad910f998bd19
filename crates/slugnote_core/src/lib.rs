//! Core domain logic for slugnote.
//! This crate is the single source of truth for note invariants: slug
//! uniqueness, owner-only access and slug derivation.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod repo;
pub mod routes;
pub mod service;
pub mod slug;
pub mod validation;

pub use auth::{require_authenticated, require_owner, Session, SessionProvider};
pub use config::{ConfigError, NotesConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{NewNote, Note, NoteDraft, NoteId, UserId};
pub use navigation::{after_read, after_write, Navigation};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use routes::Route;
pub use service::note_service::{NoteError, NoteService};
pub use slug::{resolve_slug, slugify};
pub use validation::{ValidationErrors, SLUG_TAKEN_SUFFIX};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
