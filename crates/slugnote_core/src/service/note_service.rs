//! Note use-case service.
//!
//! # Responsibility
//! - Run the per-operation flow: authenticate, check ownership, validate,
//!   persist.
//! - Resolve slugs for drafts and turn store conflicts into field errors.
//!
//! # Invariants
//! - Anonymous sessions never reach the store.
//! - Non-owners get `NotFound`, exactly like a missing note.
//! - Notes are looked up for update/delete by their current slug.
//! - A lookup slug that no stored note could hold is `NotFound`, checked
//!   before authentication so it never reaches a login redirect.
//! - A slug collision always fails the operation; nothing is renamed.
//! - Note titles and bodies are never written to logs.

use crate::auth::{require_authenticated, require_owner, SessionProvider};
use crate::config::NotesConfig;
use crate::model::note::{NewNote, Note, NoteDraft, NoteId, UserId};
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::routes::Route;
use crate::slug::{is_valid_slug, resolve_slug};
use crate::validation::{
    check_slug, check_title, slug_taken_message, ValidationErrors, FIELD_SLUG,
};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Rejection or failure of a note operation.
#[derive(Debug)]
pub enum NoteError {
    /// Anonymous session; the caller should redirect to `redirect_to`.
    NotAuthenticated { redirect_to: String },
    /// No such note, or the acting user does not own it.
    NotFound,
    /// Slug already held by another note; feedback sits on `slug`.
    SlugTaken(ValidationErrors),
    /// Draft failed field checks.
    InvalidInput(ValidationErrors),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl NoteError {
    /// Field-level feedback for form-bound rejections.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::SlugTaken(errors) | Self::InvalidInput(errors) => Some(errors),
            _ => None,
        }
    }

    /// Stable reason code used in log lines.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotAuthenticated { .. } => "not_authenticated",
            Self::NotFound => "not_found",
            Self::SlugTaken(_) => "slug_taken",
            Self::InvalidInput(_) => "invalid_input",
            Self::Repo(_) => "storage",
        }
    }

    fn slug_taken(slug: &str) -> Self {
        Self::SlugTaken(ValidationErrors::single(FIELD_SLUG, slug_taken_message(slug)))
    }
}

impl Display for NoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated { redirect_to } => {
                write!(f, "authentication required, redirect to `{redirect_to}`")
            }
            Self::NotFound => write!(f, "note not found"),
            Self::SlugTaken(errors) | Self::InvalidInput(errors) => write!(f, "{errors}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound,
            // The unique index won a race against the pre-check.
            RepoError::SlugConflict(slug) => Self::slug_taken(&slug),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over a repository implementation.
pub struct NoteService<R: NoteRepository> {
    repo: R,
    config: NotesConfig,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R, config: NotesConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    /// Landing target after a successful create/update/delete.
    pub fn success_target(&self) -> &str {
        self.config.success_path.as_str()
    }

    /// Creates a note owned by the acting user.
    ///
    /// A blank or missing slug is derived from the title.
    pub fn create<S: SessionProvider + ?Sized>(
        &self,
        session: &S,
        draft: &NoteDraft,
    ) -> Result<Note, NoteError> {
        let started_at = Instant::now();
        let result = (|| -> Result<Note, NoteError> {
            let owner = require_authenticated(session, &Route::Add)?;
            let slug = self.validate_draft(draft, None)?;
            let stored = self.repo.insert(&NewNote {
                title: draft.title.trim().to_string(),
                body: draft.body.clone(),
                slug,
                owner,
            })?;
            Ok(stored)
        })();
        log_outcome("note_create", &result, started_at);
        result
    }

    /// Replaces title, body and slug of the note currently at `current_slug`.
    ///
    /// Keeping the note's own slug is not a collision.
    pub fn update<S: SessionProvider + ?Sized>(
        &self,
        session: &S,
        current_slug: &str,
        draft: &NoteDraft,
    ) -> Result<Note, NoteError> {
        let started_at = Instant::now();
        let result = (|| -> Result<Note, NoteError> {
            let route = Route::Edit(current_slug.to_string());
            let mut note = self.owned_note(session, &route, current_slug)?;
            let slug = self.validate_draft(draft, Some(note.id))?;
            note.title = draft.title.trim().to_string();
            note.body = draft.body.clone();
            note.slug = slug;
            self.repo.update(&note)?;
            Ok(note)
        })();
        log_outcome("note_update", &result, started_at);
        result
    }

    /// Deletes the note currently at `current_slug`.
    pub fn delete<S: SessionProvider + ?Sized>(
        &self,
        session: &S,
        current_slug: &str,
    ) -> Result<(), NoteError> {
        let started_at = Instant::now();
        let result = (|| -> Result<(), NoteError> {
            let route = Route::Delete(current_slug.to_string());
            let note = self.owned_note(session, &route, current_slug)?;
            self.repo.delete(&note)?;
            Ok(())
        })();
        log_outcome("note_delete", &result, started_at);
        result
    }

    /// Lists the acting user's notes; empty when they own none.
    pub fn list<S: SessionProvider + ?Sized>(&self, session: &S) -> Result<Vec<Note>, NoteError> {
        let owner = require_authenticated(session, &Route::List)?;
        let notes = self.repo.find_by_owner(&owner)?;
        info!(
            "event=note_list module=service status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    /// Returns one note for its owner.
    pub fn get<S: SessionProvider + ?Sized>(
        &self,
        session: &S,
        slug: &str,
    ) -> Result<Note, NoteError> {
        self.owned_note(session, &Route::Detail(slug.to_string()), slug)
    }

    /// Checks that the session may open the create form.
    pub fn prepare_create<S: SessionProvider + ?Sized>(
        &self,
        session: &S,
    ) -> Result<UserId, NoteError> {
        require_authenticated(session, &Route::Add)
    }

    /// Loads the note shown on the edit form.
    pub fn prepare_edit<S: SessionProvider + ?Sized>(
        &self,
        session: &S,
        slug: &str,
    ) -> Result<Note, NoteError> {
        self.owned_note(session, &Route::Edit(slug.to_string()), slug)
    }

    /// Loads the note shown on the delete confirmation page.
    pub fn prepare_delete<S: SessionProvider + ?Sized>(
        &self,
        session: &S,
        slug: &str,
    ) -> Result<Note, NoteError> {
        self.owned_note(session, &Route::Delete(slug.to_string()), slug)
    }

    fn owned_note<S: SessionProvider + ?Sized>(
        &self,
        session: &S,
        route: &Route,
        slug: &str,
    ) -> Result<Note, NoteError> {
        if !is_valid_slug(slug) {
            return Err(NoteError::NotFound);
        }
        let user = require_authenticated(session, route)?;
        require_owner(self.repo.find_by_slug(slug)?, &user)
    }

    // Field checks first, then uniqueness against every other note.
    fn validate_draft(
        &self,
        draft: &NoteDraft,
        excluding: Option<NoteId>,
    ) -> Result<String, NoteError> {
        let slug = resolve_slug(draft, self.config.slug_max_chars);

        let mut errors = ValidationErrors::new();
        check_title(&draft.title, &self.config, &mut errors);
        check_slug(&slug, draft.supplied_slug().is_some(), &self.config, &mut errors);
        errors.into_result().map_err(NoteError::InvalidInput)?;

        if self.repo.slug_in_use(&slug, excluding)? {
            return Err(NoteError::slug_taken(&slug));
        }
        Ok(slug)
    }
}

fn log_outcome<T>(event: &str, result: &Result<T, NoteError>, started_at: Instant) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!("event={event} module=service status=ok duration_ms={duration_ms}"),
        Err(NoteError::Repo(err)) => error!(
            "event={event} module=service status=error reason=storage duration_ms={duration_ms} error={err}"
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected reason={} duration_ms={duration_ms}",
            err.reason()
        ),
    }
}
