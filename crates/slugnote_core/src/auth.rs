//! Session collaborator and access guards.
//!
//! # Responsibility
//! - Describe what core needs from the identity layer (`SessionProvider`).
//! - Provide the guards composed at the start of each note operation.
//!
//! # Invariants
//! - An anonymous caller is rejected before any store access.
//! - A non-owner gets `NotFound`, exactly like a missing note.

use crate::model::note::{Note, UserId};
use crate::routes::Route;
use crate::service::note_service::NoteError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Characters left readable in `next=`; everything else is escaped.
const NEXT_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Identity/session collaborator supplied by the hosting layer.
pub trait SessionProvider {
    /// Authenticated user, or `None` for anonymous sessions.
    fn current_user(&self) -> Option<UserId>;
    /// Login target that returns to `original_path` after sign-in.
    fn login_redirect(&self, original_path: &str) -> String;
}

/// Plain session value: an optional user plus the login page path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: Option<UserId>,
    login_path: String,
}

impl Session {
    pub fn anonymous(login_path: impl Into<String>) -> Self {
        Self {
            user: None,
            login_path: login_path.into(),
        }
    }

    pub fn authenticated(user: UserId, login_path: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            login_path: login_path.into(),
        }
    }
}

impl SessionProvider for Session {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }

    fn login_redirect(&self, original_path: &str) -> String {
        format!(
            "{}?next={}",
            self.login_path,
            utf8_percent_encode(original_path, NEXT_PATH)
        )
    }
}

/// Resolves the acting user or rejects with a login redirect back to `route`.
pub fn require_authenticated<S: SessionProvider + ?Sized>(
    session: &S,
    route: &Route,
) -> Result<UserId, NoteError> {
    session
        .current_user()
        .ok_or_else(|| NoteError::NotAuthenticated {
            redirect_to: session.login_redirect(&route.path()),
        })
}

/// Passes `note` through when `user` owns it; otherwise hides it.
pub fn require_owner(note: Option<Note>, user: &UserId) -> Result<Note, NoteError> {
    match note {
        Some(note) if note.is_owned_by(user) => Ok(note),
        _ => Err(NoteError::NotFound),
    }
}
