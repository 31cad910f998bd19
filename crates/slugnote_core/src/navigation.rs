//! Maps operation results to what a view layer does next.
//!
//! Form-bound rejections stay on the form; only `NotAuthenticated` and
//! `NotFound` change control flow. Storage failures are handed back as
//! errors for the caller's 5xx path.

use crate::repo::note_repo::RepoError;
use crate::service::note_service::NoteError;
use crate::validation::ValidationErrors;

/// Next step for a view after a note operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation<T> {
    /// Show the page with the loaded content.
    Render(T),
    /// Leave for `target` (success landing or login page).
    Redirect(String),
    /// Answer as if the note did not exist.
    NotFound,
    /// Re-display the form with field-level feedback.
    Form(ValidationErrors),
}

impl<T> Navigation<T> {
    /// HTTP status a web front end would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Render(_) | Self::Form(_) => 200,
            Self::Redirect(_) => 302,
            Self::NotFound => 404,
        }
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect(target) => Some(target.as_str()),
            _ => None,
        }
    }

    /// Drops rendered content, keeping the navigation decision.
    pub fn without_content(self) -> Navigation<()> {
        match self {
            Self::Render(_) => Navigation::Render(()),
            Self::Redirect(target) => Navigation::Redirect(target),
            Self::NotFound => Navigation::NotFound,
            Self::Form(errors) => Navigation::Form(errors),
        }
    }
}

/// Navigation after a write; success lands on `success_target`.
pub fn after_write<T>(
    result: Result<T, NoteError>,
    success_target: &str,
) -> Result<Navigation<()>, RepoError> {
    match result {
        Ok(_) => Ok(Navigation::Redirect(success_target.to_string())),
        Err(err) => rejection(err),
    }
}

/// Navigation after a read; success renders the loaded value.
pub fn after_read<T>(result: Result<T, NoteError>) -> Result<Navigation<T>, RepoError> {
    match result {
        Ok(value) => Ok(Navigation::Render(value)),
        Err(err) => rejection(err),
    }
}

fn rejection<T>(err: NoteError) -> Result<Navigation<T>, RepoError> {
    match err {
        NoteError::NotAuthenticated { redirect_to } => Ok(Navigation::Redirect(redirect_to)),
        NoteError::NotFound => Ok(Navigation::NotFound),
        NoteError::SlugTaken(errors) | NoteError::InvalidInput(errors) => {
            Ok(Navigation::Form(errors))
        }
        NoteError::Repo(err) => Err(err),
    }
}
