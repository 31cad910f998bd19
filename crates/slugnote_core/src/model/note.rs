//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and the author-supplied draft.
//! - Provide the opaque `UserId` handed over by the session layer.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `owner` is set at creation and never reassigned.
//! - `slug` is unique across all notes, not per owner.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the store on insert.
pub type NoteId = Uuid;

/// Opaque identity of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a user identifier, rejecting blank values.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned identity.
    pub id: NoteId,
    /// Non-empty author-supplied title.
    pub title: String,
    /// Free text, may be empty.
    pub body: String,
    /// Globally unique URL token used as the lookup key.
    pub slug: String,
    /// Creating user; the only one allowed to view or mutate the note.
    pub owner: UserId,
}

impl Note {
    /// Returns whether `user` owns this note.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }
}

/// Author-supplied candidate for create/update.
///
/// The owner is never part of the draft; it always comes from the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Blank or missing means "derive from title".
    #[serde(default)]
    pub slug: Option<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            slug: None,
        }
    }

    /// Sets an explicit slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Returns the supplied slug when it is not blank.
    pub fn supplied_slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|value| !value.trim().is_empty())
    }
}

/// Fully resolved note ready for insertion; the store assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub body: String,
    pub slug: String,
    pub owner: UserId,
}

#[cfg(test)]
mod tests {
    use super::{NoteDraft, UserId};

    #[test]
    fn user_id_rejects_blank_values() {
        assert!(UserId::new("   ").is_none());
        assert_eq!(UserId::new("author").unwrap().as_str(), "author");
    }

    #[test]
    fn blank_slug_counts_as_not_supplied() {
        let draft = NoteDraft::new("Title", "").with_slug("  ");
        assert_eq!(draft.supplied_slug(), None);

        let draft = NoteDraft::new("Title", "").with_slug("my-slug");
        assert_eq!(draft.supplied_slug(), Some("my-slug"));
    }
}
