//! Field-level validation for note drafts.
//!
//! # Responsibility
//! - Carry form feedback as a mapping from field name to messages.
//! - Check draft shape (title presence/length, slug format/length).
//! - Build the user-visible slug collision message.
//!
//! # Invariants
//! - The slug collision message always ends with `SLUG_TAKEN_SUFFIX`.
//! - Checks here never touch storage; uniqueness is decided by the service.

use crate::config::NotesConfig;
use crate::slug::is_valid_slug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Field name for the note title.
pub const FIELD_TITLE: &str = "title";
/// Field name for the note slug.
pub const FIELD_SLUG: &str = "slug";

/// Suffix appended to a colliding slug in the user-visible warning.
pub const SLUG_TAKEN_SUFFIX: &str = " - Value already in use, please add something else!";

const REQUIRED_MESSAGE: &str = "This field is required.";
const INVALID_SLUG_MESSAGE: &str =
    "Enter a valid slug consisting of letters, numbers, underscores or hyphens.";
const UNDERIVABLE_SLUG_MESSAGE: &str =
    "Could not derive a slug from the title, please enter one.";

/// Field name to message list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error set holding one message for one field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages attached to `field`; empty when the field is clean.
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    /// Returns `Ok(())` when no field carries a message.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Builds the slug collision warning shown on the `slug` field.
pub fn slug_taken_message(slug: &str) -> String {
    format!("{slug}{SLUG_TAKEN_SUFFIX}")
}

/// Checks the title of a draft.
pub fn check_title(title: &str, config: &NotesConfig, errors: &mut ValidationErrors) {
    let title = title.trim();
    if title.is_empty() {
        errors.add(FIELD_TITLE, REQUIRED_MESSAGE);
        return;
    }
    let length = title.chars().count();
    if length > config.title_max_chars {
        errors.add(FIELD_TITLE, too_long_message(config.title_max_chars, length));
    }
}

/// Checks a resolved slug.
///
/// `supplied` tells whether the author typed the slug; a derived slug is
/// already URL-safe and only fails when the title had nothing sluggable.
pub fn check_slug(
    slug: &str,
    supplied: bool,
    config: &NotesConfig,
    errors: &mut ValidationErrors,
) {
    if slug.is_empty() {
        if !supplied {
            errors.add(FIELD_SLUG, UNDERIVABLE_SLUG_MESSAGE);
        }
        return;
    }
    if supplied && !is_valid_slug(slug) {
        errors.add(FIELD_SLUG, INVALID_SLUG_MESSAGE);
    }
    let length = slug.chars().count();
    if length > config.slug_max_chars {
        errors.add(FIELD_SLUG, too_long_message(config.slug_max_chars, length));
    }
}

fn too_long_message(max: usize, actual: usize) -> String {
    format!("Ensure this value has at most {max} characters (it has {actual}).")
}

#[cfg(test)]
mod tests {
    use super::{
        check_slug, check_title, slug_taken_message, ValidationErrors, FIELD_SLUG, FIELD_TITLE,
    };
    use crate::config::NotesConfig;

    #[test]
    fn slug_taken_message_keeps_literal_suffix() {
        assert_eq!(
            slug_taken_message("slug"),
            "slug - Value already in use, please add something else!"
        );
    }

    #[test]
    fn blank_title_is_required() {
        let mut errors = ValidationErrors::new();
        check_title("  \n", &NotesConfig::default(), &mut errors);
        assert_eq!(errors.field(FIELD_TITLE), ["This field is required."]);
        assert!(errors.field(FIELD_SLUG).is_empty());
    }

    #[test]
    fn title_length_ignores_surrounding_whitespace() {
        let mut errors = ValidationErrors::new();
        let padded = format!("  {}  ", "a".repeat(100));
        check_title(&padded, &NotesConfig::default(), &mut errors);
        assert!(errors.is_empty());

        let padded = format!("  {}  ", "a".repeat(101));
        check_title(&padded, &NotesConfig::default(), &mut errors);
        assert_eq!(
            errors.field(FIELD_TITLE),
            ["Ensure this value has at most 100 characters (it has 101)."]
        );
    }

    #[test]
    fn long_title_and_slug_are_rejected() {
        let config = NotesConfig {
            title_max_chars: 5,
            slug_max_chars: 3,
            ..NotesConfig::default()
        };
        let mut errors = ValidationErrors::new();
        check_title("Заголовок", &config, &mut errors);
        check_slug("abcd", true, &config, &mut errors);
        assert_eq!(errors.field(FIELD_TITLE).len(), 1);
        assert_eq!(errors.field(FIELD_SLUG).len(), 1);
        assert!(errors.field(FIELD_TITLE)[0].contains("at most 5"));
    }

    #[test]
    fn supplied_slug_must_be_url_safe() {
        let mut errors = ValidationErrors::new();
        check_slug("no spaces allowed", true, &NotesConfig::default(), &mut errors);
        assert_eq!(errors.field(FIELD_SLUG).len(), 1);
    }

    #[test]
    fn empty_derived_slug_is_reported() {
        let mut errors = ValidationErrors::new();
        check_slug("", false, &NotesConfig::default(), &mut errors);
        assert_eq!(errors.field(FIELD_SLUG).len(), 1);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn display_joins_all_messages() {
        let mut errors = ValidationErrors::single(FIELD_SLUG, "one");
        errors.add(FIELD_TITLE, "two");
        assert_eq!(errors.to_string(), "slug: one; title: two");
    }
}
