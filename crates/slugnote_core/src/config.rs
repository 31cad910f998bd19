//! Service configuration.
//!
//! # Responsibility
//! - Hold landing targets and field limits used by the note service.
//! - Load overrides from JSON files; every field falls back to a default.
//!
//! # Invariants
//! - `login_path` and `success_path` are absolute paths (start with `/`).
//! - Field limits are strictly positive.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const DEFAULT_LOGIN_PATH: &str = "/auth/login/";
const DEFAULT_SUCCESS_PATH: &str = "/done/";
const DEFAULT_TITLE_MAX_CHARS: usize = 100;
const DEFAULT_SLUG_MAX_CHARS: usize = 100;

/// Runtime configuration for `NoteService`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotesConfig {
    /// Login page that anonymous requests are redirected to.
    pub login_path: String,
    /// Landing target after a successful create/update/delete.
    pub success_path: String,
    pub title_max_chars: usize,
    pub slug_max_chars: usize,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            success_path: DEFAULT_SUCCESS_PATH.to_string(),
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            slug_max_chars: DEFAULT_SLUG_MAX_CHARS,
        }
    }
}

impl NotesConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            source: err,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("login_path", &self.login_path),
            ("success_path", &self.success_path),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "{field} must start with `/`, got `{value}`"
                )));
            }
        }
        for (field, value) in [
            ("title_max_chars", self.title_max_chars),
            ("slug_max_chars", self.slug_max_chars),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{field} must be positive")));
            }
        }
        Ok(())
    }
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read config `{path}`: {source}"),
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, NotesConfig};
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = NotesConfig::from_json_str("{}").expect("empty json should parse");
        assert_eq!(config, NotesConfig::default());
        assert_eq!(config.login_path, "/auth/login/");
        assert_eq!(config.success_path, "/done/");
    }

    #[test]
    fn partial_document_overrides_selected_fields() {
        let config = NotesConfig::from_json_str(r#"{"login_path": "/login/", "slug_max_chars": 50}"#)
            .expect("partial json should parse");
        assert_eq!(config.login_path, "/login/");
        assert_eq!(config.slug_max_chars, 50);
        assert_eq!(config.title_max_chars, 100);
    }

    #[test]
    fn rejects_relative_paths_and_zero_limits() {
        let err = NotesConfig::from_json_str(r#"{"success_path": "done/"}"#)
            .expect_err("relative path must fail");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = NotesConfig::from_json_str(r#"{"title_max_chars": 0}"#)
            .expect_err("zero limit must fail");
        assert!(err.to_string().contains("title_max_chars"));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = NotesConfig::from_json_str(r#"{"logn_path": "/x/"}"#)
            .expect_err("typo must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"success_path": "/notes/done/"}}"#).expect("write config");
        let config = NotesConfig::load(file.path()).expect("config should load");
        assert_eq!(config.success_path, "/notes/done/");

        let err = NotesConfig::load(file.path().with_extension("missing"))
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
