//! Application route paths.
//!
//! Paths are what the login redirect carries back in `next=`, so they must
//! match the view layer's routing table. The success landing page is
//! configured separately (`NotesConfig::success_path`).

use std::fmt::{Display, Formatter};

/// Named application routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    List,
    Add,
    Detail(String),
    Edit(String),
    Delete(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::List => "/notes/".to_string(),
            Self::Add => "/add/".to_string(),
            Self::Detail(slug) => format!("/note/{slug}/"),
            Self::Edit(slug) => format!("/edit/{slug}/"),
            Self::Delete(slug) => format!("/delete/{slug}/"),
        }
    }

    /// Returns whether the route is served to anonymous visitors.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Home)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
