//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate guards, validation and repository calls into note
//!   operations.
//! - Keep view/CLI layers decoupled from storage details.

pub mod note_service;
