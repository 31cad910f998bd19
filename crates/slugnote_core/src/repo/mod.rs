//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the note store contract consumed by the service.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - The store enforces slug uniqueness itself; a duplicate write surfaces
//!   as `RepoError::SlugConflict`, never as a raw constraint error.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod note_repo;
