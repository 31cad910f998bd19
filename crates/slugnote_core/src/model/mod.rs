//! Domain model for personal notes.
//!
//! # Responsibility
//! - Define canonical note records and the candidate shape used by writes.
//! - Keep owner identity opaque to core.
//!
//! # Invariants
//! - Every persisted note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
