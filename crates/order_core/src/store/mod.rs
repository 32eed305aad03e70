//! Persistence for the single notes file.
//!
//! # Responsibility
//! - Read, create, and overwrite the markdown notes file.
//! - Map filesystem failures onto [`crate::error::NotesError`] variants.
//!
//! # Invariants
//! - Writes replace the whole file; there are no partial updates.
//! - A reader never observes a half-written file.

mod notes_file;

pub use notes_file::{NotesFile, NOTES_SKELETON};
