//! Core editor for the `order` dev-notes file.
//! This crate owns the markdown document model and every mutation applied to it.

pub mod document;
pub mod env;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use document::{Document, Section, SectionKind};
pub use env::{Environment, StaticEnvironment, SystemEnvironment};
pub use error::{NotesError, NotesResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::section::SectionType;
pub use model::validate::{validate_date, validate_nonempty, validate_section_type};
pub use service::{EntryOverrides, NotesEditor};
pub use store::{NotesFile, NOTES_SKELETON};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
