//! Error contract shared by every editor operation.
//!
//! # Responsibility
//! - Name each failure the editor can report to its caller.
//! - Render stable, human-readable messages for the CLI boundary.
//!
//! # Invariants
//! - Validation variants never carry I/O sources.
//! - `FileNotFound` is the only variant callers are expected to recover from.

use crate::model::section::SectionType;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type NotesResult<T> = Result<T, NotesError>;

/// Failure kinds for notes-file validation, I/O, and task lookups.
#[derive(Debug)]
pub enum NotesError {
    /// Date is not `YYYY-MM-DD` or its month/day are out of range.
    InvalidDateFormat(String),
    /// Section type is not one of [`SectionType::ALL`].
    InvalidSectionType(String),
    /// Content for an add-operation is blank.
    EmptyContent,
    /// Partial-text or search query is blank.
    EmptySearch,
    /// Notes file does not exist yet.
    FileNotFound(PathBuf),
    /// Notes file (or its directory) is not writable.
    PermissionDenied(PathBuf),
    /// Any other filesystem failure.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// No incomplete task line matched the partial text.
    TaskNotFound(String),
    /// Search query matched no line.
    NoResults(String),
}

impl Display for NotesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateFormat(_) => write!(f, "Invalid date format. Use YYYY-MM-DD"),
            Self::InvalidSectionType(_) => {
                let allowed = SectionType::ALL
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Invalid section type. Use: {allowed}")
            }
            Self::EmptyContent => write!(f, "Content cannot be empty"),
            Self::EmptySearch => write!(f, "Search text cannot be empty"),
            Self::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            Self::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            Self::Io { path, source } => write!(f, "I/O error: {}: {source}", path.display()),
            Self::TaskNotFound(text) => write!(f, "No task found containing '{text}'"),
            Self::NoResults(query) => write!(f, "No results found for '{query}'"),
        }
    }
}

impl Error for NotesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl NotesError {
    /// Maps an `std::io::Error` raised while touching `path`.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }

    /// Stable snake_case code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDateFormat(_) => "invalid_date_format",
            Self::InvalidSectionType(_) => "invalid_section_type",
            Self::EmptyContent => "empty_content",
            Self::EmptySearch => "empty_search",
            Self::FileNotFound(_) => "file_not_found",
            Self::PermissionDenied(_) => "permission_denied",
            Self::Io { .. } => "io_error",
            Self::TaskNotFound(_) => "task_not_found",
            Self::NoResults(_) => "no_results",
        }
    }
}
