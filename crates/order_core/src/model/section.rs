//! Content block kinds.
//!
//! # Responsibility
//! - Define the fixed set of `####` block headings a user subsection may hold.
//!
//! # Invariants
//! - Parsing is exact and case-sensitive (`Todo`, not `todo`).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Heading kind for one `#### ` content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    /// Checkbox task list.
    Todo,
    /// Free-form context notes.
    Notes,
    /// Ideas to revisit later.
    Ideas,
}

impl SectionType {
    /// Every accepted kind, in display order.
    pub const ALL: [SectionType; 3] = [Self::Todo, Self::Notes, Self::Ideas];

    /// Heading text as written after `#### `.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::Notes => "Notes",
            Self::Ideas => "Ideas",
        }
    }

    /// Full block heading line, e.g. `#### Todo`.
    pub fn heading(self) -> String {
        format!("#### {}", self.as_str())
    }
}

impl Display for SectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = crate::error::NotesError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| crate::error::NotesError::InvalidSectionType(value.to_string()))
    }
}
