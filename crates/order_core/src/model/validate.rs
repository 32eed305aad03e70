//! Input validation for editor operations.
//!
//! # Invariants
//! - Dates match `YYYY-MM-DD` with month 1..=12 and day 1..=31. Day counts per
//!   month are not checked.
//! - Validation never touches the filesystem.

use crate::error::{NotesError, NotesResult};
use crate::model::section::SectionType;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// Checks the `YYYY-MM-DD` shape and month/day ranges.
pub fn validate_date(date: &str) -> NotesResult<()> {
    let invalid = || NotesError::InvalidDateFormat(date.to_string());
    if !DATE_RE.is_match(date) {
        return Err(invalid());
    }

    let mut parts = date.split('-').skip(1);
    let month = parts
        .next()
        .and_then(|value| value.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    let day = parts
        .next()
        .and_then(|value| value.parse::<u32>().ok())
        .ok_or_else(invalid)?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(invalid());
    }
    Ok(())
}

/// Parses a section type name, rejecting anything outside [`SectionType::ALL`].
pub fn validate_section_type(value: &str) -> NotesResult<SectionType> {
    value.parse()
}

/// Rejects content that is empty after trimming.
pub fn validate_nonempty(text: &str) -> NotesResult<()> {
    if text.trim().is_empty() {
        return Err(NotesError::EmptyContent);
    }
    Ok(())
}

/// Rejects a blank partial-text or search query.
pub fn validate_search(text: &str) -> NotesResult<()> {
    if text.trim().is_empty() {
        return Err(NotesError::EmptySearch);
    }
    Ok(())
}
