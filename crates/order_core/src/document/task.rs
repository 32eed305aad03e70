//! Checkbox task line helpers.
//!
//! # Invariants
//! - Markers are exact, case-sensitive substrings: `- [ ]` and `- [x]`.
//! - Partial matching is case-insensitive against the whole line, markup
//!   included.

use once_cell::sync::Lazy;
use regex::Regex;

pub const INCOMPLETE_MARKER: &str = "- [ ]";
pub const COMPLETE_MARKER: &str = "- [x]";

static CARRIED_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\(carried from [^)]*\)\s*$").expect("valid carried-from regex")
});

/// Whether `line` is an open task containing `partial`.
pub fn is_open_match(line: &str, partial: &str) -> bool {
    line.contains(INCOMPLETE_MARKER) && line.to_lowercase().contains(&partial.to_lowercase())
}

/// Swaps the first incomplete marker for the complete one.
pub fn complete(line: &str) -> String {
    line.replacen(INCOMPLETE_MARKER, COMPLETE_MARKER, 1)
}

/// Task text after the checkbox marker.
///
/// Leading indentation is dropped with the marker, so a nested sub-task that
/// is carried or promoted comes back as a top-level task.
pub fn task_text(line: &str) -> &str {
    match line.split_once(INCOMPLETE_MARKER) {
        Some((_, rest)) => rest.trim(),
        None => line.trim(),
    }
}

/// Open task line for `text`.
pub fn open_task_line(text: &str) -> String {
    format!("{INCOMPLETE_MARKER} {}", text.trim())
}

/// Appends `(carried from {date})`, replacing an earlier annotation.
pub fn carried_from(text: &str, date: &str) -> String {
    let base = CARRIED_SUFFIX_RE.replace(text, "");
    format!("{} (carried from {date})", base.trim_end())
}

#[cfg(test)]
mod tests {
    use super::{carried_from, complete, is_open_match, open_task_line, task_text};

    #[test]
    fn open_match_is_case_insensitive_and_needs_open_marker() {
        assert!(is_open_match("- [ ] Fix Login Bug", "login"));
        assert!(is_open_match("- [ ] Fix Login Bug", "[ ] fix"));
        assert!(!is_open_match("- [x] Fix Login Bug", "login"));
        assert!(!is_open_match("Login notes", "login"));
    }

    #[test]
    fn complete_swaps_marker_in_place() {
        assert_eq!(complete("  - [ ] ship it"), "  - [x] ship it");
    }

    #[test]
    fn task_text_strips_marker() {
        assert_eq!(task_text("- [ ] review PR"), "review PR");
        assert_eq!(task_text("  - [ ]   indented  "), "indented");
        assert_eq!(open_task_line(" review PR "), "- [ ] review PR");
    }

    #[test]
    fn nested_task_flattens_to_top_level() {
        assert_eq!(open_task_line(task_text("    - [ ] sub step")), "- [ ] sub step");
    }

    #[test]
    fn carried_annotation_is_not_stacked() {
        assert_eq!(
            carried_from("review PR", "2025-10-24"),
            "review PR (carried from 2025-10-24)"
        );
        assert_eq!(
            carried_from("review PR (carried from 2025-10-23)", "2025-10-24"),
            "review PR (carried from 2025-10-24)"
        );
    }
}
