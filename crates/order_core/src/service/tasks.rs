//! Task completion, deletion, and carry-forward.

use super::{log_outcome, EntryOverrides, NotesEditor};
use crate::document::task::{carried_from, complete, is_open_match, open_task_line, task_text};
use crate::env::Environment;
use crate::error::{NotesError, NotesResult};
use crate::model::section::SectionType;
use crate::model::validate::{validate_date, validate_search};
use std::time::Instant;

impl<E: Environment> NotesEditor<E> {
    /// Marks the first open task containing `partial` as done.
    ///
    /// Returns the updated line.
    ///
    /// # Errors
    /// - `EmptySearch` for blank input.
    /// - `TaskNotFound` when no open task matches; the file is left untouched.
    pub fn mark_complete(&self, partial: &str) -> NotesResult<String> {
        let started_at = Instant::now();
        let result = self.complete_first(partial);
        log_outcome("task_complete", started_at, result)
    }

    /// Removes the first open task containing `partial`.
    ///
    /// Returns the removed line.
    pub fn delete_task(&self, partial: &str) -> NotesResult<String> {
        let started_at = Instant::now();
        let result = self.delete_first(partial);
        log_outcome("task_delete", started_at, result)
    }

    /// Moves the first open task containing `partial` out of its date section
    /// and into today's Todo block, annotated with the original date.
    ///
    /// Removal and re-add are persisted by a single write. Returns the carried
    /// task text, e.g. `review PR (carried from 2025-10-24)`.
    pub fn carry_forward(&self, partial: &str) -> NotesResult<String> {
        let started_at = Instant::now();
        let result = self.carry_first(partial);
        log_outcome("task_carry", started_at, result)
    }

    fn complete_first(&self, partial: &str) -> NotesResult<String> {
        validate_search(partial)?;
        let mut doc = self.load()?;
        let found = doc
            .find_line(|_, line| is_open_match(line, partial))
            .ok_or_else(|| NotesError::TaskNotFound(partial.to_string()))?;

        let updated = complete(doc.line(found));
        doc.replace_line(found, updated.clone());
        self.save(&doc)?;
        Ok(updated)
    }

    fn delete_first(&self, partial: &str) -> NotesResult<String> {
        validate_search(partial)?;
        let mut doc = self.load()?;
        let found = doc
            .find_line(|_, line| is_open_match(line, partial))
            .ok_or_else(|| NotesError::TaskNotFound(partial.to_string()))?;

        let removed = doc.remove_line(found);
        self.save(&doc)?;
        Ok(removed)
    }

    fn carry_first(&self, partial: &str) -> NotesResult<String> {
        validate_search(partial)?;
        let today = self.today();
        validate_date(&today)?;

        let mut doc = self.load()?;
        let found = doc
            .find_line(|section, line| {
                section.and_then(|s| s.date()).is_some() && is_open_match(line, partial)
            })
            .ok_or_else(|| NotesError::TaskNotFound(partial.to_string()))?;
        let origin = found
            .container
            .section()
            .and_then(|index| doc.sections[index].date())
            .map(str::to_string)
            .ok_or_else(|| NotesError::TaskNotFound(partial.to_string()))?;

        let removed = doc.remove_line(found);
        let carried = carried_from(task_text(&removed), &origin);
        let heading = self.author_heading(&EntryOverrides::default());
        doc.add_entry(&today, SectionType::Todo, &open_task_line(&carried), &heading);
        self.save(&doc)?;
        Ok(carried)
    }
}
