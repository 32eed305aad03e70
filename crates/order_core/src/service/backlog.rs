//! Backlog and project context sections.

use super::{log_outcome, EntryOverrides, NotesEditor};
use crate::document::task::{is_open_match, open_task_line, task_text};
use crate::document::{Container, LineRef, SectionKind, CONTEXT_PLACEHOLDER};
use crate::env::Environment;
use crate::error::{NotesError, NotesResult};
use crate::model::section::SectionType;
use crate::model::validate::{validate_date, validate_nonempty, validate_search};
use std::time::Instant;

impl<E: Environment> NotesEditor<E> {
    /// Appends an open task to `## Backlog`, creating the section after
    /// Project Context when absent.
    pub fn add_backlog_task(&self, text: &str) -> NotesResult<()> {
        let started_at = Instant::now();
        let result = self.append_backlog(text);
        log_outcome("backlog_add", started_at, result)
    }

    /// Moves the first open backlog task containing `partial` into today's
    /// Todo block. Returns the promoted task text.
    pub fn promote_backlog_task(&self, partial: &str) -> NotesResult<String> {
        let started_at = Instant::now();
        let result = self.promote_first(partial);
        log_outcome("backlog_promote", started_at, result)
    }

    /// Backlog section text, heading included; empty when there is none.
    pub fn get_backlog(&self) -> NotesResult<String> {
        self.section_text(&SectionKind::Backlog)
    }

    /// Project Context section text, heading included; empty when there is none.
    pub fn get_project_context(&self) -> NotesResult<String> {
        self.section_text(&SectionKind::ProjectContext)
    }

    /// Appends `text` to `## Project Context`, replacing the skeleton
    /// placeholder on first use.
    pub fn add_project_context(&self, text: &str) -> NotesResult<()> {
        let started_at = Instant::now();
        let result = self.append_context(text);
        log_outcome("context_add", started_at, result)
    }

    fn append_backlog(&self, text: &str) -> NotesResult<()> {
        validate_nonempty(text)?;
        let mut doc = self.load()?;
        let index = doc.ensure_backlog();
        doc.append_to_body(index, &open_task_line(text));
        self.save(&doc)
    }

    fn promote_first(&self, partial: &str) -> NotesResult<String> {
        validate_search(partial)?;
        let today = self.today();
        validate_date(&today)?;

        let mut doc = self.load()?;
        let found = doc
            .find_line(|section, line| {
                section.is_some_and(|s| s.kind == SectionKind::Backlog) && is_open_match(line, partial)
            })
            .ok_or_else(|| NotesError::TaskNotFound(partial.to_string()))?;

        let removed = doc.remove_line(found);
        let promoted = task_text(&removed).to_string();
        let heading = self.author_heading(&EntryOverrides::default());
        doc.add_entry(&today, SectionType::Todo, &open_task_line(&promoted), &heading);
        self.save(&doc)?;
        Ok(promoted)
    }

    fn append_context(&self, text: &str) -> NotesResult<()> {
        validate_nonempty(text)?;
        let mut doc = self.load()?;
        let index = doc.ensure_project_context();
        let placeholder = doc.sections[index]
            .body
            .iter()
            .position(|line| line.trim() == CONTEXT_PLACEHOLDER)
            .map(|line| LineRef {
                container: Container::SectionBody(index),
                index: line,
            });
        match placeholder {
            Some(at) => doc.replace_line(at, text.trim().to_string()),
            None => doc.append_to_body(index, text.trim()),
        }
        self.save(&doc)
    }

    fn section_text(&self, kind: &SectionKind) -> NotesResult<String> {
        let doc = self.load()?;
        let Some(section) = doc.section_of(kind) else {
            return Ok(String::new());
        };
        let lines = section.lines();
        let keep = lines
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .map_or(0, |last| last + 1);
        Ok(lines[..keep].join("\n"))
    }
}
