//! Date-section entries, slices, and search.

use super::log_outcome;
use crate::document::Document;
use crate::env::Environment;
use crate::error::{NotesError, NotesResult};
use crate::model::section::SectionType;
use crate::model::validate::{validate_date, validate_nonempty, validate_search, validate_section_type};
use crate::store::NotesFile;
use std::time::Instant;

/// Caller-supplied attribution that wins over environment lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryOverrides {
    pub user: Option<String>,
    pub branch: Option<String>,
}

impl EntryOverrides {
    pub fn with_branch(branch: impl Into<String>) -> Self {
        Self {
            user: None,
            branch: Some(branch.into()),
        }
    }
}

/// Read-modify-write editor bound to one notes file.
pub struct NotesEditor<E: Environment> {
    file: NotesFile,
    env: E,
}

impl<E: Environment> NotesEditor<E> {
    pub fn new(file: NotesFile, env: E) -> Self {
        Self { file, env }
    }

    pub fn file(&self) -> &NotesFile {
        &self.file
    }

    /// Today's date from the injected environment.
    pub fn today(&self) -> String {
        self.env.today()
    }

    /// Raw file content.
    pub fn read(&self) -> NotesResult<String> {
        self.file.read()
    }

    /// Lines of the first section keyed by `date`, heading included.
    ///
    /// Returns an empty list when the date has no section, and
    /// `InvalidDateFormat` before touching the file when `date` is malformed.
    pub fn extract_date_section(&self, date: &str) -> NotesResult<Vec<String>> {
        validate_date(date)?;
        let doc = self.load()?;
        Ok(doc
            .date_section(date)
            .map(|section| section.lines().into_iter().map(str::to_string).collect())
            .unwrap_or_default())
    }

    /// Validated, display-ready slice of one date.
    pub fn parse_daily_section(&self, date: &str) -> NotesResult<String> {
        Ok(self.extract_date_section(date)?.join("\n"))
    }

    /// Adds `content` to the `section_type` block of the caller's subsection
    /// under `date`, creating the date section, subsection, or block as needed.
    ///
    /// # Errors
    /// - `InvalidDateFormat`, `InvalidSectionType`, `EmptyContent` before any I/O.
    /// - Read/write errors from [`NotesFile`].
    pub fn add_to_daily_section(
        &self,
        date: &str,
        section_type: &str,
        content: &str,
        overrides: &EntryOverrides,
    ) -> NotesResult<()> {
        let started_at = Instant::now();
        let result = self.apply_entry(date, section_type, content, overrides);
        log_outcome("entry_add", started_at, result)
    }

    fn apply_entry(
        &self,
        date: &str,
        section_type: &str,
        content: &str,
        overrides: &EntryOverrides,
    ) -> NotesResult<()> {
        validate_date(date)?;
        let kind = validate_section_type(section_type)?;
        validate_nonempty(content)?;

        let mut doc = self.load()?;
        doc.add_entry(date, kind, content, &self.author_heading(overrides));
        self.save(&doc)
    }

    /// Adds `content` to today's `kind` block.
    pub fn add_today(
        &self,
        kind: SectionType,
        content: &str,
        overrides: &EntryOverrides,
    ) -> NotesResult<()> {
        self.add_to_daily_section(&self.today(), kind.as_str(), content, overrides)
    }

    /// Every line containing `query`, case-insensitively, in file order.
    ///
    /// # Errors
    /// - `EmptySearch` for a blank query.
    /// - `NoResults` when nothing matches.
    pub fn search(&self, query: &str) -> NotesResult<Vec<String>> {
        let started_at = Instant::now();
        let result = self.matching_lines(query);
        log_outcome("search", started_at, result)
    }

    fn matching_lines(&self, query: &str) -> NotesResult<Vec<String>> {
        validate_search(query)?;
        let needle = query.to_lowercase();
        let hits: Vec<String> = self
            .file
            .read()?
            .split('\n')
            .filter(|line| line.to_lowercase().contains(&needle))
            .map(str::to_string)
            .collect();
        if hits.is_empty() {
            return Err(NotesError::NoResults(query.to_string()));
        }
        Ok(hits)
    }

    pub(super) fn load(&self) -> NotesResult<Document> {
        Ok(Document::parse(&self.file.read()?))
    }

    pub(super) fn save(&self, doc: &Document) -> NotesResult<()> {
        self.file.write(&doc.to_content())
    }

    /// `### {user}-{branch} (@{user})`, or `### {user} (@{user})` without a branch.
    pub(super) fn author_heading(&self, overrides: &EntryOverrides) -> String {
        let user = overrides
            .user
            .as_deref()
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.env.current_user());
        let branch = match overrides.branch.as_deref() {
            Some(branch) => branch.trim().to_string(),
            None => self.env.current_branch(&self.file.dir()),
        };
        if branch.is_empty() {
            format!("### {user} (@{user})")
        } else {
            format!("### {user}-{branch} (@{user})")
        }
    }
}
