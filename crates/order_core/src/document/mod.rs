//! Line-preserving tree over the notes markdown file.
//!
//! # Responsibility
//! - Parse raw file content into `Document -> Section -> Subsection -> Block`.
//! - Locate and create date sections, user subsections, and typed blocks.
//! - Address individual content lines for task edits.
//!
//! # Invariants
//! - `Document::parse(text).to_content() == text` for every input.
//! - Any line starting with `## ` opens a new section; `### ` opens a
//!   subsection; `#### ` opens a block inside the current subsection.
//! - Lookups return the first match in file order.

pub mod task;

use crate::model::section::SectionType;
use crate::model::validate::validate_date;

/// Top-level header written into new files.
pub const DOCUMENT_HEADER: &str = "# Dev Notes";
/// Heading of the persistent project context section.
pub const PROJECT_CONTEXT_HEADING: &str = "## Project Context";
/// Heading of the undated backlog section.
pub const BACKLOG_HEADING: &str = "## Backlog";
/// Placeholder body line written by a fresh skeleton.
pub const CONTEXT_PLACEHOLDER: &str =
    "*Add project-level context, goals, and background information here.*";

/// What a `## ` heading denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    ProjectContext,
    Backlog,
    /// Calendar day, holding the `YYYY-MM-DD` key.
    Date(String),
    /// Any other `## ` heading; kept verbatim.
    Other,
}

impl SectionKind {
    fn classify(heading: &str) -> Self {
        let title = heading.strip_prefix("## ").unwrap_or(heading).trim_end();
        match title {
            "Project Context" => return Self::ProjectContext,
            "Backlog" => return Self::Backlog,
            _ => {}
        }

        let (key, rest) = title.split_once(' ').unwrap_or((title, ""));
        let legacy_suffix = rest.is_empty() || rest.trim_start().starts_with("(@");
        if legacy_suffix && validate_date(key).is_ok() {
            Self::Date(key.to_string())
        } else {
            Self::Other
        }
    }
}

/// Storage slot that owns a run of plain (non-heading) lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Preamble,
    SectionBody(usize),
    SubsectionBody(usize, usize),
    Block(usize, usize, usize),
}

impl Container {
    /// Index of the enclosing `## ` section, if any.
    pub fn section(self) -> Option<usize> {
        match self {
            Self::Preamble => None,
            Self::SectionBody(s) | Self::SubsectionBody(s, _) | Self::Block(s, _, _) => Some(s),
        }
    }
}

/// Position of one content line inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRef {
    pub container: Container,
    pub index: usize,
}

/// `#### ` block inside a user subsection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub heading: String,
    /// `None` for headings outside the Todo/Notes/Ideas set.
    pub kind: Option<SectionType>,
    pub lines: Vec<String>,
}

impl Block {
    fn open(heading: String) -> Self {
        let kind = heading
            .strip_prefix("#### ")
            .and_then(|title| title.trim_end().parse().ok());
        Self {
            heading,
            kind,
            lines: Vec::new(),
        }
    }

    fn with_content(kind: SectionType, content: &str) -> Self {
        let mut lines = content_lines(content);
        lines.push(String::new());
        Self {
            heading: kind.heading(),
            kind: Some(kind),
            lines,
        }
    }
}

/// `### ` subsection attributing content to one contributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    pub heading: String,
    pub body: Vec<String>,
    pub blocks: Vec<Block>,
}

impl Subsection {
    fn open(heading: String) -> Self {
        Self {
            heading,
            body: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Appends to the matching block, or adds a new block at the end.
    fn append(&mut self, kind: SectionType, content: &str) {
        match self.blocks.iter_mut().find(|block| block.kind == Some(kind)) {
            Some(block) => insert_before_trailing_blanks(&mut block.lines, content_lines(content)),
            None => self.blocks.push(Block::with_content(kind, content)),
        }
    }

    fn tail_mut(&mut self) -> &mut Vec<String> {
        match self.blocks.last_mut() {
            Some(block) => &mut block.lines,
            None => &mut self.body,
        }
    }
}

/// `## ` section and everything up to the next `## ` heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub kind: SectionKind,
    pub body: Vec<String>,
    pub subsections: Vec<Subsection>,
}

impl Section {
    fn open(heading: String) -> Self {
        Self {
            kind: SectionKind::classify(&heading),
            heading,
            body: Vec::new(),
            subsections: Vec::new(),
        }
    }

    /// Date key when this is a date section.
    pub fn date(&self) -> Option<&str> {
        match &self.kind {
            SectionKind::Date(date) => Some(date.as_str()),
            _ => None,
        }
    }

    /// Whether this section is keyed by `date`, allowing a legacy `(@user)` suffix.
    pub fn is_date(&self, date: &str) -> bool {
        self.date() == Some(date)
    }

    /// Every line of the section, heading first.
    pub fn lines(&self) -> Vec<&str> {
        let mut out = vec![self.heading.as_str()];
        out.extend(self.body.iter().map(String::as_str));
        for subsection in &self.subsections {
            out.push(subsection.heading.as_str());
            out.extend(subsection.body.iter().map(String::as_str));
            for block in &subsection.blocks {
                out.push(block.heading.as_str());
                out.extend(block.lines.iter().map(String::as_str));
            }
        }
        out
    }

    fn tail_mut(&mut self) -> &mut Vec<String> {
        match self.subsections.last_mut() {
            Some(subsection) => subsection.tail_mut(),
            None => &mut self.body,
        }
    }
}

/// Parsed notes file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Lines before the first `## ` heading, including the `# ` header.
    pub preamble: Vec<String>,
    pub sections: Vec<Section>,
}

impl Document {
    /// Splits `content` on `\n` and builds the section tree.
    pub fn parse(content: &str) -> Self {
        let mut doc = Self::default();
        for raw in content.split('\n') {
            let line = raw.to_string();
            if line.starts_with("## ") {
                doc.sections.push(Section::open(line));
                continue;
            }
            let Some(section) = doc.sections.last_mut() else {
                doc.preamble.push(line);
                continue;
            };
            if line.starts_with("### ") {
                section.subsections.push(Subsection::open(line));
                continue;
            }
            let Some(subsection) = section.subsections.last_mut() else {
                section.body.push(line);
                continue;
            };
            if line.starts_with("#### ") {
                subsection.blocks.push(Block::open(line));
                continue;
            }
            match subsection.blocks.last_mut() {
                Some(block) => block.lines.push(line),
                None => subsection.body.push(line),
            }
        }
        doc
    }

    /// Every line in file order.
    pub fn lines(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.preamble.iter().map(String::as_str).collect();
        for section in &self.sections {
            out.extend(section.lines());
        }
        out
    }

    /// Serializes back to file content.
    pub fn to_content(&self) -> String {
        self.lines().join("\n")
    }

    /// First section keyed by `date`.
    pub fn date_section(&self, date: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.is_date(date))
    }

    /// First section of the given kind.
    pub fn section_of(&self, kind: &SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| &section.kind == kind)
    }

    /// Adds `content` under `date` / `author_heading` / `kind`, creating any
    /// missing level.
    pub fn add_entry(&mut self, date: &str, kind: SectionType, content: &str, author_heading: &str) {
        let Some(index) = self.sections.iter().position(|s| s.is_date(date)) else {
            let mut subsection = Subsection::open(author_heading.to_string());
            subsection.blocks.push(Block::with_content(kind, content));
            let section = Section {
                heading: format!("## {date}"),
                kind: SectionKind::Date(date.to_string()),
                body: vec![String::new()],
                subsections: vec![subsection],
            };
            let at = self.date_insert_index();
            self.insert_section(at, section);
            return;
        };

        let section = &mut self.sections[index];
        match section
            .subsections
            .iter_mut()
            .find(|subsection| subsection.heading == author_heading)
        {
            Some(subsection) => subsection.append(kind, content),
            None => {
                ensure_trailing_blank(section.tail_mut());
                let mut subsection = Subsection::open(author_heading.to_string());
                subsection.blocks.push(Block::with_content(kind, content));
                section.subsections.push(subsection);
            }
        }
    }

    /// Index of the Project Context section, creating it at the top if absent.
    pub fn ensure_project_context(&mut self) -> usize {
        if let Some(index) = self.position_of(&SectionKind::ProjectContext) {
            return index;
        }
        let section = Section {
            heading: PROJECT_CONTEXT_HEADING.to_string(),
            kind: SectionKind::ProjectContext,
            body: Vec::new(),
            subsections: Vec::new(),
        };
        self.insert_section(0, section);
        0
    }

    /// Index of the Backlog section, creating it right after Project Context
    /// (or at the top) if absent.
    pub fn ensure_backlog(&mut self) -> usize {
        if let Some(index) = self.position_of(&SectionKind::Backlog) {
            return index;
        }
        let at = self
            .position_of(&SectionKind::ProjectContext)
            .map_or(0, |index| index + 1);
        let section = Section {
            heading: BACKLOG_HEADING.to_string(),
            kind: SectionKind::Backlog,
            body: Vec::new(),
            subsections: Vec::new(),
        };
        self.insert_section(at, section);
        at
    }

    /// Appends lines to a section body, ahead of its trailing blank lines.
    pub fn append_to_body(&mut self, index: usize, content: &str) {
        let body = &mut self.sections[index].body;
        insert_before_trailing_blanks(body, content_lines(content));
        ensure_trailing_blank(body);
    }

    /// First content line (never a heading) accepted by `matches`, which also
    /// sees the enclosing section.
    pub fn find_line<F>(&self, mut matches: F) -> Option<LineRef>
    where
        F: FnMut(Option<&Section>, &str) -> bool,
    {
        for (container, lines) in self.containers() {
            let section = container.section().map(|index| &self.sections[index]);
            if let Some(index) = lines.iter().position(|line| matches(section, line)) {
                return Some(LineRef { container, index });
            }
        }
        None
    }

    pub fn line(&self, at: LineRef) -> &str {
        self.container(at.container)[at.index].as_str()
    }

    pub fn replace_line(&mut self, at: LineRef, line: String) {
        self.container_mut(at.container)[at.index] = line;
    }

    pub fn remove_line(&mut self, at: LineRef) -> String {
        self.container_mut(at.container).remove(at.index)
    }

    fn containers(&self) -> Vec<(Container, &[String])> {
        let mut out: Vec<(Container, &[String])> =
            vec![(Container::Preamble, self.preamble.as_slice())];
        for (s, section) in self.sections.iter().enumerate() {
            out.push((Container::SectionBody(s), section.body.as_slice()));
            for (u, subsection) in section.subsections.iter().enumerate() {
                out.push((Container::SubsectionBody(s, u), subsection.body.as_slice()));
                for (b, block) in subsection.blocks.iter().enumerate() {
                    out.push((Container::Block(s, u, b), block.lines.as_slice()));
                }
            }
        }
        out
    }

    fn container(&self, container: Container) -> &Vec<String> {
        match container {
            Container::Preamble => &self.preamble,
            Container::SectionBody(s) => &self.sections[s].body,
            Container::SubsectionBody(s, u) => &self.sections[s].subsections[u].body,
            Container::Block(s, u, b) => &self.sections[s].subsections[u].blocks[b].lines,
        }
    }

    fn container_mut(&mut self, container: Container) -> &mut Vec<String> {
        match container {
            Container::Preamble => &mut self.preamble,
            Container::SectionBody(s) => &mut self.sections[s].body,
            Container::SubsectionBody(s, u) => &mut self.sections[s].subsections[u].body,
            Container::Block(s, u, b) => &mut self.sections[s].subsections[u].blocks[b].lines,
        }
    }

    fn position_of(&self, kind: &SectionKind) -> Option<usize> {
        self.sections.iter().position(|section| &section.kind == kind)
    }

    /// New days go after the leading Project Context / Backlog sections so the
    /// newest date sits on top.
    fn date_insert_index(&self) -> usize {
        let mut at = 0;
        for (index, section) in self.sections.iter().enumerate() {
            match section.kind {
                SectionKind::ProjectContext | SectionKind::Backlog => at = index + 1,
                SectionKind::Date(_) => break,
                SectionKind::Other => {}
            }
        }
        at
    }

    fn insert_section(&mut self, at: usize, mut section: Section) {
        let previous = if at == 0 {
            &mut self.preamble
        } else {
            self.sections[at - 1].tail_mut()
        };
        if !previous.is_empty() {
            // exactly one blank line between the previous content and the new heading
            let keep = previous.len() - trailing_blank_count(previous);
            previous.truncate(keep);
            previous.push(String::new());
        }
        if at < self.sections.len() {
            ensure_trailing_blank(section.tail_mut());
        }
        self.sections.insert(at, section);
    }
}

fn content_lines(content: &str) -> Vec<String> {
    content.lines().map(str::to_string).collect()
}

fn trailing_blank_count(lines: &[String]) -> usize {
    lines
        .iter()
        .rev()
        .take_while(|line| line.trim().is_empty())
        .count()
}

fn insert_before_trailing_blanks(lines: &mut Vec<String>, new_lines: Vec<String>) {
    let at = lines.len() - trailing_blank_count(lines);
    lines.splice(at..at, new_lines);
}

fn ensure_trailing_blank(lines: &mut Vec<String>) {
    if lines.last().map_or(true, |line| !line.trim().is_empty()) {
        lines.push(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::{Container, Document, SectionKind};
    use crate::model::section::SectionType;

    const SAMPLE: &str = "# Dev Notes\n\n## Project Context\n\nctx\n\n## 2025-10-24\n\n### ana-main (@ana)\n#### Todo\n- [ ] New task\n\n## 2025-10-23 (@ana)\n### Todo\n- [ ] Old task\n";

    #[test]
    fn parse_then_serialize_is_lossless() {
        for input in [SAMPLE, "", "# Dev Notes", "no header\n\n\n", "## 2025-10-24"] {
            assert_eq!(Document::parse(input).to_content(), input);
        }
    }

    #[test]
    fn classifies_headings() {
        let doc = Document::parse(SAMPLE);
        let kinds: Vec<_> = doc.sections.iter().map(|s| s.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::ProjectContext,
                SectionKind::Date("2025-10-24".to_string()),
                SectionKind::Date("2025-10-23".to_string()),
            ]
        );
        assert!(doc.date_section("2025-10-23").is_some());
        assert!(doc.date_section("2025-10-2").is_none());
    }

    #[test]
    fn legacy_level_three_type_heading_is_a_subsection() {
        let doc = Document::parse(SAMPLE);
        let legacy = doc.date_section("2025-10-23").unwrap();
        assert_eq!(legacy.subsections[0].heading, "### Todo");
        assert_eq!(legacy.subsections[0].body[0], "- [ ] Old task");
    }

    #[test]
    fn new_date_lands_after_project_context() {
        let mut doc = Document::parse(SAMPLE);
        doc.add_entry("2025-10-25", SectionType::Notes, "fresh", "### bo (@bo)");
        let content = doc.to_content();
        let context = content.find("## Project Context").unwrap();
        let newest = content.find("## 2025-10-25").unwrap();
        let older = content.find("## 2025-10-24").unwrap();
        assert!(context < newest && newest < older);
        assert!(content.contains("## 2025-10-25\n\n### bo (@bo)\n#### Notes\nfresh\n\n## 2025-10-24"));
    }

    #[test]
    fn titled_heading_after_a_date_is_not_that_date() {
        let mut doc = Document::parse("# Dev Notes\n\n## 2025-10-24 retro\n\nwent well\n");
        assert_eq!(doc.sections[0].kind, SectionKind::Other);
        assert!(!doc.sections[0].is_date("2025-10-24"));
        assert!(doc.date_section("2025-10-24").is_none());

        doc.add_entry("2025-10-24", SectionType::Todo, "- [ ] ship", "### ana-main (@ana)");
        let content = doc.to_content();
        assert!(content.contains("## 2025-10-24\n\n### ana-main (@ana)\n#### Todo\n- [ ] ship\n"));
        assert!(content.contains("## 2025-10-24 retro\n\nwent well\n"));
        assert_eq!(doc.date_section("2025-10-24").map(|s| s.heading.as_str()), Some("## 2025-10-24"));
    }

    #[test]
    fn find_line_reports_enclosing_section() {
        let doc = Document::parse(SAMPLE);
        let found = doc
            .find_line(|_, line| line.contains("Old task"))
            .unwrap();
        assert_eq!(found.container.section(), Some(2));
        assert!(matches!(found.container, Container::SubsectionBody(2, 0)));
        assert_eq!(doc.line(found), "- [ ] Old task");
    }
}
