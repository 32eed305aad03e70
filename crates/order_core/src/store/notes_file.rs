//! Whole-file read/create/write for `dev-notes.md`.

use crate::error::{NotesError, NotesResult};
use log::{error, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Content written by [`NotesFile::create`].
pub const NOTES_SKELETON: &str = "# Dev Notes\n\n## Project Context\n\n*Add project-level context, goals, and background information here.*\n\n";

/// Handle to the notes file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesFile {
    path: PathBuf,
}

impl NotesFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the file; `.` for a bare file name.
    pub fn dir(&self) -> PathBuf {
        parent_dir(&self.path)
    }

    /// Reads the whole file as UTF-8 text.
    ///
    /// # Errors
    /// - `FileNotFound` when the file does not exist yet.
    /// - `PermissionDenied` / `Io` for other filesystem failures.
    pub fn read(&self) -> NotesResult<String> {
        fs::read_to_string(&self.path).map_err(|err| NotesError::from_io(&self.path, err))
    }

    /// Writes the initial skeleton, replacing any existing content.
    pub fn create(&self) -> NotesResult<()> {
        self.write(NOTES_SKELETON)?;
        info!(
            "event=notes_create module=store status=ok path={}",
            self.path.display()
        );
        Ok(())
    }

    /// Replaces the file content.
    ///
    /// Content is staged in a sibling temp file and renamed over the target;
    /// readers see either the old or the new content. A read-only target is
    /// refused up front. An existing file's permissions carry over. A symlinked
    /// path is written through to its target; the link itself stays.
    ///
    /// # Errors
    /// - `PermissionDenied` when the target is read-only or the directory is
    ///   not writable.
    /// - `Io` for any other filesystem failure.
    pub fn write(&self, content: &str) -> NotesResult<()> {
        let started_at = Instant::now();
        let result = self.write_staged(content);
        match &result {
            Ok(()) => info!(
                "event=notes_write module=store status=ok bytes={} duration_ms={}",
                content.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=notes_write module=store status=error duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        result
    }

    /// Real file behind `path`, following symlinks; `path` itself when
    /// nothing exists there yet.
    fn resolve_target(&self) -> NotesResult<PathBuf> {
        match fs::canonicalize(&self.path) {
            Ok(real) => Ok(real),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(self.path.clone()),
            Err(err) => Err(NotesError::from_io(&self.path, err)),
        }
    }

    fn write_staged(&self, content: &str) -> NotesResult<()> {
        let target = self.resolve_target()?;
        let existing = match fs::metadata(&target) {
            Ok(meta) => Some(meta),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => return Err(NotesError::from_io(&self.path, err)),
        };
        if existing
            .as_ref()
            .is_some_and(|meta| meta.permissions().readonly())
        {
            return Err(NotesError::PermissionDenied(self.path.clone()));
        }

        let dir = parent_dir(&target);
        let mut staged =
            NamedTempFile::new_in(&dir).map_err(|err| NotesError::from_io(&dir, err))?;
        staged
            .write_all(content.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| NotesError::from_io(staged.path(), err))?;
        if let Some(meta) = existing {
            fs::set_permissions(staged.path(), meta.permissions())
                .map_err(|err| NotesError::from_io(staged.path(), err))?;
        }
        staged
            .persist(&target)
            .map_err(|err| NotesError::from_io(&target, err.error))?;
        Ok(())
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
