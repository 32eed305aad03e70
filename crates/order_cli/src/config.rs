//! Process configuration for the `order` binary.
//!
//! # Responsibility
//! - Resolve which notes file an invocation edits.
//! - Decide whether file logging is enabled, and at which level.
//!
//! # Invariants
//! - Configuration comes from the environment only; there is no config file.
//! - Values are read through a lookup closure so callers can inject them.
//! - Every resolved path is absolute when `cwd` is absolute.

use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for when no override is set.
pub const NOTES_FILE_NAME: &str = "dev-notes.md";
/// Explicit notes file path; relative values resolve against `cwd`.
pub const ENV_NOTES_FILE: &str = "ORDER_NOTES_FILE";
/// Directory for rotating log files. Logging stays off when unset.
pub const ENV_LOG_DIR: &str = "ORDER_LOG_DIR";
/// `trace|debug|info|warn|error`.
pub const ENV_LOG_LEVEL: &str = "ORDER_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub notes_path: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env(cwd: &Path) -> Self {
        Self::from_lookup(cwd, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(cwd: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let notes_path = match value(ENV_NOTES_FILE) {
            Some(path) => cwd.join(path),
            None => discover_notes_file(cwd),
        };
        let log_dir = value(ENV_LOG_DIR).map(|dir| cwd.join(dir));
        let log_level =
            value(ENV_LOG_LEVEL).unwrap_or_else(|| order_core::default_log_level().to_string());

        Self {
            notes_path,
            log_dir,
            log_level,
        }
    }
}

/// Nearest `dev-notes.md` in `start` or one of its ancestors, falling back to
/// `start/dev-notes.md` (created on first use).
pub fn discover_notes_file(start: &Path) -> PathBuf {
    walk_up(start, NOTES_FILE_NAME).unwrap_or_else(|| start.join(NOTES_FILE_NAME))
}

fn walk_up(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(name);
        if fs::metadata(&candidate).is_ok_and(|meta| meta.is_file()) {
            return Some(candidate);
        }
        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{discover_notes_file, Config, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_NOTES_FILE};
    use std::collections::HashMap;
    use std::fs;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn discovery_walks_up_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("dev-notes.md"), "# Dev Notes\n").unwrap();

        assert_eq!(discover_notes_file(&nested), dir.path().join("dev-notes.md"));
    }

    #[test]
    fn discovery_ignores_directories_named_like_the_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("dev-notes.md")).unwrap();
        let nested = dir.path().join("sub");
        fs::create_dir(&nested).unwrap();

        let found = discover_notes_file(&nested);
        assert_ne!(found, dir.path().join("dev-notes.md"));
    }

    #[test]
    fn notes_file_override_wins_and_resolves_against_cwd() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("dev-notes.md"), "# Dev Notes\n").unwrap();

        let config = Config::from_lookup(dir.path(), lookup(&[(ENV_NOTES_FILE, "docs/notes.md")]));
        assert_eq!(config.notes_path, dir.path().join("docs/notes.md"));

        let absolute = dir.path().join("elsewhere.md");
        let config = Config::from_lookup(
            dir.path(),
            lookup(&[(ENV_NOTES_FILE, absolute.to_str().unwrap())]),
        );
        assert_eq!(config.notes_path, absolute);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::from_lookup(
            dir.path(),
            lookup(&[(ENV_NOTES_FILE, "  "), (ENV_LOG_DIR, ""), (ENV_LOG_LEVEL, " ")]),
        );

        assert!(config.notes_path.ends_with("dev-notes.md"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, order_core::default_log_level());
    }

    #[test]
    fn logging_settings_are_read() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::from_lookup(
            dir.path(),
            lookup(&[(ENV_LOG_DIR, "logs"), (ENV_LOG_LEVEL, "warn")]),
        );

        assert_eq!(config.log_dir, Some(dir.path().join("logs")));
        assert_eq!(config.log_level, "warn");
    }
}
