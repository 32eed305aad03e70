//! `install-hooks`: a git pre-commit hook that stages the notes file.
//!
//! # Invariants
//! - Hooks written here carry [`HOOK_MARKER`]; a hook without it belongs to
//!   someone else and is never overwritten.
//! - Re-installing an unchanged hook is a no-op.

use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Identifies a pre-commit hook written by `order`.
pub const HOOK_MARKER: &str = "# managed-by: order";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookInstall {
    Created,
    Updated,
    Unchanged,
}

/// Writes `pre-commit` into the hooks directory of the repository containing
/// `repo_dir`. Returns the hook path and what happened to it.
pub fn install_pre_commit(repo_dir: &Path, notes_path: &Path) -> Result<(PathBuf, HookInstall), String> {
    let hooks_dir = hooks_dir(repo_dir)?;
    fs::create_dir_all(&hooks_dir)
        .map_err(|err| format!("failed to create {}: {err}", hooks_dir.display()))?;

    let hook_path = hooks_dir.join("pre-commit");
    let script = hook_script(notes_path);
    let outcome = match fs::read(&hook_path) {
        Ok(existing) if existing == script.as_bytes() => HookInstall::Unchanged,
        Ok(existing) if carries_marker(&existing) => HookInstall::Updated,
        Ok(_) => {
            warn!("event=hook_install module=hooks status=refused reason=foreign_hook");
            return Err(format!(
                "{} already exists and was not installed by order; add `git add` for the notes file to it manually",
                hook_path.display()
            ));
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => HookInstall::Created,
        Err(err) => {
            warn!("event=hook_install module=hooks status=error reason=unreadable_hook");
            return Err(format!("cannot read {}: {err}", hook_path.display()));
        }
    };

    if outcome != HookInstall::Unchanged {
        fs::write(&hook_path, &script)
            .map_err(|err| format!("failed to write {}: {err}", hook_path.display()))?;
    }
    make_executable(&hook_path)?;
    info!("event=hook_install module=hooks status=ok outcome={outcome:?}");
    Ok((hook_path, outcome))
}

/// Hook bytes need not be UTF-8; the marker line is matched on a lossy decode.
fn carries_marker(hook: &[u8]) -> bool {
    String::from_utf8_lossy(hook)
        .lines()
        .any(|line| line.trim() == HOOK_MARKER)
}

/// Resolves `git rev-parse --git-path hooks`, which honours `core.hooksPath`
/// and worktrees.
fn hooks_dir(repo_dir: &Path) -> Result<PathBuf, String> {
    let output = Command::new("git")
        .args(["rev-parse", "--git-path", "hooks"])
        .current_dir(repo_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|err| format!("git: {err}"))?;
    if !output.status.success() {
        return Err("not a git repository".to_string());
    }

    let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if raw.is_empty() {
        return Err("git did not report a hooks directory".to_string());
    }
    Ok(repo_dir.join(raw))
}

fn hook_script(notes_path: &Path) -> String {
    let quoted = shell_quote(&notes_path.to_string_lossy());
    format!(
        "#!/bin/sh\n{HOOK_MARKER}\n# Stages the dev notes file with every commit.\nNOTES_FILE={quoted}\nif [ -f \"$NOTES_FILE\" ]; then\n    git add \"$NOTES_FILE\"\nfi\n"
    )
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), String> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|err| format!("failed to mark {} executable: {err}", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), String> {
    Ok(())
}
