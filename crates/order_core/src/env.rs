//! Ambient lookups the editor depends on.
//!
//! # Responsibility
//! - Resolve the current user, git branch, and today's date behind one trait
//!   so editor logic stays testable without OS or git state.
//!
//! # Invariants
//! - Lookups never fail: they fall back to a usable default.
//! - Branch detection is bounded by [`BRANCH_LOOKUP_TIMEOUT`].

use log::debug;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Upper bound for the `git rev-parse` subprocess.
pub const BRANCH_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

const USER_ENV_KEYS: [&str; 4] = ["LOGNAME", "USER", "LNAME", "USERNAME"];
const UNKNOWN_USER: &str = "unknown";

/// Capability for user/branch/date lookups.
pub trait Environment {
    /// Login name of the person writing notes.
    fn current_user(&self) -> String;
    /// Checked-out branch of the repository containing `repo_dir`, or empty.
    fn current_branch(&self, repo_dir: &Path) -> String;
    /// Today's date as `YYYY-MM-DD`.
    fn today(&self) -> String;
}

impl<T: Environment + ?Sized> Environment for &T {
    fn current_user(&self) -> String {
        (**self).current_user()
    }

    fn current_branch(&self, repo_dir: &Path) -> String {
        (**self).current_branch(repo_dir)
    }

    fn today(&self) -> String {
        (**self).today()
    }
}

impl<T: Environment + ?Sized> Environment for Box<T> {
    fn current_user(&self) -> String {
        (**self).current_user()
    }

    fn current_branch(&self, repo_dir: &Path) -> String {
        (**self).current_branch(repo_dir)
    }

    fn today(&self) -> String {
        (**self).today()
    }
}

/// Process environment, `git`, and the local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn current_user(&self) -> String {
        USER_ENV_KEYS
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN_USER.to_string())
    }

    fn current_branch(&self, repo_dir: &Path) -> String {
        match git_branch(repo_dir, BRANCH_LOOKUP_TIMEOUT) {
            Some(branch) => branch,
            None => {
                debug!("event=branch_lookup module=env status=fallback branch=empty");
                String::new()
            }
        }
    }

    fn today(&self) -> String {
        chrono::Local::now().format("%Y-%m-%d").to_string()
    }
}

/// Fixed answers for tests and scripted callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEnvironment {
    pub user: String,
    pub branch: String,
    pub today: String,
}

impl StaticEnvironment {
    pub fn new(user: impl Into<String>, branch: impl Into<String>, today: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            branch: branch.into(),
            today: today.into(),
        }
    }
}

impl Environment for StaticEnvironment {
    fn current_user(&self) -> String {
        self.user.clone()
    }

    fn current_branch(&self, _repo_dir: &Path) -> String {
        self.branch.clone()
    }

    fn today(&self) -> String {
        self.today.clone()
    }
}

/// Runs `git rev-parse --abbrev-ref HEAD` with a deadline.
///
/// Returns `None` on spawn failure, non-zero exit, timeout, or detached `HEAD`.
fn git_branch(repo_dir: &Path, timeout: Duration) -> Option<String> {
    let dir = if repo_dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        repo_dir
    };
    let mut child = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
            Ok(None) => std::thread::sleep(Duration::from_millis(10)),
            Err(_) => return None,
        }
    };
    if !status.success() {
        return None;
    }

    let mut output = String::new();
    child.stdout.take()?.read_to_string(&mut output).ok()?;
    let branch = output.trim();
    if branch.is_empty() || branch == "HEAD" {
        return None;
    }
    Some(branch.to_string())
}

#[cfg(test)]
mod tests {
    use super::{Environment, StaticEnvironment, SystemEnvironment};
    use std::path::Path;

    #[test]
    fn static_environment_returns_fixed_values() {
        let env = StaticEnvironment::new("ana", "main", "2025-10-24");
        let boxed: Box<dyn Environment> = Box::new(env.clone());
        assert_eq!(boxed.current_user(), "ana");
        assert_eq!(boxed.current_branch(Path::new("/nowhere")), "main");
        assert_eq!((&env).today(), "2025-10-24");
    }

    #[test]
    fn branch_lookup_outside_a_repo_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let branch = SystemEnvironment.current_branch(&dir.path().join("missing"));
        assert_eq!(branch, "");
    }

    #[test]
    fn system_today_is_a_valid_date() {
        let today = SystemEnvironment.today();
        assert!(crate::model::validate::validate_date(&today).is_ok());
    }
}
