//! Command-line surface for the `order` dev-notes editor.
//!
//! # Responsibility
//! - Map argv onto `order_core` editor operations.
//! - Render each outcome as one human-readable message plus an exit code.
//!
//! # Invariants
//! - Every message goes to stdout; exit code is 0 on success and 1 on failure.
//! - A missing notes file is created from the skeleton and the command retried.

pub mod config;
pub mod hooks;

mod commands;

use log::info;
use order_core::Environment;
use std::path::PathBuf;
use std::time::Instant;

/// Captured result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub(crate) fn ok(message: impl Into<String>) -> Self {
        Self {
            stdout: with_newline(message.into()),
            exit_code: 0,
        }
    }

    pub(crate) fn fail(message: impl Into<String>) -> Self {
        Self {
            stdout: with_newline(message.into()),
            exit_code: 1,
        }
    }
}

fn with_newline(mut message: String) -> String {
    if !message.ends_with('\n') {
        message.push('\n');
    }
    message
}

/// Everything a command needs besides its arguments.
pub struct CliContext {
    pub notes_path: PathBuf,
    /// Directory the command was started from; `install-hooks` targets its repo.
    pub cwd: PathBuf,
    pub env: Box<dyn Environment>,
}

impl CliContext {
    pub fn new(notes_path: PathBuf, cwd: PathBuf, env: Box<dyn Environment>) -> Self {
        Self {
            notes_path,
            cwd,
            env,
        }
    }
}

pub(crate) fn help_text() -> String {
    "\
order keeps tasks, notes, and ideas in a dev-notes.md file, grouped by day.

Usage:
  order <command> [arguments]

Commands:
  add <title> [--branch B]    Add a task to today's Todo list
  note <text> [--branch B]    Add a note to today's section
  idea <text> [--branch B]    Add an idea to today's section
  list                        Print the whole notes file
  today                       Show today's section
  done <partial>              Mark the first open task containing <partial> as complete
  delete <partial>            Delete the first open task containing <partial>
  carry <partial>             Move an open task from an earlier day to today
  search <query>              Print every line containing <query>
  context [text|show]         Add to or show the Project Context section
  backlog [task]              Add a task to the Backlog, or show it
  promote <partial>           Move a Backlog task to today
  install-hooks               Install a git pre-commit hook that stages the notes file
  help                        Show this help

Flags:
  -h, --help       help for order
  -v, --version    version for order

Environment:
  ORDER_NOTES_FILE   notes file to use instead of the nearest dev-notes.md
  ORDER_LOG_DIR      enable rotating file logs in this directory
  ORDER_LOG_LEVEL    trace|debug|info|warn|error
"
    .to_string()
}

/// Runs one invocation; `args` excludes the program name.
pub fn run(args: &[&str], ctx: &CliContext) -> CommandOutput {
    let Some((cmd, rest)) = args.split_first() else {
        return CommandOutput::ok(help_text());
    };

    let started_at = Instant::now();
    let (name, out) = match *cmd {
        "help" | "-h" | "--help" => ("help", CommandOutput::ok(help_text())),
        "--version" | "-v" => (
            "version",
            CommandOutput::ok(format!("order version {}", order_core::core_version())),
        ),
        "add" => ("add", commands::add(rest, ctx)),
        "note" => ("note", commands::note(rest, ctx)),
        "idea" => ("idea", commands::idea(rest, ctx)),
        "list" => ("list", commands::list(ctx)),
        "today" => ("today", commands::today(ctx)),
        "done" => ("done", commands::done(rest, ctx)),
        "delete" => ("delete", commands::delete(rest, ctx)),
        "carry" => ("carry", commands::carry(rest, ctx)),
        "search" => ("search", commands::search(rest, ctx)),
        "context" => ("context", commands::context(rest, ctx)),
        "backlog" => ("backlog", commands::backlog(rest, ctx)),
        "promote" => ("promote", commands::promote(rest, ctx)),
        "install-hooks" => ("install-hooks", commands::install_hooks(ctx)),
        other => (
            "unknown",
            CommandOutput::fail(format!(
                "Error: unknown command \"{other}\" for \"order\"\nRun 'order help' for usage."
            )),
        ),
    };

    info!(
        "event=cli_command module=cli command={name} exit_code={} duration_ms={}",
        out.exit_code,
        started_at.elapsed().as_millis()
    );
    out
}

pub fn run_cli(args: &[String], ctx: &CliContext) -> CommandOutput {
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    run(&refs, ctx)
}
