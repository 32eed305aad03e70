//! One adapter per subcommand, each a thin call into `NotesEditor`.

use crate::hooks::{install_pre_commit, HookInstall};
use crate::{CliContext, CommandOutput};
use order_core::document::task::open_task_line;
use order_core::{
    EntryOverrides, Environment, NotesEditor, NotesError, NotesFile, NotesResult, SectionType,
};

type Editor<'a> = NotesEditor<&'a dyn Environment>;

/// Runs `op` against the configured file. A missing notes file is created
/// from the skeleton and `op` retried once.
fn with_notes<'a, T>(
    ctx: &'a CliContext,
    op: impl Fn(&Editor<'a>) -> NotesResult<T>,
) -> NotesResult<T> {
    let env: &'a dyn Environment = &*ctx.env;
    let editor = NotesEditor::new(NotesFile::new(&ctx.notes_path), env);
    match op(&editor) {
        Err(NotesError::FileNotFound(path)) if path == ctx.notes_path => {
            editor.file().create()?;
            op(&editor)
        }
        result => result,
    }
}

#[derive(Debug, PartialEq, Eq)]
struct EntryArgs {
    text: String,
    branch: Option<String>,
}

/// Joins free words with spaces and pulls out `--branch B` / `--branch=B`.
fn entry_args(rest: &[&str]) -> Result<EntryArgs, String> {
    let mut words = Vec::new();
    let mut branch = None;
    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        if *arg == "--branch" {
            let value = iter
                .next()
                .ok_or_else(|| "--branch requires a value".to_string())?;
            branch = Some(value.to_string());
        } else if let Some(value) = arg.strip_prefix("--branch=") {
            branch = Some(value.to_string());
        } else {
            words.push(*arg);
        }
    }
    Ok(EntryArgs {
        text: words.join(" ").trim().to_string(),
        branch,
    })
}

fn add_entry(rest: &[&str], ctx: &CliContext, kind: SectionType, label: &str) -> CommandOutput {
    let args = match entry_args(rest) {
        Ok(args) => args,
        Err(err) => return CommandOutput::fail(format!("Error: {err}")),
    };
    if args.text.is_empty() {
        return CommandOutput::fail(format!("Error: {label} content cannot be empty"));
    }

    let content = match kind {
        SectionType::Todo => open_task_line(&args.text),
        SectionType::Notes | SectionType::Ideas => args.text,
    };
    let overrides = EntryOverrides {
        user: None,
        branch: args.branch,
    };
    match with_notes(ctx, |editor| editor.add_today(kind, &content, &overrides)) {
        Ok(()) => CommandOutput::ok(format!("{label} added: {content}")),
        Err(err) => CommandOutput::fail(format!("Error: {err}")),
    }
}

pub(crate) fn add(rest: &[&str], ctx: &CliContext) -> CommandOutput {
    add_entry(rest, ctx, SectionType::Todo, "Task")
}

pub(crate) fn note(rest: &[&str], ctx: &CliContext) -> CommandOutput {
    add_entry(rest, ctx, SectionType::Notes, "Note")
}

pub(crate) fn idea(rest: &[&str], ctx: &CliContext) -> CommandOutput {
    add_entry(rest, ctx, SectionType::Ideas, "Idea")
}

pub(crate) fn list(ctx: &CliContext) -> CommandOutput {
    match with_notes(ctx, |editor| editor.read()) {
        Ok(content) => CommandOutput::ok(content),
        Err(err) => CommandOutput::fail(format!("Error reading file: {err}")),
    }
}

pub(crate) fn today(ctx: &CliContext) -> CommandOutput {
    let today = ctx.env.today();
    match with_notes(ctx, |editor| editor.parse_daily_section(&today)) {
        Ok(section) if section.trim().is_empty() => {
            CommandOutput::ok(format!("No entries for {today}"))
        }
        Ok(section) => CommandOutput::ok(section.trim_end()),
        Err(err) => CommandOutput::fail(format!("Error reading today's section: {err}")),
    }
}

pub(crate) fn done(rest: &[&str], ctx: &CliContext) -> CommandOutput {
    let partial = rest.join(" ");
    match with_notes(ctx, |editor| editor.mark_complete(&partial)) {
        Ok(_) => CommandOutput::ok(format!("Task containing '{partial}' marked as complete")),
        Err(err) => CommandOutput::fail(format!("Failed to mark task as complete: {err}")),
    }
}

pub(crate) fn delete(rest: &[&str], ctx: &CliContext) -> CommandOutput {
    let partial = rest.join(" ");
    match with_notes(ctx, |editor| editor.delete_task(&partial)) {
        Ok(_) => CommandOutput::ok(format!("Task containing '{partial}' deleted")),
        Err(err) => CommandOutput::fail(format!("Failed to delete task: {err}")),
    }
}

pub(crate) fn carry(rest: &[&str], ctx: &CliContext) -> CommandOutput {
    let partial = rest.join(" ");
    match with_notes(ctx, |editor| editor.carry_forward(&partial)) {
        Ok(carried) => CommandOutput::ok(format!("Task carried forward: {carried}")),
        Err(err) => CommandOutput::fail(format!("Failed to carry task forward: {err}")),
    }
}

pub(crate) fn search(rest: &[&str], ctx: &CliContext) -> CommandOutput {
    let query = rest.join(" ");
    match with_notes(ctx, |editor| editor.search(&query)) {
        Ok(lines) => CommandOutput::ok(lines.join("\n")),
        Err(err) => CommandOutput::fail(err.to_string()),
    }
}

pub(crate) fn context(rest: &[&str], ctx: &CliContext) -> CommandOutput {
    if let [] | ["show"] = rest {
        return match with_notes(ctx, |editor| editor.get_project_context()) {
            Ok(text) if text.trim().is_empty() => CommandOutput::ok(
                "No project context yet. Add some with: order context <text>",
            ),
            Ok(text) => CommandOutput::ok(text),
            Err(err) => CommandOutput::fail(format!("Error reading project context: {err}")),
        };
    }

    let text = rest.join(" ");
    match with_notes(ctx, |editor| editor.add_project_context(&text)) {
        Ok(()) => CommandOutput::ok(format!("Project context added: {}", text.trim())),
        Err(err) => CommandOutput::fail(format!("Error: {err}")),
    }
}

pub(crate) fn backlog(rest: &[&str], ctx: &CliContext) -> CommandOutput {
    if rest.is_empty() {
        return match with_notes(ctx, |editor| editor.get_backlog()) {
            Ok(text) if text.lines().skip(1).all(|line| line.trim().is_empty()) => {
                CommandOutput::ok("Backlog is empty")
            }
            Ok(text) => CommandOutput::ok(text),
            Err(err) => CommandOutput::fail(format!("Error reading backlog: {err}")),
        };
    }

    let text = rest.join(" ");
    match with_notes(ctx, |editor| editor.add_backlog_task(&text)) {
        Ok(()) => CommandOutput::ok(format!("Backlog task added: {}", open_task_line(&text))),
        Err(err) => CommandOutput::fail(format!("Error: {err}")),
    }
}

pub(crate) fn promote(rest: &[&str], ctx: &CliContext) -> CommandOutput {
    let partial = rest.join(" ");
    match with_notes(ctx, |editor| editor.promote_backlog_task(&partial)) {
        Ok(promoted) => CommandOutput::ok(format!("Task promoted to today: {promoted}")),
        Err(err) => CommandOutput::fail(format!("Failed to promote task: {err}")),
    }
}

pub(crate) fn install_hooks(ctx: &CliContext) -> CommandOutput {
    match install_pre_commit(&ctx.cwd, &ctx.notes_path) {
        Ok((path, HookInstall::Unchanged)) => CommandOutput::ok(format!(
            "Pre-commit hook already installed at {}",
            path.display()
        )),
        Ok((path, _)) => {
            CommandOutput::ok(format!("Pre-commit hook installed at {}", path.display()))
        }
        Err(err) => CommandOutput::fail(format!("Error: {err}")),
    }
}
