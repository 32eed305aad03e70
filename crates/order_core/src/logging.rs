//! File logging for the notes editor.
//!
//! # Responsibility
//! - Start one rotating log file sink per process.
//! - Record panics as single-line log events.
//!
//! # Invariants
//! - Repeating `init_logging` with the same level and directory is a no-op;
//!   any other combination is rejected once logging is active.
//! - Log events carry metadata only, never note or task text.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "order";
const ROTATE_AT_BYTES: u64 = 2 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 3;
const PANIC_MESSAGE_MAX_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: LevelFilter,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Starts file logging at `level` under `log_dir`.
///
/// # Errors
/// - `level` is not one of `trace|debug|info|warn|error`.
/// - `log_dir` is relative or cannot be created.
/// - Logging is already active with another level or directory.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), String> {
    let level = parse_level(level)?;
    if !log_dir.is_absolute() {
        return Err(format!(
            "log directory `{}` must be an absolute path",
            log_dir.display()
        ));
    }

    let active = ACTIVE.get_or_try_init(|| start_file_logger(level, log_dir))?;
    if active.level != level || active.log_dir != log_dir {
        return Err(format!(
            "logging is active with level={} dir=`{}`; refusing to switch to level={level} dir=`{}`",
            active.level,
            active.log_dir.display(),
            log_dir.display()
        ));
    }
    Ok(())
}

/// Active level and directory, or `None` before [`init_logging`] succeeds.
pub fn logging_status() -> Option<(LevelFilter, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_file_logger(level: LevelFilter, log_dir: &Path) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|err| format!("cannot create log directory `{}`: {err}", log_dir.display()))?;

    let spec = level.to_string().to_ascii_lowercase();
    let handle = Logger::try_with_str(&spec)
        .map_err(|err| format!("invalid log spec `{spec}`: {err}"))?
        .log_to_file(FileSpec::default().directory(log_dir).basename(LOG_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::Direct)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("cannot start file logger: {err}"))?;

    install_panic_hook();
    info!(
        "event=logging_init module=logging status=ok level={spec} version={}",
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    let normalized = raw.trim().to_ascii_lowercase();
    let parsed = match normalized.as_str() {
        "warning" => Some(LevelFilter::Warn),
        "off" => None,
        other => other.parse::<LevelFilter>().ok(),
    };
    parsed.ok_or_else(|| format!("unknown log level `{raw}`; use trace|debug|info|warn|error"))
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let chained = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |at| format!("{}:{}", at.file(), at.line()));
        error!(
            "event=panic module=logging status=error location={location} message={}",
            one_line(payload_text(info.payload()), PANIC_MESSAGE_MAX_CHARS)
        );
        chained(info);
    }));
}

fn payload_text(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Replaces line breaks and caps the length so one event stays on one line.
fn one_line(value: &str, max_chars: usize) -> String {
    let mut out: String = value
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .take(max_chars)
        .collect();
    if value.chars().nth(max_chars).is_some() {
        out.push_str("...");
    }
    out
}
