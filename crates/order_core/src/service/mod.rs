//! Editor use-cases over the notes file.
//!
//! # Responsibility
//! - Validate input, load the document, apply one mutation, persist once.
//! - Keep CLI callers independent from the document tree and file I/O.
//!
//! # Invariants
//! - Validation runs before the file is read; a rejected call never writes.
//! - Every mutating operation performs exactly one full-file write.

mod backlog;
mod editor;
mod tasks;

pub use editor::{EntryOverrides, NotesEditor};

use crate::error::NotesResult;
use log::{info, warn};
use std::time::Instant;

/// Emits the outcome event for one editor operation and passes the result on.
fn log_outcome<T>(event: &'static str, started_at: Instant, result: NotesResult<T>) -> NotesResult<T> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event={event} module=editor status=ok duration_ms={duration_ms}"),
        Err(err) => warn!(
            "event={event} module=editor status=error duration_ms={duration_ms} error_code={}",
            err.code()
        ),
    }
    result
}
