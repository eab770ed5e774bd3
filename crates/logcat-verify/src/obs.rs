//! Structured observability hooks for verification runs.
//!
//! This module provides:
//! - File-scoped tracing spans via the `FileSpan` RAII guard
//! - Emission functions for key events: file start/finish, extraction failure, batch end
//!
//! Events are emitted at `info!` level (filter with `LOGCAT_VERIFY_LOG` or `RUST_LOG`).

use std::path::Path;

use tracing::info;

/// RAII guard that enters a file-scoped span for the duration of one verification.
///
/// # Example
///
/// ```ignore
/// let _span = FileSpan::enter(Path::new("logs/logcat.txt"));
/// // tracing calls are now associated with path = "logs/logcat.txt"
/// ```
pub struct FileSpan {
    _span: tracing::span::EnteredSpan,
}

impl FileSpan {
    pub fn enter(path: &Path) -> Self {
        let span = tracing::info_span!("logcat_verify.file", path = %path.display());
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: verification of one file started.
pub fn emit_file_started(path: &Path) {
    info!(event = "verify.file_started", path = %path.display());
}

/// Emit event: file parsed and validated.
pub fn emit_file_finished(path: &Path, recorded: usize, submitted: u64, violations: usize) {
    info!(
        event = "verify.file_finished",
        path = %path.display(),
        recorded = recorded,
        submitted = submitted,
        violations = violations,
        passed = violations == 0,
    );
}

/// Emit event: the file could not be read or parsed (warning level).
pub fn emit_extract_failed(path: &Path, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "verify.extract_failed", path = %path.display(), error = %error);
}

/// Emit event: batch finished with per-outcome counts.
pub fn emit_batch_finished(total: usize, invalid: usize, unparseable: usize, duration_ms: u64) {
    info!(
        event = "verify.batch_finished",
        total = total,
        invalid = invalid,
        unparseable = unparseable,
        duration_ms = duration_ms,
        passed = invalid == 0 && unparseable == 0,
    );
}
