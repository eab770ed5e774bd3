//! Per-file pipeline and batch driver.
//!
//! [`Verifier`] runs extract-then-evaluate over one log and classifies the
//! result as valid, invalid (parsed, but rules failed) or unparseable
//! (unreadable file or malformed event JSON). A batch never aborts on a
//! single file's failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::config::VerifyConfig;
use crate::domain::{ExtractError, Extraction, VerifyError};
use crate::extract::{EventExtractor, ExtractorConfig};
use crate::metrics::METRICS;
use crate::obs::{
    emit_batch_finished, emit_extract_failed, emit_file_finished, emit_file_started, FileSpan,
};
use crate::rules::{evaluate, RuleSet, Verdict, Violation};

/// Version of the serialized [`BatchReport`] layout.
pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Classification of one file's run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Valid {
        recorded: usize,
        submitted: u64,
    },
    Invalid {
        recorded: usize,
        submitted: u64,
        violations: Vec<Violation>,
    },
    Unparseable {
        error: String,
    },
}

/// Outcome of verifying one log file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, FileOutcome::Valid { .. })
    }

    fn unparseable(path: PathBuf, error: impl std::fmt::Display) -> Self {
        Self {
            path,
            outcome: FileOutcome::Unparseable {
                error: error.to_string(),
            },
        }
    }
}

/// Aggregated per-path results of a batch, in input order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchReport {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn new(files: Vec<FileReport>) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            files,
        }
    }

    /// True when every file is valid.
    pub fn passed(&self) -> bool {
        self.files.iter().all(FileReport::passed)
    }

    pub fn valid_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Valid { .. }))
    }

    pub fn invalid_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Invalid { .. }))
    }

    pub fn unparseable_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Unparseable { .. }))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Runs the extract-and-validate pipeline.
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    extractor: EventExtractor,
    rule_set: RuleSet,
}

impl Verifier {
    pub fn new(extractor: ExtractorConfig, rule_set: RuleSet) -> Self {
        Self {
            extractor: EventExtractor::new(extractor),
            rule_set,
        }
    }

    pub fn from_config(config: &VerifyConfig) -> Self {
        Self::new(config.extractor.clone(), config.rules.to_rule_set())
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// Extract and evaluate one log text.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Parse`] when an event body is malformed.
    pub fn verify_text(&self, text: &str) -> Result<(Extraction, Verdict), ExtractError> {
        let extraction = self.extractor.extract(text)?;
        let verdict = evaluate(&self.rule_set, &extraction);
        Ok((extraction, verdict))
    }

    /// Read and verify one file. Never fails; errors become [`FileOutcome::Unparseable`].
    pub fn verify_file(&self, path: &Path) -> FileReport {
        let _span = FileSpan::enter(path);
        emit_file_started(path);
        METRICS.inc_files_verified();

        let result = std::fs::read_to_string(path)
            .map_err(|source| VerifyError::Io {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|text| self.verify_text(&text).map_err(VerifyError::from));

        let (extraction, verdict) = match result {
            Ok(pair) => pair,
            Err(err) => {
                METRICS.inc_parse_failures();
                emit_extract_failed(path, &err);
                return FileReport::unparseable(path.to_path_buf(), err);
            }
        };

        let recorded = extraction.recorded.len();
        let submitted = extraction.submitted_total();
        METRICS.add_events_extracted(recorded as u64);
        METRICS.add_violations(verdict.violations.len() as u64);
        emit_file_finished(path, recorded, submitted, verdict.violations.len());

        let outcome = if verdict.passed() {
            FileOutcome::Valid {
                recorded,
                submitted,
            }
        } else {
            FileOutcome::Invalid {
                recorded,
                submitted,
                violations: verdict.violations,
            }
        };
        FileReport {
            path: path.to_path_buf(),
            outcome,
        }
    }

    /// Verify each path in turn.
    pub fn verify_paths(&self, paths: &[PathBuf]) -> BatchReport {
        let started = Instant::now();
        let files = paths.iter().map(|p| self.verify_file(p)).collect();
        finish_batch(files, started)
    }

    /// Verify paths on the blocking pool, at most `jobs` at a time.
    ///
    /// Files are independent, so no coordination beyond the concurrency cap
    /// is needed. Reports come back in input order.
    pub async fn verify_paths_concurrent(&self, paths: &[PathBuf], jobs: usize) -> BatchReport {
        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
        let mut set = JoinSet::new();

        for (idx, path) in paths.iter().cloned().enumerate() {
            let permit = semaphore.clone().acquire_owned().await.ok();
            let verifier = self.clone();
            set.spawn_blocking(move || {
                let _permit = permit;
                (idx, verifier.verify_file(&path))
            });
        }

        let mut slots: Vec<Option<FileReport>> = paths.iter().map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, report)) => slots[idx] = Some(report),
                Err(err) => warn!(error = %err, "verification task did not complete"),
            }
        }

        let files = slots
            .into_iter()
            .zip(paths)
            .map(|(slot, path)| {
                slot.unwrap_or_else(|| {
                    FileReport::unparseable(path.clone(), "verification task did not complete")
                })
            })
            .collect();
        finish_batch(files, started)
    }
}

fn finish_batch(files: Vec<FileReport>, started: Instant) -> BatchReport {
    let report = BatchReport::new(files);
    emit_batch_finished(
        report.files.len(),
        report.invalid_count(),
        report.unparseable_count(),
        started.elapsed().as_millis() as u64,
    );
    report
}
