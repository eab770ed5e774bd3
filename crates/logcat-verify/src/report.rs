//! Batch report rendering.
//!
//! Text for terminals, Markdown for CI summaries, and a pretty JSON artifact
//! that can be read back later.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::batch::{BatchReport, FileOutcome, FileReport};
use crate::rules::Violation;

/// Plain-text report for terminals.
pub fn render_report_text(report: &BatchReport) -> String {
    let mut out = String::new();
    for file in &report.files {
        match &file.outcome {
            FileOutcome::Valid {
                recorded,
                submitted,
            } => {
                let _ = writeln!(
                    out,
                    "PASS {} ({} recorded, {} submitted)",
                    file.path.display(),
                    recorded,
                    submitted
                );
            }
            FileOutcome::Invalid {
                recorded,
                submitted,
                violations,
            } => {
                let _ = writeln!(
                    out,
                    "FAIL {} ({} recorded, {} submitted, {} violations)",
                    file.path.display(),
                    recorded,
                    submitted,
                    violations.len()
                );
                for v in violations {
                    let _ = writeln!(out, "  - {}", describe_violation(v));
                }
            }
            FileOutcome::Unparseable { error } => {
                let _ = writeln!(out, "ERROR {}: {}", file.path.display(), error);
            }
        }
    }
    let _ = writeln!(
        out,
        "\n{} files: {} valid, {} invalid, {} could not be parsed",
        report.files.len(),
        report.valid_count(),
        report.invalid_count(),
        report.unparseable_count()
    );
    out
}

/// Markdown summary for CI job output or PR comments.
pub fn render_report_md(report: &BatchReport) -> String {
    let mut out = String::new();
    out.push_str("# Logcat Verification\n\n");
    out.push_str(&format!(
        "- files: {}\n- valid: {}\n- invalid: {}\n- unparseable: {}\n\n",
        report.files.len(),
        report.valid_count(),
        report.invalid_count(),
        report.unparseable_count()
    ));

    out.push_str("| File | Status | Recorded | Submitted | Violations |\n");
    out.push_str("|---|---|---|---|---|\n");
    for file in &report.files {
        out.push_str(&md_row(file));
    }

    let failing: Vec<&FileReport> = report
        .files
        .iter()
        .filter(|f| matches!(f.outcome, FileOutcome::Invalid { .. }))
        .collect();
    if !failing.is_empty() {
        out.push_str("\n## Violations\n");
        for file in failing {
            if let FileOutcome::Invalid { violations, .. } = &file.outcome {
                out.push_str(&format!("\n### `{}`\n", file.path.display()));
                for v in violations {
                    out.push_str(&format!("- {}\n", describe_violation(v)));
                }
            }
        }
    }
    out
}

fn md_row(file: &FileReport) -> String {
    match &file.outcome {
        FileOutcome::Valid {
            recorded,
            submitted,
        } => format!(
            "| `{}` | valid | {} | {} | 0 |\n",
            file.path.display(),
            recorded,
            submitted
        ),
        FileOutcome::Invalid {
            recorded,
            submitted,
            violations,
        } => format!(
            "| `{}` | invalid | {} | {} | {} |\n",
            file.path.display(),
            recorded,
            submitted,
            violations.len()
        ),
        FileOutcome::Unparseable { error } => format!(
            "| `{}` | could not parse: {} | - | - | - |\n",
            file.path.display(),
            error.replace('|', "\\|")
        ),
    }
}

fn describe_violation(v: &Violation) -> String {
    match v.event_index {
        Some(idx) => format!("{:?} [event #{}]: {}", v.kind, idx, v.message),
        None => format!("{:?}: {}", v.kind, v.message),
    }
}

/// Serialize a report as pretty JSON.
pub fn render_report_json(report: &BatchReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("serialize batch report")
}

/// Write the report as pretty JSON.
pub fn write_report_json(path: &Path, report: &BatchReport) -> Result<()> {
    let content = render_report_json(report)?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Read a previously written JSON report.
pub fn read_report_json(path: &Path) -> Result<BatchReport> {
    let content = std::fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("parse {:?}", path))
}
