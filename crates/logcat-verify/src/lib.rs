//! logcat-verify
//!
//! Extracts clickstream analytics events from captured Android logcat output
//! and validates the recorded event stream against lifecycle and commerce
//! rules.

pub mod batch;
pub mod config;
pub mod domain;
pub mod extract;
pub mod metrics;
pub mod obs;
pub mod report;
pub mod rules;
pub mod telemetry;

pub use batch::{BatchReport, FileOutcome, FileReport, Verifier, REPORT_SCHEMA_VERSION};
pub use config::{RulesConfig, VerifyConfig};
pub use domain::{ExtractError, Extraction, RecordedEvent, Result, SaveFailure, VerifyError};
pub use extract::{
    extract_save_failures, extract_submitted, EventExtractor, ExtractorConfig,
    DEFAULT_MAX_BUFFER_BYTES, DEFAULT_TAG_MARKER,
};
pub use metrics::METRICS;
pub use obs::{
    emit_batch_finished, emit_extract_failed, emit_file_finished, emit_file_started, FileSpan,
};
pub use report::{
    read_report_json, render_report_json, render_report_md, render_report_text,
    write_report_json,
};
pub use rules::{
    evaluate, CommerceExpectations, Rule, RulePreset, RuleSet, Thresholds, Verdict, Violation,
    ViolationKind,
};
pub use telemetry::init_tracing;

/// logcat-verify version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
