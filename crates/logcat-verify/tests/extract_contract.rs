//! Extraction contract: count law, order, truncation and malformed bodies.

mod common;

use common::{event_block, noise_line, submitted_line, valid_lifecycle_log};
use logcat_verify::{EventExtractor, ExtractError, ExtractorConfig, Verifier};
use serde_json::json;

#[test]
fn count_law_holds_for_complete_log() {
    let log = valid_lifecycle_log();
    let extraction = EventExtractor::default().extract(&log).expect("extract");

    assert_eq!(extraction.submitted, vec![4, 4]);
    assert_eq!(extraction.submitted_total(), extraction.recorded.len() as u64);
    assert_eq!(extraction.discarded_partial, 0);
}

#[test]
fn recorded_events_keep_header_order() {
    let log = valid_lifecycle_log();
    let extraction = EventExtractor::default().extract(&log).expect("extract");

    let names: Vec<&str> = extraction.recorded.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "_first_open",
            "_app_start",
            "_session_start",
            "_screen_view",
            "_profile_set",
            "_profile_set",
            "_user_engagement",
            "_app_end",
        ]
    );
    assert!(extraction
        .recorded
        .windows(2)
        .all(|pair| pair[0].line < pair[1].line));
}

#[test]
fn rerunning_on_same_text_is_identical() {
    let log = valid_lifecycle_log();
    let verifier = Verifier::default();
    let first = verifier.verify_text(&log).expect("first run");
    let second = verifier.verify_text(&log).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn truncated_body_yields_one_fewer_event_without_error() {
    let full = valid_lifecycle_log();
    let complete = EventExtractor::default().extract(&full).expect("extract");

    // Cut inside the final _app_end body, before its closing line.
    let cut = full.rfind("save event: _app_end").expect("app_end header");
    let body_start = full[cut..].find('\n').expect("newline") + cut + 1;
    let body_second_line = full[body_start..].find('\n').expect("newline") + body_start + 1;
    let truncated = &full[..body_second_line];

    let partial = EventExtractor::default().extract(truncated).expect("truncation is not an error");
    assert_eq!(partial.recorded.len(), complete.recorded.len() - 1);
    assert_eq!(partial.discarded_partial, 1);
}

#[test]
fn malformed_body_is_parse_error() {
    let log = "save event: foo success, event json: { \"a\": }\n";
    let err = EventExtractor::default().extract(log).unwrap_err();
    assert!(matches!(err, ExtractError::Parse { ref event, .. } if event == "foo"));
}

#[test]
fn malformed_multiline_body_is_parse_error() {
    let mut log = event_block("_app_start", &json!({ "a": 1 }));
    log.push_str("I EventRecorder: save event: broken success, event json:\n");
    log.push_str("I EventRecorder: {\n");
    log.push_str("I EventRecorder:     \"a\": ,\n");
    log.push_str("I EventRecorder: }\n");

    let err = EventExtractor::default().extract(&log).unwrap_err();
    match err {
        ExtractError::Parse { event, line, .. } => {
            assert_eq!(event, "broken");
            assert_eq!(line, 5);
        }
    }
}

#[test]
fn strict_mode_tolerates_interleaved_recorder_lines() {
    let block = event_block("login", &json!({ "attributes": { "method": "password" } }));
    let mut lines: Vec<String> = block.lines().map(str::to_string).collect();
    // Another recorder log line lands between the opener and the first field.
    lines.insert(2, submitted_line(1).trim_end().to_string());
    let mut log = lines.join("\n");
    log.push('\n');
    log.push_str(&noise_line());

    let strict = EventExtractor::new(ExtractorConfig::strict())
        .extract(&log)
        .expect("strict extract");
    assert_eq!(strict.recorded.len(), 1);
    assert_eq!(
        strict.recorded[0].payload,
        json!({ "attributes": { "method": "password" } })
    );
    assert_eq!(strict.submitted, vec![1]);
}
