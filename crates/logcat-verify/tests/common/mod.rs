//! Builders for synthetic logcat captures.

#![allow(dead_code)]

use serde_json::{json, Value};

const PREFIX: &str = "10-18 09:15:02.117  4242  4307 I EventRecorder:";

/// One recorded event as the SDK prints it: header, then the non-empty body
/// pretty-printed, one line per log record.
pub fn event_block(name: &str, payload: &Value) -> String {
    let mut out = format!("{PREFIX} save event: {name} success, event json:\n");
    let pretty = serde_json::to_string_pretty(payload).expect("serialize payload");
    for line in pretty.lines() {
        out.push_str(&format!("{PREFIX} {line}\n"));
    }
    out
}

pub fn submitted_line(n: u64) -> String {
    format!("{PREFIX} Submitted {n} events\n")
}

pub fn noise_line() -> String {
    "10-18 09:15:02.200  4242  4242 D OkHttp  : <-- 200 OK (35ms)\n".to_string()
}

pub fn screen_view_payload() -> Value {
    json!({
        "event_type": "_screen_view",
        "attributes": {
            "_entrances": 1,
            "_screen_id": "MainActivity",
            "_screen_name": "MainActivity",
            "_screen_unique_id": "1234",
            "_session_id": "abc-20261018-091502117",
            "_session_start_timestamp": 1_792_300_502_117_u64,
            "_session_duration": 15,
            "_session_number": 1
        },
        "user": {}
    })
}

/// A complete, valid lifecycle: launch, screen view, login, sign-out, engagement, app end.
pub fn valid_lifecycle_log() -> String {
    let events = vec![
        ("_first_open", json!({ "attributes": {}, "user": {} })),
        ("_app_start", json!({ "attributes": { "_is_first_time": true }, "user": {} })),
        ("_session_start", json!({ "attributes": {}, "user": {} })),
        ("_screen_view", screen_view_payload()),
        ("_profile_set", json!({ "attributes": {}, "user": { "_user_id": "u1" } })),
        ("_profile_set", json!({ "attributes": {}, "user": {} })),
        (
            "_user_engagement",
            json!({ "attributes": { "_engagement_time_msec": 15032 }, "user": {} }),
        ),
        ("_app_end", json!({ "attributes": {}, "user": {} })),
    ];

    let mut log = String::from("--------- beginning of main\n");
    for (idx, (name, payload)) in events.iter().enumerate() {
        log.push_str(&event_block(name, payload));
        if idx == 3 {
            log.push_str(&submitted_line(4));
            log.push_str(&noise_line());
        }
    }
    log.push_str(&submitted_line(4));
    log
}
