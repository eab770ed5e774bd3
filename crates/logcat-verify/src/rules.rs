//! Event stream rules engine.
//!
//! Evaluates an [`Extraction`] against a [`RuleSet`] to produce a
//! [`Verdict`]. Every rule runs and every violation is reported unless
//! `fail_fast` is set. Rules cover the app launch sequence, screen-view and
//! engagement attributes, sign-out identity clearing, session end, and the
//! commerce actions of a shopping walkthrough.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::{Extraction, RecordedEvent};

/// Event names expected at positions 0..=3 of every launch.
pub const LAUNCH_SEQUENCE: [&str; 4] = [
    "_first_open",
    "_app_start",
    "_session_start",
    "_screen_view",
];

/// Keys the first `_screen_view` must carry under `attributes`.
pub const SCREEN_VIEW_REQUIRED_ATTRIBUTES: &[&str] = &[
    "_screen_id",
    "_screen_name",
    "_screen_unique_id",
    "_session_id",
    "_session_start_timestamp",
    "_session_duration",
    "_session_number",
];

pub const SCREEN_VIEW: &str = "_screen_view";
pub const PROFILE_SET: &str = "_profile_set";
pub const USER_ENGAGEMENT: &str = "_user_engagement";
pub const APP_END: &str = "_app_end";
pub const USER_ID: &str = "_user_id";
pub const ENGAGEMENT_TIME_MSEC: &str = "_engagement_time_msec";

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// A single check over the extracted event stream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// Sum of submitted counts equals the number of recorded events.
    CountConsistency,
    /// Positions 0..=3 follow [`LAUNCH_SEQUENCE`].
    LaunchOrder,
    /// First `_screen_view` has `_entrances == 1` and the required keys.
    ScreenViewAttributes,
    /// Last `_profile_set` has no `_user_id`; the one before it does.
    ProfileTransition,
    /// First `_user_engagement` lasted longer than the configured minimum.
    EngagementTime,
    /// The final event is `_app_end`.
    AppEnd,
    /// Enough `login` events.
    LoginEvents,
    /// A `product_exposure` with items and an `item_id`.
    ProductExposure,
    /// Enough `add_to_cart` events; the first has items and a `product_id`.
    AddToCart,
    /// Enough of each configured view event.
    ViewEvents,
    /// Enough `check_out` events; the first has items.
    CheckOut,
    /// The SDK never failed to persist an event.
    NoSaveFailures,
}

/// Kind of a reported violation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    CountMismatch,
    LaunchOrderViolation,
    ScreenViewMissing,
    ScreenViewAttributeMissing,
    ProfileTransitionViolation,
    EngagementMissing,
    EngagementTooShort,
    MissingAppEnd,
    InsufficientLoginEvents,
    ProductExposureMissing,
    ProductExposureInvalid,
    InsufficientAddToCartEvents,
    AddToCartInvalid,
    InsufficientViewEvents,
    InsufficientCheckOutEvents,
    CheckOutInvalid,
    SaveFailure,
}

/// Expected volumes for the commerce walkthrough.
///
/// `min_*` is inclusive ("at least"); `*_more_than` is strict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CommerceExpectations {
    pub min_login_events: usize,
    pub add_to_cart_more_than: usize,
    pub view_events: Vec<String>,
    pub view_more_than: usize,
    pub check_out_more_than: usize,
}

impl Default for CommerceExpectations {
    fn default() -> Self {
        Self {
            min_login_events: 2,
            add_to_cart_more_than: 3,
            view_events: ["view_home", "view_wishlist", "view_cart", "view_account"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            view_more_than: 1,
            check_out_more_than: 1,
        }
    }
}

/// Numeric limits referenced by the rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    /// `_engagement_time_msec` must be strictly greater than this.
    pub min_engagement_msec: f64,
    pub commerce: CommerceExpectations,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_engagement_msec: 1000.0,
            commerce: CommerceExpectations::default(),
        }
    }
}

/// Named rule collections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RulePreset {
    /// Launch, screen view, profile, engagement, app end, count.
    #[default]
    Lifecycle,
    /// Lifecycle plus the commerce walkthrough checks.
    Extended,
}

impl RulePreset {
    pub fn rules(self) -> Vec<Rule> {
        let mut rules = vec![
            Rule::CountConsistency,
            Rule::LaunchOrder,
            Rule::ScreenViewAttributes,
            Rule::ProfileTransition,
            Rule::EngagementTime,
            Rule::AppEnd,
        ];
        if self == Self::Extended {
            rules.extend([
                Rule::LoginEvents,
                Rule::ProductExposure,
                Rule::AddToCart,
                Rule::ViewEvents,
                Rule::CheckOut,
            ]);
        }
        rules
    }
}

/// A set of rules plus the thresholds they reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSet {
    pub thresholds: Thresholds,
    pub rules: Vec<Rule>,
    /// Stop at the first violation.
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::lifecycle()
    }
}

impl RuleSet {
    pub fn from_preset(preset: RulePreset) -> Self {
        Self {
            thresholds: Thresholds::default(),
            rules: preset.rules(),
            fail_fast: false,
        }
    }

    /// Rules 1-6: count, launch order, screen view, profile, engagement, app end.
    pub fn lifecycle() -> Self {
        Self::from_preset(RulePreset::Lifecycle)
    }

    /// Lifecycle rules plus the commerce walkthrough checks.
    pub fn extended() -> Self {
        Self::from_preset(RulePreset::Extended)
    }

    /// Add a rule.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
        self
    }

    /// Override thresholds.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// A single rule violation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Human-readable explanation.
    pub message: String,
    /// Index into the recorded event sequence, when one event is at fault.
    pub event_index: Option<usize>,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            event_index: None,
        }
    }

    fn at(mut self, index: usize) -> Self {
        self.event_index = Some(index);
        self
    }
}

/// The outcome of evaluating a rule set against one extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    /// Violations found (empty when passed).
    pub violations: Vec<Violation>,
}

impl Verdict {
    /// Whether every rule held.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Evaluate an [`Extraction`] against a [`RuleSet`], returning a [`Verdict`].
///
/// When `fail_fast` is true, evaluation stops after the first rule that
/// reports anything.
pub fn evaluate(rule_set: &RuleSet, extraction: &Extraction) -> Verdict {
    let mut violations = Vec::new();

    for rule in &rule_set.rules {
        let found = check_rule(*rule, &rule_set.thresholds, extraction);
        debug!(rule = ?rule, violations = found.len(), "rule evaluated");
        let failed = !found.is_empty();
        violations.extend(found);
        if failed && rule_set.fail_fast {
            break;
        }
    }

    Verdict { violations }
}

fn check_rule(rule: Rule, thresholds: &Thresholds, extraction: &Extraction) -> Vec<Violation> {
    let commerce = &thresholds.commerce;
    match rule {
        Rule::CountConsistency => check_count(extraction).into_iter().collect(),
        Rule::LaunchOrder => check_launch_order(&extraction.recorded),
        Rule::ScreenViewAttributes => check_screen_view(extraction),
        Rule::ProfileTransition => check_profile_transition(extraction).into_iter().collect(),
        Rule::EngagementTime => {
            check_engagement(extraction, thresholds.min_engagement_msec).into_iter().collect()
        }
        Rule::AppEnd => check_app_end(&extraction.recorded).into_iter().collect(),
        Rule::LoginEvents => {
            let count = extraction.count_named("login");
            if count < commerce.min_login_events {
                vec![Violation::new(
                    ViolationKind::InsufficientLoginEvents,
                    format!(
                        "found {} login events, expected at least {}",
                        count, commerce.min_login_events
                    ),
                )]
            } else {
                Vec::new()
            }
        }
        Rule::ProductExposure => check_product_exposure(extraction),
        Rule::AddToCart => check_add_to_cart(extraction, commerce.add_to_cart_more_than),
        Rule::ViewEvents => commerce
            .view_events
            .iter()
            .filter_map(|name| {
                let count = extraction.count_named(name);
                (count <= commerce.view_more_than).then(|| {
                    Violation::new(
                        ViolationKind::InsufficientViewEvents,
                        format!(
                            "found {} {} events, expected more than {}",
                            count, name, commerce.view_more_than
                        ),
                    )
                })
            })
            .collect(),
        Rule::CheckOut => check_check_out(extraction, commerce.check_out_more_than),
        Rule::NoSaveFailures => extraction
            .save_failures
            .iter()
            .map(|failure| {
                Violation::new(
                    ViolationKind::SaveFailure,
                    format!(
                        "SDK failed to save {} event (line {})",
                        failure.event_type, failure.line
                    ),
                )
            })
            .collect(),
    }
}

fn check_count(extraction: &Extraction) -> Option<Violation> {
    let recorded = extraction.recorded.len() as u64;
    let Some(submitted) = extraction.checked_submitted_total() else {
        return Some(Violation::new(
            ViolationKind::CountMismatch,
            format!(
                "submitted counts {:?} overflow a u64, recorded {recorded}",
                extraction.submitted
            ),
        ));
    };
    (submitted != recorded).then(|| {
        Violation::new(
            ViolationKind::CountMismatch,
            format!("submitted {submitted} events but recorded {recorded}"),
        )
    })
}

fn check_launch_order(recorded: &[RecordedEvent]) -> Vec<Violation> {
    LAUNCH_SEQUENCE
        .iter()
        .enumerate()
        .filter_map(|(idx, expected)| match recorded.get(idx) {
            Some(event) if event.name == *expected => None,
            Some(event) => Some(
                Violation::new(
                    ViolationKind::LaunchOrderViolation,
                    format!(
                        "event at position {} is '{}', expected '{}'",
                        idx, event.name, expected
                    ),
                )
                .at(idx),
            ),
            None => Some(Violation::new(
                ViolationKind::LaunchOrderViolation,
                format!("no event at position {idx}, expected '{expected}'"),
            )),
        })
        .collect()
}

fn check_screen_view(extraction: &Extraction) -> Vec<Violation> {
    let Some((idx, event)) = extraction.first_named(SCREEN_VIEW) else {
        return vec![Violation::new(
            ViolationKind::ScreenViewMissing,
            "no _screen_view event recorded",
        )];
    };

    let mut violations = Vec::new();
    let entrances = event.attribute("_entrances");
    if entrances.and_then(Value::as_f64) != Some(1.0) {
        violations.push(
            Violation::new(
                ViolationKind::ScreenViewAttributeMissing,
                format!("_screen_view _entrances is {}, expected 1", describe(entrances)),
            )
            .at(idx),
        );
    }

    for key in SCREEN_VIEW_REQUIRED_ATTRIBUTES {
        if event.attribute(key).is_none() {
            violations.push(
                Violation::new(
                    ViolationKind::ScreenViewAttributeMissing,
                    format!("_screen_view is missing attribute {key}"),
                )
                .at(idx),
            );
        }
    }
    violations
}

fn check_profile_transition(extraction: &Extraction) -> Option<Violation> {
    let profile_sets: Vec<(usize, &RecordedEvent)> = extraction.named(PROFILE_SET).collect();
    let [.., (prev_idx, prev), (last_idx, last)] = profile_sets.as_slice() else {
        return Some(Violation::new(
            ViolationKind::ProfileTransitionViolation,
            format!(
                "found {} _profile_set events, expected at least 2",
                profile_sets.len()
            ),
        ));
    };

    if carries_user_id(last) {
        return Some(
            Violation::new(
                ViolationKind::ProfileTransitionViolation,
                "last _profile_set still carries _user_id after sign-out",
            )
            .at(*last_idx),
        );
    }
    if !carries_user_id(prev) {
        return Some(
            Violation::new(
                ViolationKind::ProfileTransitionViolation,
                "second-to-last _profile_set has no _user_id",
            )
            .at(*prev_idx),
        );
    }
    None
}

fn carries_user_id(event: &RecordedEvent) -> bool {
    event.user().is_some_and(|user| user.contains_key(USER_ID))
}

fn check_engagement(extraction: &Extraction, min_msec: f64) -> Option<Violation> {
    let Some((idx, event)) = extraction.first_named(USER_ENGAGEMENT) else {
        return Some(Violation::new(
            ViolationKind::EngagementMissing,
            "no _user_engagement event recorded",
        ));
    };

    match event.attribute(ENGAGEMENT_TIME_MSEC) {
        None => Some(
            Violation::new(
                ViolationKind::EngagementMissing,
                "_user_engagement has no _engagement_time_msec attribute",
            )
            .at(idx),
        ),
        Some(value) => match value.as_f64() {
            Some(msec) if msec > min_msec => None,
            Some(msec) => Some(
                Violation::new(
                    ViolationKind::EngagementTooShort,
                    format!("_engagement_time_msec is {msec}, expected more than {min_msec}"),
                )
                .at(idx),
            ),
            None => Some(
                Violation::new(
                    ViolationKind::EngagementMissing,
                    format!("_engagement_time_msec is not a number: {value}"),
                )
                .at(idx),
            ),
        },
    }
}

fn check_app_end(recorded: &[RecordedEvent]) -> Option<Violation> {
    match recorded.last() {
        Some(event) if event.name == APP_END => None,
        Some(event) => Some(
            Violation::new(
                ViolationKind::MissingAppEnd,
                format!("last event is '{}', expected '{}'", event.name, APP_END),
            )
            .at(recorded.len() - 1),
        ),
        None => Some(Violation::new(
            ViolationKind::MissingAppEnd,
            "no events recorded, expected a final _app_end",
        )),
    }
}

fn check_product_exposure(extraction: &Extraction) -> Vec<Violation> {
    let Some((idx, event)) = extraction.first_named("product_exposure") else {
        return vec![Violation::new(
            ViolationKind::ProductExposureMissing,
            "no product_exposure event recorded",
        )];
    };

    let mut violations = Vec::new();
    if !event.has_items() {
        violations.push(
            Violation::new(
                ViolationKind::ProductExposureInvalid,
                "product_exposure has no items",
            )
            .at(idx),
        );
    }
    if event.attribute("item_id").is_none() {
        violations.push(
            Violation::new(
                ViolationKind::ProductExposureInvalid,
                "product_exposure is missing attribute item_id",
            )
            .at(idx),
        );
    }
    violations
}

fn check_add_to_cart(extraction: &Extraction, more_than: usize) -> Vec<Violation> {
    let mut violations = Vec::new();
    let count = extraction.count_named("add_to_cart");
    if count <= more_than {
        violations.push(Violation::new(
            ViolationKind::InsufficientAddToCartEvents,
            format!("found {count} add_to_cart events, expected more than {more_than}"),
        ));
    }

    if let Some((idx, first)) = extraction.first_named("add_to_cart") {
        if !first.has_items() {
            violations.push(
                Violation::new(ViolationKind::AddToCartInvalid, "first add_to_cart has no items")
                    .at(idx),
            );
        }
        if first.attribute("product_id").is_none() {
            violations.push(
                Violation::new(
                    ViolationKind::AddToCartInvalid,
                    "first add_to_cart is missing attribute product_id",
                )
                .at(idx),
            );
        }
    }
    violations
}

fn check_check_out(extraction: &Extraction, more_than: usize) -> Vec<Violation> {
    let mut violations = Vec::new();
    let count = extraction.count_named("check_out");
    if count <= more_than {
        violations.push(Violation::new(
            ViolationKind::InsufficientCheckOutEvents,
            format!("found {count} check_out events, expected more than {more_than}"),
        ));
    }

    if let Some((idx, first)) = extraction.first_named("check_out") {
        if !first.has_items() {
            violations.push(
                Violation::new(ViolationKind::CheckOutInvalid, "first check_out has no items")
                    .at(idx),
            );
        }
    }
    violations
}

fn describe(value: Option<&Value>) -> String {
    value.map_or_else(|| "missing".to_string(), Value::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SaveFailure;
    use serde_json::json;

    fn ev(name: &str, payload: Value) -> RecordedEvent {
        RecordedEvent::new(name, payload, 0)
    }

    fn extraction(events: Vec<RecordedEvent>) -> Extraction {
        Extraction {
            submitted: vec![events.len() as u64],
            recorded: events,
            ..Extraction::default()
        }
    }

    fn only(rule: Rule) -> RuleSet {
        RuleSet {
            thresholds: Thresholds::default(),
            rules: vec![rule],
            fail_fast: false,
        }
    }

    #[test]
    fn test_count_mismatch() {
        let mut ex = extraction(vec![ev("a", json!({}))]);
        ex.submitted = vec![1, 1];
        let verdict = evaluate(&only(Rule::CountConsistency), &ex);
        assert!(verdict.has(ViolationKind::CountMismatch));
        assert!(verdict.violations[0].message.contains("submitted 2"));
    }

    #[test]
    fn test_launch_order_reports_each_wrong_position() {
        let ex = extraction(vec![
            ev("_first_open", json!({})),
            ev("_session_start", json!({})),
        ]);
        let verdict = evaluate(&only(Rule::LaunchOrder), &ex);
        let indices: Vec<Option<usize>> =
            verdict.violations.iter().map(|v| v.event_index).collect();
        assert_eq!(indices, vec![Some(1), None, None]);
    }

    #[test]
    fn test_screen_view_missing_is_distinct_from_bad_attributes() {
        let verdict = evaluate(&only(Rule::ScreenViewAttributes), &extraction(vec![]));
        assert!(verdict.has(ViolationKind::ScreenViewMissing));
        assert!(!verdict.has(ViolationKind::ScreenViewAttributeMissing));
    }

    #[test]
    fn test_screen_view_attributes_checked() {
        let ex = extraction(vec![ev(
            "_screen_view",
            json!({ "attributes": { "_entrances": 0, "_screen_id": "s" } }),
        )]);
        let verdict = evaluate(&only(Rule::ScreenViewAttributes), &ex);
        // _entrances plus six missing keys
        assert_eq!(verdict.of_kind(ViolationKind::ScreenViewAttributeMissing).count(), 7);
        assert!(verdict.violations.iter().all(|v| v.event_index == Some(0)));
    }

    #[test]
    fn test_profile_transition_needs_two_events() {
        let ex = extraction(vec![ev("_profile_set", json!({ "user": {} }))]);
        let verdict = evaluate(&only(Rule::ProfileTransition), &ex);
        assert!(verdict.has(ViolationKind::ProfileTransitionViolation));
        assert!(verdict.violations[0].message.contains("found 1"));
    }

    #[test]
    fn test_profile_transition_second_to_last_without_user_id() {
        let ex = extraction(vec![
            ev("_profile_set", json!({ "user": {} })),
            ev("_profile_set", json!({ "user": {} })),
        ]);
        let verdict = evaluate(&only(Rule::ProfileTransition), &ex);
        assert_eq!(verdict.violations[0].event_index, Some(0));
    }

    #[test]
    fn test_engagement_non_numeric_is_missing() {
        let ex = extraction(vec![ev(
            "_user_engagement",
            json!({ "attributes": { "_engagement_time_msec": "long" } }),
        )]);
        let verdict = evaluate(&only(Rule::EngagementTime), &ex);
        assert!(verdict.has(ViolationKind::EngagementMissing));
    }

    #[test]
    fn test_engagement_threshold_is_strict() {
        let ex = extraction(vec![ev(
            "_user_engagement",
            json!({ "attributes": { "_engagement_time_msec": 1000 } }),
        )]);
        let verdict = evaluate(&only(Rule::EngagementTime), &ex);
        assert!(verdict.has(ViolationKind::EngagementTooShort));
    }

    #[test]
    fn test_app_end_on_empty_stream() {
        let verdict = evaluate(&only(Rule::AppEnd), &extraction(vec![]));
        assert!(verdict.has(ViolationKind::MissingAppEnd));
        assert_eq!(verdict.violations[0].event_index, None);
    }

    #[test]
    fn test_commerce_rules_on_empty_stream() {
        let verdict = evaluate(&RuleSet::extended(), &extraction(vec![]));
        for kind in [
            ViolationKind::InsufficientLoginEvents,
            ViolationKind::ProductExposureMissing,
            ViolationKind::InsufficientAddToCartEvents,
            ViolationKind::InsufficientViewEvents,
            ViolationKind::InsufficientCheckOutEvents,
        ] {
            assert!(verdict.has(kind), "expected {kind:?}");
        }
        assert_eq!(verdict.of_kind(ViolationKind::InsufficientViewEvents).count(), 4);
    }

    #[test]
    fn test_add_to_cart_threshold_is_configurable() {
        let cart = json!({ "items": [{ "id": 1 }], "attributes": { "product_id": "p" } });
        let ex = extraction(vec![ev("add_to_cart", cart.clone()), ev("add_to_cart", cart)]);
        let strict = evaluate(&only(Rule::AddToCart), &ex);
        assert!(strict.has(ViolationKind::InsufficientAddToCartEvents));

        let mut thresholds = Thresholds::default();
        thresholds.commerce.add_to_cart_more_than = 1;
        let relaxed = evaluate(&only(Rule::AddToCart).with_thresholds(thresholds), &ex);
        assert!(relaxed.passed());
    }

    #[test]
    fn test_first_add_to_cart_needs_items_and_product_id() {
        let ex = extraction(vec![ev("add_to_cart", json!({ "items": [] }))]);
        let verdict = evaluate(&only(Rule::AddToCart), &ex);
        assert_eq!(verdict.of_kind(ViolationKind::AddToCartInvalid).count(), 2);
    }

    #[test]
    fn test_product_exposure_needs_item_id() {
        let ex = extraction(vec![ev(
            "product_exposure",
            json!({ "items": [{ "id": "p" }], "attributes": {} }),
        )]);
        let verdict = evaluate(&only(Rule::ProductExposure), &ex);
        assert_eq!(verdict.violations.len(), 1);
        assert!(verdict.violations[0].message.contains("item_id"));
    }

    #[test]
    fn test_no_save_failures_rule() {
        let mut ex = extraction(vec![]);
        ex.save_failures.push(SaveFailure {
            event_type: "login".to_string(),
            line: 7,
        });
        let verdict = evaluate(&only(Rule::NoSaveFailures), &ex);
        assert!(verdict.has(ViolationKind::SaveFailure));
        assert!(verdict.violations[0].message.contains("line 7"));
    }

    #[test]
    fn test_fail_fast_stops_after_first_failing_rule() {
        let rule_set = RuleSet::lifecycle().with_fail_fast(true);
        let verdict = evaluate(&rule_set, &extraction(vec![]));
        // empty stream: count holds, launch order is the first to fail
        assert!(verdict
            .violations
            .iter()
            .all(|v| v.kind == ViolationKind::LaunchOrderViolation));
    }

    #[test]
    fn test_with_rule_does_not_duplicate() {
        let rule_set = RuleSet::lifecycle().with_rule(Rule::AppEnd);
        assert_eq!(rule_set.rules.len(), 6);
    }

    #[test]
    fn test_overflowing_submitted_sum_is_count_mismatch() {
        let mut ex = extraction(vec![ev("_app_end", json!({}))]);
        ex.submitted = vec![u64::MAX, 1];
        let verdict = evaluate(&RuleSet::lifecycle(), &ex);
        assert_eq!(verdict.of_kind(ViolationKind::CountMismatch).count(), 1);
    }

    #[test]
    fn test_rule_serde_tagged() {
        let json = serde_json::to_string(&Rule::NoSaveFailures).unwrap();
        assert_eq!(json, r#"{"type":"no_save_failures"}"#);
        let back: Rule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rule::NoSaveFailures);
    }
}
