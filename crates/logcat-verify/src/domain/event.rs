//! Recorded analytics events and the extraction result they live in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One analytics event reassembled from the log.
///
/// `payload` is the event JSON exactly as the SDK printed it; no shape is
/// imposed here. `line` is the 1-based line number of the header line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordedEvent {
    pub name: String,
    pub payload: Value,
    pub line: usize,
}

impl RecordedEvent {
    pub fn new(name: impl Into<String>, payload: Value, line: usize) -> Self {
        Self {
            name: name.into(),
            payload,
            line,
        }
    }

    /// The `attributes` object, if the payload carries one.
    pub fn attributes(&self) -> Option<&Map<String, Value>> {
        self.payload.get("attributes").and_then(Value::as_object)
    }

    /// Look up a single key under `attributes`.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes().and_then(|attrs| attrs.get(key))
    }

    /// The `user` object, if the payload carries one.
    pub fn user(&self) -> Option<&Map<String, Value>> {
        self.payload.get("user").and_then(Value::as_object)
    }

    /// Whether the payload has a non-empty `items` list.
    pub fn has_items(&self) -> bool {
        self.payload
            .get("items")
            .and_then(Value::as_array)
            .is_some_and(|items| !items.is_empty())
    }
}

/// A "Error to save event" line: the SDK failed to persist an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveFailure {
    pub event_type: String,
    pub line: usize,
}

/// Everything the extractor pulls out of one log file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Extraction {
    /// "Submitted N events" observations, in file order.
    pub submitted: Vec<u64>,
    /// Recorded events, in header-line order.
    pub recorded: Vec<RecordedEvent>,
    pub save_failures: Vec<SaveFailure>,
    /// Partial events dropped at end of input or on buffer overflow.
    pub discarded_partial: usize,
}

impl Extraction {
    /// Sum of all submitted counts, saturating at `u64::MAX`.
    pub fn submitted_total(&self) -> u64 {
        self.checked_submitted_total().unwrap_or(u64::MAX)
    }

    /// Sum of all submitted counts, `None` when it does not fit a `u64`.
    pub fn checked_submitted_total(&self) -> Option<u64> {
        self.submitted
            .iter()
            .try_fold(0u64, |total, &count| total.checked_add(count))
    }

    /// Iterate `(index, event)` over events with the given name, in order.
    pub fn named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (usize, &'a RecordedEvent)> + 'a {
        self.recorded
            .iter()
            .enumerate()
            .filter(move |(_, event)| event.name == name)
    }

    /// First event with the given name.
    pub fn first_named<'a>(&'a self, name: &'a str) -> Option<(usize, &'a RecordedEvent)> {
        self.named(name).next()
    }

    pub fn count_named(&self, name: &str) -> usize {
        self.named(name).count()
    }
}
