//! Event extraction from captured logcat output.
//!
//! The SDK logs every persisted event as a header line
//! (`save event: <name> success, event json:`) followed by the event JSON
//! pretty-printed over several lines, each prefixed by the log tag. Flushes
//! to the backend are logged as `Submitted N events`.
//!
//! [`EventExtractor`] reassembles the multi-line bodies with an explicit
//! two-state machine; the submitted counts and save failures are simple
//! single-line passes.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::domain::{ExtractError, Extraction, RecordedEvent, SaveFailure};

/// Log tag the SDK's event recorder writes under.
pub const DEFAULT_TAG_MARKER: &str = "EventRecorder:";

/// Upper bound on one event's accumulated JSON text.
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 1024 * 1024;

/// Fragment that closes a pretty-printed event body.
const BODY_CLOSER: &str = " }";

fn submitted_re() -> &'static Regex {
    static SUBMITTED_RE: OnceLock<Regex> = OnceLock::new();
    SUBMITTED_RE
        .get_or_init(|| Regex::new(r"Submitted (\d+) events").expect("valid submitted regex"))
}

fn header_re() -> &'static Regex {
    static HEADER_RE: OnceLock<Regex> = OnceLock::new();
    HEADER_RE.get_or_init(|| {
        Regex::new(r"save event: (\w+) success, event json:(.*)$").expect("valid header regex")
    })
}

fn save_failure_re() -> &'static Regex {
    static SAVE_FAILURE_RE: OnceLock<Regex> = OnceLock::new();
    SAVE_FAILURE_RE.get_or_init(|| {
        Regex::new(r"Error to save event with EventType: (\w+)")
            .expect("valid save failure regex")
    })
}

/// Extractor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Marker introducing a JSON fragment; the fragment is everything after it.
    pub tag_marker: String,

    /// Only accept fragments shaped like pretty-printed JSON (` {`, an
    /// indented continuation, or ` }`). Tolerates unrelated lines logged
    /// under the same tag in the middle of an event body, and records a
    /// compact one-line JSON object logged right after the header.
    pub strict: bool,

    /// A partial event growing past this many bytes is discarded.
    pub max_buffer_bytes: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            tag_marker: DEFAULT_TAG_MARKER.to_string(),
            strict: false,
            max_buffer_bytes: DEFAULT_MAX_BUFFER_BYTES,
        }
    }
}

impl ExtractorConfig {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

/// Parser state for recorded-event reassembly.
#[derive(Debug)]
enum ParseState {
    SeekingHeader,
    AccumulatingBody {
        name: String,
        header_line: usize,
        buffer: String,
    },
}

/// Output of the recorded-event pass.
#[derive(Debug, Default)]
struct RecordedPass {
    events: Vec<RecordedEvent>,
    discarded: usize,
}

/// Collect every `Submitted N events` count, in line order.
pub fn extract_submitted<'a, I>(lines: I) -> Vec<u64>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let caps = submitted_re().captures(line)?;
            match caps[1].parse::<u64>() {
                Ok(count) => Some(count),
                Err(err) => {
                    warn!(count = &caps[1], error = %err, "ignoring unrepresentable submitted count");
                    None
                }
            }
        })
        .collect()
}

/// Collect every `Error to save event with EventType: X` observation.
pub fn extract_save_failures<'a, I>(lines: I) -> Vec<SaveFailure>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            save_failure_re().captures(line).map(|caps| SaveFailure {
                event_type: caps[1].to_string(),
                line: idx + 1,
            })
        })
        .collect()
}

/// Reassembles recorded events from log lines.
#[derive(Debug, Clone, Default)]
pub struct EventExtractor {
    config: ExtractorConfig,
}

impl EventExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run every pass over one log text.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Parse`] when a closed event body is not valid JSON.
    pub fn extract(&self, text: &str) -> Result<Extraction, ExtractError> {
        let submitted = extract_submitted(text.lines());
        let pass = self.recorded_pass(text.lines())?;
        let save_failures = extract_save_failures(text.lines());

        let extraction = Extraction {
            submitted,
            recorded: pass.events,
            save_failures,
            discarded_partial: pass.discarded,
        };
        debug!(
            submitted_total = extraction.submitted_total(),
            recorded = extraction.recorded.len(),
            discarded = extraction.discarded_partial,
            save_failures = extraction.save_failures.len(),
            "extraction complete"
        );
        Ok(extraction)
    }

    /// Reassemble recorded events, in header-line order.
    ///
    /// A body still open at end of input is dropped without error.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Parse`] when a closed event body is not valid JSON.
    pub fn extract_recorded<'a, I>(&self, lines: I) -> Result<Vec<RecordedEvent>, ExtractError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.recorded_pass(lines).map(|pass| pass.events)
    }

    fn recorded_pass<'a, I>(&self, lines: I) -> Result<RecordedPass, ExtractError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut pass = RecordedPass::default();
        let mut state = ParseState::SeekingHeader;

        for (idx, line) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            state = match state {
                ParseState::SeekingHeader => self.seek_header(line, line_no, &mut pass)?,
                ParseState::AccumulatingBody {
                    name,
                    header_line,
                    buffer,
                } => self.accumulate(line, name, header_line, buffer, &mut pass)?,
            };
        }

        if let ParseState::AccumulatingBody {
            name, header_line, ..
        } = state
        {
            debug!(event = %name, header_line, "dropping unterminated event at end of input");
            pass.discarded += 1;
        }

        Ok(pass)
    }

    fn seek_header(
        &self,
        line: &str,
        line_no: usize,
        pass: &mut RecordedPass,
    ) -> Result<ParseState, ExtractError> {
        let Some(caps) = header_re().captures(line) else {
            return Ok(ParseState::SeekingHeader);
        };
        let name = caps[1].to_string();
        let rest = caps.get(2).map_or("", |m| m.as_str());

        match rest.trim() {
            "" => Ok(ParseState::AccumulatingBody {
                name,
                header_line: line_no,
                buffer: String::new(),
            }),
            "{" => Ok(ParseState::AccumulatingBody {
                name,
                header_line: line_no,
                buffer: rest.to_string(),
            }),
            inline => {
                let payload = parse_body(&name, line_no, inline)?;
                trace!(event = %name, line = line_no, "recorded single-line event");
                pass.events.push(RecordedEvent::new(name, payload, line_no));
                Ok(ParseState::SeekingHeader)
            }
        }
    }

    fn accumulate(
        &self,
        line: &str,
        name: String,
        header_line: usize,
        mut buffer: String,
        pass: &mut RecordedPass,
    ) -> Result<ParseState, ExtractError> {
        let keep = |buffer: String| ParseState::AccumulatingBody {
            name: name.clone(),
            header_line,
            buffer,
        };

        let Some(fragment) = self.fragment(line) else {
            return Ok(keep(buffer));
        };
        if self.config.strict && !is_json_fragment(fragment) {
            trace!(event = %name, "skipping interleaved line in strict mode");
            return Ok(keep(buffer));
        }

        if buffer.len() + fragment.len() > self.config.max_buffer_bytes {
            warn!(
                event = %name,
                header_line,
                max_buffer_bytes = self.config.max_buffer_bytes,
                "event body exceeds buffer cap, discarding"
            );
            pass.discarded += 1;
            return Ok(ParseState::SeekingHeader);
        }

        if self.config.strict && buffer.trim().is_empty() {
            if let Some(payload) = compact_body(fragment) {
                trace!(event = %name, line = header_line, "recorded compact event");
                pass.events.push(RecordedEvent::new(name, payload, header_line));
                return Ok(ParseState::SeekingHeader);
            }
        }

        buffer.push_str(fragment);
        if fragment != BODY_CLOSER {
            return Ok(keep(buffer));
        }

        let payload = parse_body(&name, header_line, &buffer)?;
        trace!(event = %name, line = header_line, "recorded event");
        pass.events.push(RecordedEvent::new(name, payload, header_line));
        Ok(ParseState::SeekingHeader)
    }

    fn fragment<'l>(&self, line: &'l str) -> Option<&'l str> {
        let marker = self.config.tag_marker.as_str();
        line.find(marker).map(|pos| &line[pos + marker.len()..])
    }
}

fn parse_body(name: &str, line: usize, body: &str) -> Result<Value, ExtractError> {
    serde_json::from_str(body).map_err(|source| ExtractError::Parse {
        event: name.to_string(),
        line,
        source,
    })
}

/// A whole JSON object logged on the line after the header.
fn compact_body(fragment: &str) -> Option<Value> {
    let body = fragment.trim();
    if !(body.starts_with('{') && body.ends_with('}')) {
        return None;
    }
    serde_json::from_str::<Value>(body)
        .ok()
        .filter(Value::is_object)
}

/// Opener, indented continuation, or closer of a pretty-printed JSON body.
fn is_json_fragment(fragment: &str) -> bool {
    if fragment.starts_with(" {") || fragment == BODY_CLOSER {
        return true;
    }
    fragment.chars().take_while(|c| c.is_whitespace()).count() >= 2
}
