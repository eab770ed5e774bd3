//! Global atomic counters for verification runs.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a batch).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Relaxed atomic counters shared by every verification task.
#[derive(Debug)]
pub struct Metrics {
    files_verified: AtomicU64,
    events_extracted: AtomicU64,
    violations_found: AtomicU64,
    parse_failures: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            files_verified: AtomicU64::new(0),
            events_extracted: AtomicU64::new(0),
            violations_found: AtomicU64::new(0),
            parse_failures: AtomicU64::new(0),
        }
    }

    pub fn inc_files_verified(&self) {
        self.files_verified.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "files_verified", "counter incremented");
    }

    pub fn add_events_extracted(&self, n: u64) {
        self.events_extracted.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "events_extracted", n, "counter incremented");
    }

    pub fn add_violations(&self, n: u64) {
        self.violations_found.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "violations_found", n, "counter incremented");
    }

    /// Count a file that could not be read or parsed.
    pub fn inc_parse_failures(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "parse_failures", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            files_verified = self.files_verified(),
            events_extracted = self.events_extracted(),
            violations_found = self.violations_found(),
            parse_failures = self.parse_failures(),
        );
    }

    pub fn files_verified(&self) -> u64 {
        self.files_verified.load(Ordering::Relaxed)
    }

    pub fn events_extracted(&self) -> u64 {
        self.events_extracted.load(Ordering::Relaxed)
    }

    pub fn violations_found(&self) -> u64 {
        self.violations_found.load(Ordering::Relaxed)
    }

    pub fn parse_failures(&self) -> u64 {
        self.parse_failures.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.files_verified.store(0, Ordering::Relaxed);
        self.events_extracted.store(0, Ordering::Relaxed);
        self.violations_found.store(0, Ordering::Relaxed);
        self.parse_failures.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment() {
        let m = Metrics::new();
        m.inc_files_verified();
        m.inc_files_verified();
        assert_eq!(m.files_verified(), 2);

        m.add_events_extracted(17);
        assert_eq!(m.events_extracted(), 17);

        m.add_violations(3);
        m.inc_parse_failures();
        assert_eq!(m.violations_found(), 3);
        assert_eq!(m.parse_failures(), 1);
    }

    #[test]
    fn reset_zeroes_all() {
        let m = Metrics::new();
        m.inc_files_verified();
        m.add_events_extracted(4);
        m.add_violations(1);
        m.inc_parse_failures();
        m.reset();
        assert_eq!(m.files_verified(), 0);
        assert_eq!(m.events_extracted(), 0);
        assert_eq!(m.violations_found(), 0);
        assert_eq!(m.parse_failures(), 0);
    }
}
