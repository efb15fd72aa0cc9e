//! Optional, caller-supplied statistics collection (spec §9 "Global mutable
//! state").
//!
//! AntCrypt's C reference keeps process-wide counters behind a
//! `PHC_DEBUG_STATISTICS` macro. A reentrant kernel has no business owning
//! global state, so the same information — how often each round-function
//! variant fired — is offered to an optional collector the caller passes
//! in. No collector means no bookkeeping at all.

/// Sink for round-function usage counts. Implementations decide whether to
/// aggregate, log, or export the counts; the kernel only calls `record`.
pub trait StatsCollector {
    fn record(&mut self, function_index: u8);
}

/// A [`StatsCollector`] that does nothing; the default when the caller
/// passes `None`.
#[derive(Debug, Default)]
pub struct NullCollector;

impl StatsCollector for NullCollector {
    fn record(&mut self, _function_index: u8) {}
}

/// A [`StatsCollector`] that tallies counts per function index, for callers
/// that want the AntCrypt-style histogram without the global variables.
#[derive(Debug, Default)]
pub struct CountingCollector {
    counts: Vec<u64>,
}

impl CountingCollector {
    pub fn new(function_count: usize) -> Self {
        Self {
            counts: vec![0; function_count],
        }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }
}

impl StatsCollector for CountingCollector {
    fn record(&mut self, function_index: u8) {
        if let Some(slot) = self.counts.get_mut(function_index as usize) {
            *slot += 1;
        }
    }
}
