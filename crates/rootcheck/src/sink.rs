//! Evidence sinks -- where positive findings and failures are reported.

use std::sync::{Mutex, PoisonError};
use tracing::warn;

use rootcheck_core::SignalKind;

/// Receives evidence strings as signals are evaluated.
pub trait EvidenceSink: Send + Sync {
    /// Record one piece of evidence for `signal`.
    fn record(&self, signal: SignalKind, evidence: &str);
}

/// Discards everything. The engine default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EvidenceSink for NoopSink {
    fn record(&self, _signal: SignalKind, _evidence: &str) {}
}

/// Emits each piece of evidence as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EvidenceSink for TracingSink {
    fn record(&self, signal: SignalKind, evidence: &str) {
        warn!(signal = %signal, evidence, "root evidence");
    }
}

/// Keeps evidence in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(SignalKind, String)>>,
}

impl MemorySink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<(SignalKind, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Signals that recorded anything, in first-seen order.
    pub fn signals(&self) -> Vec<SignalKind> {
        let mut seen = Vec::new();
        for (signal, _) in self.entries() {
            if !seen.contains(&signal) {
                seen.push(signal);
            }
        }
        seen
    }
}

impl EvidenceSink for MemorySink {
    fn record(&self, signal: SignalKind, evidence: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((signal, evidence.to_string()));
    }
}
