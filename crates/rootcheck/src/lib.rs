//! # rootcheck
//!
//! Heuristic root / tamper detection for the host the process runs on.
//!
//! No single check is conclusive. Each signal inspects one kind of
//! artifact a rooted device tends to leave behind, and the verdict is the
//! OR of them all.
//!
//! ## Signals
//!
//! - **Packages** -- root managers, root-requiring apps, cloaking apps
//! - **Binaries** -- `su`, `busybox`, `magisk` in the candidate directories
//! - **Properties** -- `ro.debuggable=1`, `ro.secure=0` (fails closed)
//! - **Mounts** -- sensitive mount points mounted read-write
//! - **Build tags** -- images signed with `test-keys`
//! - **Locate** -- `which su` finds something
//! - **Native** -- deep scan through the native bridge
//!
//! ## Data Flow
//!
//! ```text
//! DetectionConfig (defaults or TOML)
//!   -> DetectionEngine::builder()  [invoker, registry, bridge, sink]
//!   -> run each registered signal  -> Result<SignalResult>
//!   -> conclude() with FailurePolicy -> SignalOutcome (+ evidence to sink)
//!   -> OR, short-circuit or exhaustive -> bool / DetectionReport
//! ```

pub mod checks;
pub mod engine;
pub mod host;
pub mod invoker;
pub mod sink;
pub mod testing;

pub use engine::{
    DetectionEngine, EngineBuilder, SignalSpec, ROOTED_SIGNALS, ROOTED_WITH_BUSYBOX_SIGNALS,
};
pub use host::HostFacts;
pub use invoker::{ProcessInvoker, SystemInvoker};
pub use sink::{EvidenceSink, MemorySink, NoopSink, TracingSink};

/// Identifier of this host for reports.
///
/// The machine id when present, otherwise the hostname.
pub fn host_id() -> String {
    if let Ok(id) = std::fs::read_to_string("/etc/machine-id") {
        let trimmed = id.trim().to_string();
        if !trimmed.is_empty() {
            return trimmed;
        }
    }

    hostname::get().map_or_else(
        |_| "unknown".to_string(),
        |h| h.to_string_lossy().into_owned(),
    )
}
