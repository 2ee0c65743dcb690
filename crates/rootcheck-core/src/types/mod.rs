//! Core types for root detection.

pub mod mount;
pub mod report;
pub mod signal;

pub use mount::{MountEntry, MountLineFormat};
pub use report::{DetectionReport, Strategy};
pub use signal::{FailurePolicy, SignalKind, SignalOutcome, SignalResult, SignalStatus};
