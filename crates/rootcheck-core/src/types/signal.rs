//! Signal identities, failure policies and per-call results.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One independent heuristic check.
///
/// Identity is the kebab-case name; the variant order here is not the
/// aggregation order (see `DetectionEngine`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    /// Known root management packages installed
    RootManagementApps,
    /// Known root-requiring packages installed
    DangerousApps,
    /// Known root-cloaking packages installed, or cloaked native library
    RootCloakingApps,
    /// `su` present in a candidate directory
    SuBinary,
    /// `busybox` present in a candidate directory
    #[serde(rename = "busybox-binary")]
    BusyBoxBinary,
    /// `magisk` present in a candidate directory
    MagiskBinary,
    /// Debuggable or insecure system properties
    DangerousProps,
    /// Sensitive mount point mounted read-write
    RwPaths,
    /// Build signed with test keys
    TestKeys,
    /// `which su` finds something
    SuExists,
    /// Native bridge finds `su`
    RootNative,
}

impl SignalKind {
    /// Every signal, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::RootManagementApps,
        Self::DangerousApps,
        Self::RootCloakingApps,
        Self::SuBinary,
        Self::BusyBoxBinary,
        Self::MagiskBinary,
        Self::DangerousProps,
        Self::RwPaths,
        Self::TestKeys,
        Self::SuExists,
        Self::RootNative,
    ];

    /// Stable kebab-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RootManagementApps => "root-management-apps",
            Self::DangerousApps => "dangerous-apps",
            Self::RootCloakingApps => "root-cloaking-apps",
            Self::SuBinary => "su-binary",
            Self::BusyBoxBinary => "busybox-binary",
            Self::MagiskBinary => "magisk-binary",
            Self::DangerousProps => "dangerous-props",
            Self::RwPaths => "rw-paths",
            Self::TestKeys => "test-keys",
            Self::SuExists => "su-exists",
            Self::RootNative => "root-native",
        }
    }

    /// Policy applied when this signal's leaf dependency fails.
    ///
    /// The property scan is the only fail-closed signal: an unreadable
    /// property dump is reported as root.
    #[must_use]
    pub const fn default_policy(self) -> FailurePolicy {
        match self {
            Self::DangerousProps => FailurePolicy::FailClosed,
            _ => FailurePolicy::FailOpen,
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|k| k.name()).collect();
                format!("unknown signal `{s}`, expected one of: {}", names.join(", "))
            })
    }
}

/// How a leaf failure converts into a boolean contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Failure counts as "no evidence of root"
    FailOpen,
    /// Failure counts as "assume root"
    FailClosed,
}

impl FailurePolicy {
    /// Boolean a failed signal contributes to the verdict.
    #[must_use]
    pub const fn on_failure(self) -> bool {
        matches!(self, Self::FailClosed)
    }
}

/// Raw result of one successful check invocation. Never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalResult {
    /// Whether root evidence was found
    pub positive: bool,
    /// Human-readable evidence, one entry per hit
    pub evidence: Vec<String>,
}

impl SignalResult {
    /// A result with no evidence.
    #[must_use]
    pub const fn negative() -> Self {
        Self {
            positive: false,
            evidence: Vec::new(),
        }
    }

    /// Positive iff at least one piece of evidence was collected.
    #[must_use]
    pub fn from_evidence(evidence: Vec<String>) -> Self {
        Self {
            positive: !evidence.is_empty(),
            evidence,
        }
    }
}

/// What happened to a signal during one verdict computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SignalStatus {
    /// Ran and found evidence
    Positive,
    /// Ran and found nothing
    Negative,
    /// Leaf dependency failed; `assumed` is the policy's contribution
    Failed {
        /// Rendered error
        reason: String,
        /// Boolean contributed by the failure policy
        assumed: bool,
    },
    /// Not evaluated because an earlier signal short-circuited
    Skipped,
}

/// A signal's status plus its evidence, as recorded in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalOutcome {
    /// Which signal
    pub signal: SignalKind,
    /// Policy it was registered with
    pub policy: FailurePolicy,
    /// Result of evaluation
    #[serde(flatten)]
    pub status: SignalStatus,
    /// Evidence strings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,
}

impl SignalOutcome {
    /// Outcome for a signal that was never evaluated.
    #[must_use]
    pub const fn skipped(signal: SignalKind, policy: FailurePolicy) -> Self {
        Self {
            signal,
            policy,
            status: SignalStatus::Skipped,
            evidence: Vec::new(),
        }
    }

    /// Boolean this outcome contributes to the verdict.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        match &self.status {
            SignalStatus::Positive => true,
            SignalStatus::Failed { assumed, .. } => *assumed,
            SignalStatus::Negative | SignalStatus::Skipped => false,
        }
    }
}
