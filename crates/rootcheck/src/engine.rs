//! Detection engine -- owns the registered signals and combines them.
//!
//! Each signal is registered with a `FailurePolicy`. A check that fails
//! returns an error; the engine converts it to the policy's boolean, so
//! no error ever reaches a verdict.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use rootcheck_core::known::{BINARY_BUSYBOX, BINARY_MAGISK, BINARY_SU};
use rootcheck_core::{
    CheckError, DetectionConfig, DetectionReport, FailurePolicy, MountLineFormat, Result,
    SignalKind, SignalOutcome, SignalResult, SignalStatus, Strategy,
};

use crate::checks::{self, native, HostBridge, NativeBridge, PackageRegistry, PmRegistry};
use crate::host::{self, HostFacts};
use crate::invoker::{ProcessInvoker, SystemInvoker};
use crate::sink::{EvidenceSink, NoopSink};

/// Signals of `is_rooted()`, in evaluation order.
pub const ROOTED_SIGNALS: [SignalKind; 9] = [
    SignalKind::RootManagementApps,
    SignalKind::DangerousApps,
    SignalKind::SuBinary,
    SignalKind::DangerousProps,
    SignalKind::RwPaths,
    SignalKind::TestKeys,
    SignalKind::SuExists,
    SignalKind::RootNative,
    SignalKind::MagiskBinary,
];

/// Signals of `is_rooted_with_busybox_check()`, in evaluation order.
pub const ROOTED_WITH_BUSYBOX_SIGNALS: [SignalKind; 10] = [
    SignalKind::RootManagementApps,
    SignalKind::DangerousApps,
    SignalKind::SuBinary,
    SignalKind::BusyBoxBinary,
    SignalKind::DangerousProps,
    SignalKind::RwPaths,
    SignalKind::TestKeys,
    SignalKind::SuExists,
    SignalKind::RootNative,
    SignalKind::MagiskBinary,
];

/// A signal as registered with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalSpec {
    /// Which check
    pub kind: SignalKind,
    /// How its failures convert to a boolean
    pub policy: FailurePolicy,
}

/// Root detection engine.
///
/// ```rust,ignore
/// let engine = DetectionEngine::builder(DetectionConfig::default())
///     .sink(Arc::new(TracingSink))
///     .build();
/// if engine.is_rooted() {
///     // degrade
/// }
/// ```
pub struct DetectionEngine {
    config: DetectionConfig,
    invoker: Arc<dyn ProcessInvoker>,
    registry: Arc<dyn PackageRegistry>,
    bridge: Arc<dyn NativeBridge>,
    sink: Arc<dyn EvidenceSink>,
    policies: HashMap<SignalKind, FailurePolicy>,
    logging: AtomicBool,
}

/// Builder for `DetectionEngine`. Unset collaborators use the host.
pub struct EngineBuilder {
    config: DetectionConfig,
    invoker: Option<Arc<dyn ProcessInvoker>>,
    registry: Option<Arc<dyn PackageRegistry>>,
    bridge: Option<Arc<dyn NativeBridge>>,
    sink: Arc<dyn EvidenceSink>,
    policies: HashMap<SignalKind, FailurePolicy>,
    logging: bool,
}

impl EngineBuilder {
    /// Command runner (default: `SystemInvoker` with the config timeout).
    #[must_use]
    pub fn invoker(mut self, invoker: Arc<dyn ProcessInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    /// Package registry (default: `PmRegistry` over the invoker).
    #[must_use]
    pub fn registry(mut self, registry: Arc<dyn PackageRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Native bridge (default: `HostBridge`).
    #[must_use]
    pub fn bridge(mut self, bridge: Arc<dyn NativeBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Evidence sink (default: `NoopSink`).
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn EvidenceSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Register `kind` with a non-default failure policy.
    #[must_use]
    pub fn policy(mut self, kind: SignalKind, policy: FailurePolicy) -> Self {
        self.policies.insert(kind, policy);
        self
    }

    /// Initial state of the logging toggle (default: enabled).
    #[must_use]
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    /// Finish building.
    pub fn build(self) -> DetectionEngine {
        let invoker = self.invoker.unwrap_or_else(|| {
            Arc::new(SystemInvoker::new(self.config.command_timeout()))
        });
        let registry = self.registry.unwrap_or_else(|| {
            Arc::new(PmRegistry::new(
                Arc::clone(&invoker),
                self.config.commands.package_query.clone(),
            ))
        });
        let bridge = self
            .bridge
            .unwrap_or_else(|| Arc::new(HostBridge::from_config(&self.config)));

        DetectionEngine {
            config: self.config,
            invoker,
            registry,
            bridge,
            sink: self.sink,
            policies: self.policies,
            logging: AtomicBool::new(self.logging),
        }
    }
}

impl DetectionEngine {
    /// Start building an engine.
    pub fn builder(config: DetectionConfig) -> EngineBuilder {
        EngineBuilder {
            config,
            invoker: None,
            registry: None,
            bridge: None,
            sink: Arc::new(NoopSink),
            policies: HashMap::new(),
            logging: true,
        }
    }

    /// Engine over the real host with default collaborators.
    pub fn new(config: DetectionConfig) -> Self {
        Self::builder(config).build()
    }

    /// Configuration in use.
    pub const fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// SDK level and build tags as the checks see them.
    pub fn host_facts(&self) -> HostFacts {
        HostFacts::resolve(&self.config, self.invoker.as_ref())
    }

    /// Enable or disable evidence emission.
    pub fn set_logging(&self, enabled: bool) {
        self.logging.store(enabled, Ordering::Relaxed);
    }

    /// Whether evidence is emitted.
    pub fn logging_enabled(&self) -> bool {
        self.logging.load(Ordering::Relaxed)
    }

    /// Registration of one signal.
    pub fn spec(&self, kind: SignalKind) -> SignalSpec {
        SignalSpec {
            kind,
            policy: self
                .policies
                .get(&kind)
                .copied()
                .unwrap_or_else(|| kind.default_policy()),
        }
    }

    /// Registered signals of a verdict, in evaluation order.
    pub fn verdict_specs(&self, include_busybox: bool) -> Vec<SignalSpec> {
        let kinds: &[SignalKind] = if include_busybox {
            &ROOTED_WITH_BUSYBOX_SIGNALS
        } else {
            &ROOTED_SIGNALS
        };
        kinds.iter().map(|k| self.spec(*k)).collect()
    }

    // ------------------------------------------------------------------
    // Verdicts
    // ------------------------------------------------------------------

    /// Short-circuit OR of the nine default signals.
    pub fn is_rooted(&self) -> bool {
        self.aggregate(&self.verdict_specs(false), Strategy::ShortCircuit).0
    }

    /// `is_rooted()` plus the busybox probe.
    ///
    /// Busybox ships on many production devices, so this is noisier.
    pub fn is_rooted_with_busybox_check(&self) -> bool {
        self.aggregate(&self.verdict_specs(true), Strategy::ShortCircuit).0
    }

    /// Verdict with every signal's outcome.
    pub fn report(&self, strategy: Strategy, include_busybox: bool) -> DetectionReport {
        let (rooted, outcomes) = self.aggregate(&self.verdict_specs(include_busybox), strategy);
        DetectionReport {
            host_id: crate::host_id(),
            collected_at: Utc::now(),
            strategy,
            concurrent: false,
            rooted,
            outcomes,
        }
    }

    /// Exhaustive verdict with every signal on its own blocking task.
    ///
    /// A signal still running at the deadline resolves through its
    /// failure policy; the task itself is left to finish in the background.
    /// Evidence is emitted in registration order once all signals resolve.
    pub async fn report_concurrent(
        self: &Arc<Self>,
        include_busybox: bool,
        timeout: Duration,
    ) -> DetectionReport {
        let specs = self.verdict_specs(include_busybox);
        let deadline = tokio::time::Instant::now() + timeout;

        let handles: Vec<_> = specs
            .iter()
            .map(|spec| {
                let engine = Arc::clone(self);
                let kind = spec.kind;
                tokio::task::spawn_blocking(move || engine.run(kind, &[]))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(specs.len());
        for (spec, handle) in specs.iter().zip(handles) {
            let result = match tokio::time::timeout_at(deadline, handle).await {
                Ok(Ok(result)) => result,
                Ok(Err(join)) => Err(CheckError::Aborted(join.to_string())),
                Err(_) => Err(CheckError::Timeout(timeout)),
            };
            outcomes.push(self.conclude(*spec, result));
        }

        DetectionReport {
            host_id: crate::host_id(),
            collected_at: Utc::now(),
            strategy: Strategy::Exhaustive,
            concurrent: true,
            rooted: outcomes.iter().any(SignalOutcome::is_positive),
            outcomes,
        }
    }

    fn aggregate(&self, specs: &[SignalSpec], strategy: Strategy) -> (bool, Vec<SignalOutcome>) {
        let mut rooted = false;
        let mut outcomes = Vec::with_capacity(specs.len());

        for spec in specs {
            if rooted && strategy == Strategy::ShortCircuit {
                outcomes.push(SignalOutcome::skipped(spec.kind, spec.policy));
                continue;
            }
            let outcome = self.evaluate(*spec, &[]);
            rooted |= outcome.is_positive();
            outcomes.push(outcome);
        }

        (rooted, outcomes)
    }

    // ------------------------------------------------------------------
    // Individual signals
    // ------------------------------------------------------------------

    /// Evaluate one signal with its registered policy.
    ///
    /// `additional` extends package lists for package signals and adds
    /// binary names for binary signals; other signals ignore it.
    pub fn outcome(&self, kind: SignalKind, additional: &[&str]) -> SignalOutcome {
        self.evaluate(self.spec(kind), additional)
    }

    /// Boolean of one signal with its registered policy.
    pub fn signal(&self, kind: SignalKind) -> bool {
        self.outcome(kind, &[]).is_positive()
    }

    /// Known root management apps installed.
    pub fn detect_root_management_apps(&self, additional: &[&str]) -> bool {
        self.outcome(SignalKind::RootManagementApps, additional).is_positive()
    }

    /// Known root-requiring apps installed.
    pub fn detect_potentially_dangerous_apps(&self, additional: &[&str]) -> bool {
        self.outcome(SignalKind::DangerousApps, additional).is_positive()
    }

    /// Known cloaking apps installed, or the native library loads but is unreadable.
    pub fn detect_root_cloaking_apps(&self, additional: &[&str]) -> bool {
        self.outcome(SignalKind::RootCloakingApps, additional).is_positive()
    }

    /// Build signed with test keys.
    pub fn detect_test_keys(&self) -> bool {
        self.signal(SignalKind::TestKeys)
    }

    /// `name` present in any candidate directory.
    pub fn check_for_binary(&self, name: &str) -> bool {
        let paths = checks::candidate_paths(&self.config);
        let result = checks::check_for_binary(name, &paths);
        let signal = match name {
            BINARY_SU => Some(SignalKind::SuBinary),
            BINARY_BUSYBOX => Some(SignalKind::BusyBoxBinary),
            BINARY_MAGISK => Some(SignalKind::MagiskBinary),
            _ => None,
        };
        match signal {
            Some(signal) => self.emit_evidence(signal, &result.evidence),
            None => {
                for entry in &result.evidence {
                    debug!(binary = name, evidence = %entry, "binary found");
                }
            }
        }
        result.positive
    }

    /// `su` present in any candidate directory.
    pub fn check_for_su_binary(&self) -> bool {
        self.signal(SignalKind::SuBinary)
    }

    /// `busybox` present in any candidate directory.
    pub fn check_for_busybox_binary(&self) -> bool {
        self.signal(SignalKind::BusyBoxBinary)
    }

    /// `magisk` present in any candidate directory.
    pub fn check_for_magisk_binary(&self) -> bool {
        self.signal(SignalKind::MagiskBinary)
    }

    /// Dangerous properties set. Fails closed: an unreadable dump is `true`.
    pub fn check_for_dangerous_props(&self) -> bool {
        self.signal(SignalKind::DangerousProps)
    }

    /// Sensitive mount point mounted read-write.
    pub fn check_for_rw_paths(&self) -> bool {
        self.signal(SignalKind::RwPaths)
    }

    /// `which su` finds something.
    pub fn check_su_exists(&self) -> bool {
        self.signal(SignalKind::SuExists)
    }

    /// Native scan finds `su`.
    pub fn check_for_root_native(&self) -> bool {
        self.signal(SignalKind::RootNative)
    }

    /// Whether the native bridge loaded.
    pub fn can_load_native_library(&self) -> bool {
        native::can_load(self.bridge.as_ref())
    }

    /// Whether the loaded native library can be read back.
    pub fn check_for_native_library_read_access(&self) -> bool {
        native::has_read_access(self.bridge.as_ref())
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn evaluate(&self, spec: SignalSpec, additional: &[&str]) -> SignalOutcome {
        self.conclude(spec, self.run(spec.kind, additional))
    }

    fn run(&self, kind: SignalKind, additional: &[&str]) -> Result<SignalResult> {
        let config = &self.config;
        let invoker = self.invoker.as_ref();

        match kind {
            SignalKind::RootManagementApps => {
                self.packages(&config.root_management_apps, additional)
            }
            SignalKind::DangerousApps => self.packages(&config.dangerous_apps, additional),
            SignalKind::RootCloakingApps => self.cloaking(additional),
            SignalKind::SuBinary => Ok(self.binaries(BINARY_SU, additional)),
            SignalKind::BusyBoxBinary => Ok(self.binaries(BINARY_BUSYBOX, additional)),
            SignalKind::MagiskBinary => Ok(self.binaries(BINARY_MAGISK, additional)),
            SignalKind::DangerousProps => checks::check_for_dangerous_props(
                invoker,
                &config.commands.properties,
                &config.dangerous_props,
            ),
            SignalKind::RwPaths => {
                let sdk = host::sdk_version(config, invoker);
                let format = MountLineFormat::for_sdk(sdk, config.legacy_mount_max_sdk);
                checks::check_for_rw_paths(
                    invoker,
                    &config.commands.mounts,
                    format,
                    &config.sensitive_mounts,
                )
            }
            SignalKind::TestKeys => Ok(checks::detect_test_keys(
                host::build_tags(config, invoker).as_deref(),
            )),
            SignalKind::SuExists => checks::check_su_exists(invoker, &config.commands.locate),
            SignalKind::RootNative => {
                let candidates =
                    checks::full_paths(BINARY_SU, &checks::candidate_paths(config));
                checks::check_for_root_native(self.bridge.as_ref(), &candidates)
            }
        }
    }

    fn packages(&self, base: &[String], additional: &[&str]) -> Result<SignalResult> {
        let names = checks::merged_list(base, additional);
        checks::is_any_package_installed(self.registry.as_ref(), &names)
    }

    fn binaries(&self, primary: &str, additional: &[&str]) -> SignalResult {
        let paths = checks::candidate_paths(&self.config);
        let mut result = checks::check_for_binary(primary, &paths);
        for name in additional {
            let extra = checks::check_for_binary(name, &paths);
            result.positive |= extra.positive;
            result.evidence.extend(extra.evidence);
        }
        result
    }

    fn cloaking(&self, additional: &[&str]) -> Result<SignalResult> {
        let packages = self.packages(&self.config.root_cloaking_apps, additional);
        let cloak = native::detect_cloak(self.bridge.as_ref());

        match (packages, cloak) {
            (Ok(mut result), Some(evidence)) => {
                result.evidence.push(evidence);
                result.positive = true;
                Ok(result)
            }
            (Ok(result), None) => Ok(result),
            (Err(_), Some(evidence)) => Ok(SignalResult::from_evidence(vec![evidence])),
            (Err(e), None) => Err(e),
        }
    }

    fn conclude(&self, spec: SignalSpec, result: Result<SignalResult>) -> SignalOutcome {
        let outcome = match result {
            Ok(result) => SignalOutcome {
                signal: spec.kind,
                policy: spec.policy,
                status: if result.positive {
                    SignalStatus::Positive
                } else {
                    SignalStatus::Negative
                },
                evidence: result.evidence,
            },
            Err(e) => {
                let assumed = spec.policy.on_failure();
                debug!(signal = %spec.kind, error = %e, assumed, "signal failed");
                SignalOutcome {
                    signal: spec.kind,
                    policy: spec.policy,
                    status: SignalStatus::Failed {
                        reason: e.to_string(),
                        assumed,
                    },
                    evidence: Vec::new(),
                }
            }
        };

        self.emit_evidence(outcome.signal, &outcome.evidence);
        if let SignalStatus::Failed {
            reason,
            assumed: true,
        } = &outcome.status
        {
            self.emit_evidence(
                outcome.signal,
                &[format!("check failed, assuming root: {reason}")],
            );
        }
        outcome
    }

    fn emit_evidence(&self, signal: SignalKind, evidence: &[String]) {
        if !self.logging_enabled() {
            return;
        }
        for entry in evidence {
            self.sink.record(signal, entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::InstalledSet;
    use crate::sink::MemorySink;
    use crate::testing::{FakeBridge, ScriptedInvoker};

    /// Config with nothing on disk to find and no `$PATH` merging.
    fn isolated_config() -> DetectionConfig {
        DetectionConfig {
            su_paths: vec!["/nonexistent/rootcheck/".into()],
            include_path_env: false,
            ..DetectionConfig::default()
        }
    }

    fn clean_invoker() -> ScriptedInvoker {
        ScriptedInvoker::new()
            .respond("getprop", &["[ro.debuggable]: [0]", "[ro.secure]: [1]"])
            .respond("getprop ro.build.version.sdk", &["33"])
            .respond("getprop ro.build.tags", &["release-keys"])
            .respond(
                "mount",
                &["/dev/block/dm-0 on /system type ext4 (ro,seclabel,relatime)"],
            )
            .respond("which su", &[])
    }

    fn engine(invoker: ScriptedInvoker, installed: &[&str], sink: Arc<MemorySink>) -> DetectionEngine {
        DetectionEngine::builder(isolated_config())
            .invoker(Arc::new(invoker))
            .registry(Arc::new(InstalledSet::new(installed.iter().copied())))
            .bridge(Arc::new(FakeBridge::clean()))
            .sink(sink)
            .build()
    }

    #[test]
    fn clean_host_is_not_rooted() {
        let sink = Arc::new(MemorySink::new());
        let engine = engine(clean_invoker(), &[], Arc::clone(&sink));

        assert!(!engine.is_rooted());
        assert!(!engine.is_rooted_with_busybox_check());
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn short_circuit_skips_later_signals() {
        let sink = Arc::new(MemorySink::new());
        let engine = engine(clean_invoker(), &["com.topjohnwu.magisk"], Arc::clone(&sink));

        let report = engine.report(Strategy::ShortCircuit, false);
        assert!(report.rooted);
        assert_eq!(report.outcomes.len(), 9);
        assert_eq!(report.outcomes[0].status, SignalStatus::Positive);
        assert!(report.outcomes[1..]
            .iter()
            .all(|o| o.status == SignalStatus::Skipped));
        assert_eq!(sink.signals(), vec![SignalKind::RootManagementApps]);
    }

    #[test]
    fn exhaustive_evaluates_everything() {
        let sink = Arc::new(MemorySink::new());
        let invoker = clean_invoker().respond("which su", &["/system/xbin/su"]);
        let engine = engine(invoker, &["com.topjohnwu.magisk"], Arc::clone(&sink));

        let report = engine.report(Strategy::Exhaustive, true);
        assert!(report.rooted);
        assert_eq!(report.outcomes.len(), 10);
        assert!(report.outcomes.iter().all(|o| o.status != SignalStatus::Skipped));
        assert_eq!(
            report.positives(),
            vec![SignalKind::RootManagementApps, SignalKind::SuExists]
        );
        assert_eq!(
            sink.signals(),
            vec![SignalKind::RootManagementApps, SignalKind::SuExists]
        );
    }

    #[test]
    fn props_failure_fails_closed() {
        let invoker = ScriptedInvoker::new();
        let engine = engine(invoker, &[], Arc::new(MemorySink::new()));

        assert!(engine.check_for_dangerous_props());
        assert!(!engine.check_for_rw_paths());
        assert!(!engine.check_su_exists());
        assert!(engine.is_rooted());
    }

    #[test]
    fn policy_override_at_registration() {
        let engine = DetectionEngine::builder(isolated_config())
            .invoker(Arc::new(ScriptedInvoker::new()))
            .registry(Arc::new(InstalledSet::default()))
            .bridge(Arc::new(FakeBridge::clean()))
            .policy(SignalKind::DangerousProps, FailurePolicy::FailOpen)
            .build();

        assert!(!engine.check_for_dangerous_props());
        assert!(!engine.is_rooted());
    }

    #[test]
    fn legacy_sdk_selects_legacy_mount_layout() {
        let invoker = clean_invoker()
            .respond("getprop ro.build.version.sdk", &["19"])
            .respond("mount", &["/dev/block/mtdblock0 /system yaffs2 rw,relatime"]);
        let engine = engine(invoker, &[], Arc::new(MemorySink::new()));
        assert!(engine.check_for_rw_paths());
    }

    #[test]
    fn test_keys_count_toward_verdict() {
        let invoker = clean_invoker().respond("getprop ro.build.tags", &["test-keys"]);
        let engine = engine(invoker, &[], Arc::new(MemorySink::new()));
        assert!(engine.detect_test_keys());
        assert!(engine.is_rooted());
    }

    #[test]
    fn additional_packages_extend_lists() {
        let engine = engine(clean_invoker(), &["com.example.rootapp"], Arc::new(MemorySink::new()));
        assert!(!engine.detect_root_management_apps(&[]));
        assert!(engine.detect_root_management_apps(&["com.example.rootapp"]));
        assert!(engine.detect_potentially_dangerous_apps(&["com.example.rootapp"]));
    }

    #[test]
    fn cloaking_uses_read_probe() {
        let engine = DetectionEngine::builder(isolated_config())
            .invoker(Arc::new(clean_invoker()))
            .registry(Arc::new(InstalledSet::default()))
            .bridge(Arc::new(FakeBridge {
                readable: false,
                ..FakeBridge::clean()
            }))
            .build();

        assert!(engine.can_load_native_library());
        assert!(!engine.check_for_native_library_read_access());
        assert!(engine.detect_root_cloaking_apps(&[]));
        assert!(!engine.is_rooted());
    }

    #[test]
    fn ad_hoc_binaries_are_not_attributed_to_su() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::File::create(dir.path().join("frida-server")).unwrap();
        std::fs::File::create(dir.path().join("busybox")).unwrap();

        let sink = Arc::new(MemorySink::new());
        let engine = DetectionEngine::builder(DetectionConfig {
            su_paths: vec![format!("{}/", dir.path().display())],
            include_path_env: false,
            ..DetectionConfig::default()
        })
        .invoker(Arc::new(clean_invoker()))
        .registry(Arc::new(InstalledSet::default()))
        .bridge(Arc::new(FakeBridge::clean()))
        .sink(sink.clone())
        .build();

        assert!(engine.check_for_binary("frida-server"));
        assert!(sink.entries().is_empty());

        assert!(engine.check_for_binary("busybox"));
        assert_eq!(sink.signals(), vec![SignalKind::BusyBoxBinary]);
    }

    #[test]
    fn logging_toggle_silences_sink() {
        let sink = Arc::new(MemorySink::new());
        let engine = engine(clean_invoker(), &["eu.chainfire.supersu"], Arc::clone(&sink));

        engine.set_logging(false);
        assert!(engine.detect_root_management_apps(&[]));
        assert!(sink.entries().is_empty());

        engine.set_logging(true);
        assert!(engine.detect_root_management_apps(&[]));
        assert_eq!(sink.entries().len(), 1);
    }

    #[test]
    fn repeated_calls_agree() {
        let engine = engine(clean_invoker(), &[], Arc::new(MemorySink::new()));
        let first = engine.report(Strategy::Exhaustive, true);
        let second = engine.report(Strategy::Exhaustive, true);
        assert_eq!(first.rooted, second.rooted);
        assert_eq!(first.outcomes, second.outcomes);
    }

    #[tokio::test]
    async fn concurrent_report_matches_exhaustive() {
        let invoker = clean_invoker().respond("which su", &["/sbin/su"]);
        let engine = Arc::new(engine(invoker, &[], Arc::new(MemorySink::new())));

        let sequential = engine.report(Strategy::Exhaustive, true);
        let concurrent = engine.report_concurrent(true, Duration::from_secs(5)).await;

        assert!(concurrent.concurrent);
        assert_eq!(concurrent.rooted, sequential.rooted);
        assert_eq!(concurrent.positives(), sequential.positives());
    }

    #[tokio::test]
    async fn concurrent_timeout_follows_policy() {
        let invoker = clean_invoker()
            .respond_slowly("getprop", Duration::from_secs(1), &["[ro.secure]: [1]"])
            .respond_slowly("mount", Duration::from_secs(1), &[]);
        let engine = Arc::new(engine(invoker, &[], Arc::new(MemorySink::new())));

        let report = engine
            .report_concurrent(false, Duration::from_millis(200))
            .await;

        let props = report.outcome(SignalKind::DangerousProps).unwrap();
        let mounts = report.outcome(SignalKind::RwPaths).unwrap();
        assert!(matches!(props.status, SignalStatus::Failed { assumed: true, .. }));
        assert!(matches!(mounts.status, SignalStatus::Failed { assumed: false, .. }));
        assert!(report.rooted);

        let SignalStatus::Failed { reason, .. } = &props.status else {
            unreachable!();
        };
        assert!(reason.contains("200ms"), "{reason}");
    }
}
