//! End-to-end verdicts over scripted hosts.

use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use rootcheck::checks::InstalledSet;
use rootcheck::testing::{FakeBridge, ScriptedInvoker};
use rootcheck::{DetectionEngine, MemorySink};
use rootcheck_core::{DetectionConfig, SignalKind, SignalStatus, Strategy};
use tempfile::TempDir;

fn stock_device() -> ScriptedInvoker {
    ScriptedInvoker::new()
        .respond("getprop", &["[ro.debuggable]: [0]", "[ro.secure]: [1]"])
        .respond("getprop ro.build.version.sdk", &["34"])
        .respond("getprop ro.build.tags", &["release-keys"])
        .respond(
            "mount",
            &[
                "/dev/block/dm-0 on / type ext4 (ro,seclabel,relatime)",
                "/dev/block/dm-1 on /vendor type ext4 (ro,seclabel,relatime)",
                "tmpfs on /dev type tmpfs (rw,seclabel,nosuid,relatime)",
            ],
        )
        .respond("which su", &[])
}

struct Host {
    dir: TempDir,
    sink: Arc<MemorySink>,
}

impl Host {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            sink: Arc::new(MemorySink::new()),
        }
    }

    fn config(&self) -> DetectionConfig {
        DetectionConfig {
            su_paths: vec![format!("{}/", self.dir.path().display())],
            include_path_env: false,
            ..DetectionConfig::default()
        }
    }

    fn plant(&self, binary: &str) {
        File::create(self.dir.path().join(binary)).unwrap();
    }

    fn engine(&self, invoker: ScriptedInvoker, installed: &[&str]) -> DetectionEngine {
        DetectionEngine::builder(self.config())
            .invoker(Arc::new(invoker))
            .registry(Arc::new(InstalledSet::new(installed.iter().copied())))
            .bridge(Arc::new(FakeBridge::clean()))
            .sink(self.sink.clone())
            .build()
    }
}

#[test]
fn stock_device_passes() {
    let host = Host::new();
    let engine = host.engine(stock_device(), &["com.android.chrome"]);

    let report = engine.report(Strategy::Exhaustive, true);
    assert!(!report.rooted);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.status == SignalStatus::Negative));
    assert!(host.sink.entries().is_empty());
}

#[test]
fn planted_su_is_found_by_path_probe() {
    let host = Host::new();
    host.plant("su");
    let engine = host.engine(stock_device(), &[]);

    assert!(engine.check_for_su_binary());
    assert!(!engine.check_for_magisk_binary());
    assert!(engine.is_rooted());

    let entries = host.sink.entries();
    assert_eq!(entries[0].0, SignalKind::SuBinary);
    assert!(entries[0].1.ends_with("su binary detected"));
}

#[test]
fn busybox_alone_only_trips_the_busybox_verdict() {
    let host = Host::new();
    host.plant("busybox");
    let engine = host.engine(stock_device(), &[]);

    assert!(!engine.is_rooted());
    assert!(engine.is_rooted_with_busybox_check());
    assert!(engine.check_for_binary("busybox"));
}

#[test]
fn busybox_verdict_is_a_superset() {
    let host = Host::new();
    let engine = host.engine(stock_device(), &["com.koushikdutta.superuser"]);

    assert!(engine.is_rooted());
    assert!(engine.is_rooted_with_busybox_check());
}

#[test]
fn rw_system_mount_on_modern_layout() {
    let host = Host::new();
    let invoker = stock_device().respond(
        "mount",
        &["/dev/block/dm-0 on /system type ext4 (rw,seclabel,relatime)"],
    );
    let engine = host.engine(invoker, &[]);

    let report = engine.report(Strategy::Exhaustive, false);
    assert!(report.rooted);
    assert_eq!(report.positives(), vec![SignalKind::RwPaths]);
}

#[test]
fn unreadable_properties_count_as_rooted() {
    let host = Host::new();
    let invoker = stock_device().respond("getprop", &[]);
    let engine = host.engine(invoker, &[]);

    let report = engine.report(Strategy::Exhaustive, false);
    let props = report.outcome(SignalKind::DangerousProps).unwrap();
    assert!(matches!(props.status, SignalStatus::Failed { assumed: true, .. }));
    assert!(report.rooted);
    assert!(host
        .sink
        .entries()
        .iter()
        .any(|(s, e)| *s == SignalKind::DangerousProps && e.contains("assuming root")));
}

#[test]
fn short_circuit_and_exhaustive_agree_on_the_verdict() {
    let host = Host::new();
    host.plant("magisk");
    let invoker = stock_device().respond("getprop ro.build.tags", &["test-keys"]);
    let engine = host.engine(invoker, &[]);

    let short = engine.report(Strategy::ShortCircuit, false);
    let full = engine.report(Strategy::Exhaustive, false);
    assert_eq!(short.rooted, full.rooted);
    assert_eq!(short.positives(), vec![SignalKind::TestKeys]);
    assert_eq!(
        full.positives(),
        vec![SignalKind::TestKeys, SignalKind::MagiskBinary]
    );
    assert_eq!(
        short.outcome(SignalKind::MagiskBinary).unwrap().status,
        SignalStatus::Skipped
    );
}

#[test]
fn native_scan_hits_candidate_paths() {
    let host = Host::new();
    let su = format!("{}/su", host.dir.path().display());
    let engine = DetectionEngine::builder(host.config())
        .invoker(Arc::new(stock_device()))
        .registry(Arc::new(InstalledSet::default()))
        .bridge(Arc::new(FakeBridge::with_hits(&[su.as_str()])))
        .build();

    assert!(engine.check_for_root_native());
    assert!(!engine.check_for_su_binary());
    assert!(engine.is_rooted());
}

#[test]
fn unloaded_bridge_is_silent() {
    let host = Host::new();
    let engine = DetectionEngine::builder(host.config())
        .invoker(Arc::new(stock_device()))
        .registry(Arc::new(InstalledSet::default()))
        .bridge(Arc::new(FakeBridge::default()))
        .build();

    assert!(!engine.can_load_native_library());
    assert!(!engine.check_for_native_library_read_access());
    assert!(!engine.check_for_root_native());
    assert!(!engine.detect_root_cloaking_apps(&[]));
}

#[test]
fn report_serializes_for_consumers() {
    let host = Host::new();
    let engine = host.engine(stock_device(), &["com.topjohnwu.magisk"]);

    let report = engine.report(Strategy::ShortCircuit, false);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rooted"], true);
    assert_eq!(json["strategy"], "short-circuit");
    assert_eq!(json["outcomes"][0]["signal"], "root-management-apps");
    assert_eq!(json["outcomes"][0]["status"], "positive");
    assert_eq!(json["outcomes"][1]["status"], "skipped");
}

#[test]
fn host_facts_follow_overrides() {
    let host = Host::new();
    let mut config = host.config();
    config.host.sdk_version = Some(21);
    let engine = DetectionEngine::builder(config)
        .invoker(Arc::new(stock_device()))
        .build();

    let facts = engine.host_facts();
    assert_eq!(facts.sdk_version, Some(21));
    assert_eq!(facts.build_tags.as_deref(), Some("release-keys"));
}

#[test]
fn concurrent_report_from_a_blocking_caller() {
    let host = Host::new();
    host.plant("su");
    let engine = Arc::new(host.engine(stock_device(), &[]));

    let report = tokio_test::block_on(async {
        engine.report_concurrent(false, Duration::from_secs(5)).await
    });
    assert!(report.concurrent);
    assert!(report.rooted);
    assert_eq!(report.positives(), vec![SignalKind::SuBinary]);
}
