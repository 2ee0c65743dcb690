//! Native bridge -- deeper binary scan and cloak inference.
//!
//! The bridge may be unavailable on a host. Unavailability is always a
//! no-evidence result, never an error: only a link failure *after* a
//! successful load is reported as an error, and that is fail-open.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

use rootcheck_core::{CheckError, DetectionConfig, Result, SignalResult};

/// Result of a native scan over candidate paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeScan {
    /// Number of candidates found
    pub hits: u32,
    /// One entry per hit
    pub evidence: Vec<String>,
}

/// Operations a loaded bridge offers.
pub trait NativeScanner: Send + Sync {
    /// Inspect each full candidate path.
    fn deep_scan(&self, candidates: &[String]) -> Result<NativeScan>;

    /// Read the bridge's own library back.
    fn probe_read_access(&self) -> Result<()>;
}

/// Whether the bridge's native component loaded on this host.
pub enum NativeCapability<'a> {
    /// Could not be loaded; the reason is diagnostic only
    Unavailable(String),
    /// Loaded and callable
    Available(&'a dyn NativeScanner),
}

/// Source of the native capability, queried once per call.
pub trait NativeBridge: Send + Sync {
    /// Current capability.
    fn capability(&self) -> NativeCapability<'_>;
}

/// A bridge that never loads.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBridge;

impl NativeBridge for UnavailableBridge {
    fn capability(&self) -> NativeCapability<'_> {
        NativeCapability::Unavailable("no native bridge configured".into())
    }
}

/// In-process bridge: stats candidates without following symlinks and
/// reads its library file back for the cloak probe.
#[derive(Debug, Clone)]
pub struct HostBridge {
    library: Option<PathBuf>,
}

impl HostBridge {
    /// Bridge probing `library`, or the current executable if `None`.
    pub fn new(library: Option<PathBuf>) -> Self {
        Self {
            library: library.or_else(|| std::env::current_exe().ok()),
        }
    }

    /// Bridge built from `native_library` in the config.
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.native_library.clone())
    }
}

impl NativeBridge for HostBridge {
    fn capability(&self) -> NativeCapability<'_> {
        if self.library.is_some() {
            NativeCapability::Available(self)
        } else {
            NativeCapability::Unavailable("native library path unknown".into())
        }
    }
}

impl NativeScanner for HostBridge {
    fn deep_scan(&self, candidates: &[String]) -> Result<NativeScan> {
        let mut scan = NativeScan::default();

        for candidate in candidates {
            let Ok(meta) = std::fs::symlink_metadata(candidate) else {
                continue;
            };
            scan.hits += 1;
            scan.evidence
                .push(format!("{candidate} found by native scan{}", describe_mode(&meta)));
        }

        Ok(scan)
    }

    fn probe_read_access(&self) -> Result<()> {
        let library = self
            .library
            .as_ref()
            .ok_or_else(|| CheckError::NativeUnavailable("native library path unknown".into()))?;

        let mut byte = [0u8; 1];
        File::open(library)
            .and_then(|mut f| f.read(&mut byte))
            .map(|_| ())
            .map_err(|e| CheckError::NativeUnavailable(format!("{}: {e}", library.display())))
    }
}

#[cfg(unix)]
fn describe_mode(meta: &std::fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = meta.permissions().mode();
    let setuid = if mode & 0o4000 == 0 { "" } else { " setuid" };
    format!(" (mode {mode:o}{setuid})")
}

#[cfg(not(unix))]
fn describe_mode(_meta: &std::fs::Metadata) -> String {
    String::new()
}

/// Whether the bridge loaded.
pub fn can_load(bridge: &dyn NativeBridge) -> bool {
    matches!(bridge.capability(), NativeCapability::Available(_))
}

/// Whether the loaded bridge can read its own library. `false` if unloaded.
pub fn has_read_access(bridge: &dyn NativeBridge) -> bool {
    match bridge.capability() {
        NativeCapability::Available(scanner) => scanner.probe_read_access().is_ok(),
        NativeCapability::Unavailable(_) => false,
    }
}

/// Cloak inference: the library loads but cannot be read back.
///
/// Returns the evidence string when a cloak is suspected.
pub fn detect_cloak(bridge: &dyn NativeBridge) -> Option<String> {
    let NativeCapability::Available(scanner) = bridge.capability() else {
        return None;
    };
    match scanner.probe_read_access() {
        Ok(()) => None,
        Err(e) => Some(format!(
            "native library loads but cannot be read ({e}); cloaking layer suspected"
        )),
    }
}

/// Native scan for full candidate paths of the su binary.
///
/// Only runs when the bridge loaded; an unloaded bridge is negative.
pub fn check_for_root_native(bridge: &dyn NativeBridge, candidates: &[String]) -> Result<SignalResult> {
    let scanner = match bridge.capability() {
        NativeCapability::Available(scanner) => scanner,
        NativeCapability::Unavailable(reason) => {
            debug!(%reason, "could not load the native library to test for root");
            return Ok(SignalResult::negative());
        }
    };

    let scan = scanner.deep_scan(candidates)?;
    Ok(SignalResult {
        positive: scan.hits > 0,
        evidence: scan.evidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBridge;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn unavailable_bridge_is_negative() {
        let result = check_for_root_native(&UnavailableBridge, &["/sbin/su".into()]).unwrap();
        assert!(!result.positive);
        assert!(!can_load(&UnavailableBridge));
        assert!(!has_read_access(&UnavailableBridge));
        assert!(detect_cloak(&UnavailableBridge).is_none());
    }

    #[test]
    fn hit_count_drives_result() {
        let bridge = FakeBridge::with_hits(&["/system/xbin/su"]);
        let candidates = vec!["/sbin/su".to_string(), "/system/xbin/su".to_string()];
        let result = check_for_root_native(&bridge, &candidates).unwrap();
        assert!(result.positive);
        assert_eq!(result.evidence.len(), 1);
    }

    #[test]
    fn link_error_after_load_is_an_error() {
        let bridge = FakeBridge {
            link_error: true,
            ..FakeBridge::clean()
        };
        let result = check_for_root_native(&bridge, &["/sbin/su".into()]);
        assert!(matches!(result, Err(e) if e.is_native()));
    }

    #[test]
    fn unreadable_library_suggests_cloak() {
        let bridge = FakeBridge {
            readable: false,
            ..FakeBridge::clean()
        };
        assert!(can_load(&bridge));
        assert!(!has_read_access(&bridge));
        assert!(detect_cloak(&bridge).is_some());
        assert!(detect_cloak(&FakeBridge::clean()).is_none());
    }

    #[test]
    fn host_bridge_scans_the_filesystem() {
        let dir = TempDir::new().unwrap();
        let su = dir.path().join("su");
        File::create(&su).unwrap();

        let bridge = HostBridge::new(Some(su.clone()));
        let candidates = vec![
            su.display().to_string(),
            dir.path().join("missing").display().to_string(),
        ];
        let result = check_for_root_native(&bridge, &candidates).unwrap();
        assert!(result.positive);
        assert_eq!(result.evidence.len(), 1);
        assert!(has_read_access(&bridge));
    }

    #[cfg(unix)]
    #[test]
    fn host_bridge_reports_setuid_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let su = dir.path().join("su");
        File::create(&su).unwrap();
        std::fs::set_permissions(&su, std::fs::Permissions::from_mode(0o4755)).unwrap();

        let bridge = HostBridge::new(Some(su.clone()));
        let result = check_for_root_native(&bridge, &[su.display().to_string()]).unwrap();
        assert!(result.evidence[0].ends_with("(mode 104755 setuid)"), "{:?}", result.evidence);
    }

    #[test]
    fn host_bridge_missing_library_is_unreadable() {
        let bridge = HostBridge::new(Some(PathBuf::from("/nonexistent/librootcheck.so")));
        assert!(can_load(&bridge));
        assert!(detect_cloak(&bridge).is_some());
    }
}
