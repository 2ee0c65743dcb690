//! Individual detection checks. None depends on another's result.

pub mod binaries;
pub mod build_tags;
pub mod mounts;
pub mod native;
pub mod packages;
pub mod props;
pub mod su_locate;

pub use binaries::{candidate_paths, check_for_binary, full_paths};
pub use build_tags::detect_test_keys;
pub use mounts::{check_for_rw_paths, parse_mount_line, scan_mounts};
pub use native::{
    check_for_root_native, HostBridge, NativeBridge, NativeCapability, NativeScan, NativeScanner,
    UnavailableBridge,
};
pub use packages::{
    is_any_package_installed, merged_list, InstalledSet, PackageLookup, PackageRegistry, PmRegistry,
};
pub use props::{check_for_dangerous_props, scan_properties};
pub use su_locate::check_su_exists;
