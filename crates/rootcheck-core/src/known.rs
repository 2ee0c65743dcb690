//! Static known-bad data: package names, binary locations, properties.
//!
//! These lists are configuration, not logic. `DetectionConfig::default()`
//! copies them and a config file may replace or extend them.

/// Name of the su binary.
pub const BINARY_SU: &str = "su";

/// Name of the busybox binary.
pub const BINARY_BUSYBOX: &str = "busybox";

/// Name of the magisk binary.
pub const BINARY_MAGISK: &str = "magisk";

/// Marker in the build tags of test-signed builds.
pub const TEST_KEYS_TAG: &str = "test-keys";

/// Highest SDK level that prints mount lines in the legacy layout (Android 6, M).
pub const LEGACY_MOUNT_MAX_SDK: u32 = 23;

/// Root management apps.
pub const ROOT_MANAGEMENT_APPS: &[&str] = &[
    "com.noshufou.android.su",
    "com.noshufou.android.su.elite",
    "eu.chainfire.supersu",
    "com.koushikdutta.superuser",
    "com.thirdparty.superuser",
    "com.yellowes.su",
    "com.topjohnwu.magisk",
    "com.kingroot.kinguser",
    "com.kingo.root",
    "com.smedialink.oneclickroot",
    "com.zhiqupk.root.global",
    "com.alephzain.framaroot",
];

/// Apps that require root or patch other apps.
pub const DANGEROUS_APPS: &[&str] = &[
    "com.koushikdutta.rommanager",
    "com.koushikdutta.rommanager.license",
    "com.dimonvideo.luckypatcher",
    "com.chelpus.lackypatch",
    "com.ramdroid.appquarantine",
    "com.ramdroid.appquarantinepro",
    "com.android.vending.billing.InAppBillingService.COIN",
    "com.android.vending.billing.InAppBillingService.LUCK",
    "com.chelpus.luckypatcher",
    "com.blackmartalpha",
    "org.blackmart.market",
    "com.allinone.free",
    "com.repodroid.app",
    "org.creeplays.hack",
    "com.baseappfull.fwd",
    "com.zmapp",
    "com.dv.marketmod.installer",
    "org.mobilism.android",
    "com.android.wp.net.log",
    "com.android.camera.update",
    "cc.madkite.freedom",
    "com.solohsu.android.edxp.manager",
    "org.meowcat.edxposed.manager",
    "com.xmodgame",
    "com.cih.game_cih",
    "com.charles.lpoqasert",
    "catch_.me_.if_.you_.can_",
];

/// Apps that hide root from other apps.
pub const ROOT_CLOAKING_APPS: &[&str] = &[
    "com.devadvance.rootcloak",
    "com.devadvance.rootcloakplus",
    "de.robv.android.xposed.installer",
    "com.saurik.substrate",
    "com.zachspong.temprootremovejb",
    "com.amphoras.hidemyroot",
    "com.amphoras.hidemyrootadfree",
    "com.formyhm.hiderootPremium",
    "com.formyhm.hideroot",
];

/// Directories probed for su/busybox/magisk, in probing order.
pub const SU_PATHS: &[&str] = &[
    "/data/local/",
    "/data/local/bin/",
    "/data/local/xbin/",
    "/sbin/",
    "/su/bin/",
    "/system/bin/",
    "/system/bin/.ext/",
    "/system/bin/failsafe/",
    "/system/sd/xbin/",
    "/system/usr/we-need-root/",
    "/system/xbin/",
    "/cache/",
    "/data/",
    "/dev/",
];

/// Mount points that should never be mounted read-write.
pub const SENSITIVE_MOUNTS: &[&str] = &[
    "/system",
    "/system/bin",
    "/system/sbin",
    "/system/xbin",
    "/vendor/bin",
    "/sbin",
    "/etc",
];

/// Property key and the value that marks it dangerous.
pub const DANGEROUS_PROPS: &[(&str, &str)] = &[("ro.debuggable", "1"), ("ro.secure", "0")];

/// Collect a static list into owned strings.
#[must_use]
pub fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}
