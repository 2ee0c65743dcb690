//! Detection configuration: candidate paths, known-bad lists, commands.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::known;

/// Everything the detection engine reads but never mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Directories probed for binaries, in probing order.
    pub su_paths: Vec<String>,

    /// Append `$PATH` directories not already in `su_paths`.
    pub include_path_env: bool,

    /// Mount points that must not be read-write.
    pub sensitive_mounts: Vec<String>,

    /// Root management package names.
    pub root_management_apps: Vec<String>,

    /// Root-requiring package names.
    pub dangerous_apps: Vec<String>,

    /// Root-cloaking package names.
    pub root_cloaking_apps: Vec<String>,

    /// Deadline for every inspection command (0 = wait forever).
    pub command_timeout_secs: u64,

    /// Highest SDK level using the legacy mount layout.
    pub legacy_mount_max_sdk: u32,

    /// Library whose read access the cloak probe tests (default: current executable).
    pub native_library: Option<PathBuf>,

    /// Property key -> value that marks it dangerous.
    pub dangerous_props: BTreeMap<String, String>,

    /// Inspection commands.
    pub commands: CommandConfig,

    /// Host facts that skip querying the host when set.
    pub host: HostOverrides,
}

/// Argv of each inspection command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Property dump (`getprop`)
    pub properties: Vec<String>,
    /// Mount table dump (`mount`)
    pub mounts: Vec<String>,
    /// Binary locate (`which su`)
    pub locate: Vec<String>,
    /// Package query prefix; the package name is appended (`pm path`)
    pub package_query: Vec<String>,
    /// SDK level query
    pub sdk_version: Vec<String>,
    /// Build tags query
    pub build_tags: Vec<String>,
}

/// Host facts supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostOverrides {
    /// Host SDK level
    pub sdk_version: Option<u32>,
    /// Host build tags
    pub build_tags: Option<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            su_paths: known::owned(known::SU_PATHS),
            include_path_env: true,
            sensitive_mounts: known::owned(known::SENSITIVE_MOUNTS),
            root_management_apps: known::owned(known::ROOT_MANAGEMENT_APPS),
            dangerous_apps: known::owned(known::DANGEROUS_APPS),
            root_cloaking_apps: known::owned(known::ROOT_CLOAKING_APPS),
            command_timeout_secs: default_timeout(),
            legacy_mount_max_sdk: known::LEGACY_MOUNT_MAX_SDK,
            native_library: None,
            dangerous_props: known::DANGEROUS_PROPS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            commands: CommandConfig::default(),
            host: HostOverrides::default(),
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            properties: argv(&["getprop"]),
            mounts: argv(&["mount"]),
            locate: argv(&["which", known::BINARY_SU]),
            package_query: argv(&["pm", "path"]),
            sdk_version: argv(&["getprop", "ro.build.version.sdk"]),
            build_tags: argv(&["getprop", "ro.build.tags"]),
        }
    }
}

impl DetectionConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Command deadline, if any.
    #[must_use]
    pub const fn command_timeout(&self) -> Option<Duration> {
        match self.command_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    known::owned(parts)
}

// Default value functions for serde.
const fn default_timeout() -> u64 {
    10
}
