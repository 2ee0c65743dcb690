//! Mount table line layouts.

use serde::{Deserialize, Serialize};

/// Layout of one line of `mount` output.
///
/// Chosen from the host SDK level, never sniffed from the text.
///
/// ```text
/// Legacy: <fs_spec> <fs_file> <fs_vfstype> <fs_mntopts>
/// Modern: <fs_spec> on <fs_file> type <fs_vfstype> (<fs_mntopts>)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountLineFormat {
    /// SDK at or below the legacy threshold
    Legacy,
    /// Everything newer, and unknown SDK levels
    Modern,
}

impl MountLineFormat {
    /// Select the layout for a host SDK level.
    #[must_use]
    pub const fn for_sdk(sdk: Option<u32>, legacy_max_sdk: u32) -> Self {
        match sdk {
            Some(v) if v <= legacy_max_sdk => Self::Legacy,
            _ => Self::Modern,
        }
    }

    /// Fewest space-separated fields a well-formed line has.
    #[must_use]
    pub const fn min_fields(self) -> usize {
        match self {
            Self::Legacy => 4,
            Self::Modern => 6,
        }
    }

    /// Field index of the mount point.
    #[must_use]
    pub const fn mount_point_index(self) -> usize {
        match self {
            Self::Legacy => 1,
            Self::Modern => 2,
        }
    }

    /// Field index of the option list.
    #[must_use]
    pub const fn options_index(self) -> usize {
        match self {
            Self::Legacy => 3,
            Self::Modern => 5,
        }
    }

    /// Whether the option field is wrapped in parentheses.
    #[must_use]
    pub const fn parenthesized_options(self) -> bool {
        matches!(self, Self::Modern)
    }
}

/// One parsed mount line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountEntry {
    /// Where the filesystem is mounted
    pub mount_point: String,
    /// Mount options, parentheses stripped
    pub options: Vec<String>,
}

impl MountEntry {
    /// True if any option is `rw`, ignoring case.
    #[must_use]
    pub fn is_read_write(&self) -> bool {
        self.options.iter().any(|o| o.eq_ignore_ascii_case("rw"))
    }
}
