//! Mount table parsing -- sensitive mount points mounted read-write.

use tracing::debug;

use rootcheck_core::{MountEntry, MountLineFormat, Result, SignalResult};

use crate::invoker::ProcessInvoker;

/// Parse one line of `mount` output.
///
/// Fields are split on single spaces. Lines with too few fields are
/// skipped with a diagnostic and yield `None`; parsing never fails.
pub fn parse_mount_line(line: &str, format: MountLineFormat) -> Option<MountEntry> {
    let mut fields: Vec<&str> = line.split(' ').collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }

    if fields.len() < format.min_fields() {
        debug!(line, ?format, "skipping malformed mount line");
        return None;
    }

    let mount_point = fields[format.mount_point_index()].to_string();
    let mut raw_options = fields[format.options_index()].to_string();
    if format.parenthesized_options() {
        raw_options = raw_options.replace(['(', ')'], "");
    }

    Some(MountEntry {
        mount_point,
        options: raw_options.split(',').map(str::to_string).collect(),
    })
}

/// Flag every sensitive mount point mounted with an `rw` option.
///
/// Mount points compare case-insensitively. All lines are evaluated.
pub fn scan_mounts(lines: &[String], format: MountLineFormat, sensitive: &[String]) -> SignalResult {
    let mut evidence = Vec::new();

    for line in lines {
        let Some(entry) = parse_mount_line(line, format) else {
            continue;
        };
        for path in sensitive {
            if entry.mount_point.eq_ignore_ascii_case(path) && entry.is_read_write() {
                evidence.push(format!("{path} path is mounted with rw permissions! {line}"));
            }
        }
    }

    SignalResult::from_evidence(evidence)
}

/// Dump the mount table and scan it.
///
/// A failed dump is returned as an error (fail-open at the engine); an
/// empty table is simply negative.
pub fn check_for_rw_paths(
    invoker: &dyn ProcessInvoker,
    command: &[String],
    format: MountLineFormat,
    sensitive: &[String],
) -> Result<SignalResult> {
    let lines = invoker.run(command)?;
    Ok(scan_mounts(&lines, format, sensitive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensitive() -> Vec<String> {
        vec!["/system".to_string(), "/sbin".to_string()]
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn legacy_rw_system_is_positive() {
        let dump = lines(&["/dev/block/x /system yaffs2 rw,relatime"]);
        let result = scan_mounts(&dump, MountLineFormat::Legacy, &sensitive());
        assert!(result.positive);
        assert!(result.evidence[0].starts_with("/system path is mounted with rw permissions!"));
    }

    #[test]
    fn modern_rw_system_is_positive() {
        let dump = lines(&["/dev/block/x on /system type ext4 (rw,seclabel,relatime)"]);
        assert!(scan_mounts(&dump, MountLineFormat::Modern, &sensitive()).positive);
    }

    #[test]
    fn modern_ro_system_is_negative() {
        let dump = lines(&["/dev/block/x on /system type ext4 (ro,seclabel,relatime)"]);
        assert!(!scan_mounts(&dump, MountLineFormat::Modern, &sensitive()).positive);
    }

    #[test]
    fn parse_strips_parentheses() {
        let entry = parse_mount_line(
            "/dev/block/x on /system type ext4 (rw,seclabel)",
            MountLineFormat::Modern,
        )
        .unwrap();
        assert_eq!(entry.mount_point, "/system");
        assert_eq!(entry.options, vec!["rw", "seclabel"]);
    }

    #[test]
    fn short_lines_are_skipped() {
        assert!(parse_mount_line("rootfs / rootfs", MountLineFormat::Legacy).is_none());
        assert!(parse_mount_line("", MountLineFormat::Modern).is_none());
        assert!(parse_mount_line(
            "/dev/block/x /system yaffs2 rw,relatime",
            MountLineFormat::Modern
        )
        .is_none());
    }

    #[test]
    fn malformed_lines_do_not_hide_later_hits() {
        let dump = lines(&[
            "garbage",
            "tmpfs /dev tmpfs rw,nosuid",
            "/dev/block/y /SBIN ext4 RW",
        ]);
        let result = scan_mounts(&dump, MountLineFormat::Legacy, &sensitive());
        assert_eq!(result.evidence.len(), 1);
        assert!(result.evidence[0].starts_with("/sbin path"));
    }

    #[test]
    fn rw_must_be_a_whole_option() {
        let dump = lines(&["/dev/block/x /system ext4 ro,rwx,norw"]);
        assert!(!scan_mounts(&dump, MountLineFormat::Legacy, &sensitive()).positive);
    }

    #[test]
    fn format_mismatch_reads_wrong_fields() {
        // A modern line read with the legacy layout sees "on" as the mount point.
        let dump = lines(&["/dev/block/x on /system type ext4 (rw)"]);
        assert!(!scan_mounts(&dump, MountLineFormat::Legacy, &sensitive()).positive);
    }
}
