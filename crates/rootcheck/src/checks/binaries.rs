//! Binary probing -- look for a named file in every candidate directory.

use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

use rootcheck_core::{DetectionConfig, SignalResult};

/// Candidate directories: the configured list, then `$PATH` entries not
/// already present. Every entry ends with `/`.
pub fn candidate_paths(config: &DetectionConfig) -> Vec<String> {
    let path_var = if config.include_path_env {
        std::env::var_os("PATH")
    } else {
        None
    };
    merge_path_env(&config.su_paths, path_var)
}

/// Append the directories of a `PATH`-style value to `base`.
pub fn merge_path_env(base: &[String], path_var: Option<OsString>) -> Vec<String> {
    let mut paths = base.to_vec();
    let Some(path_var) = path_var else {
        return paths;
    };

    for dir in std::env::split_paths(&path_var) {
        let mut dir = dir.display().to_string();
        if dir.is_empty() {
            continue;
        }
        if !dir.ends_with('/') {
            dir.push('/');
        }
        if !paths.contains(&dir) {
            paths.push(dir);
        }
    }
    paths
}

/// `directory + "/" + name` for every candidate directory.
///
/// Plain concatenation: a name that looks absolute still lands under
/// each directory.
pub fn full_paths(name: &str, paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .map(|dir| {
            if dir.ends_with('/') {
                format!("{dir}{name}")
            } else {
                format!("{dir}/{name}")
            }
        })
        .collect()
}

/// Test every directory for `name`.
///
/// The whole set is always scanned so every hit becomes evidence; the
/// result is positive iff at least one hit was found.
pub fn check_for_binary(name: &str, paths: &[String]) -> SignalResult {
    let mut evidence = Vec::new();

    for full in full_paths(name, paths) {
        if Path::new(&full).exists() {
            evidence.push(format!("{full} binary detected"));
        } else {
            debug!(path = %full, "binary not present");
        }
    }

    SignalResult::from_evidence(evidence)
}
