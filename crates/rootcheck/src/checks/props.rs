//! Dangerous system properties (`ro.debuggable=1`, `ro.secure=0`).
//!
//! Matching is plain substring containment: a line matches a key when it
//! contains the key and also contains `[value]`. No key/value split is
//! attempted, so an unrelated line holding both substrings also matches.

use std::collections::BTreeMap;

use rootcheck_core::{Result, SignalResult};

use crate::invoker::ProcessInvoker;

/// Scan property-dump lines against the dangerous key -> value map.
///
/// Every line is tested against every key so all matches are reported.
pub fn scan_properties(lines: &[String], dangerous: &BTreeMap<String, String>) -> SignalResult {
    let mut evidence = Vec::new();

    for line in lines {
        for (key, value) in dangerous {
            let bad_value = format!("[{value}]");
            if line.contains(key.as_str()) && line.contains(&bad_value) {
                evidence.push(format!("{key} = {bad_value} detected"));
            }
        }
    }

    SignalResult::from_evidence(evidence)
}

/// Dump properties and scan them.
///
/// A failed dump is returned as an error; the engine registers this
/// signal fail-closed, so that error becomes a positive verdict.
pub fn check_for_dangerous_props(
    invoker: &dyn ProcessInvoker,
    command: &[String],
    dangerous: &BTreeMap<String, String>,
) -> Result<SignalResult> {
    let lines = invoker.run(command)?;
    Ok(scan_properties(&lines, dangerous))
}
