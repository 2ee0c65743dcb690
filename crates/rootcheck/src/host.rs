//! Host facts: SDK level and build tags.
//!
//! Resolved on every call from config overrides, else by asking the host.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rootcheck_core::DetectionConfig;

use crate::invoker::ProcessInvoker;

/// Facts about the running host that select check behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostFacts {
    /// SDK level (`ro.build.version.sdk`)
    pub sdk_version: Option<u32>,
    /// Build tags (`ro.build.tags`)
    pub build_tags: Option<String>,
}

impl HostFacts {
    /// Resolve both facts.
    pub fn resolve(config: &DetectionConfig, invoker: &dyn ProcessInvoker) -> Self {
        Self {
            sdk_version: sdk_version(config, invoker),
            build_tags: build_tags(config, invoker),
        }
    }
}

/// Host SDK level, or `None` if unknown.
pub fn sdk_version(config: &DetectionConfig, invoker: &dyn ProcessInvoker) -> Option<u32> {
    if let Some(sdk) = config.host.sdk_version {
        return Some(sdk);
    }
    let raw = first_line(invoker, &config.commands.sdk_version)?;
    match raw.parse() {
        Ok(sdk) => Some(sdk),
        Err(e) => {
            debug!(value = %raw, error = %e, "unparseable sdk version");
            None
        }
    }
}

/// Host build tags, or `None` if unknown.
pub fn build_tags(config: &DetectionConfig, invoker: &dyn ProcessInvoker) -> Option<String> {
    config
        .host
        .build_tags
        .clone()
        .or_else(|| first_line(invoker, &config.commands.build_tags))
}

fn first_line(invoker: &dyn ProcessInvoker, argv: &[String]) -> Option<String> {
    if argv.is_empty() {
        return None;
    }
    match invoker.run(argv) {
        Ok(lines) => lines
            .into_iter()
            .map(|l| l.trim().to_string())
            .find(|l| !l.is_empty()),
        Err(e) => {
            debug!(error = %e, "host fact unavailable");
            None
        }
    }
}
