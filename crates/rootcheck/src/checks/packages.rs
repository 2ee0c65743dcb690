//! Package registry queries -- is any listed package installed?

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use rootcheck_core::{CheckError, InvocationError, Result, SignalResult};

use crate::invoker::ProcessInvoker;

/// Answer from the package registry for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageLookup {
    /// Package is installed
    Installed,
    /// Package is not installed (the common case, not an error)
    NotFound,
}

/// Host package-installation registry.
pub trait PackageRegistry: Send + Sync {
    /// Look up one package identifier.
    fn lookup(&self, package: &str) -> Result<PackageLookup>;
}

/// In-memory registry.
#[derive(Debug, Clone, Default)]
pub struct InstalledSet {
    installed: HashSet<String>,
}

impl InstalledSet {
    /// Registry reporting exactly these packages as installed.
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            installed: packages.into_iter().map(Into::into).collect(),
        }
    }
}

impl PackageRegistry for InstalledSet {
    fn lookup(&self, package: &str) -> Result<PackageLookup> {
        Ok(if self.installed.contains(package) {
            PackageLookup::Installed
        } else {
            PackageLookup::NotFound
        })
    }
}

/// Registry backed by the package manager command (`pm path <package>`).
///
/// Installed packages print `package:<apk path>`; missing ones print nothing.
#[derive(Clone)]
pub struct PmRegistry {
    invoker: Arc<dyn ProcessInvoker>,
    query: Vec<String>,
}

impl PmRegistry {
    /// Registry that appends the package name to `query` and runs it.
    pub fn new(invoker: Arc<dyn ProcessInvoker>, query: Vec<String>) -> Self {
        Self { invoker, query }
    }
}

impl std::fmt::Debug for PmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PmRegistry")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl PackageRegistry for PmRegistry {
    fn lookup(&self, package: &str) -> Result<PackageLookup> {
        let mut argv = self.query.clone();
        argv.push(package.to_string());

        match self.invoker.run(&argv) {
            Ok(lines) if lines.iter().any(|l| l.trim_start().starts_with("package:")) => {
                Ok(PackageLookup::Installed)
            }
            Ok(_) | Err(InvocationError::EmptyOutput { .. }) => Ok(PackageLookup::NotFound),
            Err(e) => Err(CheckError::Registry(e.to_string())),
        }
    }
}

/// Static list followed by caller-supplied names (ad-hoc union, order kept).
pub fn merged_list(base: &[String], additional: &[&str]) -> Vec<String> {
    let mut names = base.to_vec();
    for name in additional {
        if !names.iter().any(|n| n == name) {
            names.push((*name).to_string());
        }
    }
    names
}

/// Query every name; any installed package is evidence.
///
/// Never short-circuits. Registry failures for single names are skipped;
/// if nothing was found and at least one lookup failed, the first
/// failure is returned so the signal's policy decides.
pub fn is_any_package_installed(registry: &dyn PackageRegistry, names: &[String]) -> Result<SignalResult> {
    let mut evidence = Vec::new();
    let mut first_error = None;

    for name in names {
        match registry.lookup(name) {
            Ok(PackageLookup::Installed) => evidence.push(format!("{name} is installed")),
            Ok(PackageLookup::NotFound) => {}
            Err(e) => {
                debug!(package = %name, error = %e, "package lookup failed");
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if evidence.is_empty() => Err(e),
        _ => Ok(SignalResult::from_evidence(evidence)),
    }
}
