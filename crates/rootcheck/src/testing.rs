//! Scripted collaborators for exercising the engine without a real host.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rootcheck_core::{CheckError, InvocationError, Result};

use crate::checks::native::{NativeBridge, NativeCapability, NativeScan, NativeScanner};
use crate::invoker::{split_output, ProcessInvoker};

#[derive(Debug, Clone)]
enum Reply {
    Output(String),
    Hang(Duration, String),
}

/// Replies to known command lines with canned stdout.
///
/// Unknown commands fail to spawn, the way a missing binary does.
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedInvoker {
    /// Invoker that knows no commands.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `command` (argv joined by spaces) with these lines.
    #[must_use]
    pub fn respond(mut self, command: &str, lines: &[&str]) -> Self {
        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        self.replies.insert(command.to_string(), Reply::Output(text));
        self
    }

    /// Reply to `command` after sleeping.
    #[must_use]
    pub fn respond_slowly(mut self, command: &str, delay: Duration, lines: &[&str]) -> Self {
        self.replies
            .insert(command.to_string(), Reply::Hang(delay, lines.join("\n")));
        self
    }

    /// Command lines run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProcessInvoker for ScriptedInvoker {
    fn run(&self, argv: &[String]) -> std::result::Result<Vec<String>, InvocationError> {
        if argv.is_empty() {
            return Err(InvocationError::NoCommand);
        }
        let command = argv.join(" ");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.clone());

        match self.replies.get(&command) {
            Some(Reply::Output(text)) => split_output(text, command),
            Some(Reply::Hang(delay, text)) => {
                std::thread::sleep(*delay);
                split_output(text, command)
            }
            None => Err(InvocationError::SpawnFailed {
                command,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}

/// Native bridge with configurable load, read and scan behavior.
#[derive(Debug, Clone, Default)]
pub struct FakeBridge {
    /// Whether the library loads
    pub loaded: bool,
    /// Whether the read-access probe succeeds
    pub readable: bool,
    /// Whether calls fail with a link error after loading
    pub link_error: bool,
    /// Full paths the deep scan reports as present
    pub present: HashSet<String>,
}

impl FakeBridge {
    /// A loaded, readable bridge that finds nothing.
    #[must_use]
    pub fn clean() -> Self {
        Self {
            loaded: true,
            readable: true,
            ..Self::default()
        }
    }

    /// A loaded bridge that reports these paths as present.
    #[must_use]
    pub fn with_hits(paths: &[&str]) -> Self {
        Self {
            present: paths.iter().map(|p| (*p).to_string()).collect(),
            ..Self::clean()
        }
    }
}

impl NativeBridge for FakeBridge {
    fn capability(&self) -> NativeCapability<'_> {
        if self.loaded {
            NativeCapability::Available(self)
        } else {
            NativeCapability::Unavailable("fake library not loaded".into())
        }
    }
}

impl NativeScanner for FakeBridge {
    fn deep_scan(&self, candidates: &[String]) -> Result<NativeScan> {
        if self.link_error {
            return Err(CheckError::NativeUnavailable("unsatisfied link".into()));
        }
        let evidence: Vec<String> = candidates
            .iter()
            .filter(|c| self.present.contains(*c))
            .map(|c| format!("{c} found by native scan"))
            .collect();
        Ok(NativeScan {
            hits: u32::try_from(evidence.len()).unwrap_or(u32::MAX),
            evidence,
        })
    }

    fn probe_read_access(&self) -> Result<()> {
        if self.link_error || !self.readable {
            return Err(CheckError::NativeUnavailable("read access denied".into()));
        }
        Ok(())
    }
}
