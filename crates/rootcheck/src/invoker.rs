//! External inspection commands (`getprop`, `mount`, `which su`, `pm path`).

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::debug;

use rootcheck_core::InvocationError;

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs a command and returns its standard output split into lines.
///
/// Implementations must only capture stdout. An empty stdout is
/// `InvocationError::EmptyOutput`; trailing empty lines are dropped.
pub trait ProcessInvoker: Send + Sync {
    /// Run `argv[0]` with the remaining arguments.
    fn run(&self, argv: &[String]) -> Result<Vec<String>, InvocationError>;
}

/// Spawns real processes, optionally under a deadline.
#[derive(Debug, Clone, Default)]
pub struct SystemInvoker {
    timeout: Option<Duration>,
}

impl SystemInvoker {
    /// Invoker with an optional deadline per command.
    #[must_use]
    pub const fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ProcessInvoker for SystemInvoker {
    fn run(&self, argv: &[String]) -> Result<Vec<String>, InvocationError> {
        let (program, args) = argv.split_first().ok_or(InvocationError::NoCommand)?;
        let command = argv.join(" ");
        debug!(command = %command, "running inspection command");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| InvocationError::SpawnFailed {
                command: command.clone(),
                source,
            })?;

        let Some(mut stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(InvocationError::EmptyOutput { command });
        };

        // Drain the pipe on its own thread; a full pipe would stall the child.
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });

        let deadline = self.timeout.map(|limit| (Instant::now() + limit, limit));
        let timed_out = |command: String, limit: Duration| {
            debug!(command = %command, "inspection command timed out");
            InvocationError::TimedOut {
                command,
                after: limit,
            }
        };

        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if !status.success() {
                        debug!(command = %command, %status, "inspection command exited unsuccessfully");
                    }
                    break;
                }
                Ok(None) => {
                    if let Some((at, limit)) = deadline {
                        if Instant::now() >= at {
                            let _ = child.kill();
                            let _ = child.wait();
                            return Err(timed_out(command, limit));
                        }
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(source) => {
                    let _ = child.kill();
                    return Err(InvocationError::Read { command, source });
                }
            }
        }

        // A background process may still hold stdout after the child exits.
        let received = match deadline {
            Some((at, limit)) => match rx.recv_timeout(at.saturating_duration_since(Instant::now())) {
                Ok(received) => received,
                Err(RecvTimeoutError::Timeout) => return Err(timed_out(command, limit)),
                Err(RecvTimeoutError::Disconnected) => Err(reader_gone()),
            },
            None => rx.recv().unwrap_or_else(|_| Err(reader_gone())),
        };
        let bytes = received.map_err(|source| InvocationError::Read {
            command: command.clone(),
            source,
        })?;

        split_output(&String::from_utf8_lossy(&bytes), command)
    }
}

fn reader_gone() -> std::io::Error {
    std::io::Error::other("stdout reader stopped without a result")
}

/// Split captured stdout into lines.
///
/// Empty output is an error; trailing empty lines are dropped, interior
/// ones are kept.
pub fn split_output(text: &str, command: String) -> Result<Vec<String>, InvocationError> {
    if text.is_empty() {
        return Err(InvocationError::EmptyOutput { command });
    }
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    Ok(lines)
}
