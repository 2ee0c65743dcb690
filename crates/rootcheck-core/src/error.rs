use std::time::Duration;
use thiserror::Error;

/// Result type alias for individual check operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// Failures while running an external inspection command
#[derive(Error, Debug)]
pub enum InvocationError {
    /// The command could not be started at all
    #[error("failed to spawn `{command}`: {source}")]
    SpawnFailed {
        /// Rendered argv of the command
        command: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The command ran but produced no standard output
    #[error("`{command}` produced no output")]
    EmptyOutput {
        /// Rendered argv of the command
        command: String,
    },

    /// The command did not finish before the caller-imposed deadline
    #[error("`{command}` timed out after {after:?}")]
    TimedOut {
        /// Rendered argv of the command
        command: String,
        /// Deadline that expired
        after: Duration,
    },

    /// Standard output could not be read back
    #[error("failed reading output of `{command}`: {source}")]
    Read {
        /// Rendered argv of the command
        command: String,
        /// Underlying read error
        #[source]
        source: std::io::Error,
    },

    /// The configured argv was empty
    #[error("no command configured")]
    NoCommand,
}

/// A leaf failure inside a single detection signal.
///
/// Never surfaces from a verdict: the engine folds it into the signal's
/// `FailurePolicy`.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Inspection command failed
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// Native bridge failed to load or link at call time
    #[error("native bridge unavailable: {0}")]
    NativeUnavailable(String),

    /// Package registry query failed for a reason other than "not installed"
    #[error("package registry error: {0}")]
    Registry(String),

    /// Signal did not complete before its deadline
    #[error("signal timed out after {0:?}")]
    Timeout(Duration),

    /// Signal worker panicked or was cancelled
    #[error("signal aborted: {0}")]
    Aborted(String),
}

impl CheckError {
    /// Returns true if the failure came from the native bridge
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::NativeUnavailable(_))
    }
}

/// Errors loading a detection configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML could not be parsed
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML could not be rendered
    #[error("config render error: {0}")]
    Render(#[from] toml::ser::Error),
}
