//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use rootcheck_core::SignalKind;

use crate::output::OutputFormat;

/// Heuristic root / tamper detection for the current host
///
/// Every signal looks for one artifact a rooted device tends to leave
/// behind. The verdict is the OR of all of them.
#[derive(Parser, Debug)]
#[command(name = "rootcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Detection config file (TOML); built-in defaults when absent
    #[arg(short, long, env = "ROOTCHECK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Show operational diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Combined verdict over all registered signals
    Verdict(VerdictArgs),

    /// Run a single named signal
    Signal(SignalArgs),

    /// Print the effective configuration
    Config,
}

/// How the verdict evaluates its signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Stop at the first positive signal
    #[default]
    ShortCircuit,
    /// Evaluate every signal in order
    Exhaustive,
    /// Evaluate every signal in parallel under one deadline
    Concurrent,
}

// ============================================================================
// Verdict command
// ============================================================================

#[derive(Args, Debug)]
pub struct VerdictArgs {
    /// Also probe for busybox (noisier: it ships on many stock devices)
    #[arg(long)]
    pub busybox: bool,

    /// Evaluation mode
    #[arg(short, long, value_enum, default_value_t = Mode::ShortCircuit)]
    pub mode: Mode,

    /// Deadline for concurrent mode in seconds
    #[arg(short, long, default_value_t = 30)]
    pub timeout: u64,

    /// Exit with status 2 when the host looks rooted
    #[arg(long)]
    pub fail_on_root: bool,
}

// ============================================================================
// Signal command
// ============================================================================

#[derive(Args, Debug)]
pub struct SignalArgs {
    /// Signal name, e.g. su-binary, dangerous-props, root-cloaking-apps
    pub name: SignalKind,

    /// Extra package names or binary names for list-based signals
    #[arg(short, long = "extra", value_name = "NAME")]
    pub extra: Vec<String>,
}
