//! Output formatting for different formats.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use rootcheck_core::{DetectionReport, SignalOutcome, SignalStatus};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One line per outcome, evidence indented below it.
pub fn print_outcome(outcome: &SignalOutcome) {
    let (mark, label) = match &outcome.status {
        SignalStatus::Positive => ("[+]".red().bold(), "positive".red()),
        SignalStatus::Negative => ("[ ]".green(), "negative".green()),
        SignalStatus::Failed { assumed: true, .. } => {
            ("[!]".red().bold(), "failed, assumed rooted".red())
        }
        SignalStatus::Failed { assumed: false, .. } => {
            ("[!]".yellow(), "failed, assumed clean".yellow())
        }
        SignalStatus::Skipped => ("[-]".dimmed(), "skipped".dimmed()),
    };
    println!("  {mark} {:<22} {label}", outcome.signal.name());

    if let SignalStatus::Failed { reason, .. } = &outcome.status {
        println!("        {}", reason.dimmed());
    }
    for line in &outcome.evidence {
        println!("        {line}");
    }
}

/// Verdict header followed by every outcome.
pub fn print_report(report: &DetectionReport) {
    let verdict = if report.rooted {
        "ROOTED".red().bold()
    } else {
        "not rooted".green().bold()
    };
    let mode = if report.concurrent {
        format!("{}, concurrent", report.strategy)
    } else {
        report.strategy.to_string()
    };

    println!("{} {verdict}", "Verdict:".bold());
    println!(
        "{} {}  {}",
        "Host:".bold(),
        report.host_id,
        report.collected_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed()
    );
    println!("{} {mode}", "Mode:".bold());
    println!();
    for outcome in &report.outcomes {
        print_outcome(outcome);
    }
}
