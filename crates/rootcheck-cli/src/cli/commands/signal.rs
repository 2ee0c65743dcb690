//! `rootcheck signal` - run one named signal.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use super::Context;
use crate::cli::args::SignalArgs;
use crate::output::{self, OutputFormat};

pub fn execute(ctx: &Context, args: &SignalArgs) -> Result<ExitCode> {
    let engine = ctx.engine();
    let extra: Vec<&str> = args.extra.iter().map(String::as_str).collect();
    let outcome = engine.outcome(args.name, &extra);

    match ctx.output_format {
        OutputFormat::Json => output::print_json(&outcome)?,
        OutputFormat::Pretty => {
            println!(
                "{} {} ({:?})",
                "Signal:".bold(),
                outcome.signal.name(),
                outcome.policy
            );
            output::print_outcome(&outcome);
        }
    }

    Ok(ExitCode::SUCCESS)
}
