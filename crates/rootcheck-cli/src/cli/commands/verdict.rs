//! `rootcheck verdict` - combined verdict over all registered signals.

use anyhow::Result;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use rootcheck_core::Strategy;

use super::Context;
use crate::cli::args::{Mode, VerdictArgs};
use crate::output::{self, OutputFormat};

/// Exit status when `--fail-on-root` is set and the host looks rooted.
const ROOTED_EXIT: u8 = 2;

pub async fn execute(ctx: &Context, args: &VerdictArgs) -> Result<ExitCode> {
    let engine = ctx.engine();

    let report = match args.mode {
        Mode::ShortCircuit => engine.report(Strategy::ShortCircuit, args.busybox),
        Mode::Exhaustive => engine.report(Strategy::Exhaustive, args.busybox),
        Mode::Concurrent => {
            Arc::new(engine)
                .report_concurrent(args.busybox, Duration::from_secs(args.timeout))
                .await
        }
    };

    match ctx.output_format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Pretty => output::print_report(&report),
    }

    if args.fail_on_root && report.rooted {
        return Ok(ExitCode::from(ROOTED_EXIT));
    }
    Ok(ExitCode::SUCCESS)
}
