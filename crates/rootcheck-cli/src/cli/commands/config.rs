//! `rootcheck config` - print the effective configuration.

use anyhow::Result;
use std::process::ExitCode;

use super::Context;
use crate::output::{self, OutputFormat};

pub fn execute(ctx: &Context) -> Result<ExitCode> {
    match ctx.output_format {
        OutputFormat::Json => output::print_json(&ctx.config)?,
        OutputFormat::Pretty => print!("{}", ctx.config.to_toml()?),
    }
    Ok(ExitCode::SUCCESS)
}
