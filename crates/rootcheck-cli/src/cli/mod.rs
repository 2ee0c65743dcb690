//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::{Context as _, Result};
use args::{Cli, Commands};
use clap::Parser;
use std::process::ExitCode;
use tracing::Level;

use rootcheck_core::DetectionConfig;

use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let output_format = cli.output.unwrap_or_default();

    init_tracing(cli.verbose, output_format);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = match &cli.config {
        Some(path) => DetectionConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => DetectionConfig::default(),
    };

    let ctx = commands::Context {
        config,
        output_format,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Verdict(args) => commands::verdict::execute(&ctx, &args).await,
        Commands::Signal(args) => commands::signal::execute(&ctx, &args),
        Commands::Config => commands::config::execute(&ctx),
    }
}

/// WARN by default, DEBUG with `--verbose`, ERROR only for JSON output.
fn init_tracing(verbose: bool, output_format: OutputFormat) {
    let level = if output_format == OutputFormat::Json {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
