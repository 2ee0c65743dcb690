//! rootcheck - root / tamper detection for the current host.

use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(rootcheck_cli::run());

    // Signals still running past the verdict deadline are abandoned, not awaited.
    runtime.shutdown_background();
    result
}
