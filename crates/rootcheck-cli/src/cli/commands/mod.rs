//! Command implementations.

pub mod config;
pub mod signal;
pub mod verdict;

use std::sync::Arc;

use rootcheck::{DetectionEngine, TracingSink};
use rootcheck_core::DetectionConfig;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective detection config
    pub config: DetectionConfig,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,
}

impl Context {
    /// Engine over the real host; evidence goes to the tracing subscriber.
    pub fn engine(&self) -> DetectionEngine {
        DetectionEngine::builder(self.config.clone())
            .sink(Arc::new(TracingSink))
            .logging(self.verbose)
            .build()
    }
}
