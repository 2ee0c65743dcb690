//! # rootcheck-cli
//!
//! Command-line front end for the rootcheck engine.
//!
//! ## Commands
//!
//! - **verdict**: combined verdict, short-circuit, exhaustive or concurrent
//! - **signal**: one named signal with its evidence
//! - **config**: the effective configuration as TOML

pub mod cli;
pub mod output;

pub use cli::run;
