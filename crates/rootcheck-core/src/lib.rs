//! # rootcheck-core
//!
//! Shared types for the rootcheck detection engine: signal identities and
//! failure policies, mount line layouts, verdict reports, the error
//! taxonomy, and the static configuration the checks read.

pub mod config;
pub mod error;
pub mod known;
pub mod types;

pub use config::{CommandConfig, DetectionConfig, HostOverrides};
pub use error::{CheckError, ConfigError, InvocationError, Result};
pub use types::*;
