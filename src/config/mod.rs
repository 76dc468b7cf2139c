//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, env var names, timeouts)
//! - API server configuration resolution (env > config file > default)
//! - CLI option types and parsing

mod constants;
mod environment;
mod types;

// Re-export all constants
pub use constants::*;
pub use environment::{default_config_path, ApiServerConfig, SecurityContext};
pub use types::{CliArgs, LogFormat, LogLevel};
