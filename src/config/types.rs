//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and logger configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::DEFAULT_RETRIES;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages (includes retry diagnostics)
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options for the `dxhttp` binary.
///
/// Makes a single API call, `POST /<resource>/<method>`, and prints the result.
///
/// # Examples
///
/// ```bash
/// # Who am I?
/// dxhttp system whoami
///
/// # Describe a project with an explicit input
/// dxhttp project-xxxx describe '{"fields": {"name": true}}'
///
/// # Read the input from stdin and allow retrying a non-idempotent call
/// echo '{"name": "test"}' | dxhttp record new --input - --always-retry
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "dxhttp",
    about = "Makes a call to the DNAnexus API server and prints the response."
)]
pub struct CliArgs {
    /// Class name (e.g. "file") or entity ID (e.g. "file-xxxx")
    pub resource: String,

    /// Method name to call (e.g. "describe")
    pub method: String,

    /// JSON input for the method
    #[arg(default_value = "{}")]
    pub input_json: String,

    /// Load JSON input from FILE ("-" reads from stdin)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Mark the call as safe to retry even on transport failures
    #[arg(long)]
    pub always_retry: bool,

    /// Maximum number of retries after the first attempt
    #[arg(long, default_value_t = DEFAULT_RETRIES)]
    pub max_retries: u32,

    /// Per-attempt timeout in seconds
    #[arg(long, default_value_t = 600)]
    pub timeout_seconds: u64,

    /// Do not send an Authorization header
    #[arg(long)]
    pub no_auth: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}
