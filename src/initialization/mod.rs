//! Process-wide resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - HTTP client (user agent, TLS)
//! - Logger (plain or JSON output)
//!
//! All initialization functions return `InitializationError` on failure.

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
