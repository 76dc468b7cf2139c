//! Error handling and retry policy.
//!
//! This module provides:
//! - Error type definitions (the request error taxonomy and initialization errors)
//! - Error categorization for HTTP client failures
//! - Retry strategy configuration (which errors are retried, and the backoff schedule)

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, ContentLengthRetry, RetryPolicy};
pub use types::{ApiErrorBody, InitializationError, RequestError, TransportKind};
