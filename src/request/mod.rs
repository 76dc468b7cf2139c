//! API request execution.
//!
//! This module provides:
//! - Request and response types (`RequestSpec`, `RequestOptions`, `Payload`, `ResponseBody`)
//! - Header construction (user agent, content type, authorization)
//! - Response classification (status, content length, JSON decoding)
//! - The retrying executor (`ApiClient`)

mod executor;
mod headers;
mod response;
mod types;

// Re-export public API
pub use executor::ApiClient;
pub use types::{HttpMethod, Payload, RequestOptions, RequestSpec, ResponseBody};
