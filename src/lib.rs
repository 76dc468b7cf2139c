//! dxhttp library: a resilient client for the DNAnexus API server
//!
//! This library resolves the API server and credentials from the environment,
//! sends authenticated JSON requests, classifies failures, and retries the
//! ones that are safe to retry with exponential backoff.
//!
//! # Example
//!
//! ```no_run
//! use dxhttp::{ApiClient, RequestSpec};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::from_env()?;
//!
//! let spec = RequestSpec::new("/system/findProjects")
//!     .payload(json!({"level": "VIEW"}))
//!     .always_retry(true);
//! let response = client.execute(&spec).await?;
//! println!("{}", response.into_json());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Each setting is taken from the first source that has it:
//! 1. Environment variables `DX_APISERVER_HOST`, `DX_APISERVER_PORT`,
//!    `DX_APISERVER_PROTOCOL`, `DX_SECURITY_CONTEXT`
//! 2. `~/.dnanexus_config/environment.json`
//! 3. Built-in defaults (`https://api.dnanexus.com:443`, no credentials)
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod api;
pub mod config;
mod error_handling;
pub mod initialization;
mod request;

// Re-export public API
pub use config::{ApiServerConfig, CliArgs, LogFormat, LogLevel, SecurityContext};
pub use error_handling::{
    categorize_reqwest_error, ApiErrorBody, ContentLengthRetry, InitializationError,
    RequestError, RetryPolicy, TransportKind,
};
pub use request::{ApiClient, HttpMethod, Payload, RequestOptions, RequestSpec, ResponseBody};
