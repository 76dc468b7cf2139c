//! Configuration constants.
//!
//! This module defines the environment variable names, built-in defaults and
//! request parameters used throughout the client.

use std::time::Duration;

// Environment variables (also the key names inside the config file)
/// API server hostname
pub const ENV_APISERVER_HOST: &str = "DX_APISERVER_HOST";
/// API server port
pub const ENV_APISERVER_PORT: &str = "DX_APISERVER_PORT";
/// API server protocol (`http` or `https`)
pub const ENV_APISERVER_PROTOCOL: &str = "DX_APISERVER_PROTOCOL";
/// Security context, a JSON object string with `auth_token_type` and `auth_token`
pub const ENV_SECURITY_CONTEXT: &str = "DX_SECURITY_CONTEXT";

// Config file location, relative to the user's home directory
/// Directory holding the config file
pub const CONFIG_DIR_NAME: &str = ".dnanexus_config";
/// Config file name, a flat JSON object of the environment variables above
pub const CONFIG_FILE_NAME: &str = "environment.json";

// Built-in defaults
/// Default API server hostname
pub const DEFAULT_APISERVER_HOST: &str = "api.dnanexus.com";
/// Default API server port
pub const DEFAULT_APISERVER_PORT: &str = "443";
/// Default API server protocol
pub const DEFAULT_APISERVER_PROTOCOL: &str = "https";

// Retry strategy
/// Maximum number of retries after the initial attempt
/// 5 retries = 6 attempts in total, with 1+2+4+8+16 = 31s of backoff
pub const DEFAULT_RETRIES: u32 = 5;
/// Base unit of the exponential backoff: the delay before retry `n` is `unit * 2^(n-1)`
pub const RETRY_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Per-attempt HTTP timeout
/// Long-running API calls (e.g. large `find` queries) can legitimately take minutes
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// API version sent with every request in the `DNAnexus-API` header
pub const API_VERSION: &str = "1.0.0";

// HTTP header names (lowercase, as stored by the header map)
/// Header carrying [`API_VERSION`]
pub const HEADER_API_VERSION: &str = "dnanexus-api";
/// Content type of request bodies
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// User-Agent string identifying this client.
///
/// Format: `dxhttp/<crate version> (<os>)`, e.g. `dxhttp/0.1.0 (linux)`.
pub fn user_agent() -> String {
    format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}
