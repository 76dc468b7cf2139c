//! HTTP client initialization.
//!
//! This module builds the `reqwest::Client` shared by every request an
//! `ApiClient` makes.

use reqwest::ClientBuilder;

use crate::config::user_agent;
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used for API requests.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header identifying this client
/// - Certificate verification enabled (the builder default, never turned off)
/// - No client-wide timeout; each attempt sets its own
///
/// The client pools connections internally and is safe to share across tasks.
///
/// # Returns
///
/// A configured HTTP client ready for making requests.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the TLS backend cannot be initialized.
pub fn init_client() -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new().user_agent(user_agent()).build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_builds() {
        assert!(init_client().is_ok());
    }
}
