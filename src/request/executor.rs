//! Request executor with retry and exponential backoff.
//!
//! # Data Flow
//! ```text
//! RequestSpec
//!     → resolve URL, serialize payload, build headers (fatal on error)
//!     → send attempt (per-attempt timeout)
//!     → read body chunk by chunk (early EOF → length mismatch or truncated JSON)
//!     → classify response (response.rs)
//!     → success: return decoded body
//!     → error: RetryPolicy::should_retry?
//!         no  → return the error
//!         yes → retries left? sleep 2^attempt units and send again
//!               otherwise → RetriesExhausted
//! ```
//!
//! Cancellation is checked while an attempt is in flight and while backing
//! off; either way the call returns `RequestError::Cancelled` at once.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};
use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::ApiServerConfig;
use crate::error_handling::{categorize_reqwest_error, InitializationError, RequestError, RetryPolicy};
use crate::initialization::init_client;
use crate::request::headers::build_headers;
use crate::request::response::{classify_response, classify_truncated_body};
use crate::request::types::{HttpMethod, Payload, RequestSpec, ResponseBody};

/// Client for the API server.
///
/// Cheap to clone; clones share the underlying connection pool. The client
/// holds no mutable state, so concurrent calls are independent of each other.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    server: Arc<ApiServerConfig>,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Creates a client for an explicit API server configuration.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the HTTP client cannot be built.
    pub fn new(server: Arc<ApiServerConfig>) -> Result<Self, InitializationError> {
        Ok(Self {
            http: init_client()?,
            server,
            retry: RetryPolicy::default(),
        })
    }

    /// Creates a client using the process-wide configuration.
    ///
    /// The configuration is resolved from the environment and config file on
    /// first use; see [`ApiServerConfig::global`].
    pub fn from_env() -> Result<Self, InitializationError> {
        Self::new(ApiServerConfig::global())
    }

    /// Replaces the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// API server configuration used by this client.
    pub fn server(&self) -> &ApiServerConfig {
        &self.server
    }

    /// Retry policy used by this client.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Performs a request, retrying per the client's policy.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or `RequestError::RetriesExhausted`
    /// wrapping the last error once `max_retries` retries have been spent.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<ResponseBody, RequestError> {
        self.execute_with_cancel(spec, &CancellationToken::new())
            .await
    }

    /// Performs a request that can be aborted through `cancel`.
    ///
    /// Cancelling aborts the attempt in flight or cuts the backoff sleep
    /// short, and the call returns `RequestError::Cancelled` instead of retrying.
    pub async fn execute_with_cancel(
        &self,
        spec: &RequestSpec,
        cancel: &CancellationToken,
    ) -> Result<ResponseBody, RequestError> {
        let options = &spec.options;
        let method = options.method;

        let url = self.resolve_url(spec)?;
        let body = spec.payload.as_ref().map(Payload::to_body);
        let headers = build_headers(
            body.is_some(),
            options.auth,
            self.server.security_context.as_ref(),
        )?;

        let mut delays = self.retry.backoff_schedule();
        let mut attempt: u32 = 0;

        loop {
            debug!("{method} {url} (attempt {attempt})");
            let started = Instant::now();

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(RequestError::Cancelled { attempts: attempt });
                }
                result = self.send_once(method, &url, &headers, body.as_deref(), options.timeout) => result,
            };

            let error = match result {
                Ok(response) => {
                    debug!(
                        "{method} {url} <= ok ({}ms)",
                        started.elapsed().as_millis()
                    );
                    return Ok(response);
                }
                Err(error) => error,
            };

            if !self.retry.should_retry(&error, method, options.always_retry) {
                return Err(error);
            }

            let delay = match delays.next() {
                Some(delay) if attempt < options.max_retries => delay,
                _ => {
                    return Err(RequestError::RetriesExhausted {
                        attempts: attempt + 1,
                        last: Box::new(error),
                    });
                }
            };

            warn!(
                "{method} {url}: {error}. Waiting {delay:?} before retry {} of {}...",
                attempt + 1,
                options.max_retries
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(RequestError::Cancelled { attempts: attempt + 1 });
                }
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }

    /// Builds the target URL: the server base URL plus the resource, or the
    /// resource on its own when `prepend_srv` is off.
    fn resolve_url(&self, spec: &RequestSpec) -> Result<Url, RequestError> {
        let raw = if spec.options.prepend_srv {
            format!("{}{}", self.server.base_url()?, spec.resource)
        } else {
            spec.resource.clone()
        };
        Url::parse(&raw)
            .map_err(|e| RequestError::Configuration(format!("invalid URL '{raw}': {e}")))
    }

    /// Sends a single attempt and classifies the outcome.
    async fn send_once(
        &self,
        method: HttpMethod,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&str>,
        timeout: Duration,
    ) -> Result<ResponseBody, RequestError> {
        let mut request = self
            .http
            .request(method.into(), url.clone())
            .headers(headers.clone())
            .timeout(timeout);
        if let Some(body) = body {
            request = request.body(body.to_owned());
        }

        let mut response = request
            .send()
            .await
            .map_err(|e| categorize_reqwest_error(&e))?;
        let status = response.status().as_u16();
        let response_headers = response.headers().clone();

        // Read chunk by chunk so a body cut short can be told apart from a
        // connection that never produced a response
        let mut body = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) if e.is_timeout() => return Err(categorize_reqwest_error(&e)),
                // Error statuses are reported as such, with whatever body arrived
                Err(_) if !(200..300).contains(&status) => break,
                Err(e) => {
                    let error = categorize_reqwest_error(&e);
                    return Err(classify_truncated_body(
                        &response_headers,
                        body.len() as u64,
                        &error.to_string(),
                    )
                    .unwrap_or(error));
                }
            }
        }

        classify_response(status, &response_headers, &body)
    }
}
