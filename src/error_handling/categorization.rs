//! Error categorization and retry strategy.
//!
//! This module maps HTTP client failures onto [`RequestError`] and decides,
//! per request, which errors are worth another attempt and how long to wait.

use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

use super::types::{RequestError, TransportKind};
use crate::config::RETRY_BACKOFF_UNIT;
use crate::request::HttpMethod;

/// When a `Content-Length` mismatch may be retried.
///
/// A short body on a POST may mean the server acted on the request, so
/// replaying it is only safe for some routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentLengthRetry {
    /// Retry for GET requests, or when the caller set `always_retry` (default)
    #[default]
    GetOrAlwaysRetry,
    /// Retry only when the caller set `always_retry`
    AlwaysRetryOnly,
}

/// Retry policy shared by all requests made through one client.
///
/// The number of retries is a per-request option; the policy decides which
/// errors qualify and how long to back off between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry; each later retry waits twice as long as the previous one
    pub backoff_unit: Duration,
    /// Retry rule for `Content-Length` mismatches
    pub content_length_retry: ContentLengthRetry,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff_unit: RETRY_BACKOFF_UNIT,
            content_length_retry: ContentLengthRetry::default(),
        }
    }
}

impl RetryPolicy {
    /// Determines if an error should be retried for the given request.
    ///
    /// # Retriable Errors
    ///
    /// - Transport failures, when `always_retry` is set or the method is GET
    /// - Server errors (5xx HTTP status codes)
    /// - `Content-Length` mismatches, per [`ContentLengthRetry`]
    /// - Unparseable JSON bodies, only when the response had no `Content-Length`
    ///   (a streaming response that was cut short)
    ///
    /// # Non-Retriable Errors
    ///
    /// - Client errors (4xx) and any other non-2xx status outside 5xx
    /// - Configuration and authentication errors
    /// - Unparseable JSON bodies with a `Content-Length` header
    pub fn should_retry(&self, error: &RequestError, method: HttpMethod, always_retry: bool) -> bool {
        if error.is_fatal() {
            return false;
        }
        let idempotent_or_safe = always_retry || method == HttpMethod::Get;
        match error {
            RequestError::Transport { .. } => idempotent_or_safe,
            RequestError::HttpStatus { code, .. } => (500..600).contains(code),
            RequestError::ContentLengthMismatch { .. } => match self.content_length_retry {
                ContentLengthRetry::GetOrAlwaysRetry => idempotent_or_safe,
                ContentLengthRetry::AlwaysRetryOnly => always_retry,
            },
            RequestError::MalformedResponseBody {
                content_length_present,
                ..
            } => !content_length_present,
            _ => false,
        }
    }

    /// Creates the exponential backoff schedule.
    ///
    /// Yields `unit`, `2*unit`, `4*unit`, ... with no upper bound and no
    /// jitter. The n-th item is the delay before retry n, so the delay
    /// before attempt k (k >= 1, counting from 0) is `unit * 2^(k-1)`.
    ///
    /// Delays have millisecond granularity: a non-zero unit below 1ms is
    /// rounded up to 1ms, and a zero unit disables the backoff.
    pub fn backoff_schedule(&self) -> impl Iterator<Item = Duration> {
        let mut unit_ms = u64::try_from(self.backoff_unit.as_millis()).unwrap_or(u64::MAX);
        if unit_ms == 0 && !self.backoff_unit.is_zero() {
            unit_ms = 1;
        }
        // ExponentialBackoff yields factor * 2^n for n >= 1, halve it to start at the unit
        ExponentialBackoff::from_millis(2)
            .factor(unit_ms)
            .map(|delay| delay / 2)
    }
}

/// Categorizes a `reqwest::Error` into a `RequestError`.
///
/// Builder errors (bad URL, invalid header value) mean the request itself is
/// wrong and become `Configuration`; everything else is a transport failure.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> RequestError {
    if error.is_builder() {
        return RequestError::Configuration(error_chain_message(error));
    }

    let kind = if error.is_timeout() {
        TransportKind::Timeout
    } else if error.is_connect() {
        TransportKind::Connect
    } else if error.is_body() || error.is_decode() {
        TransportKind::Body
    } else if error.is_request() {
        TransportKind::Request
    } else {
        TransportKind::Other
    };

    RequestError::Transport {
        kind,
        message: error_chain_message(error),
    }
}

/// Joins an error and its sources into one line, e.g. `error sending request: connection refused`.
fn error_chain_message(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }
    message
}
