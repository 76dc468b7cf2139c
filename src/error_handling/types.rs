//! Error type definitions.
//!
//! This module defines the error taxonomy for API requests and the errors
//! that can occur while initializing the client.

use std::fmt;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use serde::Deserialize;
use strum_macros::Display as DisplayMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Kinds of transport-level failures (no usable response was received).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DisplayMacro)]
pub enum TransportKind {
    /// The attempt exceeded its timeout
    Timeout,
    /// Connection could not be established (refused, DNS failure, TLS failure)
    Connect,
    /// The request could not be sent
    Request,
    /// The response body could not be read to completion
    Body,
    /// Any other transport failure
    Other,
}

/// Error envelope returned by the API server on failure.
///
/// ```json
/// {"error": {"type": "ResourceNotFound", "message": "...", "details": {...}}}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    /// Error class, e.g. `InvalidInput` or `PermissionDenied`
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable message
    pub message: String,
    /// Structured details, when the server provides them
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

impl ApiErrorBody {
    /// Parses the server's error envelope, returning `None` for any other shape.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str::<ApiErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error)
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

/// Errors returned by the request executor.
///
/// Whether a variant is retried depends on the request (see
/// [`RetryPolicy::should_retry`](crate::RetryPolicy::should_retry)); the
/// executor only ever returns the terminal error.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Invalid method, URL or options. Never retried.
    #[error("Invalid request configuration: {0}")]
    Configuration(String),

    /// Authentication was requested but no valid security context is available. Never retried.
    #[error("Authentication configuration error: {0}")]
    AuthConfiguration(String),

    /// No response was received from the server.
    #[error("Transport error ({kind}): {message}")]
    Transport {
        /// What went wrong at the transport level
        kind: TransportKind,
        /// Description from the HTTP client
        message: String,
    },

    /// The server answered with a non-2xx status code.
    #[error("{}", http_status_message(.code, .body, .api_error.as_ref()))]
    HttpStatus {
        /// HTTP status code
        code: u16,
        /// Raw response body
        body: String,
        /// Parsed API error envelope, if the body contained one
        api_error: Option<ApiErrorBody>,
    },

    /// The `Content-Length` header disagrees with the number of bytes received.
    #[error("Received response with content-length header set to {expected} but content length is {received}")]
    ContentLengthMismatch {
        /// Value of the `Content-Length` header
        expected: u64,
        /// Number of body bytes received
        received: u64,
    },

    /// The response claimed to be JSON but could not be parsed.
    #[error("Invalid JSON received from server: {message}")]
    MalformedResponseBody {
        /// Parser error
        message: String,
        /// Whether the response carried a `Content-Length` header
        content_length_present: bool,
    },

    /// A retryable error persisted after every allowed attempt.
    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Total number of attempts made
        attempts: u32,
        /// The error from the final attempt
        #[source]
        last: Box<RequestError>,
    },

    /// The caller cancelled the request.
    #[error("Request cancelled after {attempts} attempts")]
    Cancelled {
        /// Number of attempts completed before cancellation
        attempts: u32,
    },
}

fn http_status_message(code: &u16, body: &str, api_error: Option<&ApiErrorBody>) -> String {
    match api_error {
        Some(api_error) => format!("{api_error}, code {code}"),
        None => format!("HTTP status code: {code}, response body = '{body}'"),
    }
}

impl RequestError {
    /// HTTP status code, for errors that carry one.
    ///
    /// Looks through `RetriesExhausted` to the last underlying error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RequestError::HttpStatus { code, .. } => Some(*code),
            RequestError::RetriesExhausted { last, .. } => last.status_code(),
            _ => None,
        }
    }

    /// Parsed API error envelope, for errors that carry one.
    pub fn api_error(&self) -> Option<&ApiErrorBody> {
        match self {
            RequestError::HttpStatus { api_error, .. } => api_error.as_ref(),
            RequestError::RetriesExhausted { last, .. } => last.api_error(),
            _ => None,
        }
    }

    /// Returns `true` for errors that are never retried, whatever the request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RequestError::Configuration(_)
                | RequestError::AuthConfiguration(_)
                | RequestError::RetriesExhausted { .. }
                | RequestError::Cancelled { .. }
        )
    }
}
