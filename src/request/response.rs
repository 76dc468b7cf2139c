//! Response classification.
//!
//! Turns a received response (status, headers, body bytes) into either a
//! decoded body or a classified error. No I/O happens here.

use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};

use crate::config::CONTENT_TYPE_JSON;
use crate::error_handling::{ApiErrorBody, RequestError};
use crate::request::types::ResponseBody;

/// Returns `true` if the `Content-Type` header announces JSON.
///
/// Matching is case-insensitive and tolerates leading whitespace and
/// parameters such as `; charset=utf-8`.
pub(crate) fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with(CONTENT_TYPE_JSON)
        })
        .unwrap_or(false)
}

/// Value of the `Content-Length` header, if present and numeric.
pub(crate) fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

/// Classifies a response whose body stopped arriving before it was complete.
///
/// The connection closing early is reported by the HTTP client as a body
/// error; this maps it onto the response-level error it stands for.
///
/// # Arguments
///
/// * `headers` - Response headers
/// * `received` - Number of body bytes read before the failure
/// * `message` - Description of the read failure
///
/// # Returns
///
/// - `ContentLengthMismatch` if the response declared a `Content-Length`
/// - `MalformedResponseBody` without a `Content-Length` if the response is a JSON stream
/// - `None` otherwise, leaving the failure a transport error
pub(crate) fn classify_truncated_body(
    headers: &HeaderMap,
    received: u64,
    message: &str,
) -> Option<RequestError> {
    if let Some(expected) = declared_content_length(headers) {
        return Some(RequestError::ContentLengthMismatch { expected, received });
    }
    if is_json_content_type(headers) {
        return Some(RequestError::MalformedResponseBody {
            message: format!("response truncated after {received} bytes: {message}"),
            content_length_present: false,
        });
    }
    None
}

/// Classifies a fully received response.
///
/// # Arguments
///
/// * `status` - HTTP status code
/// * `headers` - Response headers
/// * `body` - Response body bytes as received
///
/// # Returns
///
/// The decoded body for a 2xx response: parsed JSON if the content type says
/// so, the raw text otherwise.
///
/// # Errors
///
/// - `HttpStatus` for any non-2xx status, with the API error envelope attached when present
/// - `ContentLengthMismatch` if `Content-Length` disagrees with the bytes received
/// - `MalformedResponseBody` if a JSON response does not parse
pub(crate) fn classify_response(
    status: u16,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<ResponseBody, RequestError> {
    let is_json = is_json_content_type(headers);

    if !(200..300).contains(&status) {
        let body = String::from_utf8_lossy(body).into_owned();
        let api_error = if is_json {
            ApiErrorBody::parse(&body)
        } else {
            None
        };
        return Err(RequestError::HttpStatus {
            code: status,
            body,
            api_error,
        });
    }

    let content_length = declared_content_length(headers);
    if let Some(expected) = content_length {
        let received = body.len() as u64;
        if expected != received {
            return Err(RequestError::ContentLengthMismatch { expected, received });
        }
    }

    if is_json {
        serde_json::from_slice(body)
            .map(ResponseBody::Json)
            .map_err(|e| RequestError::MalformedResponseBody {
                message: e.to_string(),
                content_length_present: content_length.is_some(),
            })
    } else {
        Ok(ResponseBody::Text(String::from_utf8_lossy(body).into_owned()))
    }
}
