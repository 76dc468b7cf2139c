//! Request and response types.

use std::str::FromStr;
use std::time::Duration;

use serde_json::Value;
use strum_macros::{Display as DisplayMacro, EnumString};

use crate::config::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRIES};
use crate::error_handling::RequestError;

/// HTTP methods supported by the API server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, DisplayMacro, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    /// Idempotent, always safe to retry
    Get,
    /// Default for API calls
    #[default]
    Post,
}

impl HttpMethod {
    /// Parses a method name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::Configuration` for anything other than GET or POST.
    pub fn parse(method: &str) -> Result<Self, RequestError> {
        HttpMethod::from_str(method).map_err(|_| {
            RequestError::Configuration(format!(
                "method should be either GET or POST, got '{method}'"
            ))
        })
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Request body.
///
/// Structured values are serialized to JSON; text is sent as-is, so callers
/// that already hold serialized JSON avoid a round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Pre-serialized body
    Text(String),
    /// Value serialized with `serde_json`
    Json(Value),
}

impl Payload {
    /// Serializes the payload into the request body.
    pub fn to_body(&self) -> String {
        match self {
            Payload::Text(text) => text.clone(),
            Payload::Json(value) => value.to_string(),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

/// Per-request options.
///
/// # Examples
///
/// ```
/// use dxhttp::{HttpMethod, RequestOptions};
///
/// let options = RequestOptions {
///     method: HttpMethod::Get,
///     max_retries: 2,
///     ..Default::default()
/// };
/// assert!(options.auth);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// HTTP method
    pub method: HttpMethod,
    /// The caller asserts the request is safe to retry even if it is not idempotent
    pub always_retry: bool,
    /// Prepend the API server base URL to the resource; otherwise the resource is a full URL
    pub prepend_srv: bool,
    /// Maximum number of retries after the first attempt (0 = a single attempt)
    pub max_retries: u32,
    /// Send the `Authorization` header from the security context
    pub auth: bool,
    /// Timeout for each attempt
    pub timeout: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: HttpMethod::Post,
            always_retry: false,
            prepend_srv: true,
            max_retries: DEFAULT_RETRIES,
            auth: true,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// A single logical API request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// Route such as `/system/whoami`, or a full URL when `prepend_srv` is false
    pub resource: String,
    /// Request body, if any
    pub payload: Option<Payload>,
    /// Request options
    pub options: RequestOptions,
}

impl RequestSpec {
    /// Creates a POST request without a body and with default options.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            payload: None,
            options: RequestOptions::default(),
        }
    }

    /// Sets the request body.
    pub fn payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Replaces the request options.
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.options.method = method;
        self
    }

    /// Marks the request as safe to retry.
    pub fn always_retry(mut self, always_retry: bool) -> Self {
        self.options.always_retry = always_retry;
        self
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.options.max_retries = max_retries;
        self
    }

    /// Turns the `Authorization` header on or off.
    pub fn auth(mut self, auth: bool) -> Self {
        self.options.auth = auth;
        self
    }

    /// Sets the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body of a response with a JSON content type
    Json(Value),
    /// Body of any other response
    Text(String),
}

impl ResponseBody {
    /// Returns the JSON value, if the response was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    /// Converts the body into a JSON value, wrapping text as a JSON string.
    pub fn into_json(self) -> Value {
        match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_parse() {
        assert_eq!(HttpMethod::parse("GET").unwrap(), HttpMethod::Get);
        assert_eq!(HttpMethod::parse("post").unwrap(), HttpMethod::Post);
        assert_eq!(HttpMethod::parse("Get").unwrap(), HttpMethod::Get);
    }

    #[test]
    fn test_http_method_parse_rejects_unsupported() {
        for method in ["PUT", "DELETE", "PATCH", ""] {
            assert!(
                matches!(HttpMethod::parse(method), Err(RequestError::Configuration(_))),
                "{method} should be rejected"
            );
        }
    }

    #[test]
    fn test_http_method_display_and_default() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::default(), HttpMethod::Post);
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
    }

    #[test]
    fn test_payload_value_and_preserialized_text_match() {
        let value = json!({"a": 1, "b": [true, null, "x"]});
        let serialized = serde_json::to_string(&value).unwrap();
        assert_eq!(
            Payload::from(value).to_body(),
            Payload::from(serialized).to_body()
        );
    }

    #[test]
    fn test_payload_text_is_sent_verbatim() {
        let text = "{ \"spaced\" : 1 }";
        assert_eq!(Payload::from(text).to_body(), text);
    }

    #[test]
    fn test_request_options_defaults() {
        let options = RequestOptions::default();
        assert_eq!(options.method, HttpMethod::Post);
        assert!(!options.always_retry);
        assert!(options.prepend_srv);
        assert_eq!(options.max_retries, 5);
        assert!(options.auth);
        assert_eq!(options.timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_request_spec_builder() {
        let spec = RequestSpec::new("/system/whoami")
            .payload(json!({}))
            .method(HttpMethod::Get)
            .always_retry(true)
            .max_retries(0);
        assert_eq!(spec.resource, "/system/whoami");
        assert_eq!(spec.payload, Some(Payload::Json(json!({}))));
        assert_eq!(spec.options.method, HttpMethod::Get);
        assert!(spec.options.always_retry);
        assert_eq!(spec.options.max_retries, 0);
    }

    #[test]
    fn test_response_body_accessors() {
        let json_body = ResponseBody::Json(json!({"a": 1}));
        assert_eq!(json_body.as_json(), Some(&json!({"a": 1})));
        assert_eq!(json_body.into_json(), json!({"a": 1}));

        let text_body = ResponseBody::Text("a=1".to_string());
        assert!(text_body.as_json().is_none());
        assert_eq!(text_body.into_json(), json!("a=1"));
    }
}
