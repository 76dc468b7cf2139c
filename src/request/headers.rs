//! Request header construction.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

use crate::config::{user_agent, SecurityContext, API_VERSION, CONTENT_TYPE_JSON, HEADER_API_VERSION};
use crate::error_handling::RequestError;

/// Builds the headers sent with every attempt of a request.
///
/// Always includes `User-Agent` and `DNAnexus-API`. `Content-Type:
/// application/json` is added iff the request has a body, and `Authorization`
/// iff `auth` is set.
///
/// # Errors
///
/// - `RequestError::AuthConfiguration` if `auth` is set but there is no security context
/// - `RequestError::Configuration` if the token cannot be used as a header value
pub(crate) fn build_headers(
    has_body: bool,
    auth: bool,
    security_context: Option<&SecurityContext>,
) -> Result<HeaderMap, RequestError> {
    let mut headers = HeaderMap::new();

    let ua = HeaderValue::from_str(&user_agent())
        .map_err(|e| RequestError::Configuration(format!("invalid User-Agent: {e}")))?;
    headers.insert(USER_AGENT, ua);
    headers.insert(
        HeaderName::from_static(HEADER_API_VERSION),
        HeaderValue::from_static(API_VERSION),
    );

    if has_body {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    }

    if auth {
        let ctx = security_context.ok_or_else(|| {
            RequestError::AuthConfiguration(
                "DX_SECURITY_CONTEXT not found (or incorrect). Unable to set Authorization header"
                    .to_string(),
            )
        })?;
        let mut value = HeaderValue::from_str(&ctx.authorization()).map_err(|_| {
            RequestError::Configuration(
                "security context contains characters not allowed in a header".to_string(),
            )
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
