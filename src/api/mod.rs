//! API route wrappers.
//!
//! Every API call is a POST of a JSON input to one of two route shapes:
//! - class routes: `/<class>/<method>`, e.g. `/file/new` or `/system/whoami`
//! - object routes: `/<object-id>/<method>`, e.g. `/file-xxxx/describe`
//!
//! [`call_class`] and [`call_object`] cover any route; the functions in
//! [`routes`] are named shortcuts for common ones.

pub mod routes;

use serde_json::Value;

use crate::error_handling::RequestError;
use crate::request::{ApiClient, RequestSpec};

/// Calls a class route, `/<class>/<method>`.
///
/// # Arguments
///
/// * `client` - Client to send the request with
/// * `class` - Class name, e.g. `system` or `project`
/// * `method` - Route method, e.g. `new` or `findDataObjects`
/// * `input` - JSON input for the method
/// * `always_retry` - Whether the call is safe to retry on transport failures
///
/// # Returns
///
/// The JSON response. A non-JSON response is returned as a JSON string.
///
/// # Errors
///
/// Returns the executor's `RequestError` unchanged.
pub async fn call_class(
    client: &ApiClient,
    class: &str,
    method: &str,
    input: Value,
    always_retry: bool,
) -> Result<Value, RequestError> {
    call(client, format!("/{class}/{method}"), input, always_retry).await
}

/// Calls an object route, `/<object-id>/<method>`.
///
/// See [`call_class`] for the arguments and errors.
pub async fn call_object(
    client: &ApiClient,
    object_id: &str,
    method: &str,
    input: Value,
    always_retry: bool,
) -> Result<Value, RequestError> {
    call(client, format!("/{object_id}/{method}"), input, always_retry).await
}

async fn call(
    client: &ApiClient,
    resource: String,
    input: Value,
    always_retry: bool,
) -> Result<Value, RequestError> {
    let spec = RequestSpec::new(resource)
        .payload(input)
        .always_retry(always_retry);
    client.execute(&spec).await.map(|body| body.into_json())
}
