//! Retry behavior of the request executor against a mock API server.
//!
//! Every test counts attempts with `Expectation::times`; the server verifies
//! the count when it is dropped at the end of the test.

mod helpers;

use std::sync::Arc;
use std::time::{Duration, Instant};

use dxhttp::{
    ApiClient, HttpMethod, RequestError, RequestSpec, ResponseBody, RetryPolicy, TransportKind,
};
use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::json;

use helpers::{client_for, client_for_addr, refused_addr, server_config};

#[tokio::test]
async fn test_server_error_retried_until_budget_exhausted() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/system/whoami"))
            .times(6)
            .respond_with(status_code(500).body("Internal Server Error")),
    );

    let result = client_for(&server)
        .execute(&RequestSpec::new("/system/whoami").payload(json!({})))
        .await;

    match result {
        Err(RequestError::RetriesExhausted { attempts, last }) => {
            assert_eq!(attempts, 6, "1 attempt + 5 retries");
            assert_eq!(last.status_code(), Some(500));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_zero_retries_makes_single_attempt() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/system/whoami"))
            .times(1)
            .respond_with(status_code(503)),
    );

    let result = client_for(&server)
        .execute(&RequestSpec::new("/system/whoami").max_retries(0))
        .await;

    assert!(matches!(
        result,
        Err(RequestError::RetriesExhausted { attempts: 1, .. })
    ));
}

#[tokio::test]
async fn test_server_error_then_success() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/project-xxxx/describe"))
            .times(3)
            .respond_with(httptest::cycle![
                status_code(502),
                status_code(504),
                json_encoded(json!({"id": "project-xxxx"})),
            ]),
    );

    let response = client_for(&server)
        .execute(&RequestSpec::new("/project-xxxx/describe").payload(json!({})))
        .await
        .expect("third attempt should succeed");

    assert_eq!(response, ResponseBody::Json(json!({"id": "project-xxxx"})));
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/system/IDoNotExist"))
            .times(1)
            .respond_with(status_code(404).body("Not Found")),
    );

    let result = client_for(&server)
        .execute(&RequestSpec::new("/system/IDoNotExist").always_retry(true))
        .await;

    match result {
        Err(RequestError::HttpStatus { code, body, .. }) => {
            assert_eq!(code, 404);
            assert_eq!(body, "Not Found");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_with_content_length_is_not_retried() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/system/findProjects"))
            .times(1)
            .respond_with(
                status_code(200)
                    .insert_header("Content-Type", "application/json")
                    .body("{MalformedJson"),
            ),
    );

    let result = client_for(&server)
        .execute(&RequestSpec::new("/system/findProjects").always_retry(true))
        .await;

    assert!(matches!(
        result,
        Err(RequestError::MalformedResponseBody {
            content_length_present: true,
            ..
        })
    ));
}

#[tokio::test]
async fn test_get_retried_on_connection_refused() {
    let result = client_for_addr(refused_addr())
        .execute(
            &RequestSpec::new("/system/whoami")
                .method(HttpMethod::Get)
                .max_retries(2),
        )
        .await;

    match result {
        Err(RequestError::RetriesExhausted { attempts, last }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(
                *last,
                RequestError::Transport {
                    kind: TransportKind::Connect,
                    ..
                }
            ));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_post_not_retried_on_connection_refused() {
    let result = client_for_addr(refused_addr())
        .execute(&RequestSpec::new("/file/new").payload(json!({})))
        .await;

    assert!(matches!(
        result,
        Err(RequestError::Transport {
            kind: TransportKind::Connect,
            ..
        })
    ));
}

#[tokio::test]
async fn test_post_with_always_retry_retried_on_connection_refused() {
    let result = client_for_addr(refused_addr())
        .execute(
            &RequestSpec::new("/file/new")
                .payload(json!({}))
                .always_retry(true)
                .max_retries(1),
        )
        .await;

    assert!(matches!(
        result,
        Err(RequestError::RetriesExhausted { attempts: 2, .. })
    ));
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/job-xxxx/describe"))
            .times(2)
            .respond_with(delay_and_then(
                Duration::from_secs(1),
                json_encoded(json!({"state": "done"})),
            )),
    );

    let result = client_for(&server)
        .execute(
            &RequestSpec::new("/job-xxxx/describe")
                .always_retry(true)
                .max_retries(1)
                .timeout(Duration::from_millis(100)),
        )
        .await;

    match result {
        Err(RequestError::RetriesExhausted { attempts, last }) => {
            assert_eq!(attempts, 2);
            assert!(matches!(
                *last,
                RequestError::Transport {
                    kind: TransportKind::Timeout,
                    ..
                }
            ));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_backoff_doubles_between_attempts() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/system/whoami"))
            .times(4)
            .respond_with(status_code(500)),
    );

    let client = ApiClient::new(Arc::new(server_config(server.addr())))
        .expect("Failed to create API client")
        .with_retry_policy(RetryPolicy {
            backoff_unit: Duration::from_millis(20),
            ..Default::default()
        });

    let started = Instant::now();
    let result = client
        .execute(&RequestSpec::new("/system/whoami").max_retries(3))
        .await;
    let elapsed = started.elapsed();

    assert!(matches!(
        result,
        Err(RequestError::RetriesExhausted { attempts: 4, .. })
    ));
    // 20ms + 40ms + 80ms of backoff
    assert!(
        elapsed >= Duration::from_millis(140),
        "backoff too short: {elapsed:?}"
    );
}
