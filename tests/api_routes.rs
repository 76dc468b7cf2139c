//! Route wrappers map onto the expected API paths and retry rules.

mod helpers;

use dxhttp::api::{call_class, call_object, routes};
use dxhttp::RequestError;
use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::json;

use helpers::{client_for, client_for_addr, refused_addr};

#[tokio::test]
async fn test_class_route() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/project/new"),
            request::body(json_decoded(eq(json!({"name": "scratch"})))),
        ])
        .respond_with(json_encoded(json!({"id": "project-xxxx"}))),
    );

    let result = routes::project_new(&client_for(&server), json!({"name": "scratch"}))
        .await
        .expect("project/new should succeed");

    assert_eq!(result, json!({"id": "project-xxxx"}));
}

#[tokio::test]
async fn test_object_route() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/file-xxxx/describe"))
            .respond_with(json_encoded(json!({"id": "file-xxxx", "state": "closed"}))),
    );

    let result = routes::file_describe(&client_for(&server), "file-xxxx", json!({}))
        .await
        .expect("describe should succeed");

    assert_eq!(result["state"], "closed");
}

#[tokio::test]
async fn test_system_route() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/system/whoami"))
            .respond_with(json_encoded(json!({"id": "user-alice"}))),
    );

    let result = routes::system_whoami(&client_for(&server), json!({}))
        .await
        .expect("whoami should succeed");

    assert_eq!(result["id"], "user-alice");
}

#[tokio::test]
async fn test_generic_calls_build_paths() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/gtable/new"))
            .respond_with(json_encoded(json!({"id": "gtable-xxxx"}))),
    );
    server.expect(
        Expectation::matching(request::method_path("POST", "/gtable-xxxx/close"))
            .respond_with(json_encoded(json!({"id": "gtable-xxxx"}))),
    );

    let client = client_for(&server);
    call_class(&client, "gtable", "new", json!({}), false)
        .await
        .expect("class call should succeed");
    call_object(&client, "gtable-xxxx", "close", json!({}), false)
        .await
        .expect("object call should succeed");
}

#[tokio::test]
async fn test_text_response_becomes_json_string() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/system/greet"))
            .respond_with(status_code(200).body("hello")),
    );

    let result = call_class(&client_for(&server), "system", "greet", json!({}), false)
        .await
        .expect("greet should succeed");

    assert_eq!(result, json!("hello"));
}

#[tokio::test]
async fn test_read_only_route_retries_transport_failures() {
    let result = routes::record_describe(&client_for_addr(refused_addr()), "record-xxxx", json!({})).await;

    assert!(matches!(
        result,
        Err(RequestError::RetriesExhausted { attempts: 6, .. })
    ));
}

#[tokio::test]
async fn test_mutating_route_does_not_retry_transport_failures() {
    let result = routes::file_close(&client_for_addr(refused_addr()), "file-xxxx", json!({})).await;

    assert!(matches!(result, Err(RequestError::Transport { .. })));
}
