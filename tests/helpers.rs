// Shared test helpers for building clients against a mock API server.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dxhttp::{ApiClient, ApiServerConfig, RetryPolicy, SecurityContext};
use httptest::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Token placed in the security context of test clients.
#[allow(dead_code)] // Used by other test files
pub const TEST_TOKEN: &str = "test-token";

/// URL host form of `addr`'s IP (IPv6 literals are bracketed; `httptest`
/// binds to `::1` when IPv6 loopback is available).
#[allow(dead_code)] // Used by other test files
pub fn url_host(addr: SocketAddr) -> String {
    match addr {
        SocketAddr::V4(v4) => v4.ip().to_string(),
        SocketAddr::V6(v6) => format!("[{}]", v6.ip()),
    }
}

/// Server configuration pointing at `addr` over plain HTTP, with a bearer token.
#[allow(dead_code)] // Used by other test files
pub fn server_config(addr: SocketAddr) -> ApiServerConfig {
    ApiServerConfig::new("http", url_host(addr), addr.port().to_string())
        .with_security_context(SecurityContext {
            auth_token_type: "Bearer".to_string(),
            auth_token: TEST_TOKEN.to_string(),
        })
}

/// Backoff short enough that a full retry budget finishes in milliseconds.
#[allow(dead_code)] // Used by other test files
pub fn fast_retry_policy() -> RetryPolicy {
    RetryPolicy {
        backoff_unit: Duration::from_millis(1),
        ..Default::default()
    }
}

/// Client for the mock server with millisecond backoff.
#[allow(dead_code)] // Used by other test files
pub fn client_for(server: &Server) -> ApiClient {
    client_for_addr(server.addr())
}

/// Client for an arbitrary address with millisecond backoff.
#[allow(dead_code)] // Used by other test files
pub fn client_for_addr(addr: SocketAddr) -> ApiClient {
    ApiClient::new(Arc::new(server_config(addr)))
        .expect("Failed to create API client")
        .with_retry_policy(fast_retry_policy())
}

/// Address on which nothing is listening, so connections are refused.
#[allow(dead_code)] // Used by other test files
pub fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    addr
}

/// Server that answers every connection with the same raw bytes and then
/// closes it, for responses `httptest` cannot produce (bodies cut short).
///
/// Returns the listening address and a counter of connections served.
#[allow(dead_code)] // Used by other test files
pub async fn spawn_raw_server(response: &'static str) -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind raw server");
    let addr = listener.local_addr().expect("Failed to read local address");
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&hits);
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            if read_request(&mut stream).await.is_err() {
                continue;
            }
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (addr, hits)
}

/// Reads one request (headers and any `Content-Length` body) off the stream.
async fn read_request(stream: &mut tokio::net::TcpStream) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let body_len = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + body_len {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Ok(())
}
