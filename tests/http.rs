//! HTTP hosting tests: status mapping, headers and graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

use quire::http::X_REQUEST_ID;
use quire::{HttpServer, Shutdown};

mod common;

async fn send(server: &HttpServer, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = server
        .router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn server() -> HttpServer {
    HttpServer::new(Arc::new(common::fixture().site))
}

#[tokio::test]
async fn test_routed_page_is_ok() {
    let (status, headers, body) = send(&server(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, common::HOME_PAGE);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    assert!(headers.contains_key(X_REQUEST_ID));
}

#[tokio::test]
async fn test_query_and_params_reach_site() {
    let (status, _, body) = send(&server(), "/post/first-post?ref=feed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "post:first-post route:7");
}

#[tokio::test]
async fn test_fallback_page_is_not_found() {
    let (status, _, body) = send(&server(), "/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "not found");
}

#[tokio::test]
async fn test_no_handler_is_not_found() {
    let server = HttpServer::new(Arc::new(common::fixture_without_fallback().site));
    let (status, _, body) = send(&server, "/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "No matching route found");
}

#[tokio::test]
async fn test_render_error_returns_partial_output() {
    let (status, _, body) = send(&server(), "/broken").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "before ");
}

#[tokio::test]
async fn test_incoming_request_id_is_propagated() {
    let response = server()
        .router()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(X_REQUEST_ID, "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get(X_REQUEST_ID).unwrap(), "abc-123");
}

#[tokio::test]
async fn test_serves_until_shutdown() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server().run(listener, shutdown.subscribe()));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /widgets HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.ends_with("<ul><li>gear</li></ul>"));

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}
