//! Server infrastructure security integration tests.
//!
//! These tests start a real server, send raw TCP traffic, and assert on
//! observable behavior.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::support::{parse, raw_request, spawn};

/// Send a partial request and return the open stream (for slowloris-style tests).
async fn raw_partial_request(addr: SocketAddr, payload: &[u8]) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.expect("failed to connect");
    stream
        .write_all(payload)
        .await
        .expect("failed to write partial request");
    stream
}

/// Headers declaring a 10 MB Content-Length are rejected on the header
/// alone with 413, before routing or authentication.
#[tokio::test]
async fn server_rejects_oversized_body() {
    let app = spawn().await;

    let response = raw_request(
        app.addr(),
        b"POST /ingredients/ HTTP/1.1\r\nHost: localhost\r\nContent-Length: 10485760\r\nConnection: close\r\n\r\n",
    )
    .await;
    let response = parse(&response);
    app.stop().await;

    assert_eq!(response.status, 413);
    assert_eq!(response.json()["error"], "Payload too large");
}

/// Opening 200 connections results in at least one being refused or
/// receiving a 503.
#[tokio::test]
async fn server_rejects_excess_connections() {
    let app = spawn().await;
    let addr = app.addr();

    let mut streams = Vec::new();
    let mut refused = 0usize;

    for _ in 0..200 {
        match TcpStream::connect(addr).await {
            Ok(s) => streams.push(s),
            Err(_) => refused += 1,
        }
    }

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let mut service_unavailable = 0usize;
    for mut stream in streams {
        let req = b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
        if stream.write_all(req).await.is_ok() {
            let mut buf = vec![0u8; 4096];
            if let Ok(Ok(n)) =
                tokio::time::timeout(std::time::Duration::from_secs(5), stream.read(&mut buf))
                    .await
                && n > 0
                && String::from_utf8_lossy(&buf[..n]).contains("503")
            {
                service_unavailable += 1;
            }
        }
    }

    app.stop().await;

    assert!(
        refused + service_unavailable > 0,
        "Expected at least one connection refused or 503, but all 200 were served"
    );
}

/// Connections that stall during header transmission are closed.
#[tokio::test]
async fn server_closes_slow_connections() {
    let app = spawn().await;

    let mut stream =
        raw_partial_request(app.addr(), b"GET /health HTTP/1.1\r\nHost: localhost\r\n").await;

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    let mut buf = vec![0u8; 4096];
    let result =
        tokio::time::timeout(std::time::Duration::from_secs(2), stream.read(&mut buf)).await;

    app.stop().await;

    match result {
        Ok(Ok(0)) | Ok(Err(_)) => {}
        Ok(Ok(n)) => {
            let resp = String::from_utf8_lossy(&buf[..n]);
            assert!(
                resp.contains("408") || resp.contains("timeout"),
                "Expected connection close or 408, got:\n{resp}"
            );
        }
        Err(_) => panic!("Server kept a stalled connection open"),
    }
}

/// Every response carries the standard security headers, errors included.
#[tokio::test]
async fn server_returns_security_headers() {
    let app = spawn().await;

    for path in ["/health", "/ingredients/"] {
        let res = app.get(path, None).await;
        assert_eq!(res.header("x-content-type-options").as_deref(), Some("nosniff"));
        assert_eq!(res.header("x-frame-options").as_deref(), Some("DENY"));
        assert_eq!(res.header("content-type").as_deref(), Some("application/json"));
    }

    app.stop().await;
}

/// The Origin header is echoed back for CORS.
#[tokio::test]
async fn server_echoes_origin() {
    let app = spawn().await;

    let response = raw_request(
        app.addr(),
        b"GET /health HTTP/1.1\r\nHost: localhost\r\nOrigin: https://pantry.example\r\nConnection: close\r\n\r\n",
    )
    .await;
    let response = parse(&response);
    app.stop().await;

    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("https://pantry.example")
    );
}

/// Bodies that are neither JSON nor a form are refused with 415.
#[tokio::test]
async fn server_rejects_wrong_content_type() {
    let app = spawn().await;
    let (_, token) = app.user("test@londonappdev.com").await;

    let res = app
        .post("/ingredients/", Some(&token), "application/xml", "<name>Kale</name>")
        .await;
    app.stop().await;

    assert_eq!(res.status, 415);
}

/// After shutdown the listener stops accepting.
#[tokio::test]
async fn server_stops_accepting_after_shutdown() {
    let app = spawn().await;
    let addr = app.addr();
    app.stop().await;

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(TcpStream::connect(addr).await.is_err());
}
