//! Test harness: a real server on a random port over a fresh database file.

#![allow(dead_code)]

use std::net::SocketAddr;

use libsql::Connection;
use pantry::config::{Auth, Config, Database, Server as ServerConfig};
use pantry::store::{User, user};
use pantry::{DbHandle, auth, db, server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub const SECRET: &str = "test-secret-that-is-at-least-32b!";

pub const JSON: &str = "application/json";

pub struct TestApp {
    pub server: server::Server,
    pub db: DbHandle,
    pub conn: Connection,
    pub config: Config,
    _dir: tempfile::TempDir,
}

pub struct TestResponse {
    pub status: u16,
    pub head: String,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", self.body))
    }

    /// Case-insensitive header lookup over the raw response head.
    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case(name)
                .then(|| v.trim().to_string())
        })
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: Database::default(),
        auth: Auth {
            jwt_secret: SECRET.to_string(),
            token_expiry_days: 1,
        },
    }
}

/// Start a server backed by its own database.
pub async fn spawn() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("pantry.db");
    let handle = db::open(path.to_str().unwrap()).await.expect("open db");
    let conn = db::connection(&handle).await.expect("connect");

    let mut config = test_config();
    config.database.url = path.display().to_string();

    let server = server::start(
        config.clone(),
        Some(handle.clone()),
        pantry::app::router().into_handle(),
    )
    .await
    .expect("failed to start test server");

    TestApp {
        server,
        db: handle,
        conn,
        config,
        _dir: dir,
    }
}

impl TestApp {
    pub fn addr(&self) -> SocketAddr {
        self.server.addr()
    }

    /// Provision a user and mint a bearer token for them.
    pub async fn user(&self, email: &str) -> (User, String) {
        let account = user::create(&self.conn, email).await.unwrap();
        let token = auth::create_token(&self.config.auth, &account.id.to_string()).unwrap();
        (account, token)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send("GET", path, token, None, "").await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        content_type: &str,
        body: &str,
    ) -> TestResponse {
        self.send("POST", path, token, Some(content_type), body).await
    }

    pub async fn send(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        content_type: Option<&str>,
        body: &str,
    ) -> TestResponse {
        let mut request = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
        if let Some(token) = token {
            request.push_str(&format!("Authorization: Bearer {token}\r\n"));
        }
        if let Some(ct) = content_type {
            request.push_str(&format!("Content-Type: {ct}\r\n"));
        }
        request.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));

        let raw = raw_request(self.addr(), request.as_bytes()).await;
        parse(&raw)
    }

    pub async fn stop(self) {
        self.server.shutdown().await.unwrap();
    }
}

/// Send a raw HTTP/1.1 request and read until the server closes.
pub async fn raw_request(addr: SocketAddr, payload: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.expect("failed to connect");
    stream.write_all(payload).await.expect("failed to write");

    let mut buf = Vec::new();
    let _ = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        stream.read_to_end(&mut buf),
    )
    .await;
    buf
}

pub fn parse(raw: &[u8]) -> TestResponse {
    let text = String::from_utf8_lossy(raw).into_owned();
    let (head, body) = text
        .split_once("\r\n\r\n")
        .unwrap_or_else(|| panic!("malformed response:\n{text}"));
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("no status line:\n{text}"));
    TestResponse {
        status,
        head: head.to_string(),
        body: body.to_string(),
    }
}
