//! Integration tests for the host HTTP server over a real loopback socket.
//!
//! Each test binds an ephemeral port, serves with a `MockCursor`, and talks
//! raw HTTP/1.1 to it so that framing, keep-alive, and error statuses are
//! exercised exactly as a controller would see them.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pointer_core::ClickButton;
use pointer_host::application::{CursorControl, IntegratorConfig, MotionIntegrator};
use pointer_host::infrastructure::cursor::MockCursor;
use pointer_host::infrastructure::http::HttpServer;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::timeout;

struct TestHost {
    addr: SocketAddr,
    cursor: Arc<MockCursor>,
    running: Arc<AtomicBool>,
    handle: JoinHandle<anyhow::Result<()>>,
}

async fn start_host(cursor: MockCursor) -> TestHost {
    let cursor = Arc::new(cursor);
    let integrator = Arc::new(MotionIntegrator::new(
        Arc::clone(&cursor) as Arc<dyn CursorControl>,
        IntegratorConfig::default(),
    ));
    let server = HttpServer::bind("127.0.0.1:0".parse().unwrap(), integrator)
        .await
        .expect("bind loopback");
    let addr = server.local_addr().unwrap();
    let running = Arc::new(AtomicBool::new(true));
    let handle = tokio::spawn(server.serve(Arc::clone(&running)));
    TestHost {
        addr,
        cursor,
        running,
        handle,
    }
}

/// A parsed response: status code, lowercase header map, body.
struct RawResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RawResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }
}

/// Reads exactly one response off `stream`.
async fn read_response(stream: &mut TcpStream, buf: &mut Vec<u8>) -> RawResponse {
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let mut chunk = [0u8; 1024];
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before response head");
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
    let mut lines = head.split("\r\n");
    let status: u16 = lines.next().unwrap().split(' ').nth(1).unwrap().parse().unwrap();
    let headers: Vec<(String, String)> = lines
        .map(|l| {
            let (n, v) = l.split_once(':').unwrap();
            (n.trim().to_string(), v.trim().to_string())
        })
        .collect();
    let len: usize = headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
        .map(|(_, v)| v.parse().unwrap())
        .unwrap_or(0);

    let body_start = head_end + 4;
    while buf.len() < body_start + len {
        let mut chunk = [0u8; 1024];
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed mid-body");
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = buf[body_start..body_start + len].to_vec();
    buf.drain(..body_start + len);

    RawResponse {
        status,
        headers,
        body,
    }
}

fn request(method: &str, path: &str, body: &str) -> String {
    format!(
        "{method} {path} HTTP/1.1\r\nHost: test\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    )
}

async fn one_shot(addr: SocketAddr, raw: &str) -> RawResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut buf = Vec::new();
    timeout(Duration::from_secs(5), read_response(&mut stream, &mut buf))
        .await
        .expect("response within timeout")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_status_probe_over_loopback() {
    // Arrange
    let host = start_host(MockCursor::at(640, 360)).await;

    // Act
    let resp = one_shot(host.addr, &request("GET", "/test", "")).await;

    // Assert
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
    let v = resp.json();
    assert_eq!(v["success"], true);
    assert_eq!(v["position"]["x"], 640);
}

#[tokio::test]
async fn test_keep_alive_connection_carries_a_burst_of_motion() {
    // Arrange
    let host = start_host(MockCursor::at(0, 0)).await;
    let mut stream = TcpStream::connect(host.addr).await.unwrap();
    let mut buf = Vec::new();

    // Act: three moves back to back on one connection
    let mut positions = Vec::new();
    for _ in 0..3 {
        stream
            .write_all(request("POST", "/mouse", r#"{"deltaX":10,"deltaY":0}"#).as_bytes())
            .await
            .unwrap();
        let resp = read_response(&mut stream, &mut buf).await;
        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("connection"), Some("keep-alive"));
        positions.push(resp.json()["position"]["x"].as_i64().unwrap());
    }

    // Assert
    assert_eq!(positions, vec![10, 20, 30]);
    assert_eq!(host.cursor.moves(), vec![(10, 0), (20, 0), (30, 0)]);
}

#[tokio::test]
async fn test_pipelined_requests_are_answered_in_order() {
    // Arrange
    let host = start_host(MockCursor::at(5, 5)).await;
    let mut stream = TcpStream::connect(host.addr).await.unwrap();
    let raw = format!(
        "{}{}",
        request("POST", "/click", r#"{"type":"right"}"#),
        request("GET", "/position", "")
    );

    // Act
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut buf = Vec::new();
    let first = read_response(&mut stream, &mut buf).await;
    let second = read_response(&mut stream, &mut buf).await;

    // Assert
    assert_eq!(first.json()["message"], "Performed right click");
    assert_eq!(second.json()["position"]["y"], 5);
    assert_eq!(host.cursor.clicks(), vec![ClickButton::Right]);
}

#[tokio::test]
async fn test_invalid_payloads_are_client_errors() {
    let host = start_host(MockCursor::at(0, 0)).await;

    let middle = one_shot(host.addr, &request("POST", "/click", r#"{"type":"middle"}"#)).await;
    assert_eq!(middle.status, 400);
    assert_eq!(middle.json()["error"], "Invalid click type");

    let bad_motion = one_shot(host.addr, &request("POST", "/mouse", r#"{"deltaX":"x"}"#)).await;
    assert_eq!(bad_motion.status, 400);
    assert_eq!(bad_motion.json()["error"], "Invalid mouse movement data");

    assert!(host.cursor.clicks().is_empty());
    assert!(host.cursor.moves().is_empty());
}

#[tokio::test]
async fn test_capability_failure_is_server_error() {
    let host = start_host(MockCursor::failing()).await;
    let resp = one_shot(host.addr, &request("GET", "/test", "")).await;
    assert_eq!(resp.status, 500);
    assert_eq!(resp.json()["error"], "Failed to initialize mouse control");
}

#[tokio::test]
async fn test_preflight_and_unknown_routes() {
    let host = start_host(MockCursor::new()).await;

    let preflight = one_shot(host.addr, &request("OPTIONS", "/mouse", "")).await;
    assert_eq!(preflight.status, 204);
    assert_eq!(preflight.header("access-control-allow-methods"), Some("GET, POST"));

    assert_eq!(one_shot(host.addr, &request("GET", "/missing", "")).await.status, 404);
    assert_eq!(one_shot(host.addr, &request("DELETE", "/mouse", "")).await.status, 405);
}

#[tokio::test]
async fn test_malformed_and_oversized_requests_are_rejected() {
    let host = start_host(MockCursor::new()).await;

    let garbage = one_shot(host.addr, "NONSENSE\r\n\r\n").await;
    assert_eq!(garbage.status, 400);
    assert_eq!(garbage.header("connection"), Some("close"));

    let huge = one_shot(
        host.addr,
        "POST /mouse HTTP/1.1\r\nContent-Length: 10000000\r\n\r\n",
    )
    .await;
    assert_eq!(huge.status, 413);
}

#[tokio::test]
async fn test_connection_close_is_honoured() {
    // Arrange
    let host = start_host(MockCursor::new()).await;
    let mut stream = TcpStream::connect(host.addr).await.unwrap();

    // Act
    stream
        .write_all(b"GET /position HTTP/1.1\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut buf = Vec::new();
    let resp = read_response(&mut stream, &mut buf).await;
    let mut rest = Vec::new();
    let n = timeout(Duration::from_secs(5), stream.read_to_end(&mut rest))
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("connection"), Some("close"));
    assert_eq!(n, 0);
}

#[tokio::test]
async fn test_clearing_running_flag_stops_accept_loop() {
    // Arrange
    let host = start_host(MockCursor::new()).await;

    // Act
    host.running.store(false, Ordering::Relaxed);
    let result = timeout(Duration::from_secs(2), host.handle)
        .await
        .expect("serve returns after the flag is cleared");

    // Assert
    assert!(result.unwrap().is_ok());
}
