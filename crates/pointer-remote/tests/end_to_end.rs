//! Controller → host over a real loopback socket.
//!
//! Runs the host's HTTP server in-process on an ephemeral port with a
//! recording `MockCursor`, and drives it through `RemoteSession` and the
//! `reqwest` transport exactly as the CLI does.

use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use pointer_core::protocol::{ClickButton, CursorPosition, MotionRequest};
use pointer_core::{SamplerConfig, TouchSample};
use pointer_host::application::{CursorControl, IntegratorConfig, MotionIntegrator};
use pointer_host::infrastructure::cursor::MockCursor;
use pointer_host::infrastructure::http::HttpServer;
use pointer_remote::application::{
    HostAddress, HostTransport, MoveOutcome, RemoteSession, SessionError, TransportError,
};
use pointer_remote::infrastructure::http_transport::HttpTransport;
use pointer_remote::infrastructure::touch_script::replay;

async fn start_host(cursor: MockCursor) -> (SocketAddr, Arc<MockCursor>, Arc<AtomicBool>) {
    let cursor = Arc::new(cursor);
    let integrator = Arc::new(MotionIntegrator::new(
        Arc::clone(&cursor) as Arc<dyn CursorControl>,
        IntegratorConfig::default(),
    ));
    let server = HttpServer::bind("127.0.0.1:0".parse().unwrap(), integrator)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    let running = Arc::new(AtomicBool::new(true));
    tokio::spawn(server.serve(Arc::clone(&running)));
    (addr, cursor, running)
}

fn transport() -> HttpTransport {
    HttpTransport::new(Duration::from_secs(2)).unwrap()
}

fn session() -> RemoteSession<HttpTransport> {
    RemoteSession::new(transport(), SamplerConfig::default())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_drag_and_click_reach_the_host_cursor() {
    // Arrange
    let (addr, cursor, _running) = start_host(MockCursor::at(500, 500)).await;
    let mut session = session();

    // Act
    let status = session.connect(&addr.to_string()).await.unwrap();
    session.touch_start(TouchSample::new(0.0, 0.0, 0));
    let mut outcomes = Vec::new();
    for i in 1..=5u64 {
        outcomes.push(
            session
                .touch_move(TouchSample::new(i as f64 * 10.0, 0.0, i * 10))
                .await
                .unwrap(),
        );
    }
    session.touch_end();
    let click = session.click(ClickButton::Left).await.unwrap();

    // Assert
    assert_eq!(status.position, CursorPosition::new(500, 500));
    assert!(matches!(outcomes[0], MoveOutcome::Suppressed(_)));
    assert!(outcomes[1..]
        .iter()
        .all(|o| matches!(o, MoveOutcome::Sent { .. })));
    let end = cursor.current();
    assert!(end.x > 500, "cursor moved right: {end:?}");
    assert_eq!(end.y, 500);
    assert_eq!(click.unwrap().message, "Performed left click");
    assert_eq!(cursor.clicks(), vec![ClickButton::Left]);
    assert_eq!(session.position().await.unwrap(), end);
}

#[tokio::test]
async fn test_reordered_and_duplicated_motion_stays_bounded() {
    // Arrange: a burst delivered out of order with repeats
    let (addr, cursor, _running) = start_host(MockCursor::at(0, 0)).await;
    let host = HostAddress::parse(&addr.to_string()).unwrap();
    let transport = transport();
    let burst = [
        (40.0, -10.0),
        (5000.0, 0.0),
        (40.0, -10.0),
        (-3.0, 250.0),
        (5000.0, 0.0),
        (0.0, 0.0),
        (-9000.0, -9000.0),
    ];

    // Act
    let mut previous = CursorPosition::new(0, 0);
    for (dx, dy) in burst {
        let resp = transport
            .send_motion(
                &host,
                MotionRequest {
                    delta_x: dx,
                    delta_y: dy,
                },
            )
            .await
            .unwrap();

        // Assert: each event moves at most the clamp bound per axis
        assert!(resp.delta.x.abs() <= 100.0 && resp.delta.y.abs() <= 100.0);
        assert!((resp.position.x - previous.x).abs() <= 100);
        assert!((resp.position.y - previous.y).abs() <= 100);
        previous = resp.position;
    }
    assert_eq!(cursor.current(), previous);
}

#[tokio::test]
async fn test_invalid_click_is_surfaced_as_client_error() {
    let (addr, _cursor, _running) = start_host(MockCursor::new()).await;
    let host = HostAddress::parse(&addr.to_string()).unwrap();

    // A well-formed but unsupported body posted directly.
    let resp = reqwest::Client::new()
        .post(host.url("/click"))
        .json(&serde_json::json!({ "type": "middle" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn test_host_move_failure_drops_the_session() {
    // Arrange
    let (addr, _cursor, _running) = start_host(MockCursor {
        fail_moves: true,
        ..MockCursor::at(10, 10)
    })
    .await;
    let mut session = session();
    session.connect(&addr.to_string()).await.unwrap();
    session.touch_start(TouchSample::new(0.0, 0.0, 0));
    session.touch_move(TouchSample::new(1.0, 0.0, 10)).await.unwrap();

    // Act
    let result = session.touch_move(TouchSample::new(30.0, 0.0, 20)).await;

    // Assert
    assert!(matches!(
        result,
        Err(SessionError::ConnectionLost(TransportError::Status { status: 500, .. }))
    ));
    assert!(!session.is_connected());
    assert_eq!(session.click(ClickButton::Left).await, Ok(None));
}

#[tokio::test]
async fn test_unreachable_host_fails_handshake_then_reconnect_succeeds() {
    // Arrange: an address nobody listens on
    let closed = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (addr, _cursor, _running) = start_host(MockCursor::new()).await;
    let mut session = session();

    // Act
    let first = session.connect(&closed.to_string()).await;
    let second = session.connect(&addr.to_string()).await;

    // Assert
    assert!(matches!(first, Err(SessionError::ConnectFailed(_))));
    assert!(second.is_ok());
    assert!(session.is_connected());
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn test_script_replay_against_live_host() {
    // Arrange
    let (addr, cursor, _running) = start_host(MockCursor::at(100, 100)).await;
    let mut session = session();
    let script = format!(
        concat!(
            "{{\"cmd\":\"connect\",\"host\":\"{addr}\"}}\n",
            "{{\"cmd\":\"start\",\"x\":0,\"y\":0,\"t\":0}}\n",
            "{{\"cmd\":\"move\",\"x\":0,\"y\":5,\"t\":10}}\n",
            "{{\"cmd\":\"move\",\"x\":0,\"y\":25,\"t\":20}}\n",
            "{{\"cmd\":\"end\"}}\n",
            "{{\"cmd\":\"click\",\"button\":\"right\"}}\n",
            "{{\"cmd\":\"position\"}}\n",
        ),
        addr = addr
    );

    // Act
    let summary = replay(script.as_bytes(), &mut session).await.unwrap();

    // Assert
    assert_eq!(summary.failures, 0);
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.clicks, 1);
    assert!(cursor.current().y > 100);
    assert_eq!(cursor.clicks(), vec![ClickButton::Right]);
}
