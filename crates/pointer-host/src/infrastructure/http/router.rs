//! Maps requests onto integrator operations and integrator results onto
//! HTTP responses.
//!
//! | Method + path    | Success | Invalid input | Capability failure |
//! |------------------|---------|---------------|--------------------|
//! | `GET /test`      | 200     | –             | 500                |
//! | `POST /mouse`    | 200     | 400           | 500                |
//! | `POST /click`    | 200     | 400           | 500                |
//! | `GET /position`  | 200     | –             | 500                |
//!
//! `OPTIONS` on any path is a CORS preflight and answers 204.  A known path
//! with the wrong method is 405; anything else is 404.
//!
//! Routing is synchronous and does no I/O of its own, so it can be tested
//! without a socket.

use pointer_core::protocol::{
    ClickRequest, ClickResponse, MotionRequest, MotionResponse, PositionResponse, StatusResponse,
    Vector2, CLICK_PATH, MOUSE_PATH, POSITION_PATH, TEST_PATH,
};
use tracing::{error, warn};

use super::request::Request;
use super::response::Response;
use crate::application::integrate_motion::{IntegratorError, MotionIntegrator};

pub const STATUS_MESSAGE: &str = "Server is running and cursor control is operational";
pub const INIT_FAILED: &str = "Failed to initialize mouse control";
pub const POSITION_FAILED: &str = "Failed to get mouse position";
pub const MOVE_FAILED: &str = "Failed to move mouse";
pub const CLICK_FAILED: &str = "Failed to perform click";
pub const INVALID_MOTION: &str = "Invalid mouse movement data";
pub const INVALID_CLICK: &str = "Invalid click type";

/// Dispatches one request.
pub fn handle_request(integrator: &MotionIntegrator, request: &Request) -> Response {
    if request.method == "OPTIONS" {
        return Response::no_content();
    }

    match (request.method.as_str(), request.path.as_str()) {
        ("GET", TEST_PATH) => status(integrator),
        ("POST", MOUSE_PATH) => motion(integrator, &request.body),
        ("POST", CLICK_PATH) => click(integrator, &request.body),
        ("GET", POSITION_PATH) => position(integrator),
        (_, TEST_PATH | MOUSE_PATH | CLICK_PATH | POSITION_PATH) => {
            Response::error(405, "Method not allowed")
        }
        _ => Response::error(404, "Not found"),
    }
}

fn status(integrator: &MotionIntegrator) -> Response {
    match integrator.query_status() {
        Ok(position) => Response::json(
            200,
            &StatusResponse {
                success: true,
                message: STATUS_MESSAGE.to_string(),
                position,
            },
        ),
        Err(e) => {
            error!("status probe failed: {e}");
            Response::error(500, INIT_FAILED)
        }
    }
}

fn motion(integrator: &MotionIntegrator, body: &[u8]) -> Response {
    let req: MotionRequest = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => {
            warn!("rejected motion body: {e}");
            return Response::error(400, INVALID_MOTION);
        }
    };

    match integrator.handle_motion(req.delta_x, req.delta_y) {
        Ok(outcome) => Response::json(
            200,
            &MotionResponse {
                success: true,
                position: outcome.position,
                delta: Vector2 {
                    x: outcome.applied.dx,
                    y: outcome.applied.dy,
                },
            },
        ),
        Err(IntegratorError::InvalidInput(reason)) => {
            warn!("rejected motion: {reason}");
            Response::error(400, INVALID_MOTION)
        }
        Err(e @ IntegratorError::CapabilityUnavailable(_)) => {
            error!("motion failed: {e}");
            Response::error(500, MOVE_FAILED)
        }
    }
}

fn click(integrator: &MotionIntegrator, body: &[u8]) -> Response {
    let req: ClickRequest = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => {
            warn!("rejected click body: {e}");
            return Response::error(400, INVALID_CLICK);
        }
    };

    match integrator.handle_click(&req.kind) {
        Ok(button) => Response::json(
            200,
            &ClickResponse {
                success: true,
                message: format!("Performed {button} click"),
            },
        ),
        Err(IntegratorError::InvalidInput(reason)) => {
            warn!("rejected click: {reason}");
            Response::error(400, INVALID_CLICK)
        }
        Err(e @ IntegratorError::CapabilityUnavailable(_)) => {
            error!("click failed: {e}");
            Response::error(500, CLICK_FAILED)
        }
    }
}

fn position(integrator: &MotionIntegrator) -> Response {
    match integrator.query_position() {
        Ok(position) => Response::json(
            200,
            &PositionResponse {
                success: true,
                position,
            },
        ),
        Err(e) => {
            error!("position query failed: {e}");
            Response::error(500, POSITION_FAILED)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pointer_core::{ClickButton, CursorPosition};
    use serde_json::Value;

    use crate::application::cursor_control::CursorControl;
    use crate::application::integrate_motion::IntegratorConfig;
    use crate::infrastructure::cursor::MockCursor;
    use crate::infrastructure::http::request::Version;

    fn make(cursor: MockCursor) -> (MotionIntegrator, Arc<MockCursor>) {
        let cursor = Arc::new(cursor);
        let integrator = MotionIntegrator::new(
            Arc::clone(&cursor) as Arc<dyn CursorControl>,
            IntegratorConfig::default(),
        );
        (integrator, cursor)
    }

    fn req(method: &str, path: &str, body: &str) -> Request {
        Request {
            method: method.into(),
            path: path.into(),
            version: Version::Http11,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: body.as_bytes().to_vec(),
        }
    }

    fn body(resp: &Response) -> Value {
        serde_json::from_slice(&resp.body).unwrap()
    }

    #[test]
    fn test_status_reports_position_and_message() {
        // Arrange
        let (integrator, _) = make(MockCursor::at(12, 34));

        // Act
        let resp = handle_request(&integrator, &req("GET", "/test", ""));

        // Assert
        assert_eq!(resp.status, 200);
        let v = body(&resp);
        assert_eq!(v["success"], true);
        assert_eq!(v["message"], STATUS_MESSAGE);
        assert_eq!(v["position"]["x"], 12);
        assert_eq!(v["position"]["y"], 34);
    }

    #[test]
    fn test_status_failure_is_server_error() {
        let (integrator, _) = make(MockCursor::failing());
        let resp = handle_request(&integrator, &req("GET", "/test", ""));
        assert_eq!(resp.status, 500);
        assert_eq!(body(&resp)["error"], INIT_FAILED);
    }

    #[test]
    fn test_mouse_moves_and_reports_delta() {
        // Arrange
        let (integrator, cursor) = make(MockCursor::at(100, 100));

        // Act
        let resp = handle_request(
            &integrator,
            &req("POST", "/mouse", r#"{"deltaX":10,"deltaY":-5.5}"#),
        );

        // Assert
        assert_eq!(resp.status, 200);
        let v = body(&resp);
        assert_eq!(v["success"], true);
        assert_eq!(v["position"]["x"], 110);
        assert_eq!(v["position"]["y"], 95);
        assert_eq!(v["delta"]["x"], 10.0);
        assert_eq!(v["delta"]["y"], -5.5);
        assert_eq!(cursor.moves(), vec![(110, 95)]);
    }

    #[test]
    fn test_mouse_clamps_claimed_magnitude() {
        let (integrator, cursor) = make(MockCursor::at(0, 0));
        let resp = handle_request(
            &integrator,
            &req("POST", "/mouse", r#"{"deltaX":1e9,"deltaY":-1e9}"#),
        );
        assert_eq!(resp.status, 200);
        assert_eq!(body(&resp)["delta"]["x"], 100.0);
        assert_eq!(cursor.moves(), vec![(100, -100)]);
    }

    #[test]
    fn test_mouse_rejects_non_numeric_and_missing_fields() {
        let (integrator, cursor) = make(MockCursor::at(0, 0));
        for bad in [
            r#"{"deltaX":"5","deltaY":1}"#,
            r#"{"deltaX":5}"#,
            r#"{"deltaX":null,"deltaY":1}"#,
            "not json",
            "",
        ] {
            let resp = handle_request(&integrator, &req("POST", "/mouse", bad));
            assert_eq!(resp.status, 400, "body {bad:?}");
            assert_eq!(body(&resp)["error"], INVALID_MOTION);
        }
        assert!(cursor.moves().is_empty());
        assert!(integrator.smoothing_state().is_idle());
    }

    #[test]
    fn test_mouse_capability_failure_is_server_error() {
        let (integrator, _) = make(MockCursor::failing());
        let resp = handle_request(
            &integrator,
            &req("POST", "/mouse", r#"{"deltaX":3,"deltaY":3}"#),
        );
        assert_eq!(resp.status, 500);
        assert_eq!(body(&resp)["error"], MOVE_FAILED);
        assert!(integrator.smoothing_state().is_idle());
    }

    #[test]
    fn test_click_left_reports_message() {
        let (integrator, cursor) = make(MockCursor::new());
        let resp = handle_request(&integrator, &req("POST", "/click", r#"{"type":"left"}"#));
        assert_eq!(resp.status, 200);
        assert_eq!(body(&resp)["message"], "Performed left click");
        assert_eq!(cursor.clicks(), vec![ClickButton::Left]);
    }

    #[test]
    fn test_click_middle_is_client_error_without_clicking() {
        // Arrange
        let (integrator, cursor) = make(MockCursor::new());

        // Act
        let resp = handle_request(&integrator, &req("POST", "/click", r#"{"type":"middle"}"#));

        // Assert
        assert_eq!(resp.status, 400);
        assert_eq!(body(&resp)["success"], false);
        assert_eq!(body(&resp)["error"], INVALID_CLICK);
        assert!(cursor.clicks().is_empty());
    }

    #[test]
    fn test_click_missing_type_is_client_error() {
        let (integrator, _) = make(MockCursor::new());
        let resp = handle_request(&integrator, &req("POST", "/click", "{}"));
        assert_eq!(resp.status, 400);
        assert_eq!(body(&resp)["error"], INVALID_CLICK);
    }

    #[test]
    fn test_click_capability_failure_is_server_error() {
        let (integrator, _) = make(MockCursor::failing());
        let resp = handle_request(&integrator, &req("POST", "/click", r#"{"type":"right"}"#));
        assert_eq!(resp.status, 500);
        assert_eq!(body(&resp)["error"], CLICK_FAILED);
    }

    #[test]
    fn test_position_reads_cursor() {
        let (integrator, _) = make(MockCursor::at(5, 6));
        let resp = handle_request(&integrator, &req("GET", "/position", ""));
        assert_eq!(resp.status, 200);
        let v: PositionResponse = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(v.position, CursorPosition::new(5, 6));
    }

    #[test]
    fn test_position_failure_is_server_error() {
        let (integrator, _) = make(MockCursor::failing());
        let resp = handle_request(&integrator, &req("GET", "/position", ""));
        assert_eq!(resp.status, 500);
        assert_eq!(body(&resp)["error"], POSITION_FAILED);
    }

    #[test]
    fn test_preflight_wrong_method_and_unknown_path() {
        let (integrator, _) = make(MockCursor::new());
        assert_eq!(handle_request(&integrator, &req("OPTIONS", "/mouse", "")).status, 204);
        assert_eq!(handle_request(&integrator, &req("GET", "/mouse", "")).status, 405);
        assert_eq!(handle_request(&integrator, &req("POST", "/test", "")).status, 405);
        assert_eq!(handle_request(&integrator, &req("GET", "/nope", "")).status, 404);
    }
}
