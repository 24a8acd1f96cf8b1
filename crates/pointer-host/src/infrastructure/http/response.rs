//! HTTP responses: JSON bodies plus the CORS headers every reply carries.

use pointer_core::protocol::ErrorResponse;
use serde::Serialize;
use tracing::error;

/// An HTTP response ready to be written to the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
    content_type: Option<&'static str>,
}

impl Response {
    /// A JSON response with `value` as the body.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                body,
                content_type: Some("application/json"),
            },
            Err(e) => {
                error!("failed to serialise response body: {e}");
                Self::error(500, "Internal server error")
            }
        }
    }

    /// A `{"success":false,"error":...}` response.
    pub fn error(status: u16, message: &str) -> Self {
        // Serialising a struct of a bool and a string cannot fail.
        let body = serde_json::to_vec(&ErrorResponse::new(message)).unwrap_or_default();
        Self {
            status,
            body,
            content_type: Some("application/json"),
        }
    }

    /// An empty `204 No Content`, used for CORS preflight.
    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: Vec::new(),
            content_type: None,
        }
    }

    /// Serialises status line, headers, and body.
    pub fn to_bytes(&self, keep_alive: bool) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status));
        if let Some(ct) = self.content_type {
            head.push_str(&format!("Content-Type: {ct}\r\n"));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Access-Control-Allow-Origin: *\r\n");
        head.push_str("Access-Control-Allow-Methods: GET, POST\r\n");
        head.push_str("Access-Control-Allow-Headers: Content-Type\r\n");
        head.push_str(if keep_alive {
            "Connection: keep-alive\r\n"
        } else {
            "Connection: close\r\n"
        });
        head.push_str("\r\n");

        let mut out = head.into_bytes();
        out.extend_from_slice(&self.body);
        out
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
