//! JSON request and response bodies for the host's HTTP endpoints.
//!
//! # Endpoints
//!
//! ```text
//! GET  /test      → StatusResponse     connectivity + capability check
//! POST /mouse     MotionRequest   → MotionResponse
//! POST /click     ClickRequest    → ClickResponse
//! GET  /position  → PositionResponse
//! ```
//!
//! Every failure, on any endpoint, is an [`ErrorResponse`]:
//!
//! ```json
//! {"success":false,"error":"Invalid click type"}
//! ```
//!
//! Field names are camelCase on the wire (`deltaX`, `deltaY`) because the
//! controller side has historically been a JavaScript touch app.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Protocol constants ────────────────────────────────────────────────────────

/// TCP port the host listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 3000;

pub const TEST_PATH: &str = "/test";
pub const MOUSE_PATH: &str = "/mouse";
pub const CLICK_PATH: &str = "/click";
pub const POSITION_PATH: &str = "/position";

// ── Shared value types ────────────────────────────────────────────────────────

/// Absolute cursor position in host screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

impl CursorPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A fractional 2-D vector, used to report the smoothed delta that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

/// Mouse buttons the host is willing to click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickButton {
    Left,
    Right,
}

impl ClickButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClickButton::Left => "left",
            ClickButton::Right => "right",
        }
    }
}

impl fmt::Display for ClickButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a click type string is not `left` or `right`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported click type: {0:?}")]
pub struct UnknownClickButton(pub String);

impl FromStr for ClickButton {
    type Err = UnknownClickButton;

    /// Parses the exact lowercase wire names; anything else (including
    /// `"middle"` and `"Left"`) is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(ClickButton::Left),
            "right" => Ok(ClickButton::Right),
            other => Err(UnknownClickButton(other.to_string())),
        }
    }
}

// ── Requests ──────────────────────────────────────────────────────────────────

/// Body of `POST /mouse`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionRequest {
    pub delta_x: f64,
    pub delta_y: f64,
}

/// Body of `POST /click`.
///
/// The click type stays a free-form string here; the host validates it so an
/// unknown value is reported as invalid input rather than as a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickRequest {
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<ClickButton> for ClickRequest {
    fn from(button: ClickButton) -> Self {
        Self {
            kind: button.as_str().to_string(),
        }
    }
}

// ── Responses ─────────────────────────────────────────────────────────────────

/// Body of a successful `GET /test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub position: CursorPosition,
}

/// Body of a successful `POST /mouse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionResponse {
    pub success: bool,
    /// Cursor position after the event (unchanged if the move was gated).
    pub position: CursorPosition,
    /// Smoothed delta that was used for this event.
    pub delta: Vector2,
}

/// Body of a successful `POST /click`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickResponse {
    pub success: bool,
    pub message: String,
}

/// Body of a successful `GET /position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionResponse {
    pub success: bool,
    pub position: CursorPosition,
}

/// Body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
