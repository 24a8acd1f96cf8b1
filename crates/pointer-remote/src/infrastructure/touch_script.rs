//! Line-delimited JSON touch scripts.
//!
//! A script stands in for the touch surface: one command object per line,
//! tagged by `"cmd"`.  Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"cmd":"connect","host":"192.168.1.20"}
//! {"cmd":"start","x":100,"y":100}
//! {"cmd":"move","x":110,"y":100,"t":16}
//! {"cmd":"end"}
//! {"cmd":"click","button":"left"}
//! {"cmd":"sensitivity","increase":true}
//! {"cmd":"position"}
//! {"cmd":"wait","ms":150}
//! ```
//!
//! `t` is the sample timestamp in milliseconds; when omitted, the time since
//! the replay started is used.  `connect` without a host reconnects to the
//! previous one.
//!
//! Session errors do not abort a replay: they are logged and counted, and
//! the script carries on in whatever state the session is left in.

use std::time::Duration;

use pointer_core::{ClickButton, TouchSample};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::application::{HostTransport, MoveOutcome, RemoteSession};

/// Errors that stop a replay.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One scripted touch-surface action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ScriptCommand {
    Connect {
        #[serde(default)]
        host: Option<String>,
    },
    Start {
        x: f64,
        y: f64,
        #[serde(default)]
        t: Option<u64>,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        t: Option<u64>,
    },
    End,
    Click {
        button: ClickButton,
    },
    Sensitivity {
        increase: bool,
    },
    Position,
    Wait {
        ms: u64,
    },
}

/// Parses one script line; `Ok(None)` for blanks and comments.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<ScriptCommand>, ScriptError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| ScriptError::Parse {
            line: line_no,
            source,
        })
}

/// Counters reported at the end of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub commands: usize,
    pub sent: usize,
    pub suppressed: usize,
    pub ignored: usize,
    pub clicks: usize,
    /// Session errors (failed connects and lost connections).
    pub failures: usize,
}

/// Replays every command read from `reader` against `session`.
///
/// # Errors
///
/// Stops at the first unreadable or unparsable line.
pub async fn replay<R, T>(
    reader: R,
    session: &mut RemoteSession<T>,
) -> Result<ReplaySummary, ScriptError>
where
    R: AsyncBufRead + Unpin,
    T: HostTransport,
{
    let started = Instant::now();
    let now_ms = || started.elapsed().as_millis() as u64;
    let mut summary = ReplaySummary::default();
    let mut lines = reader.lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let Some(command) = parse_line(&line, line_no)? else {
            continue;
        };
        summary.commands += 1;
        debug!(line = line_no, ?command, "script command");

        match command {
            ScriptCommand::Connect { host } => {
                let result = match host {
                    Some(host) => session.connect(&host).await,
                    None => session.reconnect().await,
                };
                if let Err(e) = result {
                    warn!("line {line_no}: {e}");
                    summary.failures += 1;
                }
            }
            ScriptCommand::Start { x, y, t } => {
                session.touch_start(TouchSample::new(x, y, t.unwrap_or_else(now_ms)));
            }
            ScriptCommand::Move { x, y, t } => {
                match session
                    .touch_move(TouchSample::new(x, y, t.unwrap_or_else(now_ms)))
                    .await
                {
                    Ok(MoveOutcome::Sent { .. }) => summary.sent += 1,
                    Ok(MoveOutcome::Suppressed(_)) => summary.suppressed += 1,
                    Ok(MoveOutcome::Ignored) => summary.ignored += 1,
                    Err(e) => {
                        warn!("line {line_no}: {e}");
                        summary.failures += 1;
                    }
                }
            }
            ScriptCommand::End => session.touch_end(),
            ScriptCommand::Click { button } => match session.click(button).await {
                Ok(Some(_)) => summary.clicks += 1,
                Ok(None) => summary.ignored += 1,
                Err(e) => {
                    warn!("line {line_no}: {e}");
                    summary.failures += 1;
                }
            },
            ScriptCommand::Sensitivity { increase } => {
                session.adjust_sensitivity(increase);
            }
            ScriptCommand::Position => match session.position().await {
                Ok(pos) => info!("host cursor at ({}, {})", pos.x, pos.y),
                Err(e) => {
                    warn!("line {line_no}: {e}");
                    summary.failures += 1;
                }
            },
            ScriptCommand::Wait { ms } => tokio::time::sleep(Duration::from_millis(ms)).await,
        }
    }

    Ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::transport::{MockHostTransport, TransportError};
    use pointer_core::protocol::{CursorPosition, MotionResponse, StatusResponse, Vector2};
    use pointer_core::SamplerConfig;

    #[test]
    fn test_parses_each_command_kind() {
        assert_eq!(
            parse_line(r#"{"cmd":"connect","host":"10.0.0.2"}"#, 1).unwrap(),
            Some(ScriptCommand::Connect {
                host: Some("10.0.0.2".into())
            })
        );
        assert_eq!(
            parse_line(r#"{"cmd":"connect"}"#, 1).unwrap(),
            Some(ScriptCommand::Connect { host: None })
        );
        assert_eq!(
            parse_line(r#"{"cmd":"move","x":1.5,"y":-2,"t":16}"#, 1).unwrap(),
            Some(ScriptCommand::Move {
                x: 1.5,
                y: -2.0,
                t: Some(16)
            })
        );
        assert_eq!(
            parse_line(r#"{"cmd":"click","button":"right"}"#, 1).unwrap(),
            Some(ScriptCommand::Click {
                button: ClickButton::Right
            })
        );
        assert_eq!(parse_line(r#"{"cmd":"end"}"#, 1).unwrap(), Some(ScriptCommand::End));
        assert_eq!(
            parse_line(r#"{"cmd":"wait","ms":5}"#, 1).unwrap(),
            Some(ScriptCommand::Wait { ms: 5 })
        );
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line("   ", 1).unwrap(), None);
        assert_eq!(parse_line("# warm-up gesture", 2).unwrap(), None);
    }

    #[test]
    fn test_bad_lines_report_their_number() {
        let err = parse_line(r#"{"cmd":"click","button":"middle"}"#, 7).unwrap_err();
        assert!(err.to_string().starts_with("line 7:"));
        assert!(parse_line(r#"{"cmd":"teleport"}"#, 1).is_err());
    }

    #[tokio::test]
    async fn test_replay_drives_session_and_counts_outcomes() {
        // Arrange
        let mut mock = MockHostTransport::new();
        mock.expect_probe().returning(|_| {
            Ok(StatusResponse {
                success: true,
                message: String::new(),
                position: CursorPosition::default(),
            })
        });
        mock.expect_send_motion().times(2).returning(|_, m| {
            Ok(MotionResponse {
                success: true,
                position: CursorPosition::default(),
                delta: Vector2 {
                    x: m.delta_x,
                    y: m.delta_y,
                },
            })
        });
        let mut session = RemoteSession::new(mock, SamplerConfig::default());
        let script = r#"
# click before connecting is ignored
{"cmd":"click","button":"left"}
{"cmd":"connect","host":"10.0.0.2"}
{"cmd":"start","x":0,"y":0,"t":0}
{"cmd":"move","x":2,"y":0,"t":10}
{"cmd":"move","x":12,"y":0,"t":20}
{"cmd":"move","x":22,"y":0,"t":30}
{"cmd":"move","x":22,"y":0,"t":40}
{"cmd":"end"}
"#;

        // Act
        let summary = replay(script.as_bytes(), &mut session).await.unwrap();

        // Assert
        assert_eq!(
            summary,
            ReplaySummary {
                commands: 8,
                sent: 2,
                suppressed: 2,
                ignored: 1,
                clicks: 0,
                failures: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_replay_continues_after_failed_connect() {
        // Arrange
        let mut mock = MockHostTransport::new();
        mock.expect_probe()
            .returning(|_| Err(TransportError::Unreachable("refused".into())));
        mock.expect_send_motion().never();
        let mut session = RemoteSession::new(mock, SamplerConfig::default());
        let script = "{\"cmd\":\"connect\",\"host\":\"10.0.0.9\"}\n{\"cmd\":\"start\",\"x\":0,\"y\":0}\n{\"cmd\":\"move\",\"x\":50,\"y\":0}\n{\"cmd\":\"position\"}\n";

        // Act
        let summary = replay(script.as_bytes(), &mut session).await.unwrap();

        // Assert
        assert_eq!(summary.failures, 2);
        assert_eq!(summary.ignored, 1);
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_replay_stops_on_parse_error() {
        let mut session = RemoteSession::new(MockHostTransport::new(), SamplerConfig::default());
        let err = replay("{\"cmd\":\"end\"}\nnot json\n".as_bytes(), &mut session)
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 2, .. }));
    }
}
