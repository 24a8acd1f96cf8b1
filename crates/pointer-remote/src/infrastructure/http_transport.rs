//! [`HostTransport`] over HTTP/1.1 with `reqwest`.
//!
//! Every response is read in full and inspected before it is decoded:
//!
//! - non-2xx status → [`TransportError::Status`] carrying the host's
//!   `error` text when the body has one;
//! - 2xx with `"success": false` → [`TransportError::Rejected`];
//! - anything that does not decode into the expected body →
//!   [`TransportError::Malformed`].

use std::time::Duration;

use async_trait::async_trait;
use pointer_core::protocol::{
    ClickButton, ClickRequest, ClickResponse, CursorPosition, MotionRequest, MotionResponse,
    PositionResponse, StatusResponse, CLICK_PATH, MOUSE_PATH, POSITION_PATH, TEST_PATH,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::application::transport::{HostAddress, HostTransport, TransportError};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// HTTP client for one or more hosts.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a client whose requests (connect included) give up after
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unreachable`] if the TLS backend or resolver
    /// cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .no_proxy()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;
        Ok(Self { client })
    }

    async fn get<R: DeserializeOwned>(&self, host: &HostAddress, path: &str) -> Result<R, TransportError> {
        let url = host.url(path);
        trace!("GET {url}");
        execute(self.client.get(url)).await
    }

    async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        host: &HostAddress,
        path: &str,
        body: &B,
    ) -> Result<R, TransportError> {
        let url = host.url(path);
        trace!("POST {url}");
        execute(self.client.post(url).json(body)).await
    }
}

#[async_trait]
impl HostTransport for HttpTransport {
    async fn probe(&self, host: &HostAddress) -> Result<StatusResponse, TransportError> {
        self.get(host, TEST_PATH).await
    }

    async fn send_motion(
        &self,
        host: &HostAddress,
        motion: MotionRequest,
    ) -> Result<MotionResponse, TransportError> {
        self.post(host, MOUSE_PATH, &motion).await
    }

    async fn send_click(
        &self,
        host: &HostAddress,
        button: ClickButton,
    ) -> Result<ClickResponse, TransportError> {
        self.post(host, CLICK_PATH, &ClickRequest::from(button)).await
    }

    async fn position(&self, host: &HostAddress) -> Result<CursorPosition, TransportError> {
        let resp: PositionResponse = self.get(host, POSITION_PATH).await?;
        Ok(resp.position)
    }
}

async fn execute<R: DeserializeOwned>(request: RequestBuilder) -> Result<R, TransportError> {
    let resp = request.send().await.map_err(map_reqwest_error)?;
    let status = resp.status().as_u16();
    let bytes = resp.bytes().await.map_err(map_reqwest_error)?;
    decode_body(status, &bytes)
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_decode() {
        TransportError::Malformed(e.to_string())
    } else {
        TransportError::Unreachable(e.to_string())
    }
}

/// Classifies a complete response.  Split out so the rules can be tested
/// without a socket.
fn decode_body<R: DeserializeOwned>(status: u16, body: &[u8]) -> Result<R, TransportError> {
    let value: Option<Value> = serde_json::from_slice(body).ok();
    let error_text = value
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string);

    if !(200..300).contains(&status) {
        return Err(TransportError::Status {
            status,
            message: error_text.unwrap_or_else(|| String::from_utf8_lossy(body).into_owned()),
        });
    }

    let value = value.ok_or_else(|| TransportError::Malformed("body is not JSON".into()))?;
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(TransportError::Rejected(
            error_text.unwrap_or_else(|| "unspecified error".into()),
        ));
    }
    serde_json::from_value(value).map_err(|e| TransportError::Malformed(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
