//! HTTP/1.1 request reading and parsing.
//!
//! Only what the host's small JSON API needs: a request line, headers, and a
//! `Content-Length` body.  Chunked uploads are rejected.  Bytes read past the
//! end of one request stay in the caller's buffer and start the next one, so
//! pipelined keep-alive requests work.

use std::io;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Largest accepted request head (request line plus headers).
pub const MAX_HEADER_BYTES: usize = 8 * 1024;
/// Largest accepted body.  Motion and click bodies are a few dozen bytes.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

const READ_CHUNK: usize = 1024;

/// Error type for reading a request off a connection.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed request: {0}")]
    Malformed(&'static str),
    #[error("request exceeds size limit")]
    TooLarge,
    #[error("connection closed mid-request")]
    UnexpectedEof,
}

/// HTTP protocol version from the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Http10,
    Http11,
}

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    pub version: Version,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the client wants the connection kept open after the response.
    pub fn keep_alive(&self) -> bool {
        let connection = self.header("connection").map(str::to_ascii_lowercase);
        match self.version {
            Version::Http11 => connection.as_deref() != Some("close"),
            Version::Http10 => connection.as_deref() == Some("keep-alive"),
        }
    }
}

/// The parsed head of a request, before its body has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Head {
    pub method: String,
    pub path: String,
    pub version: Version,
    pub headers: Vec<(String, String)>,
    pub content_length: usize,
}

/// Reads the next request from `reader`.
///
/// `buf` holds bytes already received on this connection and keeps any bytes
/// that belong to the following request.  Returns `Ok(None)` when the peer
/// closes the connection cleanly between requests.
pub async fn read_request<R>(reader: &mut R, buf: &mut Vec<u8>) -> Result<Option<Request>, HttpError>
where
    R: AsyncRead + Unpin,
{
    let header_end = loop {
        if let Some(end) = find_header_end(buf) {
            break end;
        }
        if buf.len() >= MAX_HEADER_BYTES {
            return Err(HttpError::TooLarge);
        }
        if read_more(reader, buf).await? == 0 {
            if buf.iter().all(u8::is_ascii_whitespace) {
                return Ok(None);
            }
            return Err(HttpError::UnexpectedEof);
        }
    };
    if header_end > MAX_HEADER_BYTES {
        return Err(HttpError::TooLarge);
    }

    let head_text = std::str::from_utf8(&buf[..header_end])
        .map_err(|_| HttpError::Malformed("request head is not UTF-8"))?;
    let head = parse_head(head_text)?;
    if head.content_length > MAX_BODY_BYTES {
        return Err(HttpError::TooLarge);
    }

    let body_start = header_end + 4;
    let body_end = body_start + head.content_length;
    while buf.len() < body_end {
        if read_more(reader, buf).await? == 0 {
            return Err(HttpError::UnexpectedEof);
        }
    }

    let body = buf[body_start..body_end].to_vec();
    buf.drain(..body_end);

    Ok(Some(Request {
        method: head.method,
        path: head.path,
        version: head.version,
        headers: head.headers,
        body,
    }))
}

async fn read_more<R>(reader: &mut R, buf: &mut Vec<u8>) -> Result<usize, HttpError>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; READ_CHUNK];
    let n = reader.read(&mut chunk).await?;
    buf.extend_from_slice(&chunk[..n]);
    Ok(n)
}

/// Index of the `\r\n\r\n` that ends the head, if it has arrived.
pub fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

/// Parses the request line and headers.
pub fn parse_head(head: &str) -> Result<Head, HttpError> {
    // Tolerate stray CRLFs left over from a previous request.
    let mut lines = head.trim_start_matches(['\r', '\n']).split("\r\n");
    let (method, target, version) =
        parse_request_line(lines.next().unwrap_or_default()).ok_or(HttpError::Malformed("bad request line"))?;

    let mut headers = Vec::new();
    for line in lines {
        let (name, value) = line
            .split_once(':')
            .ok_or(HttpError::Malformed("header without colon"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(HttpError::Malformed("empty header name"));
        }
        headers.push((name.to_string(), value.trim().to_string()));
    }

    let mut content_length = 0usize;
    for (name, value) in &headers {
        if name.eq_ignore_ascii_case("transfer-encoding") {
            return Err(HttpError::Malformed("transfer-encoding is not supported"));
        }
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value
                .parse()
                .map_err(|_| HttpError::Malformed("invalid content-length"))?;
        }
    }

    Ok(Head {
        method: method.to_string(),
        path: target_path(target).to_string(),
        version,
        headers,
        content_length,
    })
}

fn parse_request_line(line: &str) -> Option<(&str, &str, Version)> {
    let mut parts = line.split_ascii_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    let version = match parts.next()? {
        "HTTP/1.1" => Version::Http11,
        "HTTP/1.0" => Version::Http10,
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((method, target, version))
}

fn target_path(target: &str) -> &str {
    target.split('?').next().unwrap_or(target)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
