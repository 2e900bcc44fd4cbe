//! Just enough HTTP/1.1 to serve one JSON request per connection.

use http::{Method, StatusCode};
use serde::Serialize;
use std::{collections::HashMap, io::ErrorKind};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::error::{Result, ServerError, StudioError};

const MAX_HEADER_LINES: usize = 100;
const MAX_LINE_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Path without the query string
    pub path: String,
    /// Header names are lowercased
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

fn bad_request<S: Into<String>>(reason: S) -> ServerError {
    ServerError::BadRequest {
        reason: reason.into(),
    }
}

async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R, line: &mut String) -> Result<usize> {
    line.clear();
    let n = (&mut *reader)
        .take(MAX_LINE_BYTES as u64)
        .read_line(line)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidData => bad_request("request head is not valid UTF-8").into(),
            _ => StudioError::from(e),
        })?;
    if n == MAX_LINE_BYTES && !line.ends_with('\n') {
        return Err(bad_request("header line too long").into());
    }
    Ok(n)
}

/// Read one request from `reader`
///
/// Returns `Ok(None)` if the peer closed the connection before sending
/// anything.
pub async fn read_request<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_body_bytes: usize,
) -> Result<Option<HttpRequest>> {
    let mut line = String::new();
    if read_line(reader, &mut line).await? == 0 {
        return Ok(None);
    }

    // METHOD SP PATH SP VERSION
    let mut parts = line.split_whitespace();
    let (method, target) = match (parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version)) if version.starts_with("HTTP/1.") => {
            (method, target)
        }
        _ => return Err(bad_request(format!("malformed request line: {:?}", line.trim_end())).into()),
    };
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| bad_request(format!("invalid method: {}", method)))?;
    let path = target.split('?').next().unwrap_or(target).to_string();

    let mut headers = HashMap::new();
    for _ in 0..MAX_HEADER_LINES {
        if read_line(reader, &mut line).await? == 0 {
            return Err(bad_request("connection closed inside headers").into());
        }
        let trimmed = line.trim_end_matches(&['\r', '\n'][..]);
        if trimmed.is_empty() {
            return read_body(reader, method, path, headers, max_body_bytes)
                .await
                .map(Some);
        }
        let (name, value) = trimmed
            .split_once(':')
            .ok_or_else(|| bad_request(format!("malformed header: {:?}", trimmed)))?;
        headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    Err(bad_request("too many headers").into())
}

async fn read_body<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    method: Method,
    path: String,
    headers: HashMap<String, String>,
    max_body_bytes: usize,
) -> Result<HttpRequest> {
    if headers
        .get("transfer-encoding")
        .is_some_and(|v| v.to_ascii_lowercase().contains("chunked"))
    {
        return Err(bad_request("chunked request bodies are not supported").into());
    }

    let length = match headers.get("content-length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| bad_request(format!("invalid content-length: {}", value)))?,
        None => 0,
    };
    if length > max_body_bytes {
        return Err(ServerError::PayloadTooLarge {
            size: length,
            limit: max_body_bytes,
        }
        .into());
    }

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await?;

    Ok(HttpRequest {
        method,
        path,
        headers,
        body,
    })
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status)
                .with_header("Content-Type", "application/json")
                .with_body(body),
            Err(e) => {
                tracing::error!("Failed to serialize response body: {}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Serialize status line, headers and body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("")
        );
        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}
