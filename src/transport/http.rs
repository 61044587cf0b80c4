//! reqwest-backed transport
//!
//! Executes descriptors with a shared `reqwest::Client`: fixed timeout,
//! cookie store for cookie-based sessions, JSON bodies, and chunked
//! streaming into files for downloads.

use super::{Response, Transport};
use crate::error::{Error, Result};
use crate::request::RequestDescriptor;
use crate::types::{JsonValue, ResponseMode};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP transport built on reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<Response> {
        let mut req = self.client.request(request.method.into(), &request.url);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let mut response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let data = error_data(response.text().await);
            warn!(
                "Request failed with {}: {} {}",
                status.as_u16(),
                request.method,
                request.url
            );
            return Err(Error::api(status.as_u16(), data));
        }

        debug!("Request succeeded: {} {}", request.method, request.url);

        match &request.response_mode {
            ResponseMode::Json => {
                let body = response.text().await?;
                Ok(Response::Json(parse_body(&body)))
            }
            ResponseMode::File(path) => {
                let mut file = create_file(path).await?;
                match stream_into(&mut response, &mut file).await {
                    Ok(bytes_written) => {
                        debug!("Wrote {} bytes to {}", bytes_written, path.display());
                        Ok(Response::File {
                            path: path.clone(),
                            bytes_written,
                        })
                    }
                    Err(err) => {
                        drop(file);
                        if let Err(e) = tokio::fs::remove_file(path).await {
                            warn!("Failed to remove partial download {}: {e}", path.display());
                        }
                        Err(err)
                    }
                }
            }
        }
    }
}

/// Copy the response body into `file` chunk by chunk
async fn stream_into(response: &mut reqwest::Response, file: &mut tokio::fs::File) -> Result<u64> {
    let mut bytes_written = 0_u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        bytes_written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(bytes_written)
}

/// Error payload from a failed response; an unreadable body is reported as text
fn error_data<E: std::fmt::Display>(body: std::result::Result<String, E>) -> JsonValue {
    match body {
        Ok(text) => parse_body(&text),
        Err(e) => {
            warn!("Failed to read error body: {e}");
            JsonValue::String(format!("failed to read response body: {e}"))
        }
    }
}

/// JSON when the body parses, the raw text otherwise, null when empty
fn parse_body(body: &str) -> JsonValue {
    if body.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| JsonValue::String(body.to_string()))
}

async fn create_file(path: &Path) -> Result<tokio::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(tokio::fs::File::create(path).await?)
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), JsonValue::Null);
        assert_eq!(parse_body("  "), JsonValue::Null);
        assert_eq!(parse_body(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(parse_body("Not found"), json!("Not found"));
    }

    #[test]
    fn test_error_data_keeps_read_failure() {
        assert_eq!(error_data::<String>(Ok(r#"{"e":1}"#.into())), json!({"e": 1}));
        assert_eq!(
            error_data(Err("connection reset")),
            json!("failed to read response body: connection reset")
        );
    }
}
