//! Transport layer
//!
//! The client core only needs one capability from the outside world:
//! `send(descriptor) -> response`. `ReqwestTransport` is the production
//! implementation; tests plug in their own.
//!
//! # Errors
//!
//! - Non-2xx responses become `Error::Api { status_code, data }` with the
//!   body decoded as JSON (or kept as text).
//! - Failures without a response surface as `Error::Http`.

mod http;

pub use http::{ReqwestTransport, DEFAULT_TIMEOUT};

use crate::error::Result;
use crate::request::RequestDescriptor;
use crate::types::JsonValue;
use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;

/// Something that can execute a `RequestDescriptor`
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the request and deliver the body per its response mode
    async fn send(&self, request: &RequestDescriptor) -> Result<Response>;
}

/// A successful response
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Decoded JSON body
    Json(JsonValue),
    /// Body streamed into a file
    File {
        /// Where the body was written
        path: PathBuf,
        /// Number of bytes written
        bytes_written: u64,
    },
}

impl Response {
    /// The response as JSON; file responses describe what was written
    pub fn into_json(self) -> JsonValue {
        match self {
            Response::Json(value) => value,
            Response::File {
                path,
                bytes_written,
            } => json!({
                "path": path.display().to_string(),
                "bytesWritten": bytes_written,
            }),
        }
    }
}
