//! Request descriptor and parameter types
//!
//! A `RequestDescriptor` is a fully resolved HTTP request described as
//! plain data. The builder produces one per call and the transport
//! consumes it.

use crate::types::{JsonObject, JsonValue, Method, ResponseMode};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Suffix appended to the visible part of a masked API key
const MASK_SUFFIX: &str = " ******* masking-rest-of-the-api-key *******";

// ============================================================================
// Request Descriptor
// ============================================================================

/// A fully specified HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including any query string
    pub url: String,
    /// Endpoint as given by the caller, reported to the unauthorized hook
    pub endpoint: String,
    /// Request headers
    pub headers: BTreeMap<String, String>,
    /// JSON body
    pub body: Option<JsonValue>,
    /// How the response body is delivered
    pub response_mode: ResponseMode,
}

impl RequestDescriptor {
    /// Look up a header, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Query string of the URL, without the `?`
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    /// JSON rendering for debug logs, with the API key masked unless asked otherwise
    pub fn to_debug_json(&self, show_api_key: bool) -> JsonValue {
        let headers: JsonObject = self
            .headers
            .iter()
            .map(|(key, value)| {
                let value = if !show_api_key && key.eq_ignore_ascii_case("authorization") {
                    mask_api_key(value)
                } else {
                    value.clone()
                };
                (key.clone(), JsonValue::String(value))
            })
            .collect();

        let response_mode = match &self.response_mode {
            ResponseMode::Json => json!("json"),
            ResponseMode::File(path) => json!({ "file": path.display().to_string() }),
        };

        json!({
            "method": self.method.as_str(),
            "url": self.url,
            "headers": headers,
            "data": self.body,
            "responseMode": response_mode,
        })
    }
}

/// Keep the first five characters of a key and mask the rest
pub fn mask_api_key(key: &str) -> String {
    let visible: String = key.chars().take(5).collect();
    format!("{visible}{MASK_SUFFIX}")
}

// ============================================================================
// Read Parameters
// ============================================================================

/// Parameters of a read
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReadParams {
    /// Read the bare entity endpoint
    #[default]
    None,
    /// Read a single record by id
    Id(String),
    /// List records matching a filter
    Query(JsonObject),
}

impl ReadParams {
    /// Read a single record by a string id
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }
}

impl From<u64> for ReadParams {
    fn from(id: u64) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<i64> for ReadParams {
    fn from(id: i64) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<JsonObject> for ReadParams {
    fn from(params: JsonObject) -> Self {
        Self::Query(params)
    }
}

impl From<JsonValue> for ReadParams {
    /// Integers are ids and objects are filters; anything else reads the bare endpoint
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Number(n) if n.is_u64() || n.is_i64() => Self::Id(n.to_string()),
            JsonValue::Object(map) => Self::Query(map),
            _ => Self::None,
        }
    }
}

// ============================================================================
// Raw Requests
// ============================================================================

/// A passthrough request; nothing but the URL resolution is applied
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    /// HTTP method
    pub method: Method,
    /// Endpoint relative to the API base
    pub endpoint: String,
    /// Extra headers
    pub headers: BTreeMap<String, String>,
    /// JSON body
    pub body: Option<JsonValue>,
}

impl RawRequest {
    /// Create a raw request
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }
}

// ============================================================================
// Download Options
// ============================================================================

/// Options for downloading a file
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Target file or directory; defaults to the file's own name
    pub path: Option<PathBuf>,
    /// First byte of a partial download
    pub byte_start: Option<u64>,
    /// Last byte of a partial download
    pub byte_end: Option<u64>,
}

impl DownloadOptions {
    /// Download into this path
    pub fn to(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Request only a byte range
    #[must_use]
    pub fn range(mut self, start: u64, end: u64) -> Self {
        self.byte_start = Some(start);
        self.byte_end = Some(end);
        self
    }
}
