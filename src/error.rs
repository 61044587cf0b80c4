//! Error types for the Startdeliver client
//!
//! Every public API returns `Result<T, Error>`. HTTP failures keep the
//! status code and decoded response body so callers see the same
//! `{statusCode, data}` shape the API reports.

use serde_json::Value;
use thiserror::Error;

/// The main error type for the Startdeliver client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Usage Errors
    // ============================================================================
    #[error("Invalid arguments for {operation}: {message}")]
    InvalidArguments { operation: String, message: String },

    #[error("Entity '{entity}' is not supported by {operation}")]
    EntityNotAllowed { entity: String, operation: String },

    #[error("Missing history labels")]
    MissingHistory,

    #[error("No such file: {id}")]
    FileNotFound { id: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status_code}: {data}")]
    Api { status_code: u16, data: Value },

    #[error("Unexpected response from '{endpoint}': {message}")]
    UnexpectedResponse { endpoint: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid arguments error for an operation
    pub fn invalid_arguments(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an error for an entity an operation refuses to handle
    pub fn entity_not_allowed(entity: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::EntityNotAllowed {
            entity: entity.into(),
            operation: operation.into(),
        }
    }

    /// Create an API error from a status and response body
    pub fn api(status_code: u16, data: impl Into<Value>) -> Self {
        Self::Api {
            status_code,
            data: data.into(),
        }
    }

    /// Create an unexpected response error
    pub fn unexpected(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Status code of an API error, if this is one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the API rejected the credentials
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }
}

/// Result type alias for the Startdeliver client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
