//! The Startdeliver client
//!
//! Owns the configuration and a transport. Implements `ApiClient`, so all
//! entity verbs come from `EntityApi`; login and download live here since
//! they touch client state and the filesystem.

use super::api::ApiClient;
use super::login::{extract_api_key, LoginCredentials};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::request::{DownloadOptions, ReadParams, RequestDescriptor};
use crate::transport::{ReqwestTransport, Response, Transport};
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Callback invoked with the endpoint of every 401 response
pub type UnauthorizedHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Client for the Startdeliver API
pub struct Client<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl Client<ReqwestTransport> {
    /// Create a client with the reqwest transport
    ///
    /// Accepts a full `ClientConfig` or just an API key.
    pub fn new(config: impl Into<ClientConfig>) -> Result<Self> {
        let config = config.into();
        config.validate()?;
        let transport = ReqwestTransport::with_timeout(config.timeout())?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Client<T> {
    /// Create a client with a custom transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            on_unauthorized: None,
        }
    }

    /// Register a callback for 401 responses
    #[must_use]
    pub fn on_unauthorized(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    /// Current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The transport requests go through
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate and install a whole new configuration
    ///
    /// The transport is kept, so a new `timeout_secs` only applies to
    /// clients built afterwards.
    pub fn set_config(&mut self, config: ClientConfig) -> Result<()> {
        config.validate()?;
        if config.timeout_secs != self.config.timeout_secs {
            warn!("Timeout change ignored until the client is rebuilt");
        }
        self.config = config;
        Ok(())
    }

    /// Replace the API key
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.api_key = Some(api_key.into());
    }

    /// Add or replace a header sent with every request
    pub fn set_default_header(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.config.headers.insert(header.into(), value.into());
    }

    /// Log in and install the returned API key
    ///
    /// The key is left alone when cookie-based auth was requested.
    pub async fn login(&mut self, credentials: LoginCredentials) -> Result<JsonValue> {
        credentials.validate()?;

        let request = self.request_builder().login(&credentials);
        let response = self.execute_json(request).await?;

        if !credentials.set_cookie {
            match extract_api_key(&response) {
                Some(api_key) => {
                    debug!("Installing API key from login response");
                    self.set_api_key(api_key);
                }
                None => warn!("Login response carried no API key"),
            }
        }

        Ok(response)
    }

    /// Download a file and return the path it was written to
    pub async fn download(&self, file_id: &str, options: DownloadOptions) -> Result<PathBuf> {
        let lookup = self.request_builder().read("file", &ReadParams::id(file_id))?;
        let file = match self.execute_json(lookup).await {
            Ok(value) => file_record(value),
            Err(err) if err.status_code() == Some(404) => None,
            Err(err) => return Err(err),
        }
        .ok_or_else(|| Error::FileNotFound {
            id: file_id.to_string(),
        })?;

        let name = file
            .get("name")
            .and_then(JsonValue::as_str)
            .and_then(|name| Path::new(name).file_name())
            .map_or_else(|| PathBuf::from(file_id), PathBuf::from);

        let target = match options.path.clone() {
            Some(path) if is_dir(&path).await => path.join(name),
            Some(path) => path,
            None => name,
        };

        let request = self
            .request_builder()
            .download(file_id, &options, target);
        match self.execute(request).await? {
            Response::File { path, .. } => Ok(path),
            Response::Json(_) => Err(Error::unexpected(
                format!("file/{file_id}/download"),
                "transport returned JSON for a file download",
            )),
        }
    }

    fn dump(&self, label: &str, value: &JsonValue) {
        if self.config.debug {
            info!(
                target: "startdeliver::debug",
                "{label}\n{}",
                serde_json::to_string_pretty(value).unwrap_or_default()
            );
        }
    }
}

#[async_trait]
impl<T: Transport> ApiClient for Client<T> {
    fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn execute(&self, request: RequestDescriptor) -> Result<Response> {
        debug!("{} {}", request.method, request.url);
        if self.config.debug {
            self.dump("request", &request.to_debug_json(self.config.debug_show_api_key));
        }

        match self.transport.send(&request).await {
            Ok(response) => {
                if self.config.debug {
                    self.dump("response", &response.clone().into_json());
                }
                Ok(response)
            }
            Err(err) => {
                if err.is_unauthorized() {
                    if let Some(hook) = &self.on_unauthorized {
                        hook(&request.endpoint);
                    }
                }
                if let Error::Api { status_code, data } = &err {
                    self.dump(
                        "error",
                        &serde_json::json!({ "statusCode": status_code, "data": data }),
                    );
                }
                Err(err)
            }
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_url", &self.config.api_url)
            .field("version", &self.config.version)
            .field("dialect", &self.config.dialect)
            .field("has_api_key", &self.config.api_key.is_some())
            .field("transport", &self.transport)
            .field("has_unauthorized_hook", &self.on_unauthorized.is_some())
            .finish_non_exhaustive()
    }
}

/// The file record from a lookup response, if there is one
fn file_record(value: JsonValue) -> Option<JsonObject> {
    match value {
        JsonValue::Object(map) if !map.is_empty() => Some(map),
        JsonValue::Array(items) => items.into_iter().find_map(|item| match item {
            JsonValue::Object(map) if !map.is_empty() => Some(map),
            _ => None,
        }),
        _ => None,
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}
