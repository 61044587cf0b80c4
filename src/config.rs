//! Client configuration
//!
//! `ClientConfig` holds everything the request builder needs to turn an
//! endpoint into a full request: the API key, where the API lives, which
//! dialect it speaks and the default headers. It can be built in code,
//! loaded from a YAML/JSON file, or read from the environment.

use crate::error::{Error, Result, ResultExt};
use crate::types::{Dialect, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default location of the hosted API
pub const DEFAULT_API_URL: &str = "https://api.startdeliver.com/";

/// Default API version
pub const DEFAULT_VERSION: &str = "v1";

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "STARTDELIVER_API_KEY";

/// Environment variable holding the API URL
pub const ENV_API_URL: &str = "STARTDELIVER_API_URL";

/// Environment variable holding the API version
pub const ENV_API_VERSION: &str = "STARTDELIVER_API_VERSION";

/// Endpoint prefixes that skip the versioned path
const UNVERSIONED_PREFIXES: [&str; 2] = ["service/", "app/"];

// ============================================================================
// Client Config
// ============================================================================

/// Configuration for a Startdeliver client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent as the `Authorization` header
    #[serde(default)]
    pub api_key: Option<String>,

    /// Root URL of the API host
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API version segment, e.g. `v1`
    #[serde(default = "default_version")]
    pub version: String,

    /// Query dialect spoken by the API
    #[serde(default)]
    pub dialect: Dialect,

    /// Headers added to every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Dump request descriptors and responses to the log
    #[serde(default)]
    pub debug: bool,

    /// Leave the API key unmasked in debug dumps
    #[serde(default)]
    pub debug_show_api_key: bool,

    /// Drop `updatedAt`/`updatedBy` from write bodies
    #[serde(default = "default_true")]
    pub strip_audit_fields: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Entities `find_all` refuses to page through
    #[serde(default = "default_find_all_denylist")]
    pub find_all_denylist: Vec<String>,

    /// The only entity `find_with_history` accepts
    #[serde(default = "default_history_entity")]
    pub history_entity: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_find_all_denylist() -> Vec<String> {
    vec!["me".to_string()]
}

fn default_history_entity() -> String {
    "customer".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            version: default_version(),
            dialect: Dialect::default(),
            headers: BTreeMap::new(),
            debug: false,
            debug_show_api_key: false,
            strip_audit_fields: true,
            timeout_secs: default_timeout_secs(),
            find_all_denylist: default_find_all_denylist(),
            history_entity: default_history_entity(),
        }
    }
}

impl From<&str> for ClientConfig {
    fn from(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string().none_if_empty(),
            ..Self::default()
        }
    }
}

impl From<String> for ClientConfig {
    fn from(api_key: String) -> Self {
        Self::from(api_key.as_str())
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load a config file; `.yaml`/`.yml` is parsed as YAML, anything else as JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a config from `STARTDELIVER_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(key) = std::env::var(ENV_API_KEY).ok().none_if_empty() {
            config.api_key = Some(key);
        }
        if let Some(url) = std::env::var(ENV_API_URL).ok().none_if_empty() {
            config.api_url = url;
        }
        if let Some(version) = std::env::var(ENV_API_VERSION).ok().none_if_empty() {
            config.version = version;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that the API URL parses and the version is usable
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_url)?;
        if self.version.trim_start_matches('v').is_empty() {
            return Err(Error::config(format!(
                "invalid API version '{}'",
                self.version
            )));
        }
        Ok(())
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `{apiUrl}/api/`, the root unversioned endpoints resolve against
    pub fn api_root(&self) -> String {
        let mut root = self.api_url.clone();
        if !root.ends_with('/') {
            root.push('/');
        }
        root.push_str("api/");
        root
    }

    /// `{apiUrl}/api/v{n}/`, with `app/` appended for the app dialect
    pub fn versioned_base(&self) -> String {
        let version = self.version.trim_start_matches('v');
        let mut base = format!("{}v{version}/", self.api_root());
        if self.dialect == Dialect::App {
            base.push_str("app/");
        }
        base
    }

    /// Resolve an endpoint against the right base URL
    ///
    /// One leading `/` is dropped. Endpoints starting with `service/` or
    /// `app/` bypass the versioned path.
    pub fn resolve_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        if UNVERSIONED_PREFIXES
            .iter()
            .any(|prefix| endpoint.starts_with(prefix))
        {
            format!("{}{endpoint}", self.api_root())
        } else {
            format!("{}{endpoint}", self.versioned_base())
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for `ClientConfig`
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into().none_if_empty();
        self
    }

    /// Set the API host URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the API version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Set the query dialect
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    /// Enable debug dumps
    pub fn debug(mut self, show_api_key: bool) -> Self {
        self.config.debug = true;
        self.config.debug_show_api_key = show_api_key;
        self
    }

    /// Keep or drop audit fields on writes
    pub fn strip_audit_fields(mut self, strip: bool) -> Self {
        self.config.strip_audit_fields = strip;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs();
        self
    }

    /// Replace the list of entities `find_all` refuses
    pub fn find_all_denylist(mut self, entities: Vec<String>) -> Self {
        self.config.find_all_denylist = entities;
        self
    }

    /// Set the entity `find_with_history` accepts
    pub fn history_entity(mut self, entity: impl Into<String>) -> Self {
        self.config.history_entity = entity.into();
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "https://api.startdeliver.com/");
        assert_eq!(config.version, "v1");
        assert_eq!(config.dialect, Dialect::Standard);
        assert!(config.strip_audit_fields);
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_from_api_key() {
        let config = ClientConfig::from("secret-key");
        assert_eq!(config.api_key.as_deref(), Some("secret-key"));
        assert!(ClientConfig::from("").api_key.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .api_key("abc")
            .api_url("https://example.com")
            .version("2")
            .dialect(Dialect::App)
            .header("X-Team", "7")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.headers.get("X-Team"), Some(&"7".to_string()));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.versioned_base(), "https://example.com/api/v2/app/");
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let result = ClientConfig::builder().api_url("not a url").build();
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_resolve_url() {
        let config = ClientConfig::default();
        assert_eq!(
            config.resolve_url("customer"),
            "https://api.startdeliver.com/api/v1/customer"
        );
        assert_eq!(
            config.resolve_url("/customer/5"),
            "https://api.startdeliver.com/api/v1/customer/5"
        );
        assert_eq!(
            config.resolve_url("service/health"),
            "https://api.startdeliver.com/api/service/health"
        );
        assert_eq!(
            config.resolve_url("app/settings"),
            "https://api.startdeliver.com/api/app/settings"
        );
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "api_key: yaml-key\napi_url: http://localhost:8080\ndialect: app\nheaders:\n  X-Org: acme"
        )
        .unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("yaml-key"));
        assert_eq!(config.dialect, Dialect::App);
        assert_eq!(config.headers.get("X-Org"), Some(&"acme".to_string()));
        assert_eq!(config.version, "v1");
        assert!(config.strip_audit_fields);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"api_key": "json-key", "strip_audit_fields": false}}"#).unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("json-key"));
        assert!(!config.strip_audit_fields);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = ClientConfig::from_file("/nonexistent/startdeliver.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/startdeliver.yaml"));
    }
}
