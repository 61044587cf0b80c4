//! Request builder
//!
//! Turns a logical operation (read, write, replace, delete, passthrough,
//! login, download) into a `RequestDescriptor`. No I/O happens here.

use super::query::{app_query_string, standard_query, standard_query_string};
use super::types::{DownloadOptions, RawRequest, ReadParams, RequestDescriptor};
use crate::client::LoginCredentials;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::types::{Dialect, JsonObject, JsonValue, Method, ResponseMode};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// URLs longer than this are sent as a POST with a method override
pub const MAX_URL_LENGTH: usize = 7500;

/// Header asking the API to treat a POST as the named method
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

/// Fields the server maintains itself
const AUDIT_FIELDS: [&str; 2] = ["updatedAt", "updatedBy"];

/// Builds request descriptors against a client configuration
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    config: &'a ClientConfig,
}

impl<'a> RequestBuilder<'a> {
    /// Create a builder for a configuration
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    /// Base descriptor for an endpoint: resolved URL, default headers and auth
    pub fn request(&self, method: Method, endpoint: &str) -> RequestDescriptor {
        let mut headers: BTreeMap<String, String> = self.config.headers.clone();

        if let Some(key) = &self.config.api_key {
            headers.insert("Authorization".to_string(), key.clone());
        }
        if !headers.keys().any(|k| k.eq_ignore_ascii_case("user-agent")) {
            headers.insert(
                "User-Agent".to_string(),
                format!("startdeliver-rs/{}", env!("CARGO_PKG_VERSION")),
            );
        }

        RequestDescriptor {
            method,
            url: self.config.resolve_url(endpoint),
            endpoint: endpoint.to_string(),
            headers,
            body: None,
            response_mode: ResponseMode::Json,
        }
    }

    /// GET an entity by id, or list it with a filter
    pub fn read(&self, entity: &str, params: &ReadParams) -> Result<RequestDescriptor> {
        match params {
            ReadParams::None => Ok(self.request(Method::GET, entity)),
            ReadParams::Id(id) => Ok(self.request(Method::GET, &format!("{entity}/{id}"))),
            ReadParams::Query(params) => match self.config.dialect {
                Dialect::App => self.read_app(entity, params),
                Dialect::Standard => self.read_standard(entity, params),
            },
        }
    }

    fn read_app(&self, entity: &str, params: &JsonObject) -> Result<RequestDescriptor> {
        let query = app_query_string(params)?;
        if query.is_empty() {
            return Ok(self.request(Method::GET, entity));
        }
        Ok(self.request(Method::GET, &format!("{entity}?{query}")))
    }

    fn read_standard(&self, entity: &str, params: &JsonObject) -> Result<RequestDescriptor> {
        let query = standard_query(params);
        let endpoint = format!("{entity}?{}", standard_query_string(&query)?);
        let descriptor = self.request(Method::GET, &endpoint);

        if descriptor.url.len() <= MAX_URL_LENGTH {
            return Ok(descriptor);
        }

        let mut descriptor = self.request(Method::POST, entity);
        descriptor
            .headers
            .insert(METHOD_OVERRIDE_HEADER.to_string(), "GET".to_string());
        descriptor.body = Some(json!({ "query": query }));
        Ok(descriptor)
    }

    /// PATCH an existing record or POST a new one, depending on `id`
    pub fn save(&self, entity: &str, params: &JsonObject) -> RequestDescriptor {
        let mut descriptor = match params.get("id").and_then(id_segment) {
            Some(id) => self.request(Method::PATCH, &format!("{entity}/{id}")),
            None => self.request(Method::POST, entity),
        };
        descriptor.body = Some(JsonValue::Object(self.write_body(params)));
        descriptor
    }

    /// PUT a full record; a missing id leaves a trailing slash
    pub fn replace(&self, entity: &str, params: &JsonObject) -> RequestDescriptor {
        let id = params.get("id").and_then(id_segment).unwrap_or_default();
        let mut descriptor = self.request(Method::PUT, &format!("{entity}/{id}"));
        descriptor.body = Some(JsonValue::Object(self.write_body(params)));
        descriptor
    }

    /// DELETE a record given its id or the record itself
    pub fn delete(&self, entity: &str, target: &JsonValue) -> RequestDescriptor {
        let id = match target {
            JsonValue::Object(record) => record.get("id").and_then(id_segment),
            other => id_segment(other),
        }
        .unwrap_or_default();
        self.request(Method::DELETE, &format!("{entity}/{id}"))
    }

    /// Passthrough request
    pub fn raw(&self, raw: &RawRequest) -> RequestDescriptor {
        let mut descriptor = self.request(raw.method, &raw.endpoint);
        descriptor.headers.extend(raw.headers.clone());
        descriptor.body.clone_from(&raw.body);
        descriptor
    }

    /// POST login
    pub fn login(&self, credentials: &LoginCredentials) -> RequestDescriptor {
        let mut descriptor = self.request(Method::POST, "login");
        descriptor.body = Some(json!({
            "email": credentials.username,
            "password": credentials.password,
            "remember": credentials.remember,
            "setCookie": credentials.set_cookie,
        }));
        descriptor
    }

    /// GET a file's content, streamed into `target`
    pub fn download(
        &self,
        file_id: &str,
        options: &DownloadOptions,
        target: PathBuf,
    ) -> RequestDescriptor {
        let mut range = Vec::new();
        if let Some(start) = options.byte_start {
            range.push(format!("byteStart={start}"));
        }
        if let Some(end) = options.byte_end {
            range.push(format!("byteEnd={end}"));
        }

        let mut endpoint = format!("file/{file_id}/download");
        if !range.is_empty() {
            endpoint.push('?');
            endpoint.push_str(&range.join("&"));
        }

        let mut descriptor = self.request(Method::GET, &endpoint);
        descriptor.response_mode = ResponseMode::File(target);
        descriptor
    }

    fn write_body(&self, params: &JsonObject) -> JsonObject {
        let mut body = params.clone();
        if self.config.strip_audit_fields {
            for field in AUDIT_FIELDS {
                body.shift_remove(field);
            }
        }
        body
    }
}

/// Render an id value as a path segment; null, false and empty ids count as absent
pub fn id_segment(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
