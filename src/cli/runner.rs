//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::{Client, EntityApi, LoginCredentials};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::pagination::HistoryLabel;
use crate::request::{DownloadOptions, RawRequest, ReadParams};
use crate::types::{Dialect, JsonObject, JsonValue, Method, OptionStringExt};
use serde_json::json;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command and print its result
    pub async fn run(&self) -> Result<()> {
        let result = self.execute().await?;
        self.output(&result);
        Ok(())
    }

    /// Run the CLI command and return its result
    pub async fn execute(&self) -> Result<JsonValue> {
        let mut client = Client::new(self.client_config()?)?;

        match &self.cli.command {
            Commands::Get { entity, id, query } => {
                let params = match (id, query) {
                    (Some(id), _) => ReadParams::id(id.as_str()),
                    (None, Some(query)) => ReadParams::Query(parse_object("get", query)?),
                    (None, None) => ReadParams::None,
                };
                client.get(entity, params).await
            }
            Commands::FindAll { entity, query } => {
                let params = parse_optional_object("find_all", query.as_deref())?;
                let records = client.find_all(entity, &params).await?;
                debug!("Fetched {} {} records", records.len(), entity);
                Ok(JsonValue::Array(records))
            }
            Commands::History {
                entity,
                labels,
                query,
            } => {
                let params = parse_optional_object("find_with_history", query.as_deref())?;
                let labels: Vec<HistoryLabel> =
                    labels.iter().map(|label| HistoryLabel::from(label.as_str())).collect();
                let records = client.find_with_history(entity, &params, &labels).await?;
                Ok(JsonValue::Array(records))
            }
            Commands::Save { entity, data } => {
                client.save(entity, &parse_object("save", data)?).await
            }
            Commands::Replace { entity, data } => {
                client.replace(entity, &parse_object("replace", data)?).await
            }
            Commands::Delete { entity, id } => client.delete(entity, id.as_str()).await,
            Commands::Raw {
                method,
                endpoint,
                data,
                headers,
            } => {
                let raw = build_raw(method, endpoint, data.as_deref(), headers)?;
                client.raw(&raw).await
            }
            Commands::Me => client.me().await,
            Commands::Login {
                username,
                password,
                remember,
                set_cookie,
            } => {
                let credentials = LoginCredentials::new(username.as_str(), password.as_str())
                    .remember(*remember)
                    .set_cookie(*set_cookie);
                client.login(credentials).await
            }
            Commands::Download {
                file_id,
                output,
                byte_start,
                byte_end,
            } => {
                let options = DownloadOptions {
                    path: output.clone(),
                    byte_start: *byte_start,
                    byte_end: *byte_end,
                };
                let path = client.download(file_id, options).await?;
                Ok(json!({ "path": path.display().to_string() }))
            }
        }
    }

    /// Resolve the client configuration
    ///
    /// A config file replaces the environment; flags override both.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::from_env()?,
        };

        if let Some(key) = self.cli.api_key.clone().none_if_empty() {
            config.api_key = Some(key);
        }
        if let Some(url) = self.cli.api_url.clone().none_if_empty() {
            config.api_url = url;
        }
        if let Some(version) = self.cli.api_version.clone().none_if_empty() {
            config.version = version;
        }
        if self.cli.app_dialect {
            config.dialect = Dialect::App;
        }
        if self.cli.verbose {
            config.debug = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// Output a result
    fn output(&self, value: &JsonValue) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}

/// Parse a JSON object argument
fn parse_object(operation: &str, input: &str) -> Result<JsonObject> {
    match serde_json::from_str(input) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(_) => Err(Error::invalid_arguments(operation, "expected a JSON object")),
        Err(e) => Err(Error::invalid_arguments(operation, format!("invalid JSON: {e}"))),
    }
}

fn parse_optional_object(operation: &str, input: Option<&str>) -> Result<JsonObject> {
    input.map_or_else(|| Ok(JsonObject::new()), |input| parse_object(operation, input))
}

fn build_raw(
    method: &str,
    endpoint: &str,
    data: Option<&str>,
    headers: &[String],
) -> Result<RawRequest> {
    let mut raw = RawRequest::new(method.parse::<Method>()?, endpoint);

    for header in headers {
        let (name, value) = header.split_once(':').ok_or_else(|| {
            Error::invalid_arguments("raw", format!("header '{header}' is not 'Name: value'"))
        })?;
        raw = raw.header(name.trim(), value.trim());
    }

    if let Some(data) = data {
        let body = serde_json::from_str(data)
            .map_err(|e| Error::invalid_arguments("raw", format!("invalid JSON body: {e}")))?;
        raw = raw.json(body);
    }

    Ok(raw)
}
