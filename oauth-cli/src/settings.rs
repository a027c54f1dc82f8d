//! Layered configuration: config file, then `OAUTH__*` environment variables.

use config::{Config, ConfigError, Environment, File, Source};
use logger_redacted::LoggerConfig;
use oauth_code_client::ClientConfig;
use serde::Deserialize;
use std::path::Path;

/// Looked up as `oauth-client.{toml,yaml,json,...}` in the working directory
pub const DEFAULT_CONFIG_NAME: &str = "oauth-client";
const ENV_PREFIX: &str = "OAUTH";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub client: ClientConfig,
    #[serde(default)]
    pub endpoints: EndpointSettings,
    #[serde(default)]
    pub logging: LoggerConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct EndpointSettings {
    pub authorization_url: Option<String>,
    pub token_url: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Settings {
    /// Load from `path` (required) or the default file name (optional).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        Self::from_source(file)
    }

    fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            )
            .build()?
            .try_deserialize()
    }
}
