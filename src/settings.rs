use std::collections::HashMap;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::types::StartupError;

const DEFAULT_CONFIG_FILE: &str = "config/default";
const ENV_PREFIX: &str = "CAFE";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub log_level: String,
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub workers: usize,
    pub busy_timeout_ms: u64,
}

impl Settings {
    /// Defaults, then `config/default.toml` if present, then `CAFE_*` variables.
    pub fn load() -> Result<Self, StartupError> {
        let builder = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::build(builder)
    }

    pub fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, StartupError> {
        let settings: Settings = with_defaults(builder)?.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn api_keys(&self) -> ApiKeys {
        ApiKeys::new(self.api_keys.clone())
    }

    fn validate(&self) -> Result<(), StartupError> {
        if self.database.workers == 0 {
            return Err(StartupError::InvalidConfig(
                "database.workers must be at least 1".into(),
            ));
        }
        if self.database.url.trim().is_empty() {
            return Err(StartupError::InvalidConfig("database.url is empty".into()));
        }
        Ok(())
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 5000)?
        .set_default("database.url", "cafes.db")?
        .set_default("database.workers", 3)?
        .set_default("database.busy_timeout_ms", 5000)?
        .set_default("log_level", "info")
}

/// Keys accepted by the delete endpoint, by client id.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys(HashMap<String, String>);

impl ApiKeys {
    pub fn new(keys: HashMap<String, String>) -> Self {
        ApiKeys(keys)
    }

    /// Client id owning `key`, if any.
    pub fn client_for(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, known)| known.as_str() == key)
            .map(|(client, _)| client.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
