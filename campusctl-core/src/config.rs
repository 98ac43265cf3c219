use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::codes::ErrorCatalog;
use crate::error::{CoreError, Result};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "CAMPUSCTL_CONFIG";

/// Default pool size; the CLI issues one call per invocation.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Template written by `campusctl config init`
pub const CONFIG_TEMPLATE: &str = r#"# campusctl configuration

[database]
# DATABASE_URL in the environment takes precedence over this value
# url = "postgres://localhost/university"
max_connections = 5
# statement_timeout_secs = 30

[errors]
connection_prefix = "1"
token_prefix = "1"

[errors.connection]
not_connect_with_data = "1"
invalid_login_or_password = "2"
error_connect_to_db = "3"
empty_login_or_password = "4"

[errors.token]
update_token = "1"
remove_token = "2"
invalid_token = "3"
"#;

/// Centralized configuration for campusctl
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampusConfig {
    pub database: DatabaseConfig,
    pub errors: ErrorCatalog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub statement_timeout_secs: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            statement_timeout_secs: None,
        }
    }
}

impl CampusConfig {
    /// Load config from `path`, usually [`CampusConfig::config_path`].
    ///
    /// A missing file yields the built-in defaults, so the error catalog
    /// is always available.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load config from an explicit path; the file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::path_not_found(path));
        }

        let content = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| CoreError::config_parse(path, e))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Get config file path: `$CAMPUSCTL_CONFIG` or ~/.campusctl/config.toml
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".campusctl/config.toml")
    }

    /// Database URL with `DATABASE_URL` taking precedence over the file.
    pub fn database_url(&self) -> Option<String> {
        env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .or_else(|| self.database.url.clone())
    }

    /// Get a config value by dot-notation key.
    pub fn get(&self, key: &str) -> Result<String> {
        if key.starts_with("errors.") {
            return self
                .errors
                .get(key)
                .map(str::to_owned)
                .ok_or_else(|| CoreError::unknown_key(key));
        }

        match key {
            "database.url" => Ok(self.database.url.clone().unwrap_or_default()),
            "database.max_connections" => Ok(self.database.max_connections.to_string()),
            "database.statement_timeout_secs" => Ok(self
                .database
                .statement_timeout_secs
                .map(|s| s.to_string())
                .unwrap_or_default()),
            _ => Err(CoreError::unknown_key(key)),
        }
    }

    /// Pretty TOML rendering for `config show`.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
