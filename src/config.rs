//! Configuration types.

use crate::error::ConfigError;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service name for identification.
    pub name: String,
    /// Path to the local settings database.
    pub db_path: String,
    /// Port the REST surface listens on.
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "capital-copilot".to_string(),
            db_path: "./data/capital-copilot.db".to_string(),
            port: 8080,
        }
    }
}

impl ServiceConfig {
    /// Build a config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = match std::env::var("CAPITAL_COPILOT_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "CAPITAL_COPILOT_PORT".to_string(),
                message: format!("not a valid port: {raw}"),
            })?,
            Err(_) => defaults.port,
        };
        Ok(Self {
            db_path: std::env::var("CAPITAL_COPILOT_DB_PATH").unwrap_or(defaults.db_path),
            port,
            ..defaults
        })
    }
}
