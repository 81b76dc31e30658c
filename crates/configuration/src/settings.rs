use crate::error::ConfigError;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

/// Where the HTTP server binds.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// The interface to bind, e.g. "0.0.0.0".
    pub host: String,
    /// The TCP port for the JSON API.
    pub port: u16,
}

/// Connection pool tuning for the MySQL database.
///
/// The connection string itself comes from the `DATABASE_URL` environment
/// variable, not from this file, so credentials stay out of version control.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long to wait for a free connection before giving up, in seconds.
    pub acquire_timeout_secs: u64,
}

impl Config {
    /// Rejects configurations that cannot possibly serve requests.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
