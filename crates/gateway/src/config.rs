//! Gateway configuration.

use std::env;

use auth_core::AuthConfig;
use common::{env_parse, ConfigError, DatabaseConfig};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// User store connection settings
    pub database: DatabaseConfig,
    /// Token signing settings
    pub auth: AuthConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("GATEWAY_PORT", 3000)?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
        })
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
