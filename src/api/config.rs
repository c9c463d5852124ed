use crate::api::error::ApiInitError;
use crate::env::{env_string, parse_env_var};
use std::net::SocketAddr;

/// HTTP surface configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Listen address (default: 0.0.0.0)
    pub host: String,
    /// Listen port (default: 5001)
    pub port: u16,
    /// Maximum request body in bytes (default: 1MB)
    pub body_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            body_limit: 1_048_576,
        }
    }
}

impl ApiConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            host: env_string("HOST", &defaults.host),
            port: parse_env_var("PORT", defaults.port),
            body_limit: parse_env_var("BODY_LIMIT", defaults.body_limit),
        }
    }

    /// Returns the socket address to bind to
    pub fn bind_addr(&self) -> Result<SocketAddr, ApiInitError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|_| ApiInitError::InvalidAddress(addr))
    }
}
