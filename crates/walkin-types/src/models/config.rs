//! Server configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use validator::Validate;

use crate::error::ConfigError;

/// Full configuration for the walk-in queue daemon.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct WalkinConfig {
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,
    #[serde(default)]
    #[validate(nested)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    #[validate(nested)]
    pub realtime: RealtimeConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    #[validate(range(min = 1_u16))]
    pub port: u16,
    /// Browser origins allowed by CORS; empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 1000, allowed_origins: Vec::new() }
    }
}

/// PostgreSQL connection settings. Without a URL the in-memory store is used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[validate(range(min = 1_u32))]
    pub max_connections: u32,
    #[validate(range(min = 1_u64))]
    pub acquire_timeout_secs: u64,
    /// Per-statement timeout applied to every pooled connection
    #[validate(range(min = 1_u64))]
    pub statement_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 20,
            acquire_timeout_secs: 30,
            statement_timeout_ms: 5_000,
        }
    }
}

/// Which identity gateway verifies representative credentials.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// HS256-signed JWT, subject claim is the identity
    #[default]
    Jwt,
    /// Fixed token table, for local development
    Static,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Jwt => write!(f, "jwt"),
            Self::Static => write!(f, "static"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: AuthMode,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_audience: Option<String>,
    /// token -> representative identity
    #[serde(default)]
    pub static_tokens: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct RealtimeConfig {
    /// Events buffered per subscriber before it starts lagging
    #[validate(range(min = 1_usize))]
    pub channel_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self { channel_capacity: 256 }
    }
}

impl WalkinConfig {
    /// Range checks plus the cross-field rules `validator` cannot express.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|e| ConfigError::invalid("config", e.to_string()))?;

        match self.auth.mode {
            AuthMode::Jwt if self.auth.jwt_secret.is_empty() => {
                Err(ConfigError::invalid("auth.jwt_secret", "required when auth.mode is jwt"))
            },
            AuthMode::Static if self.auth.static_tokens.is_empty() => Err(ConfigError::invalid(
                "auth.static_tokens",
                "at least one token is required when auth.mode is static",
            )),
            _ => Ok(()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
