//! Configuration loading.
//!
//! A JSON file is optional; environment variables override the few settings
//! operators change per deployment.

use std::fs;
use std::path::Path;

use walkin_types::{ConfigError, WalkinConfig};

pub const ENV_PORT: &str = "WALKIN_PORT";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_JWT_SECRET: &str = "WALKIN_JWT_SECRET";

/// Load configuration from `path` (when given) and apply environment
/// overrides. Callers that serve traffic must still run
/// [`WalkinConfig::check`]; maintenance commands only need the database URL.
pub fn load_config(path: Option<&Path>) -> Result<WalkinConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => WalkinConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<WalkinConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.display().to_string() });
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::from_io_error(&e))?;
    serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))
}

/// Overlay environment values onto `config`. Empty values are ignored.
pub(crate) fn apply_env_overrides<F>(config: &mut WalkinConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(port) = get(ENV_PORT) {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid("server.port", format!("invalid port '{port}'")))?;
    }
    if let Some(url) = get(ENV_DATABASE_URL) {
        config.database.url = Some(url);
    }
    if let Some(secret) = get(ENV_JWT_SECRET) {
        config.auth.jwt_secret = secret;
    }
    Ok(())
}
