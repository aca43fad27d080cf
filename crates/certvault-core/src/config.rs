//! Configuration resolution for certvault.
//!
//! Resolution order (later wins):
//! 1. Built-in defaults
//! 2. Settings file (explicit path, or `$XDG_CONFIG_HOME/certvault/settings.json`)
//! 3. Environment variables (`CERTVAULT_*`)
//! 4. CLI arguments, applied by the server binary

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Complete certvault configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub log_level: String,
    /// Allowed CORS origins; `"*"` allows any.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_level: "info".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Startup data configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Load the built-in certificates at startup.
    pub seed: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { seed: true }
    }
}

/// Load configuration from `path` (or the global settings file when `None`)
/// and apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None => match global_config_path() {
            Some(global) if global.exists() => load_config_file(&global)?,
            _ => Config::default(),
        },
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Get the global settings file path.
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .map(|p| p.join("certvault").join("settings.json"))
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Apply `CERTVAULT_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("CERTVAULT_LISTEN_ADDR") {
        config.server.listen_addr = val
            .parse()
            .map_err(|e| Error::Config(format!("CERTVAULT_LISTEN_ADDR={val}: {e}")))?;
    }
    if let Some(val) = lookup("CERTVAULT_LOG_LEVEL") {
        config.server.log_level = val;
    }
    if let Some(val) = lookup("CERTVAULT_CORS_ORIGINS") {
        config.server.cors_allowed_origins = val
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_owned)
            .collect();
    }
    if let Some(val) = lookup("CERTVAULT_SEED") {
        config.data.seed = match val.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => return Err(Error::Config(format!("CERTVAULT_SEED={val}: expected a boolean"))),
        };
    }
    Ok(())
}
