//! Server configuration.
//!
//! Built-in defaults, overlaid by an optional YAML file, overlaid by
//! `GROWTREE_*` environment variables.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::storage::JsonConnection;

pub const DATA_DIR_ENV: &str = "GROWTREE_DATA_DIR";
pub const BIND_ENV: &str = "GROWTREE_BIND";
pub const CORS_ORIGIN_ENV: &str = "GROWTREE_CORS_ORIGIN";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
/// Used only when the platform has neither a data nor a home directory
const FALLBACK_DATA_DIR: &str = "growtree-data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory holding the JSON documents
    pub data_dir: PathBuf,
    pub bind_address: String,
    /// Origin allowed to call the API from a browser
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let data_dir = JsonConnection::default_directory().unwrap_or_else(|e| {
            warn!("{}, falling back to ./{}", e, FALLBACK_DATA_DIR);
            PathBuf::from(FALLBACK_DATA_DIR)
        });

        Self {
            data_dir,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults, then the YAML file if given, then the environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Fields missing from the YAML keep their defaults
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Apply `GROWTREE_*` overrides found through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(data_dir) = value(DATA_DIR_ENV) {
            info!("{} overrides data directory: {}", DATA_DIR_ENV, data_dir);
            self.data_dir = PathBuf::from(data_dir);
        }
        if let Some(bind_address) = value(BIND_ENV) {
            info!("{} overrides bind address: {}", BIND_ENV, bind_address);
            self.bind_address = bind_address;
        }
        if let Some(cors_origin) = value(CORS_ORIGIN_ENV) {
            info!("{} overrides CORS origin: {}", CORS_ORIGIN_ENV, cors_origin);
            self.cors_origin = cors_origin;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.cors_origin, "http://localhost:8080");
        assert!(config.data_dir.ends_with("GrowTree") || config.data_dir.ends_with(FALLBACK_DATA_DIR));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ServerConfig::from_yaml_str("bind_address: 0.0.0.0:8000\n").unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.cors_origin, "http://localhost:8080");

        assert!(ServerConfig::from_yaml_str("bind_address: [1, 2").is_err());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("growtree.yaml");
        fs::write(&path, "data_dir: /srv/growtree\ncors_origin: https://growtree.example\n").unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/growtree"));
        assert_eq!(config.cors_origin, "https://growtree.example");

        assert!(ServerConfig::from_file(&temp_dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (DATA_DIR_ENV, "/tmp/growtree"),
            (BIND_ENV, "0.0.0.0:9000"),
            (CORS_ORIGIN_ENV, "  "),
        ]);

        let mut config = ServerConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/growtree"));
        assert_eq!(config.bind_address, "0.0.0.0:9000");
        // Blank values are ignored
        assert_eq!(config.cors_origin, "http://localhost:8080");
    }
}
