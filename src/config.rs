//! Configuration module for docdrop.

use serde::Deserialize;
use std::path::Path;

use crate::{DocdropError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means any origin without credentials.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Blob storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded blobs, relative to the working directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// URL prefix under which blobs are publicly served.
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
}

fn default_storage_path() -> String {
    "uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

fn default_public_prefix() -> String {
    "/uploads".to_string()
}

impl StorageConfig {
    /// Upload ceiling in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
            public_prefix: default_public_prefix(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/docdrop.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DocdropError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DocdropError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DOCDROP_PORT`: listen port
    /// - `DOCDROP_STORAGE_PATH`: blob directory
    ///
    /// Empty or unparsable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("DOCDROP_PORT") {
            if let Ok(port) = port.trim().parse() {
                self.server.port = port;
            }
        }

        if let Ok(path) = std::env::var("DOCDROP_STORAGE_PATH") {
            if !path.is_empty() {
                self.storage.path = path;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_upload_size_mb == 0 {
            return Err(DocdropError::Config(
                "storage.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        if !self.storage.public_prefix.starts_with('/') || self.storage.public_prefix.len() < 2 {
            return Err(DocdropError::Config(format!(
                "storage.public_prefix must be an absolute URL path, got {:?}",
                self.storage.public_prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.cors_origins.is_empty());

        assert_eq!(config.storage.path, "uploads");
        assert_eq!(config.storage.max_upload_size_mb, 10);
        assert_eq!(config.storage.max_upload_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.storage.public_prefix, "/uploads");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/docdrop.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080
cors_origins = ["http://localhost:5173"]

[storage]
path = "/var/lib/docdrop"
max_upload_size_mb = 25
public_prefix = "/files"

[logging]
level = "debug"
file = "custom/docdrop.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.storage.path, "/var/lib/docdrop");
        assert_eq!(config.storage.max_upload_size_mb, 25);
        assert_eq!(config.storage.public_prefix, "/files");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/docdrop.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 4000
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.path, "uploads");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.max_upload_size_mb, 10);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        match result {
            Err(DocdropError::Config(msg)) => assert!(msg.contains("config parse error")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(DocdropError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nmax_upload_size_mb = 2\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.max_upload_size_bytes(), 2 * 1024 * 1024);
    }

    // Both env vars are exercised in one test so parallel tests never race on them.
    #[test]
    fn test_apply_env_overrides() {
        let original_port = std::env::var("DOCDROP_PORT").ok();
        let original_path = std::env::var("DOCDROP_STORAGE_PATH").ok();

        std::env::set_var("DOCDROP_PORT", "9090");
        std::env::set_var("DOCDROP_STORAGE_PATH", "/tmp/docdrop-env");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.storage.path, "/tmp/docdrop-env");

        std::env::set_var("DOCDROP_PORT", "not-a-port");
        std::env::set_var("DOCDROP_STORAGE_PATH", "");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.path, "uploads");

        match original_port {
            Some(val) => std::env::set_var("DOCDROP_PORT", val),
            None => std::env::remove_var("DOCDROP_PORT"),
        }
        match original_path {
            Some(val) => std::env::set_var("DOCDROP_STORAGE_PATH", val),
            None => std::env::remove_var("DOCDROP_STORAGE_PATH"),
        }
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_upload_size() {
        let mut config = Config::default();
        config.storage.max_upload_size_mb = 0;

        match config.validate() {
            Err(DocdropError::Config(msg)) => assert!(msg.contains("max_upload_size_mb")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_max_upload_size_bytes_saturates() {
        let mut config = Config::default();
        config.storage.max_upload_size_mb = u64::MAX;

        assert_eq!(config.storage.max_upload_size_bytes(), u64::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_relative_prefix() {
        let mut config = Config::default();
        config.storage.public_prefix = "uploads".to_string();
        assert!(config.validate().is_err());

        config.storage.public_prefix = "/".to_string();
        assert!(config.validate().is_err());
    }
}
