//! Configuration module for CloudVault.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, VaultError};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means permissive (development mode).
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// External base URL used when rendering public link URLs
    /// (e.g. "https://vault.example.com"). Links are path-relative if unset.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            public_base_url: None,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL for the relational store.
    #[serde(default = "default_db_url")]
    pub url: String,
}

fn default_db_url() -> String {
    "sqlite://data/cloudvault.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
        }
    }
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the file storage directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "data/files".to_string()
}

fn default_max_upload_size() -> u64 {
    100
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign access tokens. Must be set (or provided through
    /// the `CLOUDVAULT_JWT_SECRET` environment variable).
    #[serde(default)]
    pub jwt_secret: String,
    /// Signing algorithm for access tokens.
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_token_ttl() -> i64 {
    60
}

impl AuthConfig {
    /// The configured signing algorithm. `validate()` restricts the value
    /// to the HMAC family.
    pub fn algorithm(&self) -> jsonwebtoken::Algorithm {
        match self.jwt_algorithm.as_str() {
            "HS384" => jsonwebtoken::Algorithm::HS384,
            "HS512" => jsonwebtoken::Algorithm::HS512,
            _ => jsonwebtoken::Algorithm::HS256,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_algorithm: default_jwt_algorithm(),
            token_ttl_minutes: default_token_ttl(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file path. Console-only if unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Object storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| VaultError::Config(format!("failed to parse config: {e}")))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Build a default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Environment variables take precedence over the config file so that
    /// secrets stay out of version-controlled files.
    fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("CLOUDVAULT_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(path) = std::env::var("CLOUDVAULT_STORAGE_PATH") {
            self.storage.path = path;
        }
    }

    /// Validate the configuration, failing fast on anything the server
    /// cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(VaultError::Config(
                "auth.jwt_secret must be set (or CLOUDVAULT_JWT_SECRET)".to_string(),
            ));
        }
        match self.auth.jwt_algorithm.as_str() {
            "HS256" | "HS384" | "HS512" => {}
            other => {
                return Err(VaultError::Config(format!(
                    "unsupported jwt_algorithm: {other}"
                )));
            }
        }
        if self.auth.token_ttl_minutes <= 0 {
            return Err(VaultError::Config(
                "auth.token_ttl_minutes must be positive".to_string(),
            ));
        }
        if self.database.url.is_empty() {
            return Err(VaultError::Config("database.url must be set".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.jwt_algorithm, "HS256");
        assert_eq!(config.auth.token_ttl_minutes, 60);
        assert_eq!(config.storage.max_upload_size_mb, 100);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [server]
            port = 9000

            [auth]
            jwt_secret = "secret"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.jwt_secret, "secret");
        // Unspecified sections fall back to defaults
        assert_eq!(config.database.url, "sqlite://data/cloudvault.db");
    }

    #[test]
    fn test_validate_requires_secret() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(VaultError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_algorithm() {
        let mut config = Config::default();
        config.auth.jwt_secret = "secret".to_string();
        config.auth.jwt_algorithm = "RS256".to_string();
        assert!(matches!(config.validate(), Err(VaultError::Config(_))));
    }

    #[test]
    fn test_validate_ok() {
        let mut config = Config::default();
        config.auth.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }
}
