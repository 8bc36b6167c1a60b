//! Service configuration
//!
//! A single JSON document with three sections. Every field has a default,
//! so an empty object `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "server": { "host": "0.0.0.0", "port": 8000, "cors_origins": [] },
//!   "auth": { "policy": "read_only_or_authenticated", "jwt_secret": "...",
//!             "issuer": "bookstore", "audience": "bookstore" },
//!   "logging": { "filter": "info,tower_http=info", "format": "text" }
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{AccessPolicy, JwtConfig};

/// Secret shipped in generated configs; serving with it logs a warning
pub const PLACEHOLDER_SECRET: &str = "CHANGE_THIS_SECRET_IN_PRODUCTION";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
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
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Credential verification and access policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub policy: AccessPolicy,

    #[serde(default = "default_secret")]
    pub jwt_secret: String,

    #[serde(default = "default_claim")]
    pub issuer: String,

    #[serde(default = "default_claim")]
    pub audience: String,

    /// Lifetime of tokens issued by `JwtManager::issue_token`
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

fn default_secret() -> String {
    PLACEHOLDER_SECRET.to_string()
}

fn default_claim() -> String {
    "bookstore".to_string()
}

fn default_token_ttl_minutes() -> i64 {
    15
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            policy: AccessPolicy::default(),
            jwt_secret: default_secret(),
            issuer: default_claim(),
            audience: default_claim(),
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

impl AuthConfig {
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            access_token_ttl: Duration::minutes(self.token_ttl_minutes),
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
        }
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.jwt_secret == PLACEHOLDER_SECRET
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_filter() -> String {
    "info,tower_http=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads and validates a configuration file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// Loads `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be > 0".into()));
        }

        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".into()));
        }

        if self.auth.policy.uses_credentials() && self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "auth.jwt_secret is required by policy '{}'",
                self.auth.policy.as_str()
            )));
        }

        if self.auth.token_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "auth.token_ttl_minutes must be > 0".into(),
            ));
        }

        if let Some(origin) = self
            .server
            .cors_origins
            .iter()
            .find(|o| o.parse::<axum::http::HeaderValue>().is_err())
        {
            return Err(ConfigError::Invalid(format!(
                "server.cors_origins contains an invalid origin: '{}'",
                origin
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_is_default() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.policy, AccessPolicy::ReadOnlyOrAuthenticated);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config =
            AppConfig::from_json(r#"{"server": {"port": 9000}, "logging": {"format": "json"}}"#)
                .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, "info,tower_http=info");
    }

    #[test]
    fn test_zero_port_rejected() {
        let err = AppConfig::from_json(r#"{"server": {"port": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let err = AppConfig::from_json(r#"{"logging": {"format": "xml"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_secret_needs_open_policy() {
        let err = AppConfig::from_json(r#"{"auth": {"jwt_secret": ""}}"#).unwrap_err();
        assert!(err.to_string().contains("jwt_secret"));

        let config =
            AppConfig::from_json(r#"{"auth": {"policy": "allow_any", "jwt_secret": ""}}"#)
                .unwrap();
        assert_eq!(config.auth.policy, AccessPolicy::AllowAny);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"auth": {{"jwt_secret": "s3cret", "issuer": "shop"}}}}"#).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.jwt_config().issuer, "shop");
        assert!(!config.auth.uses_placeholder_secret());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_pretty_json_reloads() {
        let config = AppConfig::default();
        let text = config.to_json_pretty().unwrap();
        assert_eq!(AppConfig::from_json(&text).unwrap(), config);
    }
}
