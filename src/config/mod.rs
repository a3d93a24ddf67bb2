//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};

/// Deployment mode. The development bypass in the access gate exists only
/// outside `Production`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whether to expose the OpenAPI document. Should be false in hardened
    /// production.
    pub enable_docs: bool,
    /// Global request timeout in seconds applied at the HTTP layer
    pub request_timeout_seconds: u64,
    /// Allowed CORS origins. Use ["*"] to allow any (development only).
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            enable_docs: true,
            request_timeout_seconds: 30,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Authentication configuration.
///
/// Each credential source is optional; a verifier is built only for the
/// sources that are configured. Production requires at least one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Managed identity provider user pool id (enables provider verification)
    pub cognito_user_pool_id: Option<String>,
    /// App client id expected in provider-issued access tokens
    pub cognito_client_id: Option<String>,
    /// Shared secret for locally-signed tokens (enables local verification;
    /// at least 32 characters)
    pub jwt_secret: Option<String>,
}

impl AuthConfig {
    pub fn cognito_configured(&self) -> bool {
        self.cognito_user_pool_id.is_some()
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Default window duration in milliseconds
    pub window_ms: u64,
    /// Maximum requests per default window
    pub max_requests: u32,
    /// Strict window duration in milliseconds (sensitive endpoints)
    pub strict_window_ms: u64,
    /// Maximum requests per strict window
    pub strict_max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_ms: 900_000,
            max_requests: 100,
            strict_window_ms: 60_000,
            strict_max_requests: 5,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Sources, lowest to highest priority: `config/default`, `config/{ENV}`,
    /// `config/local`, then `C6OS__`-prefixed environment variables with `__`
    /// separators (e.g. `C6OS__SERVER__PORT=8080`).
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("C6OS").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_quotas() {
        let config = Config::default();
        assert_eq!(config.rate_limit.window_ms, 900_000);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.strict_window_ms, 60_000);
        assert_eq!(config.rate_limit.strict_max_requests, 5);
        assert!(!config.environment.is_production());
    }

    #[test]
    fn test_load_error_wraps_validation_failure() {
        let mut config = Config::default();
        config.rate_limit.window_ms = 0;
        let err: ConfigLoadError = config.validate().unwrap_err().into();
        assert!(matches!(err, ConfigLoadError::Validation(_)));
    }

    #[test]
    fn test_environment_parsing() {
        let env: Environment = serde_json::from_str("\"production\"").unwrap();
        assert!(env.is_production());
        let env: Environment = serde_json::from_str("\"development\"").unwrap();
        assert!(!env.is_production());
    }
}
