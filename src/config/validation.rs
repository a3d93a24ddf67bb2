//! Configuration validation run once at startup

use thiserror::Error;

use super::Config;

/// Validation failure detail
#[derive(Debug, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Startup validation for configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.environment.is_production()
            && !self.auth.cognito_configured()
            && self.auth.jwt_secret.is_none()
        {
            return Err(ValidationError::new(
                "auth",
                "production requires a configured identity provider or jwt_secret",
            ));
        }

        if let Some(secret) = &self.auth.jwt_secret
            && secret.len() < 32
        {
            return Err(ValidationError::new(
                "auth.jwt_secret",
                "must be at least 32 characters",
            ));
        }

        if self.auth.cognito_configured() && self.auth.cognito_client_id.is_none() {
            return Err(ValidationError::new(
                "auth.cognito_client_id",
                "required when cognito_user_pool_id is set",
            ));
        }

        if self.rate_limit.window_ms == 0 || self.rate_limit.strict_window_ms == 0 {
            return Err(ValidationError::new(
                "rate_limit",
                "window durations must be positive",
            ));
        }

        if self.rate_limit.max_requests == 0 || self.rate_limit.strict_max_requests == 0 {
            return Err(ValidationError::new(
                "rate_limit",
                "request maximums must be positive",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_production_without_verifiers_is_rejected() {
        let config = Config {
            environment: Environment::Production,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "auth");
    }

    #[test]
    fn test_production_with_secret_is_valid() {
        let mut config = Config {
            environment: Environment::Production,
            ..Default::default()
        };
        config.auth.jwt_secret = Some("a".repeat(32));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let mut config = Config::default();
        config.auth.jwt_secret = Some("short".to_string());
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "auth.jwt_secret");
    }

    #[test]
    fn test_pool_without_client_id_is_rejected() {
        let mut config = Config::default();
        config.auth.cognito_user_pool_id = Some("us-east-1_Pool".to_string());
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "auth.cognito_client_id");
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let mut config = Config::default();
        config.rate_limit.window_ms = 0;
        assert!(config.validate().is_err());
    }
}
