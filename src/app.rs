//! Application setup and wiring

use std::sync::Arc;
use std::time::Instant;

use axum::Router;

use crate::application::auth::AuthenticateUseCase;
use crate::config::Config;
use crate::infrastructure::auth::{
    CognitoTokenVerifier, LocalTokenVerifier, TokenVerifier, VerifierChain,
};
use crate::infrastructure::rate_limiter::{QuotaConfig, SlidingWindowLimiter};
use crate::presentation::routes::create_router;
use crate::presentation::{AppState, GateState};

/// Build the token verifier chain from configuration.
///
/// The identity provider verifier always precedes the local verifier; either
/// may be absent when unconfigured.
fn build_verifier_chain(config: &Config) -> Result<VerifierChain, Box<dyn std::error::Error>> {
    let mut verifiers: Vec<Arc<dyn TokenVerifier>> = Vec::new();

    if let Some(pool_id) = &config.auth.cognito_user_pool_id
        && let Some(client_id) = &config.auth.cognito_client_id
    {
        let verifier = CognitoTokenVerifier::new(pool_id, client_id)
            .map_err(|e| std::io::Error::other(format!("invalid Cognito configuration: {e}")))?;
        tracing::info!(user_pool_id = %pool_id, "identity provider verifier configured");
        verifiers.push(Arc::new(verifier));
    }

    if let Some(secret) = &config.auth.jwt_secret {
        verifiers.push(Arc::new(LocalTokenVerifier::new(secret)));
        tracing::info!("local token verifier configured");
    }

    if verifiers.is_empty() {
        tracing::warn!("no token verifiers configured; every presented token will be rejected");
    }

    Ok(VerifierChain::new(verifiers))
}

/// Create the fully wired application router
pub fn create_app(config: Config) -> Result<Router, Box<dyn std::error::Error>> {
    let chain = build_verifier_chain(&config)?;
    let authenticate = Arc::new(AuthenticateUseCase::new(chain, config.environment));

    let limiter = Arc::new(SlidingWindowLimiter::new(QuotaConfig {
        window_ms: config.rate_limit.window_ms,
        max_requests: config.rate_limit.max_requests,
    }));
    let strict_limiter = Arc::new(SlidingWindowLimiter::new(QuotaConfig {
        window_ms: config.rate_limit.strict_window_ms,
        max_requests: config.rate_limit.strict_max_requests,
    }));

    let gate = GateState {
        authenticate,
        limiter,
        strict_limiter,
        rate_limit_enabled: config.rate_limit.enabled,
    };

    let app_state = AppState {
        config: Arc::new(config),
        gate,
        started_at: Instant::now(),
    };

    let config_ref = app_state.config.clone();
    Ok(create_router(app_state, config_ref.as_ref()))
}
