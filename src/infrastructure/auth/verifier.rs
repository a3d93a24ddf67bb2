//! Verifier trait and ordered fallback chain

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::auth::{AuthError, TokenClaims};

/// Why a single verifier rejected a token.
///
/// Both variants are terminal for that verifier only; the chain moves on to
/// the next strategy. Detail stays server-side in logs and is never exposed
/// to clients.
#[derive(Error, Debug)]
pub enum VerifierError {
    /// Token was examined and is not acceptable (bad signature, expired,
    /// wrong issuer/audience/use)
    #[error("token rejected: {0}")]
    Rejected(String),

    /// Verification could not be performed (key set unreachable, malformed
    /// key material, timeout)
    #[error("verifier unavailable: {0}")]
    Unavailable(String),
}

/// A single token verification strategy
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a raw bearer token and produce normalized claims
    async fn verify(&self, token: &str) -> Result<TokenClaims, VerifierError>;

    /// Short name for diagnostics
    fn name(&self) -> &'static str;
}

/// Ordered list of verifiers; first success wins.
#[derive(Clone, Default)]
pub struct VerifierChain {
    verifiers: Vec<Arc<dyn TokenVerifier>>,
}

impl VerifierChain {
    pub fn new(verifiers: Vec<Arc<dyn TokenVerifier>>) -> Self {
        Self { verifiers }
    }

    /// Whether any verifier is configured
    pub fn is_empty(&self) -> bool {
        self.verifiers.is_empty()
    }

    /// Try each verifier in order. Individual failures are logged and
    /// swallowed; only the final, collective failure surfaces, normalized
    /// to `InvalidToken`.
    pub async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        for verifier in &self.verifiers {
            match verifier.verify(token).await {
                Ok(claims) => {
                    tracing::debug!(verifier = verifier.name(), subject = %claims.subject, "token verified");
                    return Ok(claims);
                }
                Err(e) => {
                    tracing::debug!(verifier = verifier.name(), error = %e, "token verification failed");
                }
            }
        }
        Err(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingVerifier {
        label: &'static str,
        succeed: bool,
        calls: Arc<AtomicUsize>,
        order: Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl TokenVerifier for RecordingVerifier {
        async fn verify(&self, _token: &str) -> Result<TokenClaims, VerifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.order.lock().unwrap().push(self.label);
            if self.succeed {
                Ok(TokenClaims {
                    subject: format!("{}-subject", self.label),
                    ..Default::default()
                })
            } else {
                Err(VerifierError::Rejected("nope".to_string()))
            }
        }

        fn name(&self) -> &'static str {
            self.label
        }
    }

    fn recording(
        label: &'static str,
        succeed: bool,
        order: &Arc<std::sync::Mutex<Vec<&'static str>>>,
    ) -> (Arc<dyn TokenVerifier>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let verifier = Arc::new(RecordingVerifier {
            label,
            succeed,
            calls: calls.clone(),
            order: order.clone(),
        });
        (verifier, calls)
    }

    #[tokio::test]
    async fn test_empty_chain_is_invalid_token() {
        let chain = VerifierChain::default();
        assert!(chain.is_empty());
        assert_eq!(chain.verify("anything").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_all_failures_normalize_to_invalid_token() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let (a, _) = recording("provider", false, &order);
        let (b, _) = recording("local", false, &order);
        let chain = VerifierChain::new(vec![a, b]);
        assert_eq!(chain.verify("t").await, Err(AuthError::InvalidToken));
        assert_eq!(*order.lock().unwrap(), vec!["provider", "local"]);
    }

    #[tokio::test]
    async fn test_first_success_stops_the_chain() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let (a, _) = recording("provider", true, &order);
        let (b, b_calls) = recording("local", true, &order);
        let chain = VerifierChain::new(vec![a, b]);
        let claims = chain.verify("t").await.unwrap();
        assert_eq!(claims.subject, "provider-subject");
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_to_second_verifier() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let (a, _) = recording("provider", false, &order);
        let (b, _) = recording("local", true, &order);
        let chain = VerifierChain::new(vec![a, b]);
        let claims = chain.verify("t").await.unwrap();
        assert_eq!(claims.subject, "local-subject");
    }
}
