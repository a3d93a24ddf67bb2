//! Request authentication and role authorization

use crate::config::Environment;
use crate::domain::auth::{AuthError, Principal, Role};
use crate::infrastructure::auth::VerifierChain;

/// Turns a raw `Authorization` header into a [`Principal`].
///
/// Missing or malformed credentials are admitted with a fixed development
/// principal outside production; in production they fail closed. A present
/// credential runs through the verifier chain and any failure surfaces as
/// `InvalidToken`.
pub struct AuthenticateUseCase {
    chain: VerifierChain,
    environment: Environment,
}

impl AuthenticateUseCase {
    pub fn new(chain: VerifierChain, environment: Environment) -> Self {
        Self { chain, environment }
    }

    pub async fn execute(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        let token = authorization.and_then(|header| header.strip_prefix("Bearer "));

        let Some(token) = token else {
            if !self.environment.is_production() {
                tracing::debug!("no credential presented, using development principal");
                return Ok(Principal::development());
            }
            return Err(AuthError::AuthenticationRequired);
        };

        let claims = self.chain.verify(token).await?;
        Ok(Principal::from(claims))
    }
}

/// Role guard, composable after authentication. An absent principal fails
/// with 401 before the role comparison runs.
pub fn authorize_role(principal: Option<&Principal>, required: Role) -> Result<(), AuthError> {
    let principal = principal.ok_or(AuthError::AuthenticationRequired)?;
    if !principal.role.satisfies(required) {
        return Err(AuthError::InsufficientPermissions { required });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::TokenClaims;
    use crate::infrastructure::auth::{TokenVerifier, VerifierError};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StaticVerifier {
        result: Result<TokenClaims, &'static str>,
    }

    #[async_trait]
    impl TokenVerifier for StaticVerifier {
        async fn verify(&self, _token: &str) -> Result<TokenClaims, VerifierError> {
            self.result
                .clone()
                .map_err(|e| VerifierError::Rejected(e.to_string()))
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    fn chain_with(result: Result<TokenClaims, &'static str>) -> VerifierChain {
        VerifierChain::new(vec![Arc::new(StaticVerifier { result })])
    }

    #[tokio::test]
    async fn test_missing_header_in_production_requires_auth() {
        let use_case = AuthenticateUseCase::new(VerifierChain::default(), Environment::Production);
        assert_eq!(
            use_case.execute(None).await,
            Err(AuthError::AuthenticationRequired)
        );
    }

    #[tokio::test]
    async fn test_malformed_header_in_production_requires_auth() {
        let use_case = AuthenticateUseCase::new(VerifierChain::default(), Environment::Production);
        assert_eq!(
            use_case.execute(Some("Token abc")).await,
            Err(AuthError::AuthenticationRequired)
        );
    }

    #[tokio::test]
    async fn test_missing_header_in_development_uses_dev_principal() {
        let use_case = AuthenticateUseCase::new(VerifierChain::default(), Environment::Development);
        let principal = use_case.execute(None).await.unwrap();
        assert_eq!(principal.id, "dev-user");
        assert_eq!(principal.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_bearer_token_runs_chain_even_in_development() {
        let use_case = AuthenticateUseCase::new(chain_with(Err("bad")), Environment::Development);
        assert_eq!(
            use_case.execute(Some("Bearer nope")).await,
            Err(AuthError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn test_verified_claims_become_principal() {
        let claims = TokenClaims {
            subject: "u-9".to_string(),
            role: Role::Moderator,
            ..Default::default()
        };
        let use_case = AuthenticateUseCase::new(chain_with(Ok(claims)), Environment::Production);
        let principal = use_case.execute(Some("Bearer good")).await.unwrap();
        assert_eq!(principal.id, "u-9");
        assert_eq!(principal.role, Role::Moderator);
    }

    #[test]
    fn test_authorize_role_absent_principal_is_unauthenticated() {
        assert_eq!(
            authorize_role(None, Role::User),
            Err(AuthError::AuthenticationRequired)
        );
    }

    #[test]
    fn test_authorize_role_hierarchy() {
        let mut principal = Principal::development();
        principal.role = Role::Moderator;
        assert_eq!(
            authorize_role(Some(&principal), Role::Admin),
            Err(AuthError::InsufficientPermissions {
                required: Role::Admin
            })
        );

        principal.role = Role::SuperAdmin;
        assert!(authorize_role(Some(&principal), Role::User).is_ok());
    }
}
