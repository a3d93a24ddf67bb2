//! Locally-signed token verification (HS256 shared secret)

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use super::verifier::{TokenVerifier, VerifierError};
use crate::domain::auth::value_objects::{Role, TokenClaims};

/// Claims accepted from locally-issued tokens. `sub` is preferred; `userId`
/// is accepted for compatibility with older issuers.
#[derive(Debug, Deserialize)]
struct LocalClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default, alias = "userId")]
    user_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[allow(dead_code)]
    exp: usize,
}

/// Verifier for tokens signed with the deployment's shared secret
pub struct LocalTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl LocalTokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenVerifier for LocalTokenVerifier {
    async fn verify(&self, token: &str) -> Result<TokenClaims, VerifierError> {
        let data = decode::<LocalClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| VerifierError::Rejected(e.to_string()))?;
        let claims = data.claims;

        let subject = claims
            .sub
            .or(claims.user_id)
            .ok_or_else(|| VerifierError::Rejected("token missing subject".to_string()))?;

        Ok(TokenClaims {
            subject,
            email: claims.email,
            name: claims.name,
            role: Role::from_claim(claims.role.as_deref()),
            groups: Vec::new(),
        })
    }

    fn name(&self) -> &'static str {
        "local-secret"
    }
}
