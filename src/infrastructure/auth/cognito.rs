//! Managed identity provider verification (Cognito-style user pool)
//!
//! Validates RS256 access tokens against the pool's published JWKS. The key
//! set is fetched over HTTPS with a bounded timeout and cached after the
//! first fetch; any network or key-set failure is a verification failure for
//! this strategy, never a process error.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

use super::verifier::{TokenVerifier, VerifierError};
use crate::domain::auth::value_objects::{Role, TokenClaims};

const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Claims carried by user-pool access tokens. Access tokens carry
/// `client_id` rather than `aud`, so audience is checked manually.
#[derive(Debug, Deserialize)]
struct CognitoClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "custom:role")]
    role: Option<String>,
    #[serde(default, rename = "cognito:groups")]
    groups: Vec<String>,
    token_use: String,
    client_id: String,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

/// RSA public key components cached per key id
#[derive(Clone)]
struct CachedKey {
    n: String,
    e: String,
}

/// Verifier for tokens issued by a managed user pool
pub struct CognitoTokenVerifier {
    http: reqwest::Client,
    issuer: String,
    jwks_url: String,
    client_id: String,
    keys: RwLock<HashMap<String, CachedKey>>,
}

impl CognitoTokenVerifier {
    /// Build a verifier for the given pool and app client.
    ///
    /// The pool region is encoded in the pool id (`{region}_{suffix}`); a
    /// pool id without that shape is a configuration error.
    pub fn new(user_pool_id: &str, client_id: &str) -> Result<Self, String> {
        let region = user_pool_id
            .split('_')
            .next()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| format!("Invalid user pool id: {}", user_pool_id))?;
        if !user_pool_id.contains('_') {
            return Err(format!("Invalid user pool id: {}", user_pool_id));
        }

        let issuer = format!("https://cognito-idp.{}.amazonaws.com/{}", region, user_pool_id);
        let jwks_url = format!("{}/.well-known/jwks.json", issuer);

        let http = reqwest::Client::builder()
            .timeout(JWKS_FETCH_TIMEOUT)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            issuer,
            jwks_url,
            client_id: client_id.to_string(),
            keys: RwLock::new(HashMap::new()),
        })
    }

    async fn key_for(&self, kid: &str) -> Result<CachedKey, VerifierError> {
        if let Some(key) = self.keys.read().await.get(kid) {
            return Ok(key.clone());
        }

        // Cache miss: refresh the whole key set (pools rotate keys rarely)
        let jwks: JwkSet = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| VerifierError::Unavailable(format!("JWKS fetch failed: {}", e)))?
            .error_for_status()
            .map_err(|e| VerifierError::Unavailable(format!("JWKS fetch failed: {}", e)))?
            .json()
            .await
            .map_err(|e| VerifierError::Unavailable(format!("Malformed JWKS: {}", e)))?;

        let mut keys = self.keys.write().await;
        for jwk in jwks.keys {
            keys.insert(jwk.kid, CachedKey { n: jwk.n, e: jwk.e });
        }

        keys.get(kid)
            .cloned()
            .ok_or_else(|| VerifierError::Rejected(format!("Unknown key id: {}", kid)))
    }
}

#[async_trait]
impl TokenVerifier for CognitoTokenVerifier {
    async fn verify(&self, token: &str) -> Result<TokenClaims, VerifierError> {
        let header =
            decode_header(token).map_err(|e| VerifierError::Rejected(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| VerifierError::Rejected("token missing key id".to_string()))?;

        let key = self.key_for(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e)
            .map_err(|e| VerifierError::Unavailable(format!("Bad key material: {}", e)))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        // Access tokens carry client_id instead of aud
        validation.validate_aud = false;

        let data = decode::<CognitoClaims>(token, &decoding_key, &validation)
            .map_err(|e| VerifierError::Rejected(e.to_string()))?;
        let claims = data.claims;

        if claims.token_use != "access" {
            return Err(VerifierError::Rejected(format!(
                "unexpected token_use: {}",
                claims.token_use
            )));
        }
        if claims.client_id != self.client_id {
            return Err(VerifierError::Rejected("client id mismatch".to_string()));
        }

        Ok(TokenClaims {
            subject: claims.sub,
            email: claims.email,
            name: claims.name,
            role: Role::from_claim(claims.role.as_deref()),
            groups: claims.groups,
        })
    }

    fn name(&self) -> &'static str {
        "identity-provider"
    }
}
