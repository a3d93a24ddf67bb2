//! Authentication entities

use super::value_objects::{Role, TokenClaims};

/// Authenticated identity attached to a request.
///
/// Constructed fresh from verified token claims on every request and
/// discarded when the response is sent; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Stable identifier (token subject)
    pub id: String,
    /// Display name, when known
    pub name: Option<String>,
    /// Email address, when known
    pub email: Option<String>,
    /// Role used for authorization decisions
    pub role: Role,
    /// Group memberships, when the identity provider supplies them
    pub groups: Vec<String>,
}

impl Principal {
    /// Fixed development principal used when authentication is bypassed
    /// outside production. Must never be constructed in production mode.
    pub fn development() -> Self {
        Self {
            id: "dev-user".to_string(),
            name: Some("Development User".to_string()),
            email: Some("dev@c6group.ai".to_string()),
            role: Role::Admin,
            groups: Vec::new(),
        }
    }
}

impl From<TokenClaims> for Principal {
    fn from(claims: TokenClaims) -> Self {
        Self {
            id: claims.subject,
            name: claims.name,
            email: claims.email,
            role: claims.role,
            groups: claims.groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_principal() {
        let principal = Principal::development();
        assert_eq!(principal.id, "dev-user");
        assert_eq!(principal.role, Role::Admin);
        assert_eq!(principal.email.as_deref(), Some("dev@c6group.ai"));
    }

    #[test]
    fn test_principal_from_claims() {
        let claims = TokenClaims {
            subject: "u-123".to_string(),
            email: Some("user@example.com".to_string()),
            name: None,
            role: Role::Moderator,
            groups: vec!["ops".to_string()],
        };
        let principal = Principal::from(claims);
        assert_eq!(principal.id, "u-123");
        assert_eq!(principal.role, Role::Moderator);
        assert_eq!(principal.groups, vec!["ops".to_string()]);
    }
}
