//! Authentication value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role assigned to a principal.
///
/// Roles form a strict hierarchy; authorization compares ordinal levels
/// rather than strings so an unknown role can never be confused with a
/// privileged one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular user role
    User,
    /// Moderator role
    Moderator,
    /// Administrator role
    Admin,
    /// Super administrator role
    SuperAdmin,
}

impl Role {
    /// Ordinal level used for hierarchy comparisons
    pub fn level(&self) -> u8 {
        match self {
            Role::User => 1,
            Role::Moderator => 2,
            Role::Admin => 3,
            Role::SuperAdmin => 4,
        }
    }

    /// Whether this role satisfies an endpoint requiring `required`
    pub fn satisfies(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Parse a role claim, falling back to `user` for absent or unknown values
    pub fn from_claim(claim: Option<&str>) -> Role {
        claim
            .and_then(|s| Role::from_str(s).ok())
            .unwrap_or(Role::User)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized claims produced by a token verifier, independent of which
/// identity source issued the token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (stable principal identifier)
    pub subject: String,
    /// Email address, when the token carries one
    pub email: Option<String>,
    /// Display name, when the token carries one
    pub name: Option<String>,
    /// Resolved role (defaults to `user` when the claim is absent)
    pub role: Role,
    /// Group memberships, when the token carries them
    pub groups: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert_eq!(Role::from_str("moderator").unwrap(), Role::Moderator);
        assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("super_admin").unwrap(), Role::SuperAdmin);
        assert!(Role::from_str("root").is_err());
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(Role::SuperAdmin.satisfies(Role::User));
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(!Role::Moderator.satisfies(Role::Admin));
        assert!(!Role::User.satisfies(Role::Moderator));
    }

    #[test]
    fn test_role_levels() {
        assert_eq!(Role::User.level(), 1);
        assert_eq!(Role::Moderator.level(), 2);
        assert_eq!(Role::Admin.level(), 3);
        assert_eq!(Role::SuperAdmin.level(), 4);
    }

    #[test]
    fn test_role_from_claim_defaults_to_user() {
        assert_eq!(Role::from_claim(None), Role::User);
        assert_eq!(Role::from_claim(Some("something-else")), Role::User);
        assert_eq!(Role::from_claim(Some("admin")), Role::Admin);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::SuperAdmin.to_string(), "super_admin");
        assert_eq!(Role::User.to_string(), "user");
    }
}
