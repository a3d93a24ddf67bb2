//! Authentication domain: principals, roles, and the gate error taxonomy

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::Principal;
pub use errors::AuthError;
pub use value_objects::{Role, TokenClaims};
