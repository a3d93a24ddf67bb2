//! Authentication domain errors

use thiserror::Error;

use super::value_objects::Role;

/// Gate-level authentication and authorization errors.
///
/// Every variant is recoverable by the caller (present a valid credential,
/// wait out the quota window, or escalate privileges); none is fatal to the
/// process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions - {required} role required")]
    InsufficientPermissions { required: Role },
}
