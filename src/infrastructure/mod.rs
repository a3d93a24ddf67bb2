//! External integrations: token verification and rate limiting

pub mod auth;
pub mod rate_limiter;
