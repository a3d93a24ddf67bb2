//! Application services and use cases

pub mod auth;
