//! C6OS Gateway - access gate for the C6Group.AI OS agent dashboard
//!
//! Layers follow a domain-driven layout:
//! - `domain`: principals, roles, and the authentication error taxonomy
//! - `application`: the authenticate use case and role authorization
//! - `infrastructure`: token verifiers (identity provider + local HS256) and
//!   the sliding-window rate limiter
//! - `presentation`: axum middleware, handlers, and routes

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

mod app;

pub use app::create_app;
pub use config::Config;
pub use logging::init_tracing;
