//! HTTP presentation layer: middleware, models, controllers, and routes

pub mod controllers;
pub mod middleware;
pub mod models;
pub mod routes;

pub use controllers::AppState;
pub use middleware::{
    GateState, RoleGuard, auth_middleware, rate_limit_middleware, require_role_middleware,
    strict_rate_limit_middleware,
};
pub use routes::create_router;
