//! Route definitions and middleware assembly
//!
//! Gated routes run authentication first, then the default quota, then any
//! route-local guard (strict quota or role threshold). The index route is
//! quota-limited without authentication; the health probe is fully public.

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::config::Config;
use crate::domain::auth::Role;
use crate::presentation::controllers::{
    self, AppState, agent_command, agents_status, api_index, health, system_configure,
    system_health, system_info,
};
use crate::presentation::middleware::{
    RoleGuard, auth_middleware, logging_middleware, rate_limit_middleware,
    require_role_middleware, security_headers_middleware, strict_rate_limit_middleware,
};
use crate::presentation::models::{
    ApiIndexResponse, CommandExecution, CommandRequest, ConfigureRequest, ErrorBody,
    HealthResponse, RateLimitErrorBody, RateLimitErrorDetail, SuccessBody,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        controllers::health,
        controllers::api_index,
        controllers::agents_status,
        controllers::agent_command,
        controllers::system_health,
        controllers::system_info,
        controllers::system_configure,
    ),
    components(
        schemas(
            HealthResponse,
            ApiIndexResponse,
            SuccessBody,
            ErrorBody,
            RateLimitErrorBody,
            RateLimitErrorDetail,
            CommandRequest,
            CommandExecution,
            ConfigureRequest,
        )
    ),
    tags(
        (name = "agents", description = "Agent status and command dispatch"),
        (name = "system", description = "Service health, information, and configuration")
    ),
    info(
        title = "C6OS Gateway",
        version = "1.0.0",
        description = "Control plane API for the C6Group.AI OS agent dashboard"
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer scheme the gated operations reference
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found(request: Request) -> Response {
    let body = ErrorBody::new(
        "Endpoint not found",
        format!("Cannot {} {}", request.method(), request.uri().path()),
    );
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods = [
        axum::http::Method::GET,
        axum::http::Method::POST,
        axum::http::Method::PUT,
        axum::http::Method::DELETE,
        axum::http::Method::OPTIONS,
    ];
    let headers = [
        axum::http::header::CONTENT_TYPE,
        axum::http::header::AUTHORIZATION,
        axum::http::header::ACCEPT,
    ];

    if config.server.allowed_origins.len() == 1 && config.server.allowed_origins[0] == "*" {
        CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(3600))
    } else {
        let mut layer = CorsLayer::new();
        for origin in &config.server.allowed_origins {
            match axum::http::HeaderValue::from_str(origin) {
                Ok(origin_header) => {
                    layer = layer.allow_origin(origin_header);
                }
                Err(_) => {
                    tracing::warn!(origin, "invalid CORS origin in config; skipping");
                }
            }
        }
        layer
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(3600))
    }
}

/// Create the application router with the full middleware stack
pub fn create_router(app_state: AppState, config: &Config) -> Router {
    let gate = app_state.gate.clone();

    // Authenticated API surface. Layers run top-down per request: the last
    // layer added is outermost, so auth is added after the default quota.
    let gated_routes = Router::new()
        .route("/api/agents/status", get(agents_status))
        .route(
            "/api/agents/{agent_id}/command",
            post(agent_command).route_layer(middleware::from_fn_with_state(
                gate.clone(),
                strict_rate_limit_middleware,
            )),
        )
        .route("/api/system/health", get(system_health))
        .route("/api/system/info", get(system_info))
        .route(
            "/api/system/configure",
            post(system_configure).route_layer(middleware::from_fn_with_state(
                RoleGuard::new(Role::Admin),
                require_role_middleware,
            )),
        )
        .layer(middleware::from_fn_with_state(
            gate.clone(),
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn_with_state(gate.clone(), auth_middleware));

    // Index is limited by client origin but requires no credential
    let index_routes = Router::new()
        .route("/api", get(api_index))
        .layer(middleware::from_fn_with_state(gate, rate_limit_middleware));

    let mut router = Router::new()
        .route("/health", get(health))
        .merge(index_routes)
        .merge(gated_routes)
        .fallback(not_found);

    if config.server.enable_docs {
        router = router.route("/api-docs/openapi.json", get(openapi_json));
    }

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(security_headers_middleware));

    router.layer(service_builder).with_state(app_state)
}
