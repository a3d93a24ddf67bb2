//! HTTP request handlers
//!
//! Handlers downstream of the gate are deliberately thin: they return static
//! status documents in the dashboard envelope so the authentication and quota
//! path has real routes to guard.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::auth::Principal;
use crate::presentation::middleware::GateState;
use crate::presentation::models::{
    ApiIndexResponse, CommandExecution, CommandRequest, ConfigureRequest, ErrorBody,
    HealthResponse, SuccessBody,
};

pub const SERVICE_NAME: &str = "C6Group.AI OS - SUPERAAI Control System";

const KNOWN_AGENTS: &[&str] = &["architect", "executor", "observer"];
const KNOWN_COMMANDS: &[&str] = &["start", "stop", "pause", "restart", "status", "configure"];

/// Application state shared by route handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gate: GateState,
    pub started_at: Instant,
}

/// GET /health - Liveness probe, unauthenticated
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: SERVICE_NAME.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// GET /api - API index, rate limited but unauthenticated
#[utoipa::path(
    get,
    path = "/api",
    responses(
        (status = 200, description = "API index", body = ApiIndexResponse),
        (status = 429, description = "Rate limit exceeded")
    ),
    tag = "system"
)]
pub async fn api_index() -> Json<ApiIndexResponse> {
    Json(ApiIndexResponse {
        name: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Control plane API for the SUPERAAI agent dashboard".to_string(),
        endpoints: json!({
            "health": "GET /health",
            "agents": {
                "status": "GET /api/agents/status",
                "command": "POST /api/agents/{agentId}/command",
            },
            "system": {
                "health": "GET /api/system/health",
                "info": "GET /api/system/info",
                "configure": "POST /api/system/configure",
            },
        }),
        documentation: "/api-docs/openapi.json".to_string(),
    })
}

/// GET /api/agents/status - Status of the three core agents
#[utoipa::path(
    get,
    path = "/api/agents/status",
    responses(
        (status = 200, description = "Agent status summary", body = SuccessBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded")
    ),
    tag = "agents",
    security(("bearer_auth" = []))
)]
pub async fn agents_status() -> Json<SuccessBody> {
    Json(SuccessBody::new(json!({
        "agents": [
            { "id": "architect", "name": "Architect", "status": "online" },
            { "id": "executor", "name": "Executor", "status": "online" },
            { "id": "observer", "name": "Observer", "status": "online" },
        ],
        "timestamp": Utc::now(),
    })))
}

/// POST /api/agents/{agent_id}/command - Dispatch a command to an agent
#[utoipa::path(
    post,
    path = "/api/agents/{agent_id}/command",
    params(
        ("agent_id" = String, Path, description = "Agent identifier")
    ),
    request_body = CommandRequest,
    responses(
        (status = 200, description = "Command accepted", body = SuccessBody),
        (status = 400, description = "Unknown command", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Unknown agent", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded")
    ),
    tag = "agents",
    security(("bearer_auth" = []))
)]
pub async fn agent_command(
    Path(agent_id): Path<String>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<SuccessBody>, (StatusCode, Json<ErrorBody>)> {
    if !KNOWN_AGENTS.contains(&agent_id.as_str()) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorBody::new(
                "Agent not found",
                format!("Unknown agent: {agent_id}"),
            )),
        ));
    }

    if !KNOWN_COMMANDS.contains(&request.command.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(
                "Invalid command",
                format!("Unknown command: {}", request.command),
            )),
        ));
    }

    let execution = CommandExecution {
        command_id: Uuid::new_v4(),
        agent_id,
        command: request.command,
        parameters: request.parameters,
        status: "initiated".to_string(),
        start_time: Utc::now(),
        executed_by: principal.id,
    };

    tracing::info!(
        command_id = %execution.command_id,
        agent_id = %execution.agent_id,
        command = %execution.command,
        executed_by = %execution.executed_by,
        "agent command accepted"
    );

    let data = serde_json::to_value(&execution).map_err(|e| {
        tracing::error!(error = %e, command_id = %execution.command_id, "failed to encode command execution");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(
                "Internal server error",
                "Failed to encode command execution",
            )),
        )
    })?;

    Ok(Json(SuccessBody::new(data)))
}

/// GET /api/system/health - Detailed system health document
#[utoipa::path(
    get,
    path = "/api/system/health",
    responses(
        (status = 200, description = "System health", body = SuccessBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded")
    ),
    tag = "system",
    security(("bearer_auth" = []))
)]
pub async fn system_health(State(state): State<AppState>) -> Json<SuccessBody> {
    Json(SuccessBody::new(json!({
        "status": "operational",
        "uptimeSeconds": state.started_at.elapsed().as_secs(),
        "components": {
            "gateway": "healthy",
            "agents": "healthy",
        },
        "timestamp": Utc::now(),
    })))
}

/// GET /api/system/info - Service build and environment information
#[utoipa::path(
    get,
    path = "/api/system/info",
    responses(
        (status = 200, description = "System information", body = SuccessBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded")
    ),
    tag = "system",
    security(("bearer_auth" = []))
)]
pub async fn system_info(State(state): State<AppState>) -> Json<SuccessBody> {
    Json(SuccessBody::new(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "timestamp": Utc::now(),
    })))
}

/// POST /api/system/configure - Update a configuration section (admin only)
#[utoipa::path(
    post,
    path = "/api/system/configure",
    request_body = ConfigureRequest,
    responses(
        (status = 200, description = "Configuration accepted", body = SuccessBody),
        (status = 400, description = "Invalid section", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded")
    ),
    tag = "system",
    security(("bearer_auth" = []))
)]
pub async fn system_configure(
    Extension(principal): Extension<Principal>,
    Json(request): Json<ConfigureRequest>,
) -> Result<Json<SuccessBody>, (StatusCode, Json<ErrorBody>)> {
    if request.section.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(
                "Invalid section",
                "Configuration section must not be empty",
            )),
        ));
    }

    tracing::info!(
        section = %request.section,
        updated_by = %principal.id,
        "configuration update accepted"
    );

    Ok(Json(SuccessBody::new(json!({
        "section": request.section,
        "settings": request.settings,
        "status": "accepted",
        "updatedBy": principal.id,
        "timestamp": Utc::now(),
    }))))
}
