//! API request and response models
//!
//! Wire shapes are stable contracts: clients branch on the `error` string of
//! simple failures and on `error.code` of quota failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Simple error body used for authentication, authorization, validation,
/// and not-found failures
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Stable error discriminator
    #[schema(example = "Authentication required")]
    pub error: String,
    /// Human-readable explanation
    #[schema(example = "Please provide a valid authorization token")]
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Envelope for quota rejections
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RateLimitErrorBody {
    pub error: RateLimitErrorDetail,
}

/// Quota rejection detail, camel-cased on the wire
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitErrorDetail {
    /// `RATE_LIMIT_EXCEEDED` or `STRICT_RATE_LIMIT_EXCEEDED`
    #[schema(example = "RATE_LIMIT_EXCEEDED")]
    pub code: String,
    #[schema(example = "Too many requests")]
    pub message: String,
    /// HTTP status, repeated in the body for programmatic clients
    #[schema(example = 429)]
    pub status: u16,
    /// Seconds until the window resets
    #[schema(example = 60)]
    pub retry_after: u64,
    /// Window maximum (omitted for the strict limiter)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Window duration in milliseconds (omitted for the strict limiter)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_ms: Option<u64>,
}

/// Success envelope wrapping all data responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessBody {
    #[schema(example = true)]
    pub success: bool,
    pub data: Value,
}

impl SuccessBody {
    pub fn new(data: Value) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Service health document
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[schema(example = "1.0.0")]
    pub version: String,
    #[schema(example = "C6Group.AI OS - SUPERAAI Control System")]
    pub service: String,
    pub uptime_seconds: u64,
}

/// API index document
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiIndexResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Value,
    pub documentation: String,
}

/// Command submitted to an agent
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommandRequest {
    /// One of start, stop, pause, restart, status, configure
    #[schema(example = "restart")]
    pub command: String,
    /// Free-form command parameters
    #[serde(default)]
    pub parameters: Value,
}

/// Record of an accepted agent command
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommandExecution {
    pub command_id: uuid::Uuid,
    #[schema(example = "executor")]
    pub agent_id: String,
    #[schema(example = "restart")]
    pub command: String,
    pub parameters: Value,
    #[schema(example = "initiated")]
    pub status: String,
    pub start_time: DateTime<Utc>,
    /// Principal that issued the command
    pub executed_by: String,
}

/// System configuration change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfigureRequest {
    /// Configuration section being updated
    #[schema(example = "monitoring")]
    pub section: String,
    /// Section settings
    pub settings: Value,
}
