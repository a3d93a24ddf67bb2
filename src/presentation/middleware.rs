//! HTTP middleware for the access gate
//!
//! Request order on gated routes: authentication (principal or 401), then
//! the default quota, then any route-level guards (strict quota, role).

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::application::auth::{AuthenticateUseCase, authorize_role};
use crate::domain::auth::{AuthError, Principal, Role};
use crate::infrastructure::rate_limiter::{RateLimitResult, SlidingWindowLimiter};
use crate::presentation::models::{ErrorBody, RateLimitErrorBody, RateLimitErrorDetail};

/// Shared state for the gate middleware.
///
/// Owns the quota tables (via the limiter handles) and the verifier chain;
/// constructed once at startup and injected into the request path, never a
/// module-level singleton.
#[derive(Clone)]
pub struct GateState {
    pub authenticate: Arc<AuthenticateUseCase>,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub strict_limiter: Arc<SlidingWindowLimiter>,
    pub rate_limit_enabled: bool,
}

impl std::fmt::Debug for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateState")
            .field("rate_limit_enabled", &self.rate_limit_enabled)
            .finish()
    }
}

/// Convert a gate error to its wire response
pub fn auth_error_response(error: &AuthError) -> Response {
    let (status, body) = match error {
        AuthError::AuthenticationRequired => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new(
                "Authentication required",
                "Please provide a valid authorization token",
            ),
        ),
        AuthError::InvalidToken => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new(
                "Invalid token",
                "The provided authentication token is invalid or expired",
            ),
        ),
        AuthError::InsufficientPermissions { required } => (
            StatusCode::FORBIDDEN,
            ErrorBody::new(
                "Insufficient permissions",
                format!("This endpoint requires {} role or higher", required),
            ),
        ),
    };
    (status, Json(body)).into_response()
}

/// Authentication middleware: resolves a principal or terminates with 401
pub async fn auth_middleware(
    State(state): State<GateState>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    match state.authenticate.execute(authorization.as_deref()).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(error = %e, uri = %request.uri(), "authentication rejected");
            auth_error_response(&e)
        }
    }
}

/// Route-level role requirement
#[derive(Debug, Clone, Copy)]
pub struct RoleGuard {
    pub required: Role,
}

impl RoleGuard {
    pub fn new(required: Role) -> Self {
        Self { required }
    }
}

/// Role authorization middleware, mounted per route after authentication
pub async fn require_role_middleware(
    State(guard): State<RoleGuard>,
    request: Request,
    next: Next,
) -> Response {
    let principal = request.extensions().get::<Principal>();
    if let Err(e) = authorize_role(principal, guard.required) {
        tracing::warn!(
            error = %e,
            required = %guard.required,
            uri = %request.uri(),
            "authorization rejected"
        );
        return auth_error_response(&e);
    }
    next.run(request).await
}

/// Derive the quota key: principal id when authenticated, client network
/// origin otherwise. `None` means no limiting is possible.
fn quota_key(request: &Request) -> Option<String> {
    if let Some(principal) = request.extensions().get::<Principal>() {
        return Some(principal.id.clone());
    }
    extract_ip(request)
}

/// Extract the client IP from proxy headers
pub fn extract_ip(request: &Request) -> Option<String> {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
        })
}

/// Attach quota metadata to a response. When two limiters guard one route
/// the innermost sets its headers first and the outer one leaves them alone.
fn add_rate_limit_headers(response: &mut Response, result: &RateLimitResult) {
    let headers = response.headers_mut();
    if headers.contains_key("x-ratelimit-limit") {
        return;
    }
    headers.insert("x-ratelimit-limit", HeaderValue::from(result.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(result.remaining));

    if let Some(reset) = Utc.timestamp_millis_opt(result.reset_at_ms as i64).single()
        && let Ok(value) = HeaderValue::from_str(&reset.to_rfc3339())
    {
        headers.insert("x-ratelimit-reset", value);
    }
}

fn quota_rejection(result: &RateLimitResult, strict: bool) -> Response {
    let retry_after = result.retry_after_secs.unwrap_or(0);

    let detail = if strict {
        RateLimitErrorDetail {
            code: "STRICT_RATE_LIMIT_EXCEEDED".to_string(),
            message: "Too many requests to sensitive endpoint".to_string(),
            status: StatusCode::TOO_MANY_REQUESTS.as_u16(),
            retry_after,
            limit: None,
            window_ms: None,
        }
    } else {
        RateLimitErrorDetail {
            code: "RATE_LIMIT_EXCEEDED".to_string(),
            message: "Too many requests".to_string(),
            status: StatusCode::TOO_MANY_REQUESTS.as_u16(),
            retry_after,
            limit: Some(result.limit),
            window_ms: Some(result.window_ms),
        }
    };

    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(RateLimitErrorBody { error: detail }),
    )
        .into_response();

    add_rate_limit_headers(&mut response, result);
    if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
        response.headers_mut().insert("retry-after", value);
    }
    response
}

async fn enforce_quota(
    limiter: &SlidingWindowLimiter,
    enabled: bool,
    strict: bool,
    request: Request,
    next: Next,
) -> Response {
    if !enabled {
        return next.run(request).await;
    }

    // No derivable key means no limiting is possible; admit unconditionally
    let Some(key) = quota_key(&request) else {
        return next.run(request).await;
    };

    // Synchronous read-modify-write: no await between the count and the verdict
    let result = limiter.check(&key);

    if !result.allowed {
        tracing::warn!(
            key = %key,
            strict,
            retry_after = result.retry_after_secs.unwrap_or(0),
            "rate limit exceeded"
        );
        return quota_rejection(&result, strict);
    }

    let mut response = next.run(request).await;
    add_rate_limit_headers(&mut response, &result);
    response
}

/// Default quota middleware applied to every API route
pub async fn rate_limit_middleware(
    State(state): State<GateState>,
    request: Request,
    next: Next,
) -> Response {
    enforce_quota(
        &state.limiter,
        state.rate_limit_enabled,
        false,
        request,
        next,
    )
    .await
}

/// Strict quota middleware for sensitive endpoints; keeps its own table so
/// default and strict counters never share keys
pub async fn strict_rate_limit_middleware(
    State(state): State<GateState>,
    request: Request,
    next: Next,
) -> Response {
    enforce_quota(
        &state.strict_limiter,
        state.rate_limit_enabled,
        true,
        request,
        next,
    )
    .await
}

/// Request logging middleware with timing and request id
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = Uuid::new_v4();
    let start_time = Instant::now();

    tracing::debug!(request_id = %request_id, method = %method, uri = %uri, "processing request");

    let response = next.run(request).await;
    let duration = start_time.elapsed();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "request completed"
    );

    response
}

/// Security headers middleware
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_headers(pairs: &[(&str, &str)]) -> Request {
        let mut builder = Request::builder().uri("/api/agents/status");
        for (name, value) in pairs {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_ip_prefers_forwarded_for() {
        let request =
            request_with_headers(&[("x-forwarded-for", "10.0.0.1, 10.0.0.2"), ("x-real-ip", "9.9.9.9")]);
        assert_eq!(extract_ip(&request).as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_extract_ip_falls_back_to_real_ip() {
        let request = request_with_headers(&[("x-real-ip", "9.9.9.9")]);
        assert_eq!(extract_ip(&request).as_deref(), Some("9.9.9.9"));
    }

    #[test]
    fn test_extract_ip_absent() {
        let request = request_with_headers(&[]);
        assert_eq!(extract_ip(&request), None);
    }

    #[test]
    fn test_quota_key_prefers_principal() {
        let mut request = request_with_headers(&[("x-real-ip", "9.9.9.9")]);
        request.extensions_mut().insert(Principal::development());
        assert_eq!(quota_key(&request).as_deref(), Some("dev-user"));
    }
}
