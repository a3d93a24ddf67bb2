//! Rate limiter types and core data structures

use serde::{Deserialize, Serialize};

/// Per-key rolling counter.
///
/// Created on the first request from a key, incremented within the window,
/// and replaced (never mutated back to zero) when the window rolls over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaRecord {
    /// Requests counted in the current window
    pub count: u32,
    /// Absolute time (ms since epoch) when the window expires
    pub reset_at_ms: u64,
    /// Absolute time (ms since epoch) when the window opened
    pub window_start_ms: u64,
}

/// Window configuration for one limiter instance
#[derive(Debug, Clone, Copy)]
pub struct QuotaConfig {
    /// Window duration in milliseconds
    pub window_ms: u64,
    /// Maximum requests admitted per window
    pub max_requests: u32,
}

impl QuotaConfig {
    /// Default API quota: 100 requests per 15 minutes
    pub fn standard() -> Self {
        Self {
            window_ms: 15 * 60 * 1000,
            max_requests: 100,
        }
    }

    /// Strict quota for sensitive endpoints: 5 requests per minute
    pub fn strict() -> Self {
        Self {
            window_ms: 60 * 1000,
            max_requests: 5,
        }
    }
}

/// Result of a quota check
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request is admitted
    pub allowed: bool,
    /// Maximum requests allowed in the window
    pub limit: u32,
    /// Remaining requests in the window (saturating at 0)
    pub remaining: u32,
    /// Absolute time (ms since epoch) when the window resets
    pub reset_at_ms: u64,
    /// Seconds until reset; only set when blocked
    pub retry_after_secs: Option<u64>,
    /// Window duration in milliseconds, for client backoff guidance
    pub window_ms: u64,
}

impl RateLimitResult {
    pub fn allowed(limit: u32, remaining: u32, reset_at_ms: u64, window_ms: u64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining,
            reset_at_ms,
            retry_after_secs: None,
            window_ms,
        }
    }

    pub fn blocked(limit: u32, reset_at_ms: u64, retry_after_secs: u64, window_ms: u64) -> Self {
        Self {
            allowed: false,
            limit,
            remaining: 0,
            reset_at_ms,
            retry_after_secs: Some(retry_after_secs),
            window_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_allowed() {
        let result = RateLimitResult::allowed(100, 57, 1_700_000_000_000, 900_000);
        assert!(result.allowed);
        assert_eq!(result.remaining, 57);
        assert!(result.retry_after_secs.is_none());
    }

    #[test]
    fn test_result_blocked() {
        let result = RateLimitResult::blocked(5, 1_700_000_060_000, 60, 60_000);
        assert!(!result.allowed);
        assert_eq!(result.remaining, 0);
        assert_eq!(result.retry_after_secs, Some(60));
    }

    #[test]
    fn test_quota_presets() {
        assert_eq!(QuotaConfig::standard().max_requests, 100);
        assert_eq!(QuotaConfig::standard().window_ms, 900_000);
        assert_eq!(QuotaConfig::strict().max_requests, 5);
        assert_eq!(QuotaConfig::strict().window_ms, 60_000);
    }
}
