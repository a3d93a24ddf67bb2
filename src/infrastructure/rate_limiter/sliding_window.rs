//! Sliding-window request limiter
//!
//! One record per key holding a count and an absolute reset time; the window
//! opens on the first request and resets a full window duration later. The
//! read-modify-write on a record happens under one lock acquisition with no
//! suspension point inside, so concurrent requests cannot interleave between
//! the read and the write.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::clock::{Clock, SystemClock};
use super::types::{QuotaConfig, QuotaRecord, RateLimitResult};

/// In-process sliding-window limiter.
///
/// Owns its quota table outright; construct one per scope (default, strict)
/// and share it by handle. Expired records are dropped opportunistically on
/// every check to bound memory growth.
pub struct SlidingWindowLimiter {
    table: Mutex<HashMap<String, QuotaRecord>>,
    config: QuotaConfig,
    clock: Arc<dyn Clock>,
}

impl SlidingWindowLimiter {
    pub fn new(config: QuotaConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Construct with an explicit time source (tests use a manual clock)
    pub fn with_clock(config: QuotaConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Mutex::new(HashMap::new()),
            config,
            clock,
        }
    }

    pub fn config(&self) -> QuotaConfig {
        self.config
    }

    /// Count a request against `key` and decide admission.
    pub fn check(&self, key: &str) -> RateLimitResult {
        let now = self.clock.now_ms();
        let QuotaConfig {
            window_ms,
            max_requests,
        } = self.config;

        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());

        // Opportunistic cleanup keeps idle keys from accumulating
        table.retain(|_, record| record.reset_at_ms > now);

        let record = table
            .entry(key.to_string())
            .and_modify(|record| record.count += 1)
            .or_insert_with(|| QuotaRecord {
                count: 1,
                reset_at_ms: now + window_ms,
                window_start_ms: now,
            });

        if record.count > max_requests {
            let retry_after_secs = record.reset_at_ms.saturating_sub(now).div_ceil(1000);
            tracing::debug!(
                key,
                count = record.count,
                limit = max_requests,
                retry_after_secs,
                "request rejected by quota"
            );
            return RateLimitResult::blocked(
                max_requests,
                record.reset_at_ms,
                retry_after_secs,
                window_ms,
            );
        }

        RateLimitResult::allowed(
            max_requests,
            max_requests.saturating_sub(record.count),
            record.reset_at_ms,
            window_ms,
        )
    }

    /// Number of live records (diagnostics and tests)
    pub fn tracked_keys(&self) -> usize {
        self.table.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
