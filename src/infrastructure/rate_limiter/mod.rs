//! Rate limiting infrastructure
//!
//! Sliding-window request quotas held in process memory. Each limiter owns
//! its own table, so the default and strict limiters can never collide on a
//! key. State is per-instance; a multi-instance deployment needs a shared
//! counter store, which is a deliberate non-goal here.

pub mod clock;
pub mod sliding_window;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use sliding_window::SlidingWindowLimiter;
pub use types::{QuotaConfig, QuotaRecord, RateLimitResult};
