//! Rate Limiting Module
//!
//! Sliding-window request limits per user and per user action.

mod limiter;
mod window;

pub use limiter::{
    LimiterSummary, RateLimitDecision, RateLimiter, UserId, UserLimitStats, ALERT_COOLDOWN,
};
pub use window::SlidingWindow;
