//! Storefront Guard - resource bounding for a chat storefront bot
//!
//! Provides a memory- and size-bounded TTL/LRU cache in front of the shop's
//! data store and a sliding-window rate limiter for user actions.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod ratelimit;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheManager;
pub use config::Config;
pub use ratelimit::RateLimiter;
pub use tasks::spawn_cleanup_task;
