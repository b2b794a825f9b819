//! Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries and
//! forgets rate-limiter users that have gone idle.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheManager;
use crate::ratelimit::RateLimiter;

/// Spawns a background task that periodically runs both sweeps.
///
/// # Arguments
/// * `cache` - Shared cache manager
/// * `limiter` - Shared rate limiter
/// * `cleanup_interval_secs` - Seconds between runs, at least 1
/// * `idle_secs` - Limiter users idle longer than this are dropped
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(
    cache: Arc<CacheManager>,
    limiter: Arc<RateLimiter>,
    cleanup_interval_secs: u64,
    idle_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let expired = cache.cleanup();
            let stale_users = limiter.cleanup_stale_users(idle_secs);

            if expired > 0 || stale_users > 0 {
                info!(
                    expired,
                    stale_users, "cleanup: removed expired entries and idle users"
                );
            } else {
                debug!("cleanup: nothing to remove");
            }
        }
    })
}
