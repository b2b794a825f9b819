//! Rate Limiter Module
//!
//! Per-user and per-(user, action) sliding-window limits with a shared,
//! cooldown-suppressed "slow down" alert.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::ratelimit::SlidingWindow;

/// Chat user identifier.
pub type UserId = i64;

/// Minimum spacing between two visible alerts for the same user.
pub const ALERT_COOLDOWN: Duration = Duration::from_secs(10);

// == Decision ==
/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Whole seconds until a slot frees up, `0` when allowed
    pub retry_after_secs: u64,
    /// Whether the caller should tell the user they are being throttled
    pub show_alert: bool,
}

impl RateLimitDecision {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            retry_after_secs: 0,
            show_alert: false,
        }
    }

    pub fn denied(retry_after_secs: u64, show_alert: bool) -> Self {
        Self {
            allowed: false,
            retry_after_secs,
            show_alert,
        }
    }
}

impl From<RateLimitDecision> for (bool, u64, bool) {
    fn from(decision: RateLimitDecision) -> Self {
        (
            decision.allowed,
            decision.retry_after_secs,
            decision.show_alert,
        )
    }
}

// == Stats ==
/// Diagnostic snapshot for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserLimitStats {
    pub user_id: UserId,
    /// Requests recorded in the general window
    pub general_requests: usize,
    /// Requests recorded per action
    pub action_requests: BTreeMap<String, usize>,
    pub last_alert_secs_ago: Option<f64>,
}

/// Aggregate view over every tracked user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LimiterSummary {
    pub tracked_users: usize,
    pub tracked_actions: usize,
    pub alerted_users: usize,
}

#[derive(Debug, Default)]
struct LimiterState {
    general: HashMap<UserId, SlidingWindow>,
    actions: HashMap<UserId, HashMap<String, SlidingWindow>>,
    last_alert: HashMap<UserId, Instant>,
}

impl LimiterState {
    /// Applies the cooldown rule and stamps the alert when it fires.
    fn should_alert(&mut self, user_id: UserId, now: Instant) -> bool {
        let due = match self.last_alert.get(&user_id) {
            Some(last) => now.saturating_duration_since(*last) >= ALERT_COOLDOWN,
            None => true,
        };
        if due {
            self.last_alert.insert(user_id, now);
        }
        due
    }

    /// Newest request stamp across the user's general and action windows.
    ///
    /// Alert stamps are not activity: a denial records no request.
    fn latest_activity(&self, user_id: UserId) -> Option<Instant> {
        let general = self.general.get(&user_id).and_then(SlidingWindow::latest);
        let actions = self
            .actions
            .get(&user_id)
            .and_then(|per_action| per_action.values().filter_map(SlidingWindow::latest).max());
        general.max(actions)
    }

    fn remove_user(&mut self, user_id: UserId) {
        self.general.remove(&user_id);
        self.actions.remove(&user_id);
        self.last_alert.remove(&user_id);
    }
}

// == Rate Limiter ==
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<LimiterState>,
    clock: Arc<dyn Clock>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    // == Constructor ==
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(LimiterState::default()),
            clock,
        }
    }

    // == Check Rate Limit ==
    /// Checks the user's general limit of `max_requests` per `window_seconds`.
    ///
    /// `max_requests == 0` always denies; `window_seconds == 0` is treated as 1.
    pub fn check_rate_limit(
        &self,
        user_id: UserId,
        max_requests: u32,
        window_seconds: u64,
    ) -> RateLimitDecision {
        let now = self.clock.now();
        let window_len = window_duration(window_seconds);
        let mut state = self.state.lock();

        let window = state.general.entry(user_id).or_default();
        match admit(window, now, max_requests, window_len) {
            Ok(()) => RateLimitDecision::allowed(),
            Err(retry_after) => {
                let show_alert = state.should_alert(user_id, now);
                debug!(user_id, retry_after, show_alert, "general rate limit hit");
                RateLimitDecision::denied(retry_after, show_alert)
            }
        }
    }

    // == Check Action Limit ==
    /// Checks a per-action limit, independent of the general window.
    ///
    /// Denials share the user's alert cooldown with the general limiter.
    pub fn check_action_limit(
        &self,
        user_id: UserId,
        action: &str,
        max_requests: u32,
        window_seconds: u64,
    ) -> RateLimitDecision {
        let now = self.clock.now();
        let window_len = window_duration(window_seconds);
        let mut state = self.state.lock();

        let window = state
            .actions
            .entry(user_id)
            .or_default()
            .entry(action.to_string())
            .or_default();
        match admit(window, now, max_requests, window_len) {
            Ok(()) => RateLimitDecision::allowed(),
            Err(retry_after) => {
                let show_alert = state.should_alert(user_id, now);
                debug!(user_id, action, retry_after, show_alert, "action rate limit hit");
                RateLimitDecision::denied(retry_after, show_alert)
            }
        }
    }

    // == Reset User ==
    /// Forgets all history and the alert stamp for `user_id`.
    pub fn reset_user(&self, user_id: UserId) {
        self.state.lock().remove_user(user_id);
        info!(user_id, "rate limit state reset");
    }

    // == Cleanup ==
    /// Drops users whose latest activity is more than `idle_seconds` old.
    ///
    /// Returns the number of users removed.
    pub fn cleanup_stale_users(&self, idle_seconds: u64) -> usize {
        let now = self.clock.now();
        let idle = Duration::from_secs(idle_seconds);
        let mut state = self.state.lock();

        let mut users: Vec<UserId> = state.general.keys().copied().collect();
        users.extend(state.actions.keys().copied());
        users.extend(state.last_alert.keys().copied());
        users.sort_unstable();
        users.dedup();

        let stale: Vec<UserId> = users
            .into_iter()
            .filter(|user_id| match state.latest_activity(*user_id) {
                Some(latest) => now.saturating_duration_since(latest) > idle,
                None => true,
            })
            .collect();

        for user_id in &stale {
            state.remove_user(*user_id);
        }
        stale.len()
    }

    // == Stats ==
    /// Stored request counts for `user_id`.
    ///
    /// Windows are only pruned when they are checked, so each count reflects the
    /// window as of its last check and may include stamps that have since aged
    /// out. Counts drop on the next check or when the user is cleaned up.
    pub fn get_stats(&self, user_id: UserId) -> UserLimitStats {
        let now = self.clock.now();
        let state = self.state.lock();

        let action_requests = state
            .actions
            .get(&user_id)
            .map(|per_action| {
                per_action
                    .iter()
                    .map(|(action, window)| (action.clone(), window.len()))
                    .collect()
            })
            .unwrap_or_default();

        UserLimitStats {
            user_id,
            general_requests: state.general.get(&user_id).map_or(0, SlidingWindow::len),
            action_requests,
            last_alert_secs_ago: state
                .last_alert
                .get(&user_id)
                .map(|last| now.saturating_duration_since(*last).as_secs_f64()),
        }
    }

    /// Counts tracked users, action windows and users with an alert stamp.
    pub fn summary(&self) -> LimiterSummary {
        let state = self.state.lock();
        let mut users: Vec<UserId> = state.general.keys().copied().collect();
        users.extend(state.actions.keys().copied());
        users.sort_unstable();
        users.dedup();

        LimiterSummary {
            tracked_users: users.len(),
            tracked_actions: state.actions.values().map(HashMap::len).sum(),
            alerted_users: state.last_alert.len(),
        }
    }
}

fn window_duration(window_seconds: u64) -> Duration {
    Duration::from_secs(window_seconds.max(1))
}

/// Prunes `window` and records a request if there is room.
///
/// On denial returns the whole seconds until the oldest request slides out,
/// at least 1.
fn admit(
    window: &mut SlidingWindow,
    now: Instant,
    max_requests: u32,
    window_len: Duration,
) -> Result<(), u64> {
    window.prune(now, window_len);

    if window.len() < max_requests as usize {
        window.record(now);
        return Ok(());
    }

    let remaining = match window.oldest() {
        Some(oldest) => window_len.saturating_sub(now.saturating_duration_since(oldest)),
        None => window_len,
    };
    let mut secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs += 1;
    }
    Err(secs.max(1))
}
