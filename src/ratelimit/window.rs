//! Sliding Window Module
//!
//! Time-ordered request log backing each rate-limit key.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

// == Sliding Window ==
/// Request timestamps for one limiter key.
///
/// Timestamps are kept in ascending order:
/// - Front = Oldest request
/// - Back = Newest request
#[derive(Debug, Default, Clone)]
pub struct SlidingWindow {
    stamps: VecDeque<Instant>,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self {
            stamps: VecDeque::new(),
        }
    }

    // == Prune ==
    /// Drops every timestamp that has aged a full `window` or more at `now`.
    pub fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(oldest) = self.stamps.front() {
            if now.saturating_duration_since(*oldest) >= window {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
    }

    // == Record ==
    /// Appends a request at `now`.
    pub fn record(&mut self, now: Instant) {
        self.stamps.push_back(now);
    }

    pub fn oldest(&self) -> Option<Instant> {
        self.stamps.front().copied()
    }

    pub fn latest(&self) -> Option<Instant> {
        self.stamps.back().copied()
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_new() {
        let window = SlidingWindow::new();
        assert!(window.is_empty());
        assert_eq!(window.oldest(), None);
        assert_eq!(window.latest(), None);
    }

    #[test]
    fn test_record_keeps_order() {
        let t0 = Instant::now();
        let mut window = SlidingWindow::new();
        window.record(t0);
        window.record(t0 + Duration::from_secs(1));
        window.record(t0 + Duration::from_secs(2));

        assert_eq!(window.len(), 3);
        assert_eq!(window.oldest(), Some(t0));
        assert_eq!(window.latest(), Some(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn test_prune_drops_only_old_stamps() {
        let t0 = Instant::now();
        let mut window = SlidingWindow::new();
        for secs in [0, 10, 20, 30] {
            window.record(t0 + Duration::from_secs(secs));
        }

        window.prune(t0 + Duration::from_secs(40), Duration::from_secs(20));

        // A stamp exactly one window old has slid out
        assert_eq!(window.len(), 1);
        assert_eq!(window.oldest(), Some(t0 + Duration::from_secs(30)));
    }

    #[test]
    fn test_prune_everything() {
        let t0 = Instant::now();
        let mut window = SlidingWindow::new();
        window.record(t0);
        window.prune(t0 + Duration::from_secs(120), Duration::from_secs(60));
        assert!(window.is_empty());
    }
}
