//! Fixed-window request counters keyed by client and route.
//!
//! # Responsibilities
//! - Track admitted requests per (client key, route) pair
//! - Decide admit/reject against the rule bound to the route
//! - Evict entries whose window has elapsed
//!
//! # Design Decisions
//! - Check-then-increment runs under the DashMap shard write lock, so
//!   concurrent callers on one key can never over-admit
//! - Entries are created lazily on first use
//! - State lives in process memory only; a restart resets every quota

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::clock::Clock;
use crate::security::rule::RateLimitRule;

/// Partition key for one counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LimitKey {
    client: String,
    route: String,
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    window_start: Instant,
    window: Duration,
}

impl WindowEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.window_start) > self.window
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Request may proceed; `remaining` admissions are left in this window.
    Admit { remaining: u32 },
    /// Quota exhausted until the window resets.
    Reject {
        limit: RateLimitRule,
        retry_after: Duration,
    },
}

impl Decision {
    pub fn is_admit(&self) -> bool {
        matches!(self, Decision::Admit { .. })
    }
}

/// In-memory fixed-window rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    entries: DashMap<LimitKey, WindowEntry>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Check and, on admission, count one request from `client_key` to `route`.
    pub fn check(&self, client_key: &str, route: &str, rule: &RateLimitRule) -> Decision {
        let key = LimitKey {
            client: client_key.to_string(),
            route: route.to_string(),
        };

        // Holding the entry guard keeps the shard locked for the whole step.
        let now = self.clock.now();
        let mut entry = self.entries.entry(key).or_insert(WindowEntry {
            count: 0,
            window_start: now,
            window: rule.window(),
        });

        if entry.is_expired(now) {
            *entry = WindowEntry {
                count: 0,
                window_start: now,
                window: rule.window(),
            };
        }

        if entry.count < rule.max_requests() {
            entry.count += 1;
            Decision::Admit {
                remaining: rule.max_requests() - entry.count,
            }
        } else {
            let elapsed = now.saturating_duration_since(entry.window_start);
            Decision::Reject {
                limit: *rule,
                retry_after: entry.window.saturating_sub(elapsed),
            }
        }
    }

    /// Drop every entry whose window has elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of tracked (client, route) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, MonotonicClock};
    use std::thread;

    fn limiter_with_clock() -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (RateLimiter::new(clock.clone()), clock)
    }

    #[test]
    fn test_admits_up_to_max_then_rejects() {
        let (limiter, _) = limiter_with_clock();
        let rule = RateLimitRule::per_minute(2);

        assert_eq!(limiter.check("10.0.0.1", "/", &rule), Decision::Admit { remaining: 1 });
        assert_eq!(limiter.check("10.0.0.1", "/", &rule), Decision::Admit { remaining: 0 });

        match limiter.check("10.0.0.1", "/", &rule) {
            Decision::Reject { limit, retry_after } => {
                assert_eq!(limit, rule);
                assert_eq!(retry_after, Duration::from_secs(60));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let (limiter, clock) = limiter_with_clock();
        let rule = RateLimitRule::per_minute(2);

        assert!(limiter.check("a", "/", &rule).is_admit());
        clock.advance(Duration::from_secs(30));
        assert!(limiter.check("a", "/", &rule).is_admit());
        assert!(!limiter.check("a", "/", &rule).is_admit());

        // Exactly one window later is still inside it.
        clock.advance(Duration::from_secs(30));
        assert!(!limiter.check("a", "/", &rule).is_admit());

        clock.advance(Duration::from_millis(1));
        assert_eq!(limiter.check("a", "/", &rule), Decision::Admit { remaining: 1 });
    }

    #[test]
    fn test_retry_after_shrinks_as_window_ages() {
        let (limiter, clock) = limiter_with_clock();
        let rule = RateLimitRule::per_minute(1);

        assert!(limiter.check("a", "/", &rule).is_admit());
        clock.advance(Duration::from_secs(45));
        match limiter.check("a", "/", &rule) {
            Decision::Reject { retry_after, .. } => assert_eq!(retry_after, Duration::from_secs(15)),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_counters_are_partitioned_by_client_and_route() {
        let (limiter, _) = limiter_with_clock();
        let rule = RateLimitRule::per_minute(1);

        assert!(limiter.check("a", "/", &rule).is_admit());
        assert!(!limiter.check("a", "/", &rule).is_admit());

        assert!(limiter.check("b", "/", &rule).is_admit());
        assert!(limiter.check("a", "/items/{item_id}", &rule).is_admit());
        assert_eq!(limiter.len(), 3);
    }

    #[test]
    fn test_purge_expired_keeps_live_windows() {
        let (limiter, clock) = limiter_with_clock();

        limiter.check("a", "/", &RateLimitRule::per_second(5));
        limiter.check("b", "/", &RateLimitRule::per_minute(5));
        assert_eq!(limiter.purge_expired(), 0);

        clock.advance(Duration::from_secs(2));
        assert_eq!(limiter.purge_expired(), 1);
        assert_eq!(limiter.len(), 1);

        clock.advance(Duration::from_secs(60));
        assert_eq!(limiter.purge_expired(), 1);
        assert!(limiter.is_empty());
    }

    #[test]
    fn test_concurrent_checks_never_over_admit() {
        let limiter = Arc::new(RateLimiter::new(Arc::new(MonotonicClock)));
        let rule = RateLimitRule::per_minute(5);

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let limiter = limiter.clone();
                thread::spawn(move || limiter.check("shared", "/items/{item_id}", &rule).is_admit())
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|admitted| *admitted)
            .count();
        assert_eq!(admitted, 5);
    }
}
