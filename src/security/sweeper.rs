//! Background eviction of expired rate limit windows.
//!
//! # Responsibilities
//! - Periodically drop counters whose window has elapsed
//! - Exit on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::security::limiter::RateLimiter;

pub struct Sweeper {
    limiter: Arc<RateLimiter>,
    interval: Duration,
}

impl Sweeper {
    pub fn new(limiter: Arc<RateLimiter>, interval: Duration) -> Self {
        Self { limiter, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Limiter sweeper starting");

        let mut ticker = time::interval(self.interval);
        // The first tick completes immediately; nothing to purge yet.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = self.limiter.purge_expired();
                    if purged > 0 {
                        tracing::debug!(purged, remaining = self.limiter.len(), "Evicted idle rate limit windows");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Limiter sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::security::rule::RateLimitRule;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_then_stops_on_shutdown() {
        let clock = Arc::new(ManualClock::new());
        let limiter = Arc::new(RateLimiter::new(clock.clone()));
        limiter.check("a", "/", &RateLimitRule::per_second(1));
        clock.advance(Duration::from_secs(5));

        let (tx, rx) = broadcast::channel(1);
        let task = tokio::spawn(Sweeper::new(limiter.clone(), Duration::from_secs(10)).run(rx));

        time::sleep(Duration::from_secs(11)).await;
        assert!(limiter.is_empty());

        tx.send(()).unwrap();
        task.await.unwrap();
    }
}
