use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Process-wide throttle for outbound provider calls. Holding the lock
/// across the sleep serializes concurrent callers, so the minimum interval
/// holds between any two consecutive requests, not per caller.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// A limiter that never waits, for tests and offline runs.
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
