use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::Response;
use tokio::time::sleep;

/// Pacing applied by the aggregator: how many repositories are fetched at
/// once and how long to wait between batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub batch_size: usize,
    pub batch_pause: Duration,
}

impl RateLimitPolicy {
    pub fn unpaced(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            batch_pause: Duration::ZERO,
        }
    }

    pub async fn pause(&self) {
        if !self.batch_pause.is_zero() {
            tracing::trace!("Pausing {:?} between batches", self.batch_pause);
            sleep(self.batch_pause).await;
        }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            batch_size: 8,
            batch_pause: Duration::from_millis(80),
        }
    }
}

/// Last quota snapshot reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub remaining: u32,
    pub resets_in: Option<Duration>,
}

/// Tracks the `x-ratelimit-*` headers of every response. It never blocks;
/// calls rejected for quota degrade to empty results like any other failure.
#[derive(Debug, Default)]
pub struct RateLimiter {
    status: Mutex<Option<RateLimitStatus>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_from_response(&self, response: &Response) {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        self.record(
            header("x-ratelimit-remaining").as_deref(),
            header("x-ratelimit-reset").as_deref(),
        );
    }

    fn record(&self, remaining: Option<&str>, reset: Option<&str>) {
        let Some(remaining) = remaining.and_then(|v| v.trim().parse::<u32>().ok()) else {
            return;
        };

        let resets_in = reset
            .and_then(|v| v.trim().parse::<u64>().ok())
            .and_then(|reset_timestamp| {
                let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
                reset_timestamp.checked_sub(now).map(Duration::from_secs)
            });

        if remaining == 0 {
            tracing::warn!("GitHub rate limit exhausted, resets in {:?}", resets_in);
        }

        if let Ok(mut status) = self.status.lock() {
            *status = Some(RateLimitStatus {
                remaining,
                resets_in,
            });
        }
    }

    pub fn status(&self) -> Option<RateLimitStatus> {
        self.status.lock().ok().and_then(|status| *status)
    }

    pub fn is_exhausted(&self) -> bool {
        self.status().is_some_and(|s| s.remaining == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_remaining_quota() {
        let limiter = RateLimiter::new();
        assert_eq!(limiter.status(), None);

        limiter.record(Some("4999"), None);
        assert_eq!(limiter.status().map(|s| s.remaining), Some(4999));
        assert!(!limiter.is_exhausted());

        limiter.record(Some("0"), Some("1"));
        assert!(limiter.is_exhausted());
        // reset timestamp in the past
        assert_eq!(limiter.status().and_then(|s| s.resets_in), None);
    }

    #[test]
    fn ignores_malformed_headers() {
        let limiter = RateLimiter::new();
        limiter.record(Some("lots"), Some("soon"));
        assert_eq!(limiter.status(), None);
    }

    #[tokio::test]
    async fn unpaced_policy_never_sleeps() {
        let policy = RateLimitPolicy::unpaced(0);
        assert_eq!(policy.batch_size, 1);
        let started = std::time::Instant::now();
        policy.pause().await;
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
