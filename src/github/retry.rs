use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Retry schedule for statistics endpoints that answer `202 Accepted` while
/// GitHub is still computing the numbers. Attempt `n` waits `n * base_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl StatsRetryPolicy {
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for StatsRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug)]
pub enum StatsPoll<T> {
    Ready(T),
    Computing,
}

/// Polls `f` until it yields [`StatsPoll::Ready`] or the attempts run out.
/// Returns `None` when every attempt reported the statistic as still computing.
pub async fn poll_until_ready<F, Fut, T>(
    policy: &StatsRetryPolicy,
    operation_name: &str,
    mut f: F,
) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StatsPoll<T>>,
{
    for attempt in 1..=policy.max_attempts {
        match f().await {
            StatsPoll::Ready(value) => {
                if attempt > 1 {
                    tracing::debug!("{} ready on attempt {}", operation_name, attempt);
                }
                return Some(value);
            }
            StatsPoll::Computing => {
                let delay = policy.delay_for(attempt);
                tracing::debug!(
                    "{} still computing (attempt {}/{}), retrying in {:?}",
                    operation_name,
                    attempt,
                    policy.max_attempts,
                    delay
                );
                if !delay.is_zero() {
                    sleep(delay).await;
                }
            }
        }
    }

    tracing::warn!(
        "{} still computing after {} attempts, giving up",
        operation_name,
        policy.max_attempts
    );
    None
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn backoff_grows_linearly() {
        let policy = StatsRetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn gives_up_after_three_pending_responses() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = StatsRetryPolicy::immediate(3);
        let result: Option<u64> = poll_until_ready(&policy, "code_frequency", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            StatsPoll::Computing
        })
        .await;

        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn returns_first_ready_value() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = StatsRetryPolicy::immediate(3);
        let result = poll_until_ready(&policy, "contributors", move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                StatsPoll::Computing
            } else {
                StatsPoll::Ready(42u64)
            }
        })
        .await;

        assert_eq!(result, Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
