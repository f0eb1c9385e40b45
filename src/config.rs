use std::env;
use std::time::Duration;

use crate::github::rate_limiter::RateLimitPolicy;
use crate::github::retry::StatsRetryPolicy;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_WAKATIME_URL: &str = "https://wakatime.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub wakatime_url: String,
    pub max_repos: usize,
    pub batch_size: usize,
    pub batch_pause_ms: u64,
    pub stats_retry_attempts: u32,
    pub stats_retry_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let github_token = env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let github_api_url = env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string());

        let wakatime_url = env::var("WAKATIME_URL")
            .unwrap_or_else(|_| DEFAULT_WAKATIME_URL.to_string());

        Self {
            github_token,
            github_api_url: github_api_url.trim_end_matches('/').to_string(),
            wakatime_url: wakatime_url.trim_end_matches('/').to_string(),
            max_repos: parse_var("MAX_REPOS").unwrap_or(40),
            batch_size: parse_var("BATCH_SIZE").filter(|&n| n > 0).unwrap_or(8),
            batch_pause_ms: parse_var("BATCH_PAUSE_MS").unwrap_or(80),
            stats_retry_attempts: parse_var("STATS_RETRY_ATTEMPTS")
                .filter(|&n| n > 0)
                .unwrap_or(3),
            stats_retry_delay_ms: parse_var("STATS_RETRY_DELAY_MS").unwrap_or(1000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            wakatime_url: DEFAULT_WAKATIME_URL.to_string(),
            max_repos: 40,
            batch_size: 8,
            batch_pause_ms: 80,
            stats_retry_attempts: 3,
            stats_retry_delay_ms: 1000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[derive(Debug, Clone)]
pub struct AggregationConfig {
    pub max_repos: usize,
    pub rate_limit: RateLimitPolicy,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for AggregationConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_repos: config.max_repos,
            rate_limit: RateLimitPolicy {
                batch_size: config.batch_size.max(1),
                batch_pause: Duration::from_millis(config.batch_pause_ms),
            },
        }
    }
}

impl From<&Config> for StatsRetryPolicy {
    fn from(config: &Config) -> Self {
        Self {
            max_attempts: config.stats_retry_attempts.max(1),
            base_delay: Duration::from_millis(config.stats_retry_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_request_budget() {
        let config = Config::default();
        let aggregation = AggregationConfig::from(&config);
        assert_eq!(aggregation.max_repos, 40);
        assert_eq!(aggregation.rate_limit.batch_size, 8);
        assert_eq!(aggregation.rate_limit.batch_pause, Duration::from_millis(80));

        let retry = StatsRetryPolicy::from(&config);
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        let config = Config {
            batch_size: 0,
            ..Config::default()
        };
        assert_eq!(AggregationConfig::from(&config).rate_limit.batch_size, 1);
    }
}
