pub mod client;
pub mod paginator;
pub mod rate_limiter;
pub mod retry;
pub mod source;
#[cfg(test)]
pub(crate) mod test_server;

pub use client::GitHubClient;
pub use paginator::Paginator;
pub use rate_limiter::{RateLimitPolicy, RateLimiter};
pub use retry::StatsRetryPolicy;
pub use source::RepoStatsSource;
