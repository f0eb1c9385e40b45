use async_trait::async_trait;

use crate::error::Result;
use crate::models::{LanguageBytes, Repository};

/// Per-repository data the aggregator needs. Only discovery may fail; the
/// per-repository operations absorb their own failures and report empty data.
#[async_trait]
pub trait RepoStatsSource: Send + Sync {
    /// Countable (non-fork, non-archived) repositories owned by `username`.
    async fn list_repositories(&self, username: &str) -> Result<Vec<Repository>>;

    async fn repository_languages(&self, owner: &str, repo: &str) -> LanguageBytes;

    /// Lines added across the repository's whole commit history, all authors.
    async fn commit_additions_total(&self, owner: &str, repo: &str) -> u64;

    /// Lines added by `username` alone, matched case-insensitively.
    async fn commit_additions_by_user(&self, owner: &str, repo: &str, username: &str) -> u64;
}
