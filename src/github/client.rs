use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{Config, DEFAULT_GITHUB_API_URL};
use crate::error::{Error, Result};
use crate::github::paginator::Paginator;
use crate::github::rate_limiter::RateLimiter;
use crate::github::retry::{poll_until_ready, StatsPoll, StatsRetryPolicy};
use crate::github::source::RepoStatsSource;
use crate::models::{GitHubUser, LanguageBytes, Repository};

const REPOS_PER_PAGE: usize = 100;
const MAX_LISTED_REPOS: usize = 1000;

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
    retry_policy: StatsRetryPolicy,
}

impl GitHubClient {
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("langcard/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(),
            base_url: DEFAULT_GITHUB_API_URL.to_string(),
            retry_policy: StatsRetryPolicy::default(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.github_token.as_deref())?
            .with_base_url(&config.github_api_url)
            .with_retry_policy(StatsRetryPolicy::from(config)))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, policy: StatsRetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        let url = format!("{}/users/{}", self.base_url, username);
        tracing::info!("Fetching user: {}", username);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_response(&response);

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::UserNotFound(username.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to fetch user {}: {} - {}",
                username, status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Profile lookup for display purposes; any failure yields `None`.
    pub async fn get_user_profile(&self, username: &str) -> Option<GitHubUser> {
        match self.get_user(username).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Profile lookup for {} failed: {}", username, e);
                None
            }
        }
    }

    /// Lists up to 1000 repositories and keeps the countable ones.
    pub async fn get_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let url = format!("{}/users/{}/repos?type=all&sort=updated", self.base_url, username);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        tracing::info!("Fetching repositories for: {}", username);

        let repos: Vec<Repository> = paginator
            .fetch_capped(&url, REPOS_PER_PAGE, MAX_LISTED_REPOS)
            .await?;
        let listed = repos.len();
        let repos: Vec<_> = repos.into_iter().filter(Repository::is_countable).collect();

        tracing::debug!(
            "{} of {} listed repositories are neither forks nor archived",
            repos.len(),
            listed
        );
        Ok(repos)
    }

    pub async fn get_repo_languages(&self, owner: &str, repo: &str) -> Result<LanguageBytes> {
        let url = format!("{}/repos/{}/{}/languages", self.base_url, owner, repo);
        tracing::debug!("Fetching languages for: {}/{}", owner, repo);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_response(&response);

        if !response.status().is_success() {
            tracing::debug!("Languages for {}/{}: {}", owner, repo, response.status());
            return Ok(LanguageBytes::default());
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get_commit_additions_total(&self, owner: &str, repo: &str) -> Result<u64> {
        let url = format!("{}/repos/{}/{}/stats/code_frequency", self.base_url, owner, repo);
        let rows: Option<Vec<Value>> = self.fetch_stats(&url).await?;
        Ok(rows.map(|rows| sum_code_frequency_additions(&rows)).unwrap_or(0))
    }

    pub async fn get_commit_additions_by_user(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> Result<u64> {
        let url = format!("{}/repos/{}/{}/stats/contributors", self.base_url, owner, repo);
        let contributors: Option<Vec<ContributorStats>> = self.fetch_stats(&url).await?;
        Ok(contributors
            .map(|c| sum_contributor_additions(&c, username))
            .unwrap_or(0))
    }

    /// Fetches a statistics endpoint, retrying while it answers `202`.
    /// `Ok(None)` means the statistic is unavailable (still computing or a
    /// non-success status).
    async fn fetch_stats<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let client = &self.client;
        let rate_limiter = &self.rate_limiter;

        let polled = poll_until_ready(&self.retry_policy, url, move || async move {
            tracing::debug!("Fetching: {}", url);
            match client.get(url).send().await {
                Ok(response) => {
                    rate_limiter.update_from_response(&response);
                    if response.status() == StatusCode::ACCEPTED {
                        StatsPoll::Computing
                    } else {
                        StatsPoll::Ready(Ok(response))
                    }
                }
                Err(e) => StatsPoll::Ready(Err(e)),
            }
        })
        .await;

        let Some(response) = polled else {
            return Ok(None);
        };
        let response = response?;

        if !response.status().is_success() {
            tracing::debug!("Statistics {}: {}", url, response.status());
            return Ok(None);
        }

        let body = response.text().await?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributorStats {
    #[serde(default)]
    pub author: Option<ContributorAuthor>,
    #[serde(default)]
    pub weeks: Vec<ContributorWeek>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributorAuthor {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributorWeek {
    #[serde(default)]
    pub a: Option<i64>,
}

/// Sums the additions column of `[week, additions, deletions]` rows.
pub fn sum_code_frequency_additions(rows: &[Value]) -> u64 {
    let added: i64 = rows
        .iter()
        .filter_map(|row| row.as_array()?.get(1)?.as_i64())
        .sum();
    added.max(0) as u64
}

pub fn sum_contributor_additions(contributors: &[ContributorStats], username: &str) -> u64 {
    let Some(entry) = contributors.iter().find(|c| {
        c.author
            .as_ref()
            .is_some_and(|author| author.login.eq_ignore_ascii_case(username))
    }) else {
        return 0;
    };

    let added: i64 = entry.weeks.iter().filter_map(|w| w.a).sum();
    added.max(0) as u64
}

fn absorb<T: Default>(operation: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(retryable = e.is_retryable(), "{} failed: {}", operation, e);
        T::default()
    })
}

#[async_trait]
impl RepoStatsSource for GitHubClient {
    async fn list_repositories(&self, username: &str) -> Result<Vec<Repository>> {
        self.get_user_repos(username).await
    }

    async fn repository_languages(&self, owner: &str, repo: &str) -> LanguageBytes {
        let operation = format!("languages for {}/{}", owner, repo);
        absorb(&operation, self.get_repo_languages(owner, repo).await)
    }

    async fn commit_additions_total(&self, owner: &str, repo: &str) -> u64 {
        let operation = format!("code frequency for {}/{}", owner, repo);
        absorb(&operation, self.get_commit_additions_total(owner, repo).await)
    }

    async fn commit_additions_by_user(&self, owner: &str, repo: &str, username: &str) -> u64 {
        let operation = format!("contributors for {}/{}", owner, repo);
        absorb(
            &operation,
            self.get_commit_additions_by_user(owner, repo, username).await,
        )
    }
}
