use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::AggregationConfig;
use crate::error::{Error, Result};
use crate::github::RepoStatsSource;
use crate::languages::estimate_lines;
use crate::models::{AggregatedLanguage, AggregationResult, RepoLanguageProfile, Repository};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} repos";

pub struct LanguageAggregator {
    source: Arc<dyn RepoStatsSource>,
    config: AggregationConfig,
    show_progress: bool,
}

/// Language byte totals in first-seen order.
#[derive(Debug, Default)]
struct LanguageTally {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl LanguageTally {
    fn add(&mut self, name: &str, bytes: u64) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 += bytes,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), bytes));
            }
        }
    }

    fn total(&self) -> u64 {
        self.entries.iter().map(|(_, bytes)| bytes).sum()
    }
}

#[derive(Debug, Default)]
struct CommitTally {
    all_by_language: HashMap<String, f64>,
    user_by_language: HashMap<String, f64>,
    total_all: u64,
    total_user: u64,
}

impl CommitTally {
    fn add_repo(
        &mut self,
        profile: Option<&RepoLanguageProfile>,
        additions_all: u64,
        additions_user: u64,
    ) {
        self.total_all += additions_all;
        self.total_user += additions_user;

        // without a byte distribution the additions only count toward the totals
        let Some(profile) = profile else {
            return;
        };
        for (language, share) in profile.distribute(additions_all) {
            *self.all_by_language.entry(language.to_string()).or_default() += share;
        }
        for (language, share) in profile.distribute(additions_user) {
            *self.user_by_language.entry(language.to_string()).or_default() += share;
        }
    }

    fn rounded(map: &HashMap<String, f64>, language: &str) -> u64 {
        map.get(language).map_or(0, |v| v.round().max(0.0) as u64)
    }
}

impl LanguageAggregator {
    pub fn new(source: Arc<dyn RepoStatsSource>, config: AggregationConfig) -> Self {
        Self {
            source,
            config,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub async fn aggregate(&self, username: &str) -> Result<AggregationResult> {
        if username.trim().is_empty() {
            return Err(Error::InvalidUsername(username.to_string()));
        }

        // Step 1: Discover repositories
        tracing::info!("Aggregating languages for: {}", username);
        let repos = match self.source.list_repositories(username).await {
            Ok(repos) => repos,
            Err(e) => {
                tracing::warn!("Repository discovery for {} failed: {}", username, e);
                Vec::new()
            }
        };

        let repos: Vec<Repository> = repos.into_iter().take(self.config.max_repos).collect();
        if repos.is_empty() {
            tracing::info!("No countable repositories for {}", username);
            return Ok(AggregationResult::default());
        }
        tracing::info!("Processing {} repositories", repos.len());

        // Step 2: Byte breakdown per repository
        let (bytes, profiles) = self.collect_language_bytes(&repos).await;

        // Step 3: Commit additions, weighted by each repository's byte share
        let commits = self.collect_commit_additions(username, &repos, &profiles).await;

        // Step 4: Per-language figures
        let result = build_result(bytes, &commits, repos.len());
        tracing::info!(
            "Aggregated {} languages, {} estimated lines",
            result.languages.len(),
            result.total_estimated_lines
        );
        Ok(result)
    }

    async fn collect_language_bytes(
        &self,
        repos: &[Repository],
    ) -> (LanguageTally, Vec<RepoLanguageProfile>) {
        let policy = &self.config.rate_limit;
        let pb = self.progress_bar(repos.len(), "languages");

        let mut tally = LanguageTally::default();
        let mut profiles = Vec::with_capacity(repos.len());

        for (batch_index, batch) in repos.chunks(policy.batch_size).enumerate() {
            if batch_index > 0 {
                policy.pause().await;
            }

            let results = join_all(
                batch
                    .iter()
                    .map(|repo| self.source.repository_languages(&repo.owner.login, &repo.name)),
            )
            .await;

            for (repo, languages) in batch.iter().zip(results) {
                if languages.is_empty() {
                    tracing::debug!("No language data for {}", repo.full_name());
                }
                for stat in languages.iter() {
                    tally.add(&stat.name, stat.bytes);
                }
                profiles.push(RepoLanguageProfile::from_bytes(&languages));
            }
            pb.inc(batch.len() as u64);
        }

        pb.finish_and_clear();
        (tally, profiles)
    }

    async fn collect_commit_additions(
        &self,
        username: &str,
        repos: &[Repository],
        profiles: &[RepoLanguageProfile],
    ) -> CommitTally {
        let policy = &self.config.rate_limit;
        let pb = self.progress_bar(repos.len(), "commit stats");
        let mut tally = CommitTally::default();

        for (batch_index, batch) in repos.chunks(policy.batch_size).enumerate() {
            if batch_index > 0 {
                policy.pause().await;
            }

            let results = join_all(batch.iter().map(|repo| async move {
                tokio::join!(
                    self.source.commit_additions_total(&repo.owner.login, &repo.name),
                    self.source
                        .commit_additions_by_user(&repo.owner.login, &repo.name, username),
                )
            }))
            .await;

            let offset = batch_index * policy.batch_size;
            for (i, (additions_all, additions_user)) in results.into_iter().enumerate() {
                let profile = profiles.get(offset + i).filter(|p| p.total_bytes > 0);
                tally.add_repo(profile, additions_all, additions_user);
            }
            pb.inc(batch.len() as u64);
        }

        pb.finish_and_clear();
        tally
    }

    fn progress_bar(&self, len: usize, label: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        let template = format!("{} ({})", PROGRESS_TEMPLATE, label);
        if let Ok(style) = ProgressStyle::default_bar().template(&template) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

fn build_result(
    bytes: LanguageTally,
    commits: &CommitTally,
    repo_count: usize,
) -> AggregationResult {
    let total_bytes = bytes.total();

    let mut languages: Vec<AggregatedLanguage> = bytes
        .entries
        .into_iter()
        .map(|(name, bytes)| {
            let percent = if total_bytes > 0 {
                bytes as f64 / total_bytes as f64 * 100.0
            } else {
                0.0
            };
            AggregatedLanguage {
                estimated_lines: estimate_lines(&name, bytes),
                committed_all_lines: CommitTally::rounded(&commits.all_by_language, &name),
                committed_user_lines: CommitTally::rounded(&commits.user_by_language, &name),
                name,
                bytes,
                percent,
            }
        })
        .collect();

    // stable: ties keep first-seen order
    languages.sort_by(|a, b| b.bytes.cmp(&a.bytes));

    AggregationResult {
        total_estimated_lines: languages.iter().map(|l| l.estimated_lines).sum(),
        total_committed_lines_all: commits.total_all,
        total_committed_lines_user: commits.total_user,
        repo_count,
        languages,
    }
}
