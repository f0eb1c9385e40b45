use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::github::rate_limiter::RateLimiter;

pub struct Paginator<'a> {
    client: &'a Client,
    rate_limiter: &'a RateLimiter,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, rate_limiter: &'a RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
        }
    }

    /// Walks `page=1,2,..` until a short or empty page, or until `max_items`
    /// entries were collected. Only a failed first page is an error; a later
    /// failure ends the walk with what was collected so far.
    pub async fn fetch_capped<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: usize,
        max_items: usize,
    ) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let separator = if base_url.contains('?') { "&" } else { "?" };
            let url = format!("{}{}per_page={}&page={}", base_url, separator, per_page, page);

            let items = match self.fetch_page::<T>(&url).await {
                Ok(items) => items,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!("Stopping pagination at page {}: {}", page, e);
                    break;
                }
            };

            let items_count = items.len();
            all_items.extend(items);

            if items_count == 0 || items_count < per_page || all_items.len() >= max_items {
                break;
            }

            page += 1;
        }

        all_items.truncate(max_items);
        Ok(all_items)
    }

    async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        tracing::debug!("Fetching: {}", url);
        let response = self.client.get(url).send().await?;
        self.rate_limiter.update_from_response(&response);

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to fetch {}: {} - {}",
                url, status, body
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
