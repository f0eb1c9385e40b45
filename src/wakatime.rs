use reqwest::{header, Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::config::DEFAULT_WAKATIME_URL;
use crate::error::{Error, Result};

/// Reads total tracked hours from a public WakaTime share.
pub struct WakaTimeClient {
    client: Client,
    base_url: String,
}

impl WakaTimeClient {
    pub fn new() -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("langcard/0.1"),
        );
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_WAKATIME_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Hours tracked in the share, or `None` when the share is unreachable or
    /// none of the known layouts yields a positive total.
    pub async fn get_tracked_hours(&self, username: &str, share_id: &str) -> Option<f64> {
        match self.fetch_share(username, share_id).await {
            Ok(document) => tracked_hours(&document),
            Err(e) => {
                tracing::warn!("WakaTime share {} for {} failed: {}", share_id, username, e);
                None
            }
        }
    }

    fn share_url(&self, username: &str, share_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid WakaTime URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::Config(format!("WakaTime URL {} cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .extend([
                "share".to_string(),
                format!("@{}", username),
                format!("{}.json", share_id),
            ]);
        Ok(url)
    }

    async fn fetch_share(&self, username: &str, share_id: &str) -> Result<Value> {
        let url = self.share_url(username, share_id)?;
        tracing::debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::WakaTime(format!(
                "share responded {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

type ShapeMatcher = fn(&Value) -> Option<f64>;

/// Known share layouts, tried in order. Each returns total seconds.
const SHARE_SHAPES: [(&str, ShapeMatcher); 2] =
    [("summaries", summaries_seconds), ("datasets", datasets_seconds)];

pub fn tracked_hours(document: &Value) -> Option<f64> {
    SHARE_SHAPES.iter().find_map(|(shape, matcher)| {
        let seconds = matcher(document).filter(|s| *s > 0.0)?;
        tracing::debug!("WakaTime share matched {} layout", shape);
        Some(seconds / 3600.0)
    })
}

#[derive(Debug, Deserialize)]
struct PeriodSummary {
    #[serde(default)]
    grand_total: Option<GrandTotal>,
    // some exports misspell the field
    #[serde(default)]
    gran_total: Option<GrandTotal>,
}

#[derive(Debug, Deserialize)]
struct GrandTotal {
    #[serde(default)]
    total_seconds: Option<Value>,
}

impl PeriodSummary {
    fn seconds(&self) -> Option<f64> {
        let from = |total: &Option<GrandTotal>| {
            total
                .as_ref()
                .and_then(|t| t.total_seconds.as_ref())
                .and_then(Value::as_f64)
        };
        from(&self.grand_total).or_else(|| from(&self.gran_total))
    }
}

fn summaries_seconds(document: &Value) -> Option<f64> {
    let periods = document.get("data")?.as_array()?;
    Some(
        periods
            .iter()
            .filter_map(|p| PeriodSummary::deserialize(p).ok())
            .filter_map(|p| p.seconds())
            .sum(),
    )
}

fn datasets_seconds(document: &Value) -> Option<f64> {
    let datasets = document.get("datasets")?.as_array()?;
    Some(
        datasets
            .iter()
            .filter_map(|d| d.get("data")?.as_array())
            .flatten()
            .map(point_seconds)
            .sum(),
    )
}

fn point_seconds(point: &Value) -> f64 {
    let seconds = match point {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if seconds.is_finite() {
        seconds
    } else {
        0.0
    }
}
