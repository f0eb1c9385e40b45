use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedLanguage {
    pub name: String,
    pub bytes: u64,
    pub percent: f64,
    pub estimated_lines: u64,
    pub committed_all_lines: u64,
    pub committed_user_lines: u64,
}

/// Languages are ordered by descending byte count; render order and
/// truncation priority follow this order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub languages: Vec<AggregatedLanguage>,
    pub total_estimated_lines: u64,
    pub total_committed_lines_all: u64,
    pub total_committed_lines_user: u64,
    pub repo_count: usize,
}

/// JSON document served for a user's raw numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub username: String,
    #[serde(flatten)]
    pub stats: AggregationResult,
    pub generated_at: DateTime<Utc>,
}

impl StatsReport {
    pub fn new(username: impl Into<String>, stats: AggregationResult) -> Self {
        Self {
            username: username.into(),
            stats,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_flat_camel_case() {
        let report = StatsReport::new("octocat", AggregationResult::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["username"], "octocat");
        assert_eq!(json["languages"], serde_json::json!([]));
        assert_eq!(json["totalEstimatedLines"], 0);
        assert_eq!(json["totalCommittedLinesAll"], 0);
        assert_eq!(json["totalCommittedLinesUser"], 0);
        assert_eq!(json["repoCount"], 0);
        assert!(json.get("generatedAt").is_some());
    }
}
