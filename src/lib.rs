pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod wakatime;
pub mod languages;
pub mod theme;
pub mod analysis;
pub mod render;

pub use config::{AggregationConfig, Config};
pub use error::{Error, Result};
pub use github::{GitHubClient, RateLimitPolicy, RepoStatsSource, StatsRetryPolicy};
pub use wakatime::WakaTimeClient;
pub use analysis::LanguageAggregator;
pub use render::{render_card, render_error_card, CardRenderParams, CardVariant};
pub use theme::{normalize_accent, resolve_theme, Theme};
