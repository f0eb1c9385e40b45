use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use langcard::models::{sanitize_login, StatsReport};
use langcard::theme::theme_names;
use langcard::{
    normalize_accent, render_card, render_error_card, AggregationConfig, CardRenderParams,
    CardVariant, Config, GitHubClient, LanguageAggregator, RepoStatsSource, WakaTimeClient,
};

#[derive(Parser, Debug)]
#[command(name = "langcard")]
#[command(version = "0.1.0")]
#[command(about = "Aggregate GitHub language usage and render it as an SVG card")]
struct Cli {
    /// Show progress bars while fetching repository data
    #[arg(long, global = true)]
    progress: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print aggregated language statistics as JSON
    Stats(StatsArgs),
    /// Render the language card as SVG
    Card(CardArgs),
    /// List the available theme names
    Themes,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// GitHub username
    username: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct CardArgs {
    /// GitHub username
    username: String,

    /// Palette name (unknown names fall back to light)
    #[arg(long)]
    theme: Option<String>,

    /// Card layout: list, legend or compact
    #[arg(long)]
    variant: Option<String>,

    /// Card title
    #[arg(long)]
    title: Option<String>,

    /// Tracking period shown in the footer
    #[arg(long)]
    period: Option<String>,

    /// Accent color as 3 or 6 hex digits
    #[arg(long)]
    accent: Option<String>,

    /// WakaTime public share id for tracked hours
    #[arg(long)]
    wakatime_share: Option<String>,

    /// WakaTime user owning the share (defaults to the GitHub username)
    #[arg(long)]
    wakatime_user: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the SVG/JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("langcard=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Stats(args) => run_stats(&args, &config, cli.progress).await,
        Command::Card(args) => match run_card(&args, &config, cli.progress).await {
            Ok(svg) => write_output(args.output.as_deref(), &svg),
            Err(e) => {
                tracing::error!("Card rendering failed: {}", e);
                write_output(args.output.as_deref(), &render_error_card(&e.to_string()))?;
                Err(e)
            }
        },
        Command::Themes => {
            for name in theme_names() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

fn aggregator(github: &Arc<GitHubClient>, config: &Config, progress: bool) -> LanguageAggregator {
    let source: Arc<dyn RepoStatsSource> = github.clone();
    LanguageAggregator::new(source, AggregationConfig::from(config)).with_progress(progress)
}

async fn run_stats(args: &StatsArgs, config: &Config, progress: bool) -> anyhow::Result<()> {
    let login = sanitize_login(&args.username)?;
    let github = Arc::new(GitHubClient::from_config(config)?);

    tracing::info!("Collecting stats for GitHub user: {}", login);
    let stats = aggregator(&github, config, progress).aggregate(&login).await?;
    warn_if_exhausted(&github);

    let report = StatsReport::new(login, stats);
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    write_output(args.output.as_deref(), &json)
}

async fn run_card(args: &CardArgs, config: &Config, progress: bool) -> anyhow::Result<String> {
    let login = sanitize_login(&args.username)?;
    let github = Arc::new(GitHubClient::from_config(config)?);
    let wakatime = WakaTimeClient::new()?.with_base_url(&config.wakatime_url);

    let wakatime_user = match args.wakatime_user.as_deref() {
        Some(user) => sanitize_login(user)?,
        None => login.clone(),
    };
    let accent = args.accent.as_deref().and_then(|raw| {
        let accent = normalize_accent(raw);
        if accent.is_none() {
            tracing::warn!("Ignoring invalid accent color: {}", raw);
        }
        accent
    });

    tracing::info!("Rendering card for GitHub user: {}", login);
    let aggregator = aggregator(&github, config, progress);
    let tracked = async {
        match args.wakatime_share.as_deref() {
            Some(share) => wakatime.get_tracked_hours(&wakatime_user, share).await,
            None => None,
        }
    };
    let (stats, profile, tracked_hours) = tokio::join!(
        aggregator.aggregate(&login),
        github.get_user_profile(&login),
        tracked
    );
    let stats = stats?;
    warn_if_exhausted(&github);

    let display_name = profile
        .as_ref()
        .map(|user| user.display_name())
        .unwrap_or(&login);

    Ok(render_card(&CardRenderParams {
        theme: args.theme.as_deref(),
        variant: CardVariant::parse(args.variant.as_deref()),
        title: args.title.as_deref(),
        period: args.period.as_deref(),
        tracked_hours,
        accent: accent.as_deref(),
        ..CardRenderParams::new(display_name, &stats)
    }))
}

fn warn_if_exhausted(github: &GitHubClient) {
    if github.rate_limiter().is_exhausted() {
        tracing::warn!("GitHub rate limit exhausted; results may be partial (set GITHUB_TOKEN)");
    }
}

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    if let Some(path) = path {
        std::fs::write(path, content)?;
        tracing::info!("Output written to: {}", path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}
