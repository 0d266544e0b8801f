//! news-filter — binary entrypoint.
//! Loads settings and triggers, then polls the configured feeds and prints
//! stories that fire at least one trigger.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use news_trigger_filter::feed::rss::RssSource;
use news_trigger_filter::feed::scheduler::{spawn_poller, PollerCfg};
use news_trigger_filter::feed::{poll_once, StorySource};
use news_trigger_filter::settings::Settings;
use news_trigger_filter::sink::{JsonLinesSink, LogSink, StorySink};
use news_trigger_filter::{load_trigger_config, ActiveTriggerList};

#[derive(Debug, Parser)]
#[command(name = "news-filter", version, about = "Filter news feeds through boolean triggers")]
struct Cli {
    /// Settings TOML (defaults to $NEWS_FILTER_SETTINGS or config/news_filter.toml)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Trigger configuration file
    #[arg(long, env = "NEWS_FILTER_TRIGGERS")]
    triggers: Option<PathBuf>,

    /// Feed URL; repeat for several feeds
    #[arg(long = "feed")]
    feeds: Vec<String>,

    /// Comma-separated keywords; replaces the trigger file
    #[arg(long, value_delimiter = ',')]
    keywords: Vec<String>,

    /// Poll interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Poll once and exit
    #[arg(long)]
    once: bool,

    /// Print matches as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feed=info,sink=info,triggers=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.settings {
        Some(p) => Settings::load_from(p)?.with_env_overrides(),
        None => Settings::load_default()?,
    };
    if let Some(p) = &cli.triggers {
        settings.triggers_path = p.clone();
    }
    if !cli.feeds.is_empty() {
        settings.feeds = cli.feeds.clone();
    }
    if !cli.keywords.is_empty() {
        settings.keywords = cli.keywords.clone();
    }
    if let Some(secs) = cli.interval {
        settings.poll_interval_secs = secs;
    }
    Ok(settings)
}

fn resolve_triggers(settings: &Settings) -> Result<ActiveTriggerList> {
    let from_keywords = ActiveTriggerList::from_keywords(&settings.keywords);
    if !from_keywords.is_empty() {
        tracing::info!(target: "triggers", keywords = from_keywords.len(), "using keyword triggers");
        return Ok(from_keywords);
    }
    load_trigger_config(&settings.triggers_path)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let settings = resolve_settings(&cli)?;
    let triggers = resolve_triggers(&settings)?;
    if triggers.is_empty() {
        tracing::warn!(target: "triggers", "no active triggers: nothing will match");
    }
    if settings.feeds.is_empty() {
        bail!("no feeds configured (use --feed or `feeds` in settings)");
    }

    let sources: Vec<Box<dyn StorySource>> = settings
        .feeds
        .iter()
        .map(|url| Box::new(RssSource::from_url(url)) as Box<dyn StorySource>)
        .collect();

    let mut sink: Box<dyn StorySink + Send> = if cli.json {
        Box::new(JsonLinesSink::new(std::io::stdout()))
    } else {
        Box::new(LogSink::new())
    };

    if cli.once {
        let matched = poll_once(&sources, &triggers).await;
        sink.deliver(&matched).context("delivering matches")?;
        return Ok(());
    }

    let cfg = PollerCfg {
        interval_secs: settings.poll_interval_secs,
    };
    let handle = spawn_poller(cfg, sources, triggers, sink);

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    tracing::info!(target: "feed", "shutting down");
    handle.abort();
    Ok(())
}
