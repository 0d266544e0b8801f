// src/settings.rs
//! Runtime settings for the `news-filter` binary.
//!
//! ```toml
//! feeds = ["http://news.google.com/news?output=rss"]
//! poll_interval_secs = 120
//! triggers_path = "config/triggers.txt"
//! keywords = []
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_SETTINGS_PATH: &str = "NEWS_FILTER_SETTINGS";
pub const ENV_POLL_SECS: &str = "NEWS_FILTER_POLL_SECS";
pub const DEFAULT_SETTINGS_PATH: &str = "config/news_filter.toml";
pub const DEFAULT_TRIGGERS_PATH: &str = "config/triggers.txt";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub feeds: Vec<String>,
    pub poll_interval_secs: u64,
    pub triggers_path: PathBuf,
    /// When non-empty, replaces the trigger file with one title-or-description trigger per keyword.
    pub keywords: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feeds: Vec::new(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            triggers_path: PathBuf::from(DEFAULT_TRIGGERS_PATH),
            keywords: Vec::new(),
        }
    }
}

// parse optional positive integer env; zero or garbage is ignored
fn parse_poll_secs_env(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut settings: Settings = toml::from_str(s).context("parsing settings toml")?;
        settings.keywords = clean_list(settings.keywords);
        settings.feeds = clean_list(settings.feeds);
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Load settings using env var + fallbacks:
    /// 1) $NEWS_FILTER_SETTINGS
    /// 2) config/news_filter.toml
    /// 3) built-in defaults
    ///
    /// `$NEWS_FILTER_POLL_SECS` then overrides the interval.
    pub fn load_default() -> Result<Self> {
        let settings = if let Ok(p) = std::env::var(ENV_SETTINGS_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_SETTINGS_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_SETTINGS_PATH);
            if default_p.exists() {
                Self::load_from(&default_p)?
            } else {
                Self::default()
            }
        };

        Ok(settings.with_env_overrides())
    }

    /// Apply `$NEWS_FILTER_POLL_SECS` on top of file-provided values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(secs) = parse_poll_secs_env(std::env::var(ENV_POLL_SECS).ok()) {
            self.poll_interval_secs = secs;
        }
        self
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|it| it.trim().to_string())
        .filter(|it| !it.is_empty())
        .collect()
}
