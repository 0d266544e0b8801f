// src/feed/mod.rs
//! Story sources: fetch, sanitize, and hand stories to the filter once per poll cycle.

pub mod rss;
pub mod scheduler;

use anyhow::Result;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::config::ActiveTriggerList;
use crate::filter::filter_stories;
use crate::story::Story;

/// One-time metrics registration (so series show up once an exporter is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_stories_total", "Stories fetched from all sources.");
        describe_counter!("feed_source_errors_total", "Source fetch/parse errors.");
        describe_counter!("feed_polls_total", "Completed poll cycles.");
        describe_histogram!("feed_parse_ms", "RSS parse time in milliseconds.");
        describe_gauge!("feed_poll_last_run_ts", "Unix ts when the last poll ran.");
    });
}

#[async_trait::async_trait]
pub trait StorySource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Story>>;
    fn name(&self) -> &str;
}

/// Decode HTML entities, strip tags, normalize typographic quotes and collapse whitespace.
pub fn sanitize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    // 5) Tags replaced by spaces must not detach trailing punctuation
    static RE_PUNCT: OnceCell<regex::Regex> = OnceCell::new();
    let re_punct = RE_PUNCT.get_or_init(|| regex::Regex::new(r" ([.,;:!?])").unwrap());
    out = re_punct.replace_all(&out, "$1").to_string();
    out.trim().to_string()
}

/// Fetch from every source (failures are logged and skipped), then filter.
pub async fn poll_once(
    sources: &[Box<dyn StorySource>],
    triggers: &ActiveTriggerList,
) -> Vec<Story> {
    ensure_metrics_described();

    let mut fetched = Vec::new();
    for src in sources {
        match src.fetch_latest().await {
            Ok(mut v) => {
                tracing::debug!(target: "feed", source = src.name(), count = v.len(), "fetched");
                fetched.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(target: "feed", error = ?e, source = src.name(), "source error");
                counter!("feed_source_errors_total").increment(1);
            }
        }
    }

    let now = chrono::Utc::now().timestamp().max(0);
    counter!("feed_stories_total").increment(fetched.len() as u64);
    gauge!("feed_poll_last_run_ts").set(now as f64);

    let matched = filter_stories(&fetched, triggers);
    tracing::info!(
        target: "feed",
        fetched = fetched.len(),
        matched = matched.len(),
        "poll cycle"
    );
    matched
}
