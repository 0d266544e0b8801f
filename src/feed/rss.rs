// src/feed/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use metrics::histogram;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::feed::{sanitize_text, StorySource};
use crate::story::{PubDate, Story};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    guid: Option<Guid>,
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

// `<guid isPermaLink="false">…</guid>`: keep the text, ignore attributes.
#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text", default)]
    value: String,
}

/// RFC 2822 first; an unknown trailing zone name falls back to a naive instant.
pub fn parse_pubdate(raw: &str) -> Option<PubDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(PubDate::Zoned(dt));
    }
    let (head, _zone) = raw.rsplit_once(' ')?;
    NaiveDateTime::parse_from_str(head, "%a, %d %b %Y %H:%M:%S")
        .ok()
        .map(PubDate::Naive)
}

pub struct RssSource {
    label: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RssSource {
    pub fn from_fixture(label: &str, xml: &str) -> Self {
        Self {
            label: label.to_string(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn from_url(url: &str) -> Self {
        Self {
            label: url.to_string(),
            mode: Mode::Http {
                url: url.to_string(),
                client: reqwest::Client::new(),
            },
        }
    }

    fn parse_items_from_str(&self, s: &str) -> Result<Vec<Story>> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean)
            .with_context(|| format!("parsing rss xml from {}", self.label))?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let link = it.link.unwrap_or_default().trim().to_string();
            let guid = it
                .guid
                .map(|g| g.value.trim().to_string())
                .filter(|g| !g.is_empty())
                .unwrap_or_else(|| link.clone());
            if guid.is_empty() {
                tracing::warn!(target: "feed", source = %self.label, "item without guid or link dropped");
                continue;
            }
            let Some(pubdate) = it.pub_date.as_deref().and_then(parse_pubdate) else {
                tracing::warn!(
                    target: "feed",
                    source = %self.label,
                    %guid,
                    pub_date = ?it.pub_date,
                    "item with unparseable pubDate dropped"
                );
                continue;
            };

            out.push(Story {
                guid,
                title: sanitize_text(it.title.as_deref().unwrap_or_default()),
                description: sanitize_text(it.description.as_deref().unwrap_or_default()),
                link,
                pubdate,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("feed_parse_ms").record(ms);
        Ok(out)
    }
}

#[async_trait]
impl StorySource for RssSource {
    async fn fetch_latest(&self) -> Result<Vec<Story>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_items_from_str(s),
            Mode::Http { url, client } => {
                let body = client
                    .get(url.as_str())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("GET {url}"))?
                    .text()
                    .await
                    .with_context(|| format!("reading body of {url}"))?;
                self.parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.label
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
