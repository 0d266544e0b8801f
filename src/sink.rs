// src/sink.rs
//! Delivery of matched stories, with cross-cycle dedup by `guid`.
//!
//! The filter is stateless; a feed re-delivers the same item every poll, so
//! sinks remember what they already showed. State is in-memory only.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::Write;

use crate::story::Story;

/// Guids already delivered during this process lifetime.
#[derive(Debug, Default, Clone)]
pub struct SeenGuids {
    seen: HashSet<String>,
}

impl SeenGuids {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stories whose guid was never seen before (input order kept); records them.
    pub fn retain_new<'a>(&mut self, stories: &'a [Story]) -> Vec<&'a Story> {
        stories
            .iter()
            .filter(|s| self.seen.insert(s.guid.clone()))
            .collect()
    }

    pub fn contains(&self, guid: &str) -> bool {
        self.seen.contains(guid)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

pub trait StorySink {
    /// Deliver one poll cycle's matches; returns how many were new.
    fn deliver(&mut self, stories: &[Story]) -> Result<usize>;
}

/// Writes each new story through `tracing`.
#[derive(Debug, Default)]
pub struct LogSink {
    seen: SeenGuids,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorySink for LogSink {
    fn deliver(&mut self, stories: &[Story]) -> Result<usize> {
        let fresh = self.seen.retain_new(stories);
        for s in &fresh {
            tracing::info!(
                target: "sink",
                guid = %s.guid,
                link = %s.link,
                published = %s.published_utc().to_rfc3339(),
                "{}",
                s.title
            );
        }
        Ok(fresh.len())
    }
}

/// One JSON object per line for each new story.
pub struct JsonLinesSink<W: Write> {
    out: W,
    seen: SeenGuids,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            seen: SeenGuids::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StorySink for JsonLinesSink<W> {
    fn deliver(&mut self, stories: &[Story]) -> Result<usize> {
        let fresh = self.seen.retain_new(stories);
        for s in &fresh {
            serde_json::to_writer(&mut self.out, s).context("serializing story")?;
            self.out.write_all(b"\n").context("writing story line")?;
        }
        self.out.flush().context("flushing sink")?;
        Ok(fresh.len())
    }
}
