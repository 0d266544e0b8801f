// src/story.rs
//! Story record consumed by the filter core, plus publication-time normalization.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

/// Publication instant as delivered by a feed: with or without a zone offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PubDate {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl PubDate {
    /// Normalize to UTC. Naive values are read as UTC wall-clock time.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            PubDate::Naive(n) => Utc.from_utc_datetime(n),
            PubDate::Zoned(dt) => dt.with_timezone(&Utc),
        }
    }
}

impl From<NaiveDateTime> for PubDate {
    fn from(n: NaiveDateTime) -> Self {
        PubDate::Naive(n)
    }
}

impl From<DateTime<FixedOffset>> for PubDate {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        PubDate::Zoned(dt)
    }
}

impl From<DateTime<Utc>> for PubDate {
    fn from(dt: DateTime<Utc>) -> Self {
        PubDate::Zoned(dt.fixed_offset())
    }
}

/// One news item. Fields are already sanitized by the feed layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    pub guid: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub pubdate: PubDate,
}

impl Story {
    pub fn new(
        guid: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
        pubdate: impl Into<PubDate>,
    ) -> Self {
        Self {
            guid: guid.into(),
            title: title.into(),
            description: description.into(),
            link: link.into(),
            pubdate: pubdate.into(),
        }
    }

    /// `pubdate` normalized to UTC (see [`PubDate::to_utc`]).
    pub fn published_utc(&self) -> DateTime<Utc> {
        self.pubdate.to_utc()
    }
}
