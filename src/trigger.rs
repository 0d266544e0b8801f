// src/trigger.rs
//! Trigger predicates over a [`Story`].
//!
//! The set of variants is closed and mirrors the configuration grammar:
//! phrase triggers (`TITLE`, `DESCRIPTION`), time triggers (`BEFORE`, `AFTER`)
//! and composites (`NOT`, `AND`, `OR`). Composite operands are shared `Arc`
//! handles so one registered trigger can feed several composites.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::TimeParseError;
use crate::phrase;
use crate::story::Story;

/// chrono pattern for thresholds such as `12 Oct 2016 23:59:59`.
pub const THRESHOLD_FORMAT: &str = "%d %b %Y %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Phrase (lowercased) must occur in the title.
    Title(String),
    /// Phrase (lowercased) must occur in the description.
    Description(String),
    /// Story published strictly before the threshold.
    Before(DateTime<Utc>),
    /// Story published strictly after the threshold.
    After(DateTime<Utc>),
    Not(Arc<Trigger>),
    And(Arc<Trigger>, Arc<Trigger>),
    Or(Arc<Trigger>, Arc<Trigger>),
}

/// Parse a naive threshold string and pin it to UTC.
pub fn parse_threshold(input: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), THRESHOLD_FORMAT).map_err(|e| {
        TimeParseError {
            input: input.to_string(),
            source: e,
        }
    })?;
    Ok(Utc.from_utc_datetime(&naive))
}

impl Trigger {
    pub fn title(phrase: &str) -> Self {
        Trigger::Title(phrase.to_lowercase())
    }

    pub fn description(phrase: &str) -> Self {
        Trigger::Description(phrase.to_lowercase())
    }

    pub fn before(threshold: &str) -> Result<Self, TimeParseError> {
        parse_threshold(threshold).map(Trigger::Before)
    }

    pub fn after(threshold: &str) -> Result<Self, TimeParseError> {
        parse_threshold(threshold).map(Trigger::After)
    }

    pub fn not(inner: Arc<Trigger>) -> Self {
        Trigger::Not(inner)
    }

    pub fn and(left: Arc<Trigger>, right: Arc<Trigger>) -> Self {
        Trigger::And(left, right)
    }

    pub fn or(left: Arc<Trigger>, right: Arc<Trigger>) -> Self {
        Trigger::Or(left, right)
    }

    /// Whether this trigger fires for `story`. Pure; composites short-circuit.
    pub fn evaluate(&self, story: &Story) -> bool {
        match self {
            Trigger::Title(p) => phrase::contains(p, &story.title),
            Trigger::Description(p) => phrase::contains(p, &story.description),
            Trigger::Before(t) => story.published_utc() < *t,
            Trigger::After(t) => story.published_utc() > *t,
            Trigger::Not(inner) => !inner.evaluate(story),
            Trigger::And(a, b) => a.evaluate(story) && b.evaluate(story),
            Trigger::Or(a, b) => a.evaluate(story) || b.evaluate(story),
        }
    }

    /// Config keyword this variant is built from.
    pub fn keyword(&self) -> &'static str {
        match self {
            Trigger::Title(_) => "TITLE",
            Trigger::Description(_) => "DESCRIPTION",
            Trigger::Before(_) => "BEFORE",
            Trigger::After(_) => "AFTER",
            Trigger::Not(_) => "NOT",
            Trigger::And(..) => "AND",
            Trigger::Or(..) => "OR",
        }
    }

    /// Nesting depth; leaves are 1.
    pub fn depth(&self) -> usize {
        match self {
            Trigger::Title(_) | Trigger::Description(_) | Trigger::Before(_) | Trigger::After(_) => 1,
            Trigger::Not(inner) => 1 + inner.depth(),
            Trigger::And(a, b) | Trigger::Or(a, b) => 1 + a.depth().max(b.depth()),
        }
    }
}
