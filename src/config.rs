// src/config.rs
//! Trigger configuration: parses the line-oriented trigger file into the
//! ordered list of active triggers.
//!
//! ```text
//! // comment
//! t1,TITLE,election
//! t2,DESCRIPTION,election
//! t3,OR,t1,t2
//! t4,AFTER,3 Oct 2016 17:00:10
//! ADD,t3,t4
//! ```
//!
//! Any bad record fails the whole build with the offending line attached.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigErrorKind};
use crate::trigger::Trigger;

pub const COMMENT_MARKER: &str = "//";
pub const ADD_DIRECTIVE: &str = "ADD";
pub const TRIGGER_KEYWORDS: [&str; 7] =
    ["TITLE", "DESCRIPTION", "BEFORE", "AFTER", "NOT", "AND", "OR"];

/// Triggers selected by `ADD`, in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct ActiveTriggerList {
    entries: Vec<(String, Arc<Trigger>)>,
}

impl ActiveTriggerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, trigger: Arc<Trigger>) {
        self.entries.push((name.into(), trigger));
    }

    /// One `OR(TITLE k, DESCRIPTION k)` per non-empty keyword.
    pub fn from_keywords<S: AsRef<str>>(keywords: &[S]) -> Self {
        let mut list = Self::new();
        for k in keywords {
            let k = k.as_ref().trim();
            if k.is_empty() {
                continue;
            }
            let either = Trigger::or(
                Arc::new(Trigger::title(k)),
                Arc::new(Trigger::description(k)),
            );
            list.push(k, Arc::new(either));
        }
        list
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.entries.iter().map(|(_, t)| t.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Trigger)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t.as_ref()))
    }
}

/// Named triggers defined so far. Lives only for the duration of one build.
#[derive(Debug, Default)]
struct TriggerRegistry {
    by_name: HashMap<String, Arc<Trigger>>,
}

impl TriggerRegistry {
    fn get(&self, name: &str) -> Result<Arc<Trigger>, ConfigErrorKind> {
        if name.is_empty() {
            return Err(ConfigErrorKind::EmptyName);
        }
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigErrorKind::UndefinedReference(name.to_string()))
    }

    fn define(&mut self, name: &str, trigger: Trigger) -> Result<(), ConfigErrorKind> {
        if name.is_empty() {
            return Err(ConfigErrorKind::EmptyName);
        }
        if self.by_name.contains_key(name) {
            return Err(ConfigErrorKind::DuplicateName(name.to_string()));
        }
        self.by_name.insert(name.to_string(), Arc::new(trigger));
        Ok(())
    }
}

/// Incremental builder: feed lines in order, then `finish`.
#[derive(Debug, Default)]
pub struct TriggerRegistryBuilder {
    registry: TriggerRegistry,
    active: ActiveTriggerList,
    line_no: usize,
}

impl TriggerRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one raw line (comment, blank, definition or `ADD`).
    pub fn feed_line(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.line_no += 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            return Ok(());
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        self.apply(&fields)
            .map_err(|kind| ConfigError::new(self.line_no, line, kind))
    }

    fn apply(&mut self, fields: &[&str]) -> Result<(), ConfigErrorKind> {
        if fields[0] == ADD_DIRECTIVE {
            if fields.len() < 2 {
                return Err(wrong_count(ADD_DIRECTIVE, "at least 2", fields.len()));
            }
            // `ADD,TITLE,x` is a definition trying to use the reserved name
            let defines_add = TRIGGER_KEYWORDS.contains(&fields[1])
                && !self.registry.by_name.contains_key(fields[1]);
            if defines_add {
                return Err(ConfigErrorKind::ReservedName);
            }
            for name in &fields[1..] {
                let t = self.registry.get(name)?;
                self.active.push(*name, t);
            }
            debug!(target: "triggers", added = ?&fields[1..], "ADD");
            return Ok(());
        }

        if fields.len() < 2 {
            return Err(wrong_count("definition", "at least 3", fields.len()));
        }
        let (name, keyword) = (fields[0], fields[1]);
        let arity = match keyword {
            "TITLE" | "DESCRIPTION" | "BEFORE" | "AFTER" | "NOT" => 3,
            "AND" | "OR" => 4,
            other => return Err(ConfigErrorKind::UnknownType(other.to_string())),
        };
        if fields.len() != arity {
            return Err(wrong_count(keyword, &arity.to_string(), fields.len()));
        }

        let trigger = match keyword {
            "TITLE" => Trigger::title(fields[2]),
            "DESCRIPTION" => Trigger::description(fields[2]),
            "BEFORE" => Trigger::before(fields[2])?,
            "AFTER" => Trigger::after(fields[2])?,
            "NOT" => Trigger::not(self.registry.get(fields[2])?),
            "AND" => Trigger::and(self.registry.get(fields[2])?, self.registry.get(fields[3])?),
            _ => Trigger::or(self.registry.get(fields[2])?, self.registry.get(fields[3])?),
        };
        debug!(
            target: "triggers",
            name,
            kind = trigger.keyword(),
            depth = trigger.depth(),
            "defined trigger"
        );
        self.registry.define(name, trigger)
    }

    pub fn defined(&self) -> usize {
        self.registry.by_name.len()
    }

    pub fn finish(self) -> ActiveTriggerList {
        info!(
            target: "triggers",
            defined = self.defined(),
            active = self.active.len(),
            "trigger config built"
        );
        self.active
    }
}

fn wrong_count(keyword: &str, expected: &str, actual: usize) -> ConfigErrorKind {
    ConfigErrorKind::WrongFieldCount {
        keyword: keyword.to_string(),
        expected: expected.to_string(),
        actual,
    }
}

/// Build the active trigger list from configuration text.
pub fn build(config_text: &str) -> Result<ActiveTriggerList, ConfigError> {
    let mut b = TriggerRegistryBuilder::new();
    for line in config_text.lines() {
        b.feed_line(line)?;
    }
    Ok(b.finish())
}

/// Read a trigger file from disk and build it.
pub fn load_trigger_config(path: &Path) -> Result<ActiveTriggerList> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading trigger config from {}", path.display()))?;
    build(&content).with_context(|| format!("building triggers from {}", path.display()))
}
