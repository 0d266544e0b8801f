// src/error.rs
//! Typed errors for trigger configuration.
//!
//! Evaluation and filtering are total, so everything here surfaces from
//! building the trigger set, never from applying it.

use thiserror::Error;

/// A `BEFORE`/`AFTER` time string that does not fit `day mon year hh:mm:ss`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time `{input}` (expected e.g. `3 Oct 2016 17:00:10`): {source}")]
pub struct TimeParseError {
    pub input: String,
    #[source]
    pub source: chrono::ParseError,
}

/// Why a configuration record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigErrorKind {
    #[error("unknown trigger type `{0}`")]
    UnknownType(String),

    #[error("undefined trigger `{0}`")]
    UndefinedReference(String),

    #[error("`{keyword}` expects {expected} fields, got {actual}")]
    WrongFieldCount {
        keyword: String,
        expected: String,
        actual: usize,
    },

    #[error("empty trigger name")]
    EmptyName,

    #[error("trigger `{0}` is already defined")]
    DuplicateName(String),

    #[error("`ADD` is reserved and cannot name a trigger")]
    ReservedName,

    #[error(transparent)]
    Time(#[from] TimeParseError),
}

/// A rejected configuration line, with its 1-based number and raw content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("trigger config line {line} (`{content}`): {kind}")]
pub struct ConfigError {
    pub line: usize,
    pub content: String,
    #[source]
    pub kind: ConfigErrorKind,
}

impl ConfigError {
    pub fn new(line: usize, content: impl Into<String>, kind: ConfigErrorKind) -> Self {
        Self {
            line,
            content: content.into(),
            kind,
        }
    }
}
