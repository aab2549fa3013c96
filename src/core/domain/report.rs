//! Copy reports.
//!
//! Every listed item ends in exactly one terminal [`Outcome`]. Per-secret
//! flow: `Pending -> Skipped | SealFailed | Sealed -> (Uploaded | UploadFailed)`,
//! where a dry run stops at `Sealed` and records `DryRun`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::types::{EnvironmentName, Name};

/// Which pipeline produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    Variables,
    Secrets,
}

impl Pipeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Variables => "variables",
            Self::Secrets => "secrets",
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an item was not copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    EmptyValue,
    InvalidName(String),
    NotInFile,
    EmptyInFile,
    NoInput,
    Cancelled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue => f.write_str("empty value"),
            Self::InvalidName(reason) => write!(f, "invalid name: {}", reason),
            Self::NotInFile => f.write_str("not found in secrets file"),
            Self::EmptyInFile => f.write_str("empty value in secrets file"),
            Self::NoInput => f.write_str("no value entered"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Terminal state of one variable or secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    /// Variable created on the target.
    Created,
    /// Secret sealed and uploaded to the target.
    Uploaded,
    /// Name reported by a read-only mode.
    Listed,
    /// Would have been written; `--dry-run` was set.
    DryRun,
    Skipped(SkipReason),
    CreateFailed(String),
    SealFailed(String),
    UploadFailed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Created | Self::Uploaded)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::CreateFailed(_) | Self::SealFailed(_) | Self::UploadFailed(_)
        )
    }
}

/// One item's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub name: Name,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Result of one pipeline run, items in listing order.
#[derive(Debug, Clone, Serialize)]
pub struct CopyReport {
    pub pipeline: Pipeline,
    pub source: EnvironmentName,
    pub target: EnvironmentName,
    pub finished_at: DateTime<Utc>,
    pub items: Vec<ItemReport>,
}

impl CopyReport {
    pub fn new(
        pipeline: Pipeline,
        source: impl Into<EnvironmentName>,
        target: impl Into<EnvironmentName>,
        items: Vec<ItemReport>,
    ) -> Self {
        Self {
            pipeline,
            source: source.into(),
            target: target.into(),
            finished_at: Utc::now(),
            items,
        }
    }

    /// Items written to the target (variables created, secrets uploaded).
    pub fn created(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_success()).count()
    }

    pub fn skipped(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_failure()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    /// Outcome recorded for `name`, if it was listed.
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.items
            .iter()
            .find(|i| i.name == name)
            .map(|i| &i.outcome)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.name.as_str())
    }
}
