//! Turning a ranked group into per-file verdicts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiwakeError};

/// What to do with every copy except the best one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateAction {
    /// Relocate into the duplicates directory.
    #[default]
    Move,
    Delete,
    /// Only list them.
    Report,
}

impl DuplicateAction {
    #[must_use]
    pub fn verdict(self) -> Verdict {
        match self {
            Self::Move => Verdict::Move,
            Self::Delete => Verdict::Delete,
            Self::Report => Verdict::ReportOnly,
        }
    }
}

impl std::fmt::Display for DuplicateAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Move => "move",
            Self::Delete => "delete",
            Self::Report => "report",
        })
    }
}

impl FromStr for DuplicateAction {
    type Err = ShiwakeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "move" => Ok(Self::Move),
            "delete" => Ok(Self::Delete),
            "report" => Ok(Self::Report),
            other => Err(ShiwakeError::InvalidConfig(format!(
                "unknown duplicate action {other:?} (expected move, delete or report)"
            ))),
        }
    }
}

/// Outcome for one copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Keep,
    Move,
    Delete,
    ReportOnly,
}

impl Verdict {
    #[must_use]
    pub fn is_keep(self) -> bool {
        self == Self::Keep
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Keep => "keep",
            Self::Move => "move",
            Self::Delete => "delete",
            Self::ReportOnly => "report",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disposition<T> {
    pub item: T,
    pub verdict: Verdict,
}

/// Keeps the head of `ranked` and applies `action` to the rest.
///
/// Performs no I/O. An empty input yields no dispositions.
#[must_use]
pub fn resolve<T>(ranked: Vec<T>, action: DuplicateAction) -> Vec<Disposition<T>> {
    ranked
        .into_iter()
        .enumerate()
        .map(|(i, item)| Disposition {
            item,
            verdict: if i == 0 { Verdict::Keep } else { action.verdict() },
        })
        .collect()
}
