//! Identity keys: which records describe the same logical title.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;
use crate::types::AttributeRecord;

/// The logical title a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentityKey {
    Movie { title: String, year: u16 },
    Series { name: String },
}

impl IdentityKey {
    #[must_use]
    pub fn is_series(&self) -> bool {
        matches!(self, Self::Series { .. })
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Movie { title, year } => write!(f, "{title} ({year})"),
            Self::Series { name } => write!(f, "{name}"),
        }
    }
}

/// Season and episode inside a series group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EpisodeKey {
    pub season: u32,
    pub episode: u32,
}

impl std::fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{:02}E{:02}", self.season, self.episode)
    }
}

/// Computes the grouping key of `record`.
///
/// Returns `None` for movies without a year and for records whose title
/// normalizes to nothing. Such records are never merged with anything.
#[must_use]
pub fn identity_key(record: &AttributeRecord) -> Option<IdentityKey> {
    if let Some(ref series) = record.series {
        let name = normalize(&series.name);
        return (!name.is_empty()).then_some(IdentityKey::Series { name });
    }

    let year = record.year?;
    let title = normalize(&record.title);
    if title.is_empty() {
        return None;
    }
    Some(IdentityKey::Movie { title, year })
}

/// The secondary key of a series record.
#[must_use]
pub fn episode_key(record: &AttributeRecord) -> Option<EpisodeKey> {
    record.series.as_ref().map(|s| EpisodeKey {
        season: s.season,
        episode: s.episode,
    })
}
