use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiwakeError};

/// One dimension the ranker compares on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Higher resolution first.
    Resolution,
    /// Any HDR format before none.
    Hdr,
    /// Dual audio before single.
    DualAudio,
    /// Better audio tier first.
    AudioQuality,
    /// Better codec first.
    Codec,
    /// Larger file first.
    Size,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Self::Resolution,
        Self::Hdr,
        Self::DualAudio,
        Self::AudioQuality,
        Self::Codec,
        Self::Size,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resolution => "resolution",
            Self::Hdr => "hdr",
            Self::DualAudio => "dual_audio",
            Self::AudioQuality => "audio_quality",
            Self::Codec => "codec",
            Self::Size => "size",
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = ShiwakeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ShiwakeError::InvalidPriority(format!("unknown criterion {s:?}")))
    }
}

/// Ordered list of ranking criteria, most significant first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Criterion>", into = "Vec<Criterion>")]
pub struct QualityPriority {
    criteria: Vec<Criterion>,
}

impl QualityPriority {
    /// The fixed default order.
    pub const DEFAULT: [Criterion; 5] = [
        Criterion::Resolution,
        Criterion::Hdr,
        Criterion::DualAudio,
        Criterion::AudioQuality,
        Criterion::Size,
    ];

    /// Builds a priority list.
    ///
    /// # Errors
    ///
    /// Returns `ShiwakeError::InvalidPriority` if `criteria` is empty or
    /// names a criterion twice.
    pub fn new(criteria: Vec<Criterion>) -> Result<Self> {
        if criteria.is_empty() {
            return Err(ShiwakeError::InvalidPriority(
                "at least one criterion is required".into(),
            ));
        }
        for (i, criterion) in criteria.iter().enumerate() {
            if criteria[..i].contains(criterion) {
                return Err(ShiwakeError::InvalidPriority(format!(
                    "{criterion} listed more than once"
                )));
            }
        }
        Ok(Self { criteria })
    }

    /// Parses criterion names such as `["resolution", "hdr", "size"]`.
    ///
    /// # Errors
    ///
    /// Returns `ShiwakeError::InvalidPriority` for unknown names and for the
    /// conditions checked by [`QualityPriority::new`].
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let criteria = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<Result<Vec<Criterion>>>()?;
        Self::new(criteria)
    }

    #[must_use]
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }
}

impl Default for QualityPriority {
    fn default() -> Self {
        Self {
            criteria: Self::DEFAULT.to_vec(),
        }
    }
}

impl TryFrom<Vec<Criterion>> for QualityPriority {
    type Error = ShiwakeError;

    fn try_from(criteria: Vec<Criterion>) -> Result<Self> {
        Self::new(criteria)
    }
}

impl From<QualityPriority> for Vec<Criterion> {
    fn from(priority: QualityPriority) -> Self {
        priority.criteria
    }
}

impl std::fmt::Display for QualityPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.criteria.iter().map(|c| c.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}
