//! # Engine
//!
//! One run over a batch of files: extract every record, group by identity,
//! rank each duplicate group and resolve it into dispositions. Nothing is
//! touched on disk; the caller acts on the returned [`RunOutcome`].
//!
//! Movie groups are ranked as a whole. Series groups are split by episode
//! first, and each episode with more than one copy is ranked on its own.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grouping::{group, CandidateSet};
use crate::identity::{EpisodeKey, IdentityKey};
use crate::normalize::normalize;
use crate::parser::AttributeExtractor;
use crate::policy::{resolve, Disposition, DuplicateAction, Verdict};
use crate::scoring::{QualityPriority, Ranker};
use crate::types::{AttributeRecord, Candidate, MediaEntry};

/// Which classifications a run allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Every file is a movie; episode markers are ignored.
    #[default]
    Movies,
    /// Files with an episode marker are grouped as series.
    MoviesAndSeries,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub mode: ScanMode,
    pub priority: QualityPriority,
    pub action: DuplicateAction,
}

/// Something worth telling the user that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanWarning {
    /// A movie without a recognizable year. It is never grouped.
    MissingYear { path: PathBuf, title: String },
    /// The title normalizes to nothing.
    EmptyTitle { path: PathBuf },
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingYear { path, title } => {
                write!(f, "no year found for {title:?} ({})", path.display())
            }
            Self::EmptyTitle { path } => write!(f, "no title found in {}", path.display()),
        }
    }
}

/// The ranked verdicts for one duplicate group (or one episode of a series).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDecision {
    pub key: IdentityKey,
    pub episode: Option<EpisodeKey>,
    /// Best first; the head is always [`Verdict::Keep`].
    pub dispositions: Vec<Disposition<Candidate>>,
}

impl GroupDecision {
    #[must_use]
    pub fn keeper(&self) -> Option<&Candidate> {
        self.dispositions
            .iter()
            .find(|d| d.verdict.is_keep())
            .map(|d| &d.item)
    }

    /// Every copy that is not kept.
    pub fn duplicates(&self) -> impl Iterator<Item = &Disposition<Candidate>> {
        self.dispositions.iter().filter(|d| !d.verdict.is_keep())
    }

    #[must_use]
    pub fn duplicate_bytes(&self) -> u64 {
        self.duplicates()
            .map(|d| d.item.record.source_size_bytes)
            .sum()
    }
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub scanned: usize,
    pub movies: usize,
    pub episodes: usize,
    pub groups: usize,
    pub duplicate_groups: usize,
    pub duplicate_files: usize,
    pub ungrouped: usize,
    pub reclaimable_bytes: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunOutcome {
    pub candidates: CandidateSet,
    pub decisions: Vec<GroupDecision>,
    pub warnings: Vec<ScanWarning>,
    pub stats: RunStats,
}

impl RunOutcome {
    /// Dispositions with the given verdict across all decisions.
    pub fn with_verdict(&self, verdict: Verdict) -> impl Iterator<Item = &Disposition<Candidate>> {
        self.decisions
            .iter()
            .flat_map(|d| &d.dispositions)
            .filter(move |d| d.verdict == verdict)
    }
}

#[derive(Debug)]
pub struct Engine {
    extractor: AttributeExtractor,
    ranker: Ranker,
    config: EngineConfig,
}

impl Engine {
    /// # Errors
    ///
    /// Returns `ShiwakeError::Regex` if the extractor fails to compile.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self {
            extractor: AttributeExtractor::new()?,
            ranker: Ranker::new(config.priority.clone()),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn extractor(&self) -> &AttributeExtractor {
        &self.extractor
    }

    /// Extracts one filename according to the configured mode.
    #[must_use]
    pub fn classify(&self, filename: &str) -> AttributeRecord {
        match self.config.mode {
            ScanMode::Movies => self.extractor.extract_movie(filename),
            ScanMode::MoviesAndSeries => self.extractor.extract(filename),
        }
    }

    pub fn run(&self, entries: impl IntoIterator<Item = MediaEntry>) -> RunOutcome {
        let candidates: Vec<Candidate> = entries
            .into_iter()
            .map(|entry| {
                let record = self.classify(&entry.file_name()).with_size(entry.size_bytes);
                Candidate::new(entry.path, record)
            })
            .collect();

        let mut stats = RunStats {
            scanned: candidates.len(),
            ..RunStats::default()
        };
        let mut warnings = Vec::new();

        for candidate in &candidates {
            let record = &candidate.record;
            if record.is_series() {
                stats.episodes += 1;
                continue;
            }
            stats.movies += 1;
            if normalize(&record.title).is_empty() {
                tracing::warn!(path = %candidate.path.display(), "no title found");
                warnings.push(ScanWarning::EmptyTitle {
                    path: candidate.path.clone(),
                });
            } else if record.year.is_none() {
                tracing::warn!(path = %candidate.path.display(), title = %record.title, "no year found");
                warnings.push(ScanWarning::MissingYear {
                    path: candidate.path.clone(),
                    title: record.title.clone(),
                });
            }
        }

        let set = group(candidates);
        let decisions = self.decide(&set);

        stats.groups = set.len();
        stats.ungrouped = set.groups().iter().filter(|g| g.key.is_none()).count();
        stats.duplicate_groups = decisions.len();
        stats.duplicate_files = decisions.iter().map(|d| d.duplicates().count()).sum();
        stats.reclaimable_bytes = decisions.iter().map(GroupDecision::duplicate_bytes).sum();

        tracing::info!(
            scanned = stats.scanned,
            groups = stats.groups,
            duplicate_groups = stats.duplicate_groups,
            duplicate_files = stats.duplicate_files,
            ungrouped = stats.ungrouped,
            "run complete"
        );

        RunOutcome {
            candidates: set,
            decisions,
            warnings,
            stats,
        }
    }

    fn decide(&self, set: &CandidateSet) -> Vec<GroupDecision> {
        let mut decisions = Vec::new();

        for g in set.groups() {
            let Some(ref key) = g.key else {
                continue;
            };

            if g.is_series() {
                for (episode, members) in g.episodes() {
                    if members.len() < 2 {
                        continue;
                    }
                    let owned = members.into_iter().cloned().collect();
                    decisions.push(self.decision(key, Some(episode), owned));
                }
            } else if g.is_duplicate() {
                decisions.push(self.decision(key, None, g.members.clone()));
            }
        }

        decisions
    }

    fn decision(
        &self,
        key: &IdentityKey,
        episode: Option<EpisodeKey>,
        members: Vec<Candidate>,
    ) -> GroupDecision {
        let ranked = self.ranker.rank(members);
        tracing::debug!(key = %key, copies = ranked.len(), "ranked duplicate group");
        GroupDecision {
            key: key.clone(),
            episode,
            dispositions: resolve(ranked, self.config.action),
        }
    }
}
