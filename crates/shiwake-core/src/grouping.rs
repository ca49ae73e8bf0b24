//! Partitioning candidates by identity key.

use std::collections::HashMap;

use serde::Serialize;

use crate::identity::{episode_key, identity_key, EpisodeKey, IdentityKey};
use crate::types::Candidate;

/// Candidates sharing one identity key, in insertion order.
///
/// A group with `key == None` always holds exactly one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateGroup {
    pub key: Option<IdentityKey>,
    pub members: Vec<Candidate>,
}

impl CandidateGroup {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }

    #[must_use]
    pub fn is_series(&self) -> bool {
        self.key.as_ref().is_some_and(IdentityKey::is_series)
    }

    /// Splits the group by episode key, in first-seen order.
    ///
    /// Members without an episode key (every member of a movie group) are
    /// left out.
    #[must_use]
    pub fn episodes(&self) -> Vec<(EpisodeKey, Vec<&Candidate>)> {
        let mut index: HashMap<EpisodeKey, usize> = HashMap::new();
        let mut out: Vec<(EpisodeKey, Vec<&Candidate>)> = Vec::new();

        for member in &self.members {
            let Some(key) = episode_key(&member.record) else {
                continue;
            };
            match index.get(&key) {
                Some(&i) => out[i].1.push(member),
                None => {
                    index.insert(key, out.len());
                    out.push((key, vec![member]));
                }
            }
        }

        out
    }
}

/// Every group of one run, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateSet {
    groups: Vec<CandidateGroup>,
}

impl CandidateSet {
    #[must_use]
    pub fn groups(&self) -> &[CandidateGroup] {
        &self.groups
    }

    #[must_use]
    pub fn into_groups(self) -> Vec<CandidateGroup> {
        self.groups
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups with more than one member.
    pub fn duplicate_groups(&self) -> impl Iterator<Item = &CandidateGroup> {
        self.groups.iter().filter(|g| g.is_duplicate())
    }

    /// Total number of candidates across all groups.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.groups.iter().map(CandidateGroup::len).sum()
    }
}

/// Groups `candidates` by identity key in a single pass.
///
/// Candidates without a key become singleton groups at the position they
/// were seen.
pub fn group(candidates: impl IntoIterator<Item = Candidate>) -> CandidateSet {
    let mut index: HashMap<IdentityKey, usize> = HashMap::new();
    let mut groups: Vec<CandidateGroup> = Vec::new();

    for candidate in candidates {
        let Some(key) = identity_key(&candidate.record) else {
            groups.push(CandidateGroup {
                key: None,
                members: vec![candidate],
            });
            continue;
        };

        match index.get(&key) {
            Some(&i) => groups[i].members.push(candidate),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(CandidateGroup {
                    key: Some(key),
                    members: vec![candidate],
                });
            }
        }
    }

    CandidateSet { groups }
}
