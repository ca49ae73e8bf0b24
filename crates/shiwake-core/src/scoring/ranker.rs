use std::cmp::Ordering;

use crate::scoring::priority::{Criterion, QualityPriority};
use crate::types::AttributeRecord;

/// Orders competing copies of one title, best first.
///
/// The comparator walks the priority list and returns the first non-equal
/// criterion. The sort is stable, so copies that tie on every criterion keep
/// their insertion order.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    priority: QualityPriority,
}

impl Ranker {
    #[must_use]
    pub fn new(priority: QualityPriority) -> Self {
        Self { priority }
    }

    #[must_use]
    pub fn priority(&self) -> &QualityPriority {
        &self.priority
    }

    /// Sorts `items` best first. The head is the canonical copy.
    #[must_use]
    pub fn rank<T: AsRef<AttributeRecord>>(&self, mut items: Vec<T>) -> Vec<T> {
        items.sort_by(|a, b| self.compare(a.as_ref(), b.as_ref()));
        items
    }

    /// `Less` means `a` is the better copy.
    #[must_use]
    pub fn compare(&self, a: &AttributeRecord, b: &AttributeRecord) -> Ordering {
        self.priority
            .criteria()
            .iter()
            .map(|criterion| compare_by(*criterion, a, b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

fn compare_by(criterion: Criterion, a: &AttributeRecord, b: &AttributeRecord) -> Ordering {
    match criterion {
        Criterion::Resolution => a.resolution.cmp(&b.resolution),
        Criterion::Hdr => b.hdr.is_hdr().cmp(&a.hdr.is_hdr()),
        Criterion::DualAudio => b.dual_audio.cmp(&a.dual_audio),
        Criterion::AudioQuality => a.audio.cmp(&b.audio),
        Criterion::Codec => a.codec.cmp(&b.codec),
        Criterion::Size => b.source_size_bytes.cmp(&a.source_size_bytes),
    }
}
