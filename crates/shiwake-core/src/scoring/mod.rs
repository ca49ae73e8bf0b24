pub mod priority;
pub mod ranker;

pub use priority::{Criterion, QualityPriority};
pub use ranker::Ranker;
