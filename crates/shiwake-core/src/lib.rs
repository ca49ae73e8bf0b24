//! # Shiwake Core
//!
//! Filename-driven media classification and duplicate resolution. Turns raw
//! movie and episode filenames into structured attributes, groups copies of
//! the same title, ranks them by release quality and decides which copy to
//! keep. Everything here is pure; walking directories and moving files is
//! left to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use shiwake_core::{Engine, EngineConfig, MediaEntry, Resolution};
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let outcome = engine.run(vec![
//!     MediaEntry::new("Movie.Name.2020.1080p.DD5.1.x264-GRP.mkv", 4_000),
//!     MediaEntry::new("Movie Name (2020) 2160p HDR DUAL Atmos x265.mkv", 15_000),
//! ]);
//!
//! let decision = &outcome.decisions[0];
//! assert_eq!(decision.keeper().unwrap().record.resolution, Resolution::Uhd2160);
//! ```
pub mod engine;
pub mod error;
pub mod grouping;
pub mod identity;
pub mod naming;
pub mod normalize;
pub mod parser;
pub mod policy;
pub mod scoring;
pub mod types;

// Re-export primary API
pub use engine::{Engine, EngineConfig, GroupDecision, RunOutcome, RunStats, ScanMode, ScanWarning};
pub use error::{Result, ShiwakeError};
pub use grouping::{group, CandidateGroup, CandidateSet};
pub use identity::{episode_key, identity_key, EpisodeKey, IdentityKey};
pub use normalize::normalize;
pub use parser::AttributeExtractor;
pub use policy::{resolve, Disposition, DuplicateAction, Verdict};
pub use scoring::{Criterion, QualityPriority, Ranker};
pub use types::{
    AttributeRecord, AudioTier, Candidate, HdrFormat, MediaEntry, Resolution, SeriesInfo,
    VideoCodec,
};
