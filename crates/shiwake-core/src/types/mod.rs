pub mod candidate;
pub mod quality;
pub mod record;

pub use candidate::{Candidate, MediaEntry};
pub use quality::{AudioTier, HdrFormat, Resolution, VideoCodec};
pub use record::{AttributeRecord, SeriesInfo};
