pub mod extractor;
pub mod series;
pub mod vocabulary;
pub mod year;

pub use extractor::AttributeExtractor;
pub use series::{EpisodeMarker, MarkerKind, SeriesDetector};
pub use vocabulary::TagVocabulary;
pub use year::{YearExtractor, YearMatch};
