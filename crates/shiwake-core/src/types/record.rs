use serde::{Deserialize, Serialize};

use super::quality::{AudioTier, HdrFormat, Resolution, VideoCodec};

/// Season/episode position of a series file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesInfo {
    /// Cleaned series name (text preceding the episode marker).
    pub name: String,
    /// Season number, `1` when the filename only carries an episode.
    pub season: u32,
    /// Episode number.
    pub episode: u32,
}

/// Everything the extractor recognized in one filename.
///
/// Produced by [`AttributeExtractor`](crate::parser::AttributeExtractor);
/// every field is derived from the filename text except
/// `source_size_bytes`, which the caller supplies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// Filename as found on disk, extension included.
    pub raw_name: String,

    /// Residual title after release tags are removed. For series this is
    /// the cleaned series name.
    pub title: String,

    /// Release year, validated to 1900–2035.
    pub year: Option<u16>,

    pub resolution: Resolution,

    pub hdr: HdrFormat,

    pub audio: AudioTier,

    pub codec: VideoCodec,

    /// The release bundles two language tracks.
    pub dual_audio: bool,

    /// Present when the filename carries a season/episode marker.
    pub series: Option<SeriesInfo>,

    /// Size reported by the filesystem, used as the last ranking tie-break.
    pub source_size_bytes: u64,
}

impl AttributeRecord {
    /// Creates a record with every attribute at its default.
    #[must_use]
    pub fn new(raw_name: impl Into<String>) -> Self {
        Self {
            raw_name: raw_name.into(),
            title: String::new(),
            year: None,
            resolution: Resolution::Unknown,
            hdr: HdrFormat::None,
            audio: AudioTier::Unknown,
            codec: VideoCodec::Unknown,
            dual_audio: false,
            series: None,
            source_size_bytes: 0,
        }
    }

    /// Sets the filesystem size.
    #[must_use]
    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.source_size_bytes = size_bytes;
        self
    }

    #[must_use]
    pub fn is_series(&self) -> bool {
        self.series.is_some()
    }

    /// Returns `true` if any release tag was recognized.
    #[must_use]
    pub fn has_release_tags(&self) -> bool {
        self.resolution != Resolution::Unknown
            || self.hdr.is_hdr()
            || self.audio != AudioTier::Unknown
            || self.codec != VideoCodec::Unknown
            || self.dual_audio
    }
}

impl AsRef<AttributeRecord> for AttributeRecord {
    fn as_ref(&self) -> &AttributeRecord {
        self
    }
}

impl std::fmt::Display for AttributeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.title)?;
        if let Some(year) = self.year {
            write!(f, " ({year})")?;
        }
        if let Some(ref series) = self.series {
            write!(f, " S{:02}E{:02}", series.season, series.episode)?;
        }
        write!(f, " [{}", self.resolution)?;
        if self.hdr.is_hdr() {
            write!(f, ", {}", self.hdr)?;
        }
        if self.audio != AudioTier::Unknown {
            write!(f, ", {}", self.audio)?;
        }
        if self.codec != VideoCodec::Unknown {
            write!(f, ", {}", self.codec)?;
        }
        if self.dual_audio {
            write!(f, ", DUAL")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_defaults() {
        let record = AttributeRecord::new("file.mkv");
        assert_eq!(record.raw_name, "file.mkv");
        assert!(record.title.is_empty());
        assert_eq!(record.year, None);
        assert_eq!(record.resolution, Resolution::Unknown);
        assert_eq!(record.hdr, HdrFormat::None);
        assert!(!record.is_series());
        assert!(!record.has_release_tags());
        assert_eq!(record.source_size_bytes, 0);
    }

    #[test]
    fn with_size_sets_bytes() {
        let record = AttributeRecord::new("file.mkv").with_size(4_000);
        assert_eq!(record.source_size_bytes, 4_000);
    }

    #[test]
    fn display_lists_recognized_tags() {
        let mut record = AttributeRecord::new("x.mkv");
        record.title = "Movie Name".into();
        record.year = Some(2020);
        record.resolution = Resolution::Uhd2160;
        record.hdr = HdrFormat::Hdr;
        record.dual_audio = true;
        let display = record.to_string();
        assert!(display.contains("Movie Name"));
        assert!(display.contains("(2020)"));
        assert!(display.contains("2160p"));
        assert!(display.contains("HDR"));
        assert!(display.contains("DUAL"));
    }

    #[test]
    fn display_series_marker() {
        let mut record = AttributeRecord::new("x.mkv");
        record.title = "Show".into();
        record.series = Some(SeriesInfo {
            name: "Show".into(),
            season: 1,
            episode: 2,
        });
        assert!(record.to_string().contains("S01E02"));
    }
}
