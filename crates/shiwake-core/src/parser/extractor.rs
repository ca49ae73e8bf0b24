use regex::Regex;

use crate::error::Result;
use crate::parser::series::SeriesDetector;
use crate::parser::vocabulary::{
    TagMatcher, AUDIO_TIERS, EDITIONS, HDR_FORMATS, LANGUAGES, PLATFORMS, RESOLUTIONS, SOURCES,
    VIDEO_CODECS, VIDEO_EXTENSIONS,
};
use crate::parser::year::{YearExtractor, YearMatch};
use crate::types::{AttributeRecord, AudioTier, HdrFormat, Resolution, SeriesInfo, VideoCodec};

/// Filename classifier.
///
/// Runs three independent passes over the filename stem: title cleaning
/// (which also classifies release tags), year extraction, and series marker
/// detection. All patterns are compiled once in [`AttributeExtractor::new`];
/// extraction itself never fails.
#[derive(Debug)]
pub struct AttributeExtractor {
    re_extension: Regex,
    re_release_group: Regex,
    re_brackets: Regex,
    re_disambiguator: Regex,
    resolution: TagMatcher<Resolution>,
    hdr: TagMatcher<HdrFormat>,
    source: TagMatcher<()>,
    audio: TagMatcher<AudioTier>,
    codec: TagMatcher<VideoCodec>,
    language: TagMatcher<bool>,
    platform: TagMatcher<()>,
    edition: TagMatcher<()>,
    year: YearExtractor,
    series: SeriesDetector,
}

/// Result of one cleaning run over some text.
#[derive(Debug)]
struct Cleaned {
    title: String,
    resolution: Option<Resolution>,
    hdr: Option<HdrFormat>,
    audio: Option<AudioTier>,
    codec: Option<VideoCodec>,
    dual_audio: bool,
}

impl AttributeExtractor {
    /// Compiles every pattern.
    ///
    /// # Errors
    ///
    /// Returns `ShiwakeError::Regex` if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_extension: Regex::new(&format!(r"(?i)\.(?:{})$", VIDEO_EXTENSIONS.join("|")))?,
            re_release_group: Regex::new(r"(?i)(?:^|[\s.\])])-[a-z0-9]{2,}\s*$")?,
            re_brackets: Regex::new(r"\[[^\]]*\]")?,
            re_disambiguator: Regex::new(
                r"(?i)\((?:[^)]*(?:blu-?ray|web|remux|dual)[^)]*|\s*)\)",
            )?,
            resolution: TagMatcher::compile(&RESOLUTIONS)?,
            hdr: TagMatcher::compile(&HDR_FORMATS)?,
            source: TagMatcher::compile(&SOURCES)?,
            audio: TagMatcher::compile(&AUDIO_TIERS)?,
            codec: TagMatcher::compile(&VIDEO_CODECS)?,
            language: TagMatcher::compile(&LANGUAGES)?,
            platform: TagMatcher::compile(&PLATFORMS)?,
            edition: TagMatcher::compile(&EDITIONS)?,
            year: YearExtractor::new()?,
            series: SeriesDetector::new()?,
        })
    }

    /// Classifies `filename`, recognizing series markers.
    pub fn extract(&self, filename: &str) -> AttributeRecord {
        self.extract_inner(filename, true)
    }

    /// Classifies `filename` as a movie, skipping series detection.
    pub fn extract_movie(&self, filename: &str) -> AttributeRecord {
        self.extract_inner(filename, false)
    }

    fn extract_inner(&self, filename: &str, detect_series: bool) -> AttributeRecord {
        let stem = self.stem(filename.trim());
        let year = self.year.find(stem);
        let cleaned = self.clean(stem, year.as_ref());

        let mut record = AttributeRecord::new(filename);
        record.title = cleaned.title;
        record.year = year.map(|m| m.year);
        record.resolution = cleaned.resolution.unwrap_or_default();
        record.hdr = cleaned.hdr.unwrap_or_default();
        record.audio = cleaned.audio.unwrap_or_default();
        record.codec = cleaned.codec.unwrap_or_default();
        record.dual_audio = cleaned.dual_audio;

        if detect_series {
            record.series = self.series_info(stem);
            if let Some(ref series) = record.series {
                record.title = series.name.clone();
            }
        }

        tracing::debug!(file = filename, record = %record, "classified");
        record
    }

    fn stem<'a>(&self, filename: &'a str) -> &'a str {
        match self.re_extension.find(filename) {
            Some(m) => &filename[..m.start()],
            None => filename,
        }
    }

    /// Series name is the text before the marker, cleaned like a title.
    fn series_info(&self, stem: &str) -> Option<SeriesInfo> {
        let marker = self.series.detect(stem)?;
        let prefix = &stem[..marker.start];
        let name = self.clean(prefix, self.year.find(prefix).as_ref()).title;
        if name.is_empty() {
            return None;
        }
        Some(SeriesInfo {
            name,
            season: marker.season,
            episode: marker.episode,
        })
    }

    fn clean(&self, text: &str, year: Option<&YearMatch>) -> Cleaned {
        let mut work = text.to_string();
        if let Some(m) = year {
            work.replace_range(m.span.clone(), " ");
        }

        let resolution = self.resolution.take(&mut work);
        let hdr = self.hdr.take(&mut work);
        let source = self.source.take(&mut work);
        let audio = self.audio.take(&mut work);
        let codec = self.codec.take(&mut work);
        let language = self.language.take(&mut work);
        let platform = self.platform.take(&mut work);
        let edition = self.edition.take(&mut work);

        let tagged = year.is_some()
            || resolution.matched
            || hdr.matched
            || source.matched
            || audio.matched
            || codec.matched
            || language.matched
            || platform.matched
            || edition.matched;
        if tagged {
            work = self.re_release_group.replace(&work, " ").into_owned();
        }

        work = self.re_brackets.replace_all(&work, " ").into_owned();
        work = self.re_disambiguator.replace_all(&work, " ").into_owned();

        let title = work
            .replace(['.', '_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        Cleaned {
            title,
            resolution: resolution.tier,
            hdr: hdr.tier,
            audio: audio.tier,
            codec: codec.tier,
            dual_audio: language.tier.unwrap_or(false),
        }
    }
}
