//! # Release Tag Vocabulary
//!
//! Ordered tag lists for every category the extractor recognizes. Each
//! category lists its tiers best first; a tier owns the aliases (regex
//! fragments, matched case-insensitively) that classify a filename into it.
//! `noise` aliases are removed from the title but never classify anything.
//!
//! The order of `tiers` is the priority order: when several aliases could
//! match at the same position, the earlier tier wins.

use std::ops::RangeInclusive;

use regex::Regex;

use crate::error::Result;
use crate::types::{AudioTier, HdrFormat, Resolution, VideoCodec};

/// One category of release tags.
#[derive(Debug)]
pub struct TagVocabulary<T: 'static> {
    /// Category name, used in log output.
    pub category: &'static str,
    /// Classified tiers, best first.
    pub tiers: &'static [(T, &'static [&'static str])],
    /// Aliases that are stripped without setting an attribute.
    pub noise: &'static [&'static str],
}

/// Accepted release years.
pub const YEAR_RANGE: RangeInclusive<u16> = 1900..=2035;

/// Year patterns in priority order. Group 1 is the year.
pub const YEAR_PATTERNS: &[&str] = &[
    r"\((\d{4})\)",
    r"\.(\d{4})\.",
    r"\s(\d{4})\s",
    r"\.(\d{4})$",
    r"\s(\d{4})$",
];

/// Extensions stripped before any pass runs.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "mov", "wmv", "flv", "webm", "ts", "m2ts",
];

pub const RESOLUTIONS: TagVocabulary<Resolution> = TagVocabulary {
    category: "resolution",
    tiers: &[
        (Resolution::Uhd2160, &["2160p", "4k", "uhd"]),
        (Resolution::Fhd1080, &["1080p", "1080i"]),
        (Resolution::Hd720, &["720p"]),
        (Resolution::Sd480, &["480p"]),
    ],
    noise: &[],
};

pub const HDR_FORMATS: TagVocabulary<HdrFormat> = TagVocabulary {
    category: "hdr",
    tiers: &[
        (HdrFormat::DolbyVision, &["dv", "dovi", r"dolby[ ._-]?vision"]),
        (HdrFormat::Hdr10Plus, &[r"hdr10\+", "hdr10plus"]),
        (HdrFormat::Hdr10, &["hdr10"]),
        (HdrFormat::Hdr, &["hdr"]),
    ],
    noise: &[],
};

pub const SOURCES: TagVocabulary<()> = TagVocabulary {
    category: "source",
    tiers: &[],
    noise: &[
        r"web[ ._-]?dl",
        r"web[ ._-]?rip",
        r"blu[ ._-]?ray",
        "bdrip",
        "brrip",
        "remux",
        "hdts",
        "hdtv",
        r"dvd[ ._-]?rip",
        "bd",
    ],
};

pub const AUDIO_TIERS: TagVocabulary<AudioTier> = TagVocabulary {
    category: "audio",
    tiers: &[
        (AudioTier::Atmos, &["atmos"]),
        (AudioTier::TrueHd, &[r"true[ ._-]?hd"]),
        (AudioTier::DtsHd, &[r"dts[ ._-]?hd(?:[ ._-]?ma)?"]),
        (AudioTier::Ddp71, &[r"ddp[ ._]?7\.1", r"dd\+[ ._]?7\.1", r"eac3[ ._]?7\.1"]),
        (AudioTier::Dd71, &[r"dd[ ._]?7\.1"]),
        (AudioTier::Ddp51, &[r"ddp[ ._]?5\.1", r"dd\+[ ._]?5\.1", r"eac3[ ._]?5\.1"]),
        (AudioTier::Dd51, &[r"dd[ ._]?5\.1"]),
        (AudioTier::Aac, &[r"aac(?:[ ._]?2\.0)?"]),
        (AudioTier::Ac3, &["ac3"]),
    ],
    noise: &[r"7\.1", r"5\.1", r"2\.0", "dts", "ddp", "eac3"],
};

pub const VIDEO_CODECS: TagVocabulary<VideoCodec> = TagVocabulary {
    category: "codec",
    tiers: &[
        (VideoCodec::H265, &[r"h\.?265"]),
        (VideoCodec::Hevc, &["hevc"]),
        (VideoCodec::X265, &["x265"]),
        (VideoCodec::H264, &[r"h\.?264"]),
        (VideoCodec::X264, &["x264"]),
    ],
    noise: &["avc", r"10[ ._-]?bit", r"8[ ._-]?bit"],
};

/// Language tags. The single tier marks dual-audio releases.
pub const LANGUAGES: TagVocabulary<bool> = TagVocabulary {
    category: "language",
    tiers: &[(true, &[r"dual(?:[ ._-]?audio)?"])],
    noise: &[
        "latino",
        "spanish",
        "english",
        "ingl[eé]s",
        "espa[ñn]ol",
        "castellano",
        "multi",
        "subs?",
    ],
};

pub const PLATFORMS: TagVocabulary<()> = TagVocabulary {
    category: "platform",
    tiers: &[],
    noise: &[
        "amzn", "nf", "atvp", "aptv", "dsnp", "ma", "hbo", "hmax", "hulu", "chilebt",
    ],
};

pub const EDITIONS: TagVocabulary<()> = TagVocabulary {
    category: "edition",
    tiers: &[],
    noise: &[
        "extended",
        "unrated",
        "uncut",
        "remastered",
        "imax",
        "clean",
        "line",
        r"director'?s[ ._-]?cut",
        "theatrical",
        r"special[ ._-]?edition",
    ],
};

/// What one pass found in the working text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Taken<T> {
    /// Leftmost classified tier, if any alias of a tier matched.
    pub tier: Option<T>,
    /// Whether any alias (tier or noise) matched and was erased.
    pub matched: bool,
}

/// A compiled [`TagVocabulary`].
///
/// Capture group `i + 1` of the compiled pattern corresponds to tier `i`;
/// noise aliases sit in a trailing non-capturing group.
#[derive(Debug)]
pub(crate) struct TagMatcher<T: Copy + 'static> {
    category: &'static str,
    regex: Regex,
    tiers: Vec<T>,
}

impl<T: Copy + 'static> TagMatcher<T> {
    pub fn compile(vocabulary: &TagVocabulary<T>) -> Result<Self> {
        let mut groups: Vec<String> = vocabulary
            .tiers
            .iter()
            .map(|(_, aliases)| format!("({})", alternation(aliases)))
            .collect();
        if !vocabulary.noise.is_empty() {
            groups.push(format!("(?:{})", alternation(vocabulary.noise)));
        }

        let pattern = format!(r"(?i)\b(?:{})", groups.join("|"));
        Ok(Self {
            category: vocabulary.category,
            regex: Regex::new(&pattern)?,
            tiers: vocabulary.tiers.iter().map(|(tier, _)| *tier).collect(),
        })
    }

    /// Returns the leftmost classified tier in `text`, skipping noise.
    pub fn classify(&self, text: &str) -> Option<T> {
        self.regex.captures_iter(text).find_map(|caps| {
            self.tiers
                .iter()
                .enumerate()
                .find(|(i, _)| caps.get(i + 1).is_some())
                .map(|(_, tier)| *tier)
        })
    }

    /// Classifies `work`, then replaces every match with a space.
    pub fn take(&self, work: &mut String) -> Taken<T> {
        let tier = self.classify(work);
        let matched = self.regex.is_match(work);
        if matched {
            *work = self.regex.replace_all(work, " ").into_owned();
            tracing::trace!(category = self.category, remaining = %work, "stripped tags");
        }
        Taken { tier, matched }
    }
}

fn alternation(aliases: &[&str]) -> String {
    aliases
        .iter()
        .map(|alias| bounded(alias))
        .collect::<Vec<_>>()
        .join("|")
}

/// Appends a word boundary unless the alias ends in a non-word character,
/// where `\b` would require the next character to be a word character.
fn bounded(alias: &str) -> String {
    if alias.ends_with(r"\+") {
        alias.to_string()
    } else {
        format!(r"{alias}\b")
    }
}
