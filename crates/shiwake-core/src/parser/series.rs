//! Season/episode marker detection.

use regex::Regex;

use crate::error::Result;

/// Which family of marker matched. Declared in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `S01E02`, `S01.E02`, `Season 1 Episode 2`
    SeasonEpisode,
    /// `1x02`
    Cross,
    /// `Show - 03`
    TrailingNumber,
    /// `Episode 5`, `EP05`
    Keyword,
}

/// An episode marker found in a filename stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeMarker {
    pub kind: MarkerKind,
    pub season: u32,
    pub episode: u32,
    /// Byte offset where the marker starts; the series name is the text
    /// before it.
    pub start: usize,
}

#[derive(Debug)]
pub struct SeriesDetector {
    patterns: Vec<(MarkerKind, Regex)>,
    trailing_tags: Regex,
}

impl SeriesDetector {
    pub fn new() -> Result<Self> {
        let patterns = vec![
            (
                MarkerKind::SeasonEpisode,
                Regex::new(r"(?i)\bs(\d{1,2})[ ._-]?e(\d{1,4})")?,
            ),
            (
                MarkerKind::SeasonEpisode,
                Regex::new(r"(?i)\bseason[ ._-]*(\d{1,2})[ ._-]*(?:episode|ep)[ ._-]*(\d{1,4})\b")?,
            ),
            (MarkerKind::Cross, Regex::new(r"(?i)\b(\d{1,2})x(\d{2,3})\b")?),
            (
                MarkerKind::TrailingNumber,
                Regex::new(r"\s+-\s+(\d{1,4})(?:v\d{1,2})?$")?,
            ),
            (
                MarkerKind::Keyword,
                Regex::new(r"(?i)\b(?:episode|ep)[ ._-]?(\d{1,4})\b")?,
            ),
        ];

        Ok(Self {
            patterns,
            trailing_tags: Regex::new(r"\s*(?:\[[^\]]*\]|\([^)]*\))\s*$")?,
        })
    }

    /// Finds the highest-priority episode marker in `stem`.
    ///
    /// Trailing bracket and parenthesis groups (`[1080p]`, `(WEB)`) are
    /// ignored so `Show - 03 [1080p]` still reads as a trailing number.
    pub fn detect(&self, stem: &str) -> Option<EpisodeMarker> {
        let view = self.trim_trailing_tags(stem);

        self.patterns.iter().find_map(|(kind, pattern)| {
            pattern.captures_iter(view).find_map(|caps| {
                let whole = caps.get(0)?;
                let (season, episode) = match caps.get(2) {
                    Some(ep) => (caps[1].parse().ok()?, ep.as_str().parse().ok()?),
                    None => (1, caps[1].parse().ok()?),
                };

                if *kind == MarkerKind::TrailingNumber && looks_like_year(&caps[1]) {
                    return None;
                }

                Some(EpisodeMarker {
                    kind: *kind,
                    season,
                    episode,
                    start: whole.start(),
                })
            })
        })
    }

    fn trim_trailing_tags<'a>(&self, stem: &'a str) -> &'a str {
        let mut view = stem.trim_end();
        while let Some(m) = self.trailing_tags.find(view) {
            if m.start() == 0 {
                break;
            }
            view = view[..m.start()].trim_end();
        }
        view
    }
}

/// Four-digit numbers in the 1900s and 2000s are years, not episodes.
fn looks_like_year(digits: &str) -> bool {
    digits.len() == 4 && matches!(digits.parse::<u16>(), Ok(1900..=2099))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(stem: &str) -> Option<(u32, u32, MarkerKind)> {
        SeriesDetector::new()
            .unwrap()
            .detect(stem)
            .map(|m| (m.season, m.episode, m.kind))
    }

    #[test]
    fn season_episode_forms() {
        assert_eq!(detect("Show.S01E02"), Some((1, 2, MarkerKind::SeasonEpisode)));
        assert_eq!(detect("Show s3.e14 1080p"), Some((3, 14, MarkerKind::SeasonEpisode)));
        assert_eq!(
            detect("Show Season 2 Episode 5"),
            Some((2, 5, MarkerKind::SeasonEpisode))
        );
    }

    #[test]
    fn cross_form() {
        assert_eq!(detect("Show 2x07 Title"), Some((2, 7, MarkerKind::Cross)));
    }

    #[test]
    fn cross_form_ignores_dimensions_and_codecs() {
        assert_eq!(detect("Movie 1920x1080"), None);
        assert_eq!(detect("Movie.2020.1080p.DD5.1.x264-GRP"), None);
    }

    #[test]
    fn trailing_number_defaults_to_season_one() {
        assert_eq!(detect("Show - 03"), Some((1, 3, MarkerKind::TrailingNumber)));
        assert_eq!(
            detect("[SubsPlease] Show - 1084v2 (1080p) [A1B2C3D4]"),
            Some((1, 1084, MarkerKind::TrailingNumber))
        );
    }

    #[test]
    fn trailing_year_is_not_an_episode() {
        assert_eq!(detect("Movie - 2020"), None);
        assert_eq!(detect("Blade Runner - 2049"), None);
    }

    #[test]
    fn keyword_forms() {
        assert_eq!(detect("Show Episode 5"), Some((1, 5, MarkerKind::Keyword)));
        assert_eq!(detect("Show.EP05.720p"), Some((1, 5, MarkerKind::Keyword)));
    }

    #[test]
    fn explicit_form_beats_trailing_number() {
        assert_eq!(detect("Show S02E01 - 03"), Some((2, 1, MarkerKind::SeasonEpisode)));
    }

    #[test]
    fn plain_titles_are_movies() {
        assert_eq!(detect("Unknown Title No Year"), None);
        assert_eq!(detect("Apollo 13 (1995)"), None);
        assert_eq!(detect("Movie Name (2020) 2160p HDR DUAL Atmos x265"), None);
    }

    #[test]
    fn marker_start_splits_the_name() {
        let m = SeriesDetector::new().unwrap().detect("Show - 03").unwrap();
        assert_eq!(&"Show - 03"[..m.start], "Show");
    }
}
