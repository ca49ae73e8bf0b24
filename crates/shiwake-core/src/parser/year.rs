use std::ops::Range;

use regex::Regex;

use crate::error::Result;
use crate::parser::vocabulary::{YEAR_PATTERNS, YEAR_RANGE};

/// A validated year and where it sits in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearMatch {
    pub year: u16,
    /// Byte span to erase from the title. Covers the parentheses for the
    /// `(2020)` form and only the digits otherwise.
    pub span: Range<usize>,
}

/// Positional year finder.
///
/// Patterns are tried in priority order; within a pattern every match is
/// validated against [`YEAR_RANGE`] and the first valid one wins.
#[derive(Debug)]
pub struct YearExtractor {
    patterns: Vec<Regex>,
}

impl YearExtractor {
    pub fn new() -> Result<Self> {
        let patterns = YEAR_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn find(&self, text: &str) -> Option<YearMatch> {
        self.patterns
            .iter()
            .find_map(|pattern| first_valid(pattern, text))
    }
}

/// Rejected matches resume right after their digits, so a delimiter shared
/// with the next candidate (`.2049.2017.`) is not consumed.
fn first_valid(pattern: &Regex, text: &str) -> Option<YearMatch> {
    let mut start = 0;
    while let Some(caps) = pattern.captures_at(text, start) {
        let digits = caps.get(1)?;
        let year = digits
            .as_str()
            .parse::<u16>()
            .ok()
            .filter(|y| YEAR_RANGE.contains(y));
        if let Some(year) = year {
            let whole = caps.get(0)?;
            let span = if whole.as_str().starts_with('(') {
                whole.range()
            } else {
                digits.range()
            };
            return Some(YearMatch { year, span });
        }
        start = digits.end();
    }
    None
}
