//! # Title Normalizer
//!
//! Turns a display title into the comparison key used for grouping.
//! Equality after normalization is the only notion of "same title": there is
//! no fuzzy matching.

/// Leading articles dropped from comparison keys (English and Spanish).
pub const ARTICLES: &[&str] = &["the", "a", "an", "la", "el", "los", "las"];

/// Canonicalizes `title` for equality comparison.
///
/// Lower-cases, drops every character that is neither alphanumeric nor
/// whitespace, collapses whitespace, and strips a leading article.
/// The result is idempotent: `normalize(&normalize(x)) == normalize(x)`.
///
/// ```
/// use shiwake_core::normalize;
///
/// assert_eq!(normalize("The Matrix"), normalize("the   MATRIX"));
/// assert_eq!(normalize("Spider-Man: No Way Home"), "spiderman no way home");
/// ```
#[must_use]
pub fn normalize(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let words: Vec<&str> = stripped.split_whitespace().collect();

    // Only one article is dropped, and only when a non-article word follows
    // it; otherwise a second pass could strip again.
    let skip = match words.as_slice() {
        [first, second, ..] if is_article(first) && !is_article(second) => 1,
        _ => 0,
    };

    words[skip..].join(" ")
}

fn is_article(word: &str) -> bool {
    ARTICLES.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_insensitive() {
        assert_eq!(normalize("The Matrix"), normalize("the   MATRIX"));
        assert_eq!(normalize("  Heat  "), "heat");
    }

    #[test]
    fn strips_leading_articles() {
        assert_eq!(normalize("The Matrix"), "matrix");
        assert_eq!(normalize("A Quiet Place"), "quiet place");
        assert_eq!(normalize("An American Tail"), "american tail");
        assert_eq!(normalize("La Casa de Papel"), "casa de papel");
        assert_eq!(normalize("El Camino"), "camino");
        assert_eq!(normalize("Los Olvidados"), "olvidados");
        assert_eq!(normalize("Las Chicas"), "chicas");
    }

    #[test]
    fn articles_inside_the_title_are_kept() {
        assert_eq!(normalize("Beauty and the Beast"), "beauty and the beast");
        assert_eq!(normalize("Theater Camp"), "theater camp");
    }

    #[test]
    fn article_runs_are_left_alone() {
        assert_eq!(normalize("La La Land"), "la la land");
        assert_eq!(normalize("The The"), "the the");
    }

    #[test]
    fn lone_article_survives() {
        assert_eq!(normalize("The"), "the");
        assert_eq!(normalize("A"), "a");
    }

    #[test]
    fn removes_punctuation() {
        assert_eq!(normalize("Spider-Man: Homecoming"), "spiderman homecoming");
        assert_eq!(normalize("Ocean's Eleven!"), "oceans eleven");
        assert_eq!(normalize("snake_case"), "snakecase");
    }

    #[test]
    fn keeps_non_ascii_letters() {
        assert_eq!(normalize("Amélie"), "amélie");
        assert_eq!(normalize("El Niño"), "niño");
    }

    #[test]
    fn idempotent() {
        for input in [
            "The Matrix",
            "The The",
            "  the... a   movie",
            "A-Team",
            "La La Land",
            "",
            "!!!",
            "Amélie (Director's Cut)",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn empty_and_symbol_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!!"), "");
    }
}
