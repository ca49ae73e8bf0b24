//! Destination names for organized libraries.

/// Characters that are invalid in folder names on common filesystems.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Canonical artwork name and the suffixes that map to it.
const ARTWORK_ALIASES: &[(&str, &[&str])] = &[
    ("poster", &["poster", "cover"]),
    ("backdrop", &["backdrop", "fanart", "background", "landscape"]),
    ("logo", &["logo"]),
];

/// Folder name for a movie: `Title (2020)`, or just `Title` without a year.
///
/// ```
/// use shiwake_core::naming::movie_folder_name;
///
/// assert_eq!(movie_folder_name("Movie: Name", Some(2020)), "Movie Name (2020)");
/// ```
#[must_use]
pub fn movie_folder_name(title: &str, year: Option<u16>) -> String {
    let clean: String = title.chars().filter(|c| !INVALID_CHARS.contains(c)).collect();
    let clean = clean.split_whitespace().collect::<Vec<_>>().join(" ");
    match year {
        Some(year) => format!("{clean} ({year})"),
        None => clean,
    }
}

/// `Season 01`.
#[must_use]
pub fn season_folder_name(season: u32) -> String {
    format!("Season {season:02}")
}

/// Renames a companion file of `video_stem` to the simplified name media
/// servers expect inside a movie folder.
///
/// `Movie (2020)-poster.jpg` (or `-cover`) becomes `poster.jpg`; backdrops,
/// fanart and backgrounds become `backdrop.*`; logos become `logo.*` and any
/// `.nfo` becomes `movie.nfo`. Anything else keeps its name.
#[must_use]
pub fn companion_name(video_stem: &str, file_name: &str) -> String {
    let (base, ext) = match file_name.rsplit_once('.') {
        Some((base, ext)) => (base, ext),
        None => (file_name, ""),
    };

    if ext.eq_ignore_ascii_case("nfo") {
        return "movie.nfo".to_string();
    }

    let suffix = base
        .strip_prefix(video_stem)
        .unwrap_or(base)
        .to_ascii_lowercase();
    let Some(simple) = ARTWORK_ALIASES.iter().find_map(|(canonical, aliases)| {
        aliases
            .iter()
            .any(|alias| suffix.ends_with(&format!("-{alias}")))
            .then_some(*canonical)
    }) else {
        return file_name.to_string();
    };

    if ext.is_empty() {
        simple.to_string()
    } else {
        format!("{simple}.{ext}")
    }
}
