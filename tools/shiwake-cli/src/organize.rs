//! Library organization: movie folders and the series structure audit.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use shiwake_core::naming::{companion_name, movie_folder_name};
use shiwake_core::{normalize, Engine};
use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::fileops::FileOps;
use crate::scan;

/// One planned (or performed) movie move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieMove {
    pub source: PathBuf,
    pub folder: PathBuf,
    pub title: String,
    pub year: Option<u16>,
    /// `(source, new name)` for every companion file.
    pub companions: Vec<(PathBuf, String)>,
}

#[derive(Debug, Default, Serialize)]
pub struct MovieSummary {
    pub moves: Vec<MovieMove>,
    /// Files left in place: no year or title, or already organized.
    pub skipped: Vec<PathBuf>,
}

/// What `organize` did for one `[directories.<category>]` entry.
#[derive(Debug, Serialize)]
pub struct CategoryRun {
    pub category: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub planned: MovieSummary,
    pub moved: usize,
}

/// Plans a folder for every loose video file directly inside `root`.
pub fn plan_movies(root: &Path, scan: &ScanConfig, engine: &Engine) -> Result<MovieSummary> {
    let mut files: Vec<PathBuf> = fs::read_dir(root)
        .with_context(|| format!("Failed to read movies directory: {}", root.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    let mut summary = MovieSummary::default();

    for video in files.iter().filter(|p| scan.is_video(p)) {
        let Some(name) = video.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if scan.is_excluded_file(&name) {
            continue;
        }

        let record = engine.extractor().extract_movie(&name);
        let Some(year) = record.year else {
            warn!("No year found, skipping: {name}");
            summary.skipped.push(video.clone());
            continue;
        };

        let folder = root.join(movie_folder_name(&record.title, Some(year)));
        if folder.exists() {
            info!("Folder already exists, skipping: {}", folder.display());
            summary.skipped.push(video.clone());
            continue;
        }

        let companions = companions_of(video, scan);
        summary.moves.push(MovieMove {
            source: video.clone(),
            folder,
            title: record.title,
            year: Some(year),
            companions,
        });
    }

    Ok(summary)
}

/// Plans every video found anywhere under `source` into a `Title (Year)`
/// folder under `destination`. Files without a year get a `Title` folder.
///
/// A folder that already holds a video with the same extension counts as
/// organized and is left alone. A missing `source` plans nothing.
pub fn plan_category(
    source: &Path,
    destination: &Path,
    scan: &ScanConfig,
    engine: &Engine,
) -> Result<MovieSummary> {
    let mut summary = MovieSummary::default();
    if !source.is_dir() {
        warn!("Source directory does not exist: {}", source.display());
        return Ok(summary);
    }

    for entry in scan::discover(source, scan)? {
        let record = engine.extractor().extract_movie(&entry.file_name());
        if normalize(&record.title).is_empty() {
            warn!("No title found, skipping: {}", entry.path.display());
            summary.skipped.push(entry.path);
            continue;
        }

        let folder = destination.join(movie_folder_name(&record.title, record.year));
        if holds_same_kind(&folder, &entry.path) {
            info!("Already organized: {}", folder.display());
            summary.skipped.push(entry.path);
            continue;
        }

        let companions = companions_of(&entry.path, scan);
        summary.moves.push(MovieMove {
            source: entry.path,
            folder,
            title: record.title,
            year: record.year,
            companions,
        });
    }

    Ok(summary)
}

/// Metadata files next to `video` whose name starts with its stem, paired
/// with their simplified names.
fn companions_of(video: &Path, scan: &ScanConfig) -> Vec<(PathBuf, String)> {
    let (Some(dir), Some(stem)) = (video.parent(), video.file_stem()) else {
        return Vec::new();
    };
    let stem = stem.to_string_lossy();
    let Ok(read) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut companions: Vec<(PathBuf, String)> = read
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p != video && p.is_file() && scan.is_metadata(p))
        .filter_map(|p| {
            let file_name = p.file_name()?.to_string_lossy().into_owned();
            file_name
                .starts_with(&*stem)
                .then(|| (p.clone(), companion_name(&stem, &file_name)))
        })
        .collect();
    companions.sort();
    companions
}

/// Whether `folder` already contains a file with `video`'s extension.
fn holds_same_kind(folder: &Path, video: &Path) -> bool {
    let Some(ext) = video.extension() else {
        return false;
    };
    let Ok(read) = fs::read_dir(folder) else {
        return false;
    };
    read.filter_map(|e| e.ok()).any(|e| {
        e.path()
            .extension()
            .is_some_and(|other| other.eq_ignore_ascii_case(ext))
    })
}

/// Performs planned moves. Returns how many videos were moved.
pub fn apply_movies(summary: &MovieSummary, ops: &mut FileOps) -> usize {
    let mut moved = 0;
    for planned in &summary.moves {
        if !ops.ensure_dir(&planned.folder) {
            continue;
        }
        if ops.relocate(&planned.source, &planned.folder, None).is_none() {
            continue;
        }
        for (companion, new_name) in &planned.companions {
            ops.relocate(companion, &planned.folder, Some(new_name));
        }
        moved += 1;
    }
    moved
}

/// Structure of one series folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeriesLayout {
    /// Has season folders.
    Seasons { count: usize },
    /// Has other subfolders, assumed organized.
    Subfolders { count: usize },
    /// Video files sit directly in the series folder.
    LooseFiles { count: usize },
    Empty,
}

impl SeriesLayout {
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::LooseFiles { .. } | Self::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesAudit {
    pub name: String,
    pub layout: SeriesLayout,
}

/// `Season 1`, `season01`, `S01`, `Temporada 2`.
fn is_season_folder(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with("season")
        || lower.starts_with("temp")
        || (lower.starts_with('s') && lower[1..].starts_with(|c: char| c.is_ascii_digit()))
}

/// Classifies every series folder under `root`. Read-only.
pub fn audit_series(root: &Path, scan: &ScanConfig) -> Result<Vec<SeriesAudit>> {
    let mut audits = Vec::new();

    for folder in scan::subdirectories(root, scan)? {
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let subdirs = scan::subdirectories(&folder, scan)?;
        let seasons = subdirs
            .iter()
            .filter_map(|d| d.file_name())
            .filter(|n| is_season_folder(&n.to_string_lossy()))
            .count();
        let loose = fs::read_dir(&folder)
            .with_context(|| format!("Failed to read series folder: {}", folder.display()))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && scan.is_video(&e.path()))
            .count();

        let layout = if seasons > 0 {
            SeriesLayout::Seasons { count: seasons }
        } else if loose > 0 {
            SeriesLayout::LooseFiles { count: loose }
        } else if !subdirs.is_empty() {
            SeriesLayout::Subfolders {
                count: subdirs.len(),
            }
        } else {
            SeriesLayout::Empty
        };

        if layout.needs_attention() {
            warn!("Series folder needs attention: {name} ({layout:?})");
        }
        audits.push(SeriesAudit { name, layout });
    }

    Ok(audits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptionsConfig;
    use shiwake_core::EngineConfig;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn engine() -> Engine {
        Engine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn plans_folder_and_companions() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("Movie.Name.2020.1080p.x264-GRP.mkv"));
        touch(&root.join("Movie.Name.2020.1080p.x264-GRP-poster.jpg"));
        touch(&root.join("Movie.Name.2020.1080p.x264-GRP.nfo"));
        touch(&root.join("Unrelated.txt"));
        touch(&root.join("No Year Here.mkv"));

        let summary = plan_movies(root, &ScanConfig::default(), &engine()).unwrap();
        assert_eq!(summary.moves.len(), 1);
        assert_eq!(summary.skipped, vec![root.join("No Year Here.mkv")]);

        let planned = &summary.moves[0];
        assert_eq!(planned.folder, root.join("Movie Name (2020)"));
        let mut names: Vec<&str> = planned.companions.iter().map(|(_, n)| n.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["movie.nfo", "poster.jpg"]);
    }

    #[test]
    fn existing_folder_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("Heat (1995) 1080p.mkv"));
        fs::create_dir(root.join("Heat (1995)")).unwrap();

        let summary = plan_movies(root, &ScanConfig::default(), &engine()).unwrap();
        assert!(summary.moves.is_empty());
        assert_eq!(summary.skipped.len(), 1);
    }

    #[test]
    fn apply_moves_video_and_renames_companions() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("Heat.1995.1080p.mkv"));
        touch(&root.join("Heat.1995.1080p-backdrop.jpg"));

        let summary = plan_movies(root, &ScanConfig::default(), &engine()).unwrap();
        let mut ops = FileOps::new(&OptionsConfig::default(), false);
        assert_eq!(apply_movies(&summary, &mut ops), 1);

        let folder = root.join("Heat (1995)");
        assert!(folder.join("Heat.1995.1080p.mkv").exists());
        assert!(folder.join("backdrop.jpg").exists());
        assert!(!root.join("Heat.1995.1080p.mkv").exists());
    }

    #[test]
    fn dry_run_apply_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("Heat.1995.1080p.mkv"));

        let summary = plan_movies(root, &ScanConfig::default(), &engine()).unwrap();
        let mut ops = FileOps::new(&OptionsConfig::default(), true);
        apply_movies(&summary, &mut ops);
        assert!(root.join("Heat.1995.1080p.mkv").exists());
        assert!(!root.join("Heat (1995)").exists());
    }

    #[test]
    fn category_walks_source_into_destination() {
        let source = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        touch(&source.path().join("batch1/Heat.1995.1080p.BluRay.mkv"));
        touch(&source.path().join("batch1/Heat.1995.1080p.BluRay-cover.jpg"));
        touch(&source.path().join("Untitled Film.mp4"));

        let summary =
            plan_category(source.path(), destination.path(), &ScanConfig::default(), &engine())
                .unwrap();
        assert_eq!(summary.moves.len(), 2);
        assert!(summary.skipped.is_empty());

        let heat = summary.moves.iter().find(|m| m.title == "Heat").unwrap();
        assert_eq!(heat.folder, destination.path().join("Heat (1995)"));
        assert_eq!(heat.companions.len(), 1);
        assert_eq!(heat.companions[0].1, "poster.jpg");

        let untitled = summary.moves.iter().find(|m| m.year.is_none()).unwrap();
        assert_eq!(untitled.folder, destination.path().join("Untitled Film"));

        let mut ops = FileOps::new(&OptionsConfig::default(), false);
        assert_eq!(apply_movies(&summary, &mut ops), 2);
        assert!(destination
            .path()
            .join("Heat (1995)/Heat.1995.1080p.BluRay.mkv")
            .exists());
        assert!(destination.path().join("Heat (1995)/poster.jpg").exists());
        assert!(destination
            .path()
            .join("Untitled Film/Untitled Film.mp4")
            .exists());
    }

    #[test]
    fn category_skips_folders_with_same_extension() {
        let source = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        touch(&source.path().join("Heat.1995.720p.mkv"));
        touch(&source.path().join("Heat.1995.720p.mp4"));
        touch(&destination.path().join("Heat (1995)/Heat.1995.1080p.MKV"));

        let summary =
            plan_category(source.path(), destination.path(), &ScanConfig::default(), &engine())
                .unwrap();
        assert_eq!(summary.skipped, vec![source.path().join("Heat.1995.720p.mkv")]);
        assert_eq!(summary.moves.len(), 1);
        assert_eq!(summary.moves[0].source, source.path().join("Heat.1995.720p.mp4"));
    }

    #[test]
    fn category_honours_size_threshold_and_missing_source() {
        let source = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        touch(&source.path().join("Heat.1995.720p.mkv"));
        let scan = ScanConfig {
            min_file_size_mb: 1,
            ..ScanConfig::default()
        };

        let summary = plan_category(source.path(), destination.path(), &scan, &engine()).unwrap();
        assert!(summary.moves.is_empty());

        let missing = source.path().join("nope");
        let summary =
            plan_category(&missing, destination.path(), &ScanConfig::default(), &engine()).unwrap();
        assert!(summary.moves.is_empty() && summary.skipped.is_empty());
    }

    #[test]
    fn season_folder_names() {
        assert!(is_season_folder("Season 01"));
        assert!(is_season_folder("season1"));
        assert!(is_season_folder("S02"));
        assert!(is_season_folder("Temporada 3"));
        assert!(!is_season_folder("Specials"));
        assert!(!is_season_folder("Extras"));
    }

    #[test]
    fn audit_classifies_layouts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("Organized/Season 01/e1.mkv"));
        touch(&root.join("Loose/Show - 01.mkv"));
        touch(&root.join("Loose/Show - 02.mkv"));
        touch(&root.join("Nested/Part A/e1.mkv"));
        fs::create_dir_all(root.join("Empty")).unwrap();

        let audits = audit_series(root, &ScanConfig::default()).unwrap();
        let layouts: Vec<(&str, SeriesLayout)> =
            audits.iter().map(|a| (a.name.as_str(), a.layout)).collect();
        assert_eq!(
            layouts,
            vec![
                ("Empty", SeriesLayout::Empty),
                ("Loose", SeriesLayout::LooseFiles { count: 2 }),
                ("Nested", SeriesLayout::Subfolders { count: 1 }),
                ("Organized", SeriesLayout::Seasons { count: 1 }),
            ]
        );
    }
}
