//! Directory discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use shiwake_core::MediaEntry;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;

fn is_excluded_dir(entry: &DirEntry, scan: &ScanConfig) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|n| scan.is_excluded_folder(n))
}

/// Collects video files under `root`.
///
/// Excluded folders are pruned, excluded names and files below the size
/// threshold are skipped. Unreadable entries are logged and skipped. Results
/// are sorted by path so runs are reproducible.
pub fn discover(root: &Path, scan: &ScanConfig) -> Result<Vec<MediaEntry>> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    info!("Scanning directory: {}", root.display());
    let min_size = scan.min_file_size_bytes();
    let max_depth = if scan.recursive { usize::MAX } else { 1 };
    let mut entries = Vec::new();

    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, scan));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() || !scan.is_video(entry.path()) {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if scan.is_excluded_file(&name) {
            debug!("Excluded file: {}", entry.path().display());
            continue;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!("Failed to read metadata for {}: {e}", entry.path().display());
                continue;
            }
        };
        if size < min_size {
            debug!(size, "Below size threshold: {}", entry.path().display());
            continue;
        }

        entries.push(MediaEntry::new(entry.path(), size));
    }

    info!("Found {} video files in {}", entries.len(), root.display());
    Ok(entries)
}

/// Video files anywhere below `dir`, sorted by path.
pub fn list_videos(dir: &Path, scan: &ScanConfig) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, scan))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && scan.is_video(e.path()))
        .map(DirEntry::into_path)
        .collect()
}

/// Immediate subdirectories of `dir`, sorted by name, exclusions applied.
pub fn subdirectories(dir: &Path, scan: &ScanConfig) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        if entry.file_type()?.is_dir() && !scan.is_excluded_folder(&name.to_string_lossy()) {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
