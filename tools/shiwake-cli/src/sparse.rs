//! Finding folders that hold only a handful of videos.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::config::ScanConfig;
use crate::scan;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SparseFolder {
    pub path: PathBuf,
    /// Video files inside, sorted by path.
    pub files: Vec<PathBuf>,
}

impl SparseFolder {
    #[must_use]
    pub fn videos(&self) -> usize {
        self.files.len()
    }
}

/// Top-level folders of `root` holding between 1 and `max_files` videos,
/// counted recursively.
pub fn find_sparse(root: &Path, scan: &ScanConfig, max_files: usize) -> Result<Vec<SparseFolder>> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let mut found = Vec::new();
    for dir in scan::subdirectories(root, scan)? {
        let files = scan::list_videos(&dir, scan);
        if (1..=max_files).contains(&files.len()) {
            found.push(SparseFolder { path: dir, files });
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn finds_single_episode_folders() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("One/ep1.mkv"));
        touch(&root.join("Two/ep1.mkv"));
        touch(&root.join("Two/Season 01/ep2.mkv"));
        touch(&root.join("Art/cover.jpg"));

        let scan = ScanConfig::default();
        let single = find_sparse(root, &scan, 1).unwrap();
        assert_eq!(
            single,
            vec![SparseFolder {
                path: root.join("One"),
                files: vec![root.join("One/ep1.mkv")],
            }]
        );

        let up_to_two = find_sparse(root, &scan, 2).unwrap();
        assert_eq!(up_to_two.len(), 2);
        assert_eq!(up_to_two[1].videos(), 2);
        assert_eq!(
            up_to_two[1].files,
            vec![root.join("Two/Season 01/ep2.mkv"), root.join("Two/ep1.mkv")]
        );
    }

    #[test]
    fn missing_root_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_sparse(&dir.path().join("nope"), &ScanConfig::default(), 1).is_err());
    }
}
