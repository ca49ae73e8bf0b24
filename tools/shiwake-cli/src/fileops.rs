//! Move, copy and delete with per-item error collection.
//!
//! Nothing here aborts a run: each failure is logged and appended to the
//! error list that ends up in the report.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::{OptionsConfig, TransferMode};

/// A failed file operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpError {
    pub path: PathBuf,
    pub operation: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct FileOps {
    dry_run: bool,
    preserve_permissions: bool,
    transfer: TransferMode,
    errors: Vec<OpError>,
}

impl FileOps {
    pub fn new(options: &OptionsConfig, dry_run: bool) -> Self {
        Self {
            dry_run,
            preserve_permissions: options.preserve_permissions,
            transfer: options.transfer,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[OpError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<OpError> {
        self.errors
    }

    fn record(&mut self, path: &Path, operation: &'static str, err: &io::Error) {
        error!("Failed to {operation} {}: {err}", path.display());
        self.errors.push(OpError {
            path: path.to_path_buf(),
            operation,
            message: err.to_string(),
        });
    }

    /// Creates `dir` (and parents). New directories take the owner and mode
    /// of their parent when permissions are preserved.
    pub fn ensure_dir(&mut self, dir: &Path) -> bool {
        if self.dry_run || dir.is_dir() {
            return true;
        }
        match fs::create_dir_all(dir) {
            Ok(()) => {
                if self.preserve_permissions {
                    inherit_from_parent(dir, true);
                }
                true
            }
            Err(e) => {
                self.record(dir, "create directory", &e);
                false
            }
        }
    }

    /// Moves (or copies, per `options.transfer`) `src` into `dest_dir`
    /// under `file_name`, or its own name when `None`. An existing file at
    /// the destination is never overwritten; a numbered name is chosen
    /// instead.
    ///
    /// Returns the destination path, or `None` if the operation failed.
    pub fn relocate(
        &mut self,
        src: &Path,
        dest_dir: &Path,
        file_name: Option<&str>,
    ) -> Option<PathBuf> {
        self.transfer_to(src, dest_dir, file_name, self.transfer)
    }

    /// Like [`FileOps::relocate`] but always moves, whatever the configured
    /// transfer mode. Duplicates must leave the library.
    pub fn move_to(&mut self, src: &Path, dest_dir: &Path) -> Option<PathBuf> {
        self.transfer_to(src, dest_dir, None, TransferMode::Move)
    }

    fn transfer_to(
        &mut self,
        src: &Path,
        dest_dir: &Path,
        file_name: Option<&str>,
        mode: TransferMode,
    ) -> Option<PathBuf> {
        let name = match file_name {
            Some(name) => name.to_string(),
            None => src.file_name()?.to_string_lossy().into_owned(),
        };
        let dest = unique_destination(dest_dir, &name);

        if self.dry_run {
            info!("[dry-run] {} -> {}", src.display(), dest.display());
            return Some(dest);
        }
        if !self.ensure_dir(dest_dir) {
            return None;
        }

        let result = match mode {
            TransferMode::Move => move_file(src, &dest),
            TransferMode::Copy => fs::copy(src, &dest).map(|_| ()),
        };
        match result {
            Ok(()) => {
                if self.preserve_permissions {
                    inherit_from_parent(&dest, false);
                }
                info!("{} -> {}", src.display(), dest.display());
                Some(dest)
            }
            Err(e) => {
                let operation = match mode {
                    TransferMode::Move => "move",
                    TransferMode::Copy => "copy",
                };
                self.record(src, operation, &e);
                None
            }
        }
    }

    pub fn delete(&mut self, path: &Path) -> bool {
        if self.dry_run {
            info!("[dry-run] delete {}", path.display());
            return true;
        }
        match fs::remove_file(path) {
            Ok(()) => {
                info!("Deleted {}", path.display());
                true
            }
            Err(e) => {
                self.record(path, "delete", &e);
                false
            }
        }
    }
}

/// Renames, falling back to copy and remove across filesystems.
fn move_file(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("Cross-device move, copying {}", src.display());
            fs::copy(src, dest)?;
            fs::remove_file(src)
        }
        Err(e) => Err(e),
    }
}

/// `dir/name`, or `dir/stem (n).ext` for the first free `n`.
pub fn unique_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Copies owner (and for directories, mode) from the parent directory.
/// Failures are expected when not running as the owner and only logged.
#[cfg(unix)]
fn inherit_from_parent(path: &Path, is_dir: bool) {
    use std::os::unix::fs::MetadataExt;

    let Some(parent) = path.parent() else {
        return;
    };
    let meta = match fs::metadata(parent) {
        Ok(meta) => meta,
        Err(e) => {
            debug!("Cannot stat {}: {e}", parent.display());
            return;
        }
    };

    if let Err(e) = std::os::unix::fs::chown(path, Some(meta.uid()), Some(meta.gid())) {
        debug!("Cannot change owner of {}: {e}", path.display());
    }
    if is_dir {
        if let Err(e) = fs::set_permissions(path, meta.permissions()) {
            debug!("Cannot change mode of {}: {e}", path.display());
        }
    }
}

#[cfg(not(unix))]
fn inherit_from_parent(_path: &Path, _is_dir: bool) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(dry_run: bool, transfer: TransferMode) -> FileOps {
        let options = OptionsConfig {
            transfer,
            ..OptionsConfig::default()
        };
        FileOps::new(&options, dry_run)
    }

    #[test]
    fn move_into_new_folder() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.mkv");
        fs::write(&src, b"data").unwrap();
        let dest_dir = dir.path().join("Movie (2020)");

        let mut ops = ops(false, TransferMode::Move);
        let dest = ops.relocate(&src, &dest_dir, None).unwrap();

        assert_eq!(dest, dest_dir.join("a.mkv"));
        assert!(dest.exists());
        assert!(!src.exists());
        assert!(ops.errors().is_empty());
    }

    #[test]
    fn copy_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.mkv");
        fs::write(&src, b"data").unwrap();

        let mut ops = ops(false, TransferMode::Copy);
        let dest = ops.relocate(&src, &dir.path().join("out"), Some("b.mkv")).unwrap();

        assert!(src.exists());
        assert_eq!(fs::read(dest).unwrap(), b"data");
    }

    #[test]
    fn move_to_ignores_copy_mode() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.mkv");
        fs::write(&src, b"data").unwrap();

        let mut ops = ops(false, TransferMode::Copy);
        let dest = ops.move_to(&src, &dir.path().join("dups")).unwrap();

        assert!(dest.exists());
        assert!(!src.exists());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.mkv");
        fs::write(&src, b"data").unwrap();
        let dest_dir = dir.path().join("out");

        let mut ops = ops(true, TransferMode::Move);
        assert!(ops.relocate(&src, &dest_dir, None).is_some());
        assert!(ops.delete(&src));
        assert!(src.exists());
        assert!(!dest_dir.exists());
    }

    #[test]
    fn existing_destination_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mkv"), b"old").unwrap();
        fs::write(dir.path().join("a (1).mkv"), b"old").unwrap();

        assert_eq!(
            unique_destination(dir.path(), "a.mkv"),
            dir.path().join("a (2).mkv")
        );
        assert_eq!(unique_destination(dir.path(), "b.mkv"), dir.path().join("b.mkv"));
    }

    #[test]
    fn failures_are_collected() {
        let dir = tempfile::tempdir().unwrap();
        let mut ops = ops(false, TransferMode::Move);

        assert!(!ops.delete(&dir.path().join("missing.mkv")));
        assert!(ops
            .relocate(&dir.path().join("missing.mkv"), &dir.path().join("out"), None)
            .is_none());

        let errors = ops.into_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].operation, "delete");
        assert_eq!(errors[1].operation, "move");
    }

    #[test]
    fn delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dup.mkv");
        fs::write(&path, b"x").unwrap();

        let mut ops = ops(false, TransferMode::Move);
        assert!(ops.delete(&path));
        assert!(!path.exists());
    }
}
