use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::record::AttributeRecord;

/// A file handed to the engine by the directory walker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl MediaEntry {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            size_bytes,
        }
    }

    /// The file name component, lossily converted. Empty for paths that end
    /// in `..` or have no name.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// An extracted record together with the path it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub path: PathBuf,
    pub record: AttributeRecord,
}

impl Candidate {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, record: AttributeRecord) -> Self {
        Self {
            path: path.into(),
            record,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<AttributeRecord> for Candidate {
    fn as_ref(&self) -> &AttributeRecord {
        &self.record
    }
}
