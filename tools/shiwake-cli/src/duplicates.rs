//! Carrying out duplicate verdicts on disk.

use std::path::{Path, PathBuf};

use shiwake_core::naming::{movie_folder_name, season_folder_name};
use shiwake_core::{GroupDecision, RunOutcome, Verdict};

use crate::fileops::FileOps;
use crate::report::DuplicateReport;

/// Folder under the duplicates root that receives the copies of one group.
///
/// Movies use `Title (Year)` from the kept copy; episodes go to
/// `Series/Season NN`.
pub fn destination_folder(root: &Path, decision: &GroupDecision) -> PathBuf {
    let Some(keeper) = decision.keeper() else {
        return root.to_path_buf();
    };
    let record = &keeper.record;

    match (&record.series, decision.episode) {
        (Some(series), Some(episode)) => root
            .join(movie_folder_name(&series.name, None))
            .join(season_folder_name(episode.season)),
        _ => root.join(movie_folder_name(&record.title, record.year)),
    }
}

/// Applies every non-keep verdict. Returns how many files were handled
/// successfully; failures are collected by `ops`.
pub fn apply(
    outcome: &RunOutcome,
    ops: &mut FileOps,
    duplicates_root: Option<&Path>,
    report: &mut DuplicateReport,
) -> usize {
    let mut handled = 0;

    for decision in &outcome.decisions {
        for disposition in decision.duplicates() {
            let path = &disposition.item.path;
            match disposition.verdict {
                Verdict::Move => {
                    let Some(root) = duplicates_root else {
                        tracing::warn!("No duplicates directory, leaving {}", path.display());
                        continue;
                    };
                    let folder = destination_folder(root, decision);
                    if let Some(dest) = ops.move_to(path, &folder) {
                        report.set_destination(path, dest);
                        handled += 1;
                    }
                }
                Verdict::Delete => {
                    if ops.delete(path) {
                        handled += 1;
                    }
                }
                Verdict::ReportOnly | Verdict::Keep => {}
            }
        }
    }

    handled
}
