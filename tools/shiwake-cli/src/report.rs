//! Human-readable summaries and the JSON report file.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use shiwake_core::{DuplicateAction, GroupDecision, RunOutcome, RunStats, ScanWarning, Verdict};

use crate::fileops::OpError;

#[derive(Debug, Serialize)]
pub struct ReportFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub verdict: Verdict,
    pub resolution: String,
    pub hdr: String,
    pub audio: String,
    pub codec: String,
    pub dual_audio: bool,
    /// Where the file went, when it was relocated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ReportGroup {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,
    pub files: Vec<ReportFile>,
}

#[derive(Debug, Serialize)]
pub struct DuplicateReport {
    pub generated_at: DateTime<Local>,
    pub root: PathBuf,
    pub action: DuplicateAction,
    pub dry_run: bool,
    pub stats: RunStats,
    pub groups: Vec<ReportGroup>,
    pub warnings: Vec<String>,
    pub errors: Vec<OpError>,
}

impl DuplicateReport {
    pub fn new(root: &Path, action: DuplicateAction, dry_run: bool, outcome: &RunOutcome) -> Self {
        Self {
            generated_at: Local::now(),
            root: root.to_path_buf(),
            action,
            dry_run,
            stats: outcome.stats,
            groups: outcome.decisions.iter().map(report_group).collect(),
            warnings: outcome.warnings.iter().map(ScanWarning::to_string).collect(),
            errors: Vec::new(),
        }
    }

    /// Records where a file was relocated to.
    pub fn set_destination(&mut self, source: &Path, destination: PathBuf) {
        if let Some(file) = self
            .groups
            .iter_mut()
            .flat_map(|g| g.files.iter_mut())
            .find(|f| f.path == source)
        {
            file.destination = Some(destination);
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        tracing::info!("Report saved to {}", path.display());
        Ok(())
    }
}

fn report_group(decision: &GroupDecision) -> ReportGroup {
    ReportGroup {
        key: decision.key.to_string(),
        episode: decision.episode.map(|e| e.to_string()),
        files: decision
            .dispositions
            .iter()
            .map(|d| {
                let record = &d.item.record;
                ReportFile {
                    path: d.item.path.clone(),
                    size_bytes: record.source_size_bytes,
                    verdict: d.verdict,
                    resolution: record.resolution.to_string(),
                    hdr: record.hdr.to_string(),
                    audio: record.audio.to_string(),
                    codec: record.codec.to_string(),
                    dual_audio: record.dual_audio,
                    destination: None,
                }
            })
            .collect(),
    }
}

/// Formats a byte count as `12.3 GB`.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// The console summary of a duplicate run.
pub fn render_summary(outcome: &RunOutcome) -> String {
    let mut out = String::new();

    for decision in &outcome.decisions {
        let _ = match decision.episode {
            Some(episode) => writeln!(out, "{} {}", decision.key, episode),
            None => writeln!(out, "{}", decision.key),
        };
        for d in &decision.dispositions {
            let record = &d.item.record;
            let _ = writeln!(
                out,
                "  [{:<6}] {} ({}, {})",
                d.verdict.to_string(),
                d.item.path.display(),
                record.resolution,
                human_size(record.source_size_bytes)
            );
        }
    }

    let stats = &outcome.stats;
    let _ = writeln!(out);
    let _ = writeln!(out, "Files scanned:      {}", stats.scanned);
    let _ = writeln!(out, "Movies / episodes:  {} / {}", stats.movies, stats.episodes);
    let _ = writeln!(out, "Duplicate groups:   {}", stats.duplicate_groups);
    let _ = writeln!(out, "Duplicate files:    {}", stats.duplicate_files);
    let _ = writeln!(out, "Ungrouped files:    {}", stats.ungrouped);
    let _ = writeln!(out, "Reclaimable space:  {}", human_size(stats.reclaimable_bytes));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiwake_core::{Engine, EngineConfig, MediaEntry};

    fn outcome() -> RunOutcome {
        Engine::new(EngineConfig::default()).unwrap().run(vec![
            MediaEntry::new("/m/Heat.1995.720p.mkv", 2048),
            MediaEntry::new("/m/Heat.1995.1080p.mkv", 4096),
            MediaEntry::new("/m/No Year.mkv", 1),
        ])
    }

    #[test]
    fn sizes() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(15 * 1024 * 1024 * 1024), "15.0 GB");
    }

    #[test]
    fn summary_lists_verdicts() {
        let text = render_summary(&outcome());
        assert!(text.contains("heat (1995)"));
        assert!(text.contains("[keep  ] /m/Heat.1995.1080p.mkv"));
        assert!(text.contains("[move  ] /m/Heat.1995.720p.mkv"));
        assert!(text.contains("Duplicate files:    1"));
    }

    #[test]
    fn report_round_trips_to_json() {
        let outcome = outcome();
        let mut report = DuplicateReport::new(Path::new("/m"), DuplicateAction::Move, true, &outcome);
        report.set_destination(Path::new("/m/Heat.1995.720p.mkv"), PathBuf::from("/dups/x.mkv"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.write(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["action"], "move");
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["stats"]["duplicate_files"], 1);
        assert_eq!(json["groups"][0]["files"][0]["verdict"], "keep");
        assert_eq!(json["groups"][0]["files"][1]["destination"], "/dups/x.mkv");
        assert_eq!(json["warnings"].as_array().unwrap().len(), 1);
    }
}
