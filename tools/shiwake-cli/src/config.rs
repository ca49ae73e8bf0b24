//! TOML configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shiwake_core::parser::vocabulary::VIDEO_EXTENSIONS;
use shiwake_core::{DuplicateAction, EngineConfig, QualityPriority, ScanMode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub duplicates: DuplicatesConfig,

    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Source/destination pairs processed by `organize`, keyed by category
    /// name (`movies`, `anime`, `documentaries`, `series`, ...).
    #[serde(default)]
    pub directories: BTreeMap<String, DirectoryConfig>,
}

/// Library roots. Commands that take a directory argument fall back to these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    pub movies: Option<PathBuf>,
    pub series: Option<PathBuf>,
    /// Where moved duplicates land.
    pub duplicates: Option<PathBuf>,
}

/// What a category holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Every video becomes `Title (Year)/file` under the destination.
    #[default]
    Movies,
    /// Audited only; episodes are never moved.
    Series,
}

/// One `[directories.<category>]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    pub source: PathBuf,
    pub destination: PathBuf,

    #[serde(default)]
    pub kind: CategoryKind,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub auto_organize: bool,
}

impl DirectoryConfig {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.auto_organize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Extensions (without dot, case-insensitive) treated as video files.
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    /// Companion files moved alongside their video.
    #[serde(default = "default_metadata_extensions")]
    pub metadata_extensions: Vec<String>,

    /// Files smaller than this are ignored. `0` disables the check.
    #[serde(default)]
    pub min_file_size_mb: u64,

    /// Directory names skipped entirely.
    #[serde(default = "default_exclude_folders")]
    pub exclude_folders: Vec<String>,

    /// File names skipped.
    #[serde(default = "default_exclude_files")]
    pub exclude_files: Vec<String>,

    #[serde(default = "default_true")]
    pub recursive: bool,
}

fn default_video_extensions() -> Vec<String> {
    VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_metadata_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "nfo", "srt", "sub", "idx", "ass", "vtt"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_exclude_folders() -> Vec<String> {
    [".@__thumb", "@eaDir", "Thumbs", ".jellyfin-data"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_exclude_files() -> Vec<String> {
    [".DS_Store", "Thumbs.db", "desktop.ini"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            video_extensions: default_video_extensions(),
            metadata_extensions: default_metadata_extensions(),
            min_file_size_mb: 0,
            exclude_folders: default_exclude_folders(),
            exclude_files: default_exclude_files(),
            recursive: true,
        }
    }
}

impl ScanConfig {
    #[must_use]
    pub fn min_file_size_bytes(&self) -> u64 {
        self.min_file_size_mb.saturating_mul(1024 * 1024)
    }

    #[must_use]
    pub fn is_video(&self, path: &Path) -> bool {
        has_extension(path, &self.video_extensions)
    }

    #[must_use]
    pub fn is_metadata(&self, path: &Path) -> bool {
        has_extension(path, &self.metadata_extensions)
    }

    #[must_use]
    pub fn is_excluded_folder(&self, name: &str) -> bool {
        self.exclude_folders.iter().any(|f| f == name)
    }

    #[must_use]
    pub fn is_excluded_file(&self, name: &str) -> bool {
        self.exclude_files.iter().any(|f| f == name)
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DuplicatesConfig {
    /// Ranking criteria, most significant first.
    #[serde(default)]
    pub priority: QualityPriority,

    #[serde(default)]
    pub action: DuplicateAction,
}

impl Default for DuplicatesConfig {
    fn default() -> Self {
        Self {
            priority: QualityPriority::default(),
            action: DuplicateAction::Move,
        }
    }
}

/// How `organize` relocates movies and their companion files. Duplicates
/// with a move verdict always leave the library, whatever this says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    #[default]
    Move,
    Copy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsConfig {
    /// Plan only. `--execute` overrides it.
    #[serde(default = "default_true")]
    pub dry_run: bool,

    /// Give created folders and relocated files the owner and mode of
    /// their destination's parent.
    #[serde(default = "default_true")]
    pub preserve_permissions: bool,

    #[serde(default = "default_true")]
    pub generate_report: bool,

    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    #[serde(default)]
    pub transfer: TransferMode,
}

fn default_report_path() -> PathBuf {
    PathBuf::from("shiwake-report.json")
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            preserve_permissions: true,
            generate_report: true,
            report_path: default_report_path(),
            transfer: TransferMode::Move,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset, e.g. `info` or `shiwake=debug`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Also append log lines to this file.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

impl Config {
    #[must_use]
    pub fn engine_config(&self, mode: ScanMode) -> EngineConfig {
        EngineConfig {
            mode,
            priority: self.duplicates.priority.clone(),
            action: self.duplicates.action,
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    validate_config(&config)?;
    Ok(config)
}

/// Candidate config locations, most specific first.
fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("./shiwake.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("shiwake").join("config.toml"));
    }
    paths.push(PathBuf::from("/etc/shiwake/config.toml"));
    paths
}

/// The config file to load: `custom_path` if given, otherwise the first
/// default location that exists.
pub fn resolve_config_path(custom_path: Option<&Path>) -> Option<PathBuf> {
    match custom_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_paths().into_iter().find(|p| p.exists()),
    }
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    match resolve_config_path(custom_path) {
        Some(path) => load_config(&path),
        None => Ok(Config::default()),
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.scan.video_extensions.is_empty() {
        anyhow::bail!("scan.video_extensions cannot be empty");
    }

    for ext in config
        .scan
        .video_extensions
        .iter()
        .chain(&config.scan.metadata_extensions)
    {
        if ext.is_empty() || ext.starts_with('.') {
            anyhow::bail!("Extension {ext:?} must be non-empty and given without a leading dot");
        }
    }

    if config.logging.level.trim().is_empty() {
        anyhow::bail!("logging.level cannot be empty");
    }

    Ok(())
}

/// Non-fatal problems worth a warning once logging is up.
#[must_use]
pub fn config_warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    for (name, path) in [
        ("movies", &config.paths.movies),
        ("series", &config.paths.series),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                warnings.push(format!("paths.{name} does not exist: {}", path.display()));
            }
        }
    }

    for (category, dir) in config.directories.iter().filter(|(_, d)| d.is_active()) {
        if !dir.source.exists() {
            warnings.push(format!(
                "directories.{category}.source does not exist: {}",
                dir.source.display()
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiwake_core::Criterion;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(config.options.dry_run);
        assert_eq!(config.duplicates.action, DuplicateAction::Move);
        assert_eq!(config.duplicates.priority, QualityPriority::default());
        assert!(config.scan.video_extensions.iter().any(|e| e == "mkv"));
        assert_eq!(config.logging.level, "info");
        validate_config(&config).unwrap();
    }

    #[test]
    fn full_file() {
        let file = write_config(
            r#"
[paths]
movies = "/srv/media/movies"
duplicates = "/srv/media/duplicates"

[scan]
video_extensions = ["mkv", "mp4"]
min_file_size_mb = 100
exclude_folders = ["@eaDir"]

[duplicates]
priority = ["resolution", "codec", "size"]
action = "report"

[options]
dry_run = false
transfer = "copy"

[logging]
level = "debug"
file = "/var/log/shiwake.log"

[directories.anime]
source = "/srv/downloads/anime"
destination = "/srv/media/anime"
enabled = true
auto_organize = true

[directories.series]
source = "/srv/downloads/series"
destination = "/srv/media/series"
kind = "series"
enabled = true
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.paths.movies, Some(PathBuf::from("/srv/media/movies")));
        assert_eq!(config.scan.min_file_size_bytes(), 100 * 1024 * 1024);
        assert_eq!(
            config.duplicates.priority.criteria(),
            &[Criterion::Resolution, Criterion::Codec, Criterion::Size]
        );
        assert_eq!(config.duplicates.action, DuplicateAction::Report);
        assert!(!config.options.dry_run);
        assert_eq!(config.options.transfer, TransferMode::Copy);
        assert!(config.options.preserve_permissions);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("/var/log/shiwake.log")));

        let anime = &config.directories["anime"];
        assert_eq!(anime.kind, CategoryKind::Movies);
        assert!(anime.is_active());
        let series = &config.directories["series"];
        assert_eq!(series.kind, CategoryKind::Series);
        assert!(!series.is_active());
    }

    #[test]
    fn missing_paths_become_warnings() {
        let mut config = Config::default();
        config.paths.movies = Some(PathBuf::from("/nonexistent/movies"));
        config.directories.insert(
            "anime".into(),
            DirectoryConfig {
                source: PathBuf::from("/nonexistent/anime"),
                destination: PathBuf::from("/srv/anime"),
                kind: CategoryKind::Movies,
                enabled: true,
                auto_organize: true,
            },
        );

        validate_config(&config).unwrap();
        let warnings = config_warnings(&config);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("paths.movies"));
        assert!(warnings[1].starts_with("directories.anime.source"));
        assert!(config_warnings(&Config::default()).is_empty());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = write_config("");
        assert_eq!(load_config(file.path()).unwrap(), Config::default());
    }

    #[test]
    fn unknown_action_is_rejected() {
        let file = write_config("[duplicates]\naction = \"shred\"\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn bad_priority_is_rejected() {
        let file = write_config("[duplicates]\npriority = [\"size\", \"size\"]\n");
        assert!(load_config(file.path()).is_err());

        let file = write_config("[duplicates]\npriority = []\n");
        assert!(load_config(file.path()).is_err());

        let file = write_config("[duplicates]\npriority = [\"bitrate\"]\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn dotted_extension_is_rejected() {
        let file = write_config("[scan]\nvideo_extensions = [\".mkv\"]\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains(".mkv"));
    }

    #[test]
    fn missing_file_errors() {
        assert!(load_config(Path::new("/nonexistent/shiwake.toml")).is_err());
    }

    #[test]
    fn explicit_path_wins() {
        let file = write_config("[logging]\nlevel = \"warn\"\n");
        let config = load_config_or_default(Some(file.path())).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(
            resolve_config_path(Some(file.path())),
            Some(file.path().to_path_buf())
        );
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        let scan = ScanConfig::default();
        assert!(scan.is_video(Path::new("Movie.MKV")));
        assert!(!scan.is_video(Path::new("Movie.txt")));
        assert!(scan.is_metadata(Path::new("poster.JPG")));
        assert!(scan.is_excluded_folder("@eaDir"));
        assert!(scan.is_excluded_file(".DS_Store"));
    }

    #[test]
    fn engine_config_follows_duplicates_section() {
        let mut config = Config::default();
        config.duplicates.action = DuplicateAction::Delete;
        let engine = config.engine_config(ScanMode::MoviesAndSeries);
        assert_eq!(engine.action, DuplicateAction::Delete);
        assert_eq!(engine.mode, ScanMode::MoviesAndSeries);
    }
}
