//! Shiwake
//!
//! Sorts a media library by what its filenames say: finds duplicate copies
//! of the same movie or episode and keeps the best one, moves loose movies
//! into `Title (Year)` folders, and audits series folders.

mod config;
mod duplicates;
mod fileops;
mod organize;
mod report;
mod scan;
mod sparse;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shiwake_core::{DuplicateAction, Engine, ScanMode};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{CategoryKind, Config, LoggingConfig};
use crate::fileops::FileOps;
use crate::report::DuplicateReport;

/// CLI arguments
#[derive(Parser)]
#[command(name = "shiwake")]
#[command(about = "Classify, deduplicate and organize a media library by filename")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(short, long, global = true, env = "SHIWAKE_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the attributes recognized in filenames
    Classify {
        /// Filenames; read from stdin (one per line) when empty
        names: Vec<String>,

        /// One JSON object per line
        #[arg(long)]
        json: bool,

        /// Ignore episode markers
        #[arg(long)]
        movies_only: bool,
    },
    /// Find duplicate copies and keep the best one
    Duplicates {
        /// Directory to scan (defaults to paths.movies)
        dir: Option<PathBuf>,

        /// Group episodes of the same series
        #[arg(long)]
        series: bool,

        /// What to do with the worse copies: move, delete or report
        #[arg(short, long)]
        action: Option<DuplicateAction>,

        /// Perform the actions instead of only planning them
        #[arg(long)]
        execute: bool,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,

        /// Write the JSON report here
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Move loose movies into `Title (Year)` folders and audit series folders
    Organize {
        /// Perform the moves instead of only planning them
        #[arg(long)]
        execute: bool,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,

        /// Write the JSON report here
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List folders with only a few video files
    SparseFolders {
        /// Directory to inspect (defaults to paths.series)
        dir: Option<PathBuf>,

        /// Largest video count to list
        #[arg(short, long, default_value_t = 1)]
        max_files: usize,

        /// Also list the video files in each folder
        #[arg(long)]
        show_files: bool,
    },
    /// Validate the configuration and print the effective values
    CheckConfig,
}

/// Installs the stderr subscriber, plus a plain-text file layer when
/// `logging.file` is set. The returned guard flushes the file on drop.
fn init_logging(verbose: bool, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    // RUST_LOG wins over the configured level; --verbose wins over both.
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let (file_layer, guard) = match &logging.file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(log_file_appender(path)?);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(guard)
}

/// Appends to `path`, creating its directory.
fn log_file_appender(path: &Path) -> Result<RollingFileAppender> {
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("logging.file has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = config::resolve_config_path(cli.config.as_deref());
    let config = config::load_config_or_default(config_path.as_deref())?;
    let _log_guard = init_logging(cli.verbose, &config.logging)?;

    match &config_path {
        Some(path) => debug!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }
    for warning in config::config_warnings(&config) {
        warn!("{warning}");
    }

    match cli.command {
        Commands::Classify {
            names,
            json,
            movies_only,
        } => classify(&config, names, json, movies_only),
        Commands::Duplicates {
            dir,
            series,
            action,
            execute,
            yes,
            report,
        } => find_duplicates(
            &config,
            DuplicatesArgs {
                dir,
                series,
                action,
                execute,
                yes,
                report,
            },
        ),
        Commands::Organize {
            execute,
            yes,
            report,
        } => organize_library(&config, execute, yes, report),
        Commands::SparseFolders {
            dir,
            max_files,
            show_files,
        } => sparse_folders(&config, dir, max_files, show_files),
        Commands::CheckConfig => check_config(&config),
    }
}

fn classify(config: &Config, names: Vec<String>, json: bool, movies_only: bool) -> Result<()> {
    let mode = if movies_only {
        ScanMode::Movies
    } else {
        ScanMode::MoviesAndSeries
    };
    let engine = Engine::new(config.engine_config(mode))?;

    let names = if names.is_empty() {
        std::io::stdin()
            .lock()
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .context("Failed to read filenames from stdin")?
    } else {
        names
    };

    let mut stdout = std::io::stdout().lock();
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let record = engine.classify(name);
        if json {
            serde_json::to_writer(&mut stdout, &record)?;
            writeln!(stdout)?;
        } else {
            writeln!(stdout, "{name}\n  {record}")?;
        }
    }
    Ok(())
}

struct DuplicatesArgs {
    dir: Option<PathBuf>,
    series: bool,
    action: Option<DuplicateAction>,
    execute: bool,
    yes: bool,
    report: Option<PathBuf>,
}

fn find_duplicates(config: &Config, args: DuplicatesArgs) -> Result<()> {
    let root = args
        .dir
        .or_else(|| config.paths.movies.clone())
        .context("No directory given and paths.movies is not set")?;
    let mode = if args.series {
        ScanMode::MoviesAndSeries
    } else {
        ScanMode::Movies
    };

    let mut engine_config = config.engine_config(mode);
    if let Some(action) = args.action {
        engine_config.action = action;
    }
    let action = engine_config.action;
    let dry_run = !args.execute && config.options.dry_run;

    if !dry_run && action == DuplicateAction::Move && config.paths.duplicates.is_none() {
        anyhow::bail!("paths.duplicates must be set to move duplicates");
    }

    let engine = Engine::new(engine_config)?;
    let entries = scan::discover(&root, &config.scan)?;
    let outcome = engine.run(entries);

    print!("{}", report::render_summary(&outcome));

    let mut report = DuplicateReport::new(&root, action, dry_run, &outcome);
    let mut ops = FileOps::new(&config.options, dry_run);

    if action != DuplicateAction::Report && outcome.stats.duplicate_files > 0 {
        let proceed = dry_run
            || args.yes
            || confirm(&format!(
                "{} {} duplicate file(s)?",
                action, outcome.stats.duplicate_files
            ))?;
        if proceed {
            let handled =
                duplicates::apply(&outcome, &mut ops, config.paths.duplicates.as_deref(), &mut report);
            info!(handled, failed = ops.errors().len(), dry_run, "Duplicates processed");
        } else {
            info!("Cancelled");
        }
    }

    report.errors = ops.into_errors();
    if let Some(path) = args
        .report
        .or_else(|| config.options.generate_report.then(|| config.options.report_path.clone()))
    {
        report.write(&path)?;
    }

    if !report.errors.is_empty() {
        anyhow::bail!("{} file operation(s) failed", report.errors.len());
    }
    Ok(())
}

fn print_plan(summary: &organize::MovieSummary) {
    for planned in &summary.moves {
        println!("{} -> {}/", planned.source.display(), planned.folder.display());
        for (companion, name) in &planned.companions {
            println!("    {} -> {name}", companion.display());
        }
    }
}

fn print_attention(audits: &[organize::SeriesAudit]) {
    for audit in audits.iter().filter(|s| s.layout.needs_attention()) {
        println!("needs attention: {} ({:?})", audit.name, audit.layout);
    }
}

fn organize_library(
    config: &Config,
    execute: bool,
    yes: bool,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let dry_run = !execute && config.options.dry_run;
    let engine = Engine::new(config.engine_config(ScanMode::Movies))?;
    let mut ops = FileOps::new(&config.options, dry_run);

    let mut movies = organize::MovieSummary::default();
    if let Some(root) = config.paths.movies.as_deref() {
        movies = organize::plan_movies(root, &config.scan, &engine)?;
        print_plan(&movies);
        println!(
            "Movies: {} to organize, {} skipped",
            movies.moves.len(),
            movies.skipped.len()
        );

        if !movies.moves.is_empty()
            && (dry_run || yes || confirm(&format!("Move {} movie(s)?", movies.moves.len()))?)
        {
            let moved = organize::apply_movies(&movies, &mut ops);
            info!(moved, dry_run, "Movies organized");
        }
    } else {
        info!("paths.movies is not set, skipping movies");
    }

    let mut series = Vec::new();
    if let Some(root) = config.paths.series.as_deref() {
        series = organize::audit_series(root, &config.scan)?;
        print_attention(&series);
        let attention = series.iter().filter(|s| s.layout.needs_attention()).count();
        println!("Series: {} folders, {attention} need attention", series.len());
    } else {
        info!("paths.series is not set, skipping series audit");
    }

    let mut categories = Vec::new();
    for (category, dir) in &config.directories {
        if !dir.is_active() {
            debug!(category = %category, "Category not enabled for auto-organize");
            continue;
        }
        info!(
            category = %category,
            source = %dir.source.display(),
            destination = %dir.destination.display(),
            "Processing category"
        );

        match dir.kind {
            CategoryKind::Movies => {
                let planned =
                    organize::plan_category(&dir.source, &dir.destination, &config.scan, &engine)?;
                print_plan(&planned);
                println!(
                    "{category}: {} to organize, {} skipped",
                    planned.moves.len(),
                    planned.skipped.len()
                );

                let proceed = !planned.moves.is_empty()
                    && (dry_run
                        || yes
                        || confirm(&format!(
                            "Move {} file(s) into {}?",
                            planned.moves.len(),
                            dir.destination.display()
                        ))?);
                let moved = if proceed {
                    organize::apply_movies(&planned, &mut ops)
                } else {
                    0
                };
                info!(category = %category, moved, dry_run, "Category organized");

                categories.push(organize::CategoryRun {
                    category: category.clone(),
                    source: dir.source.clone(),
                    destination: dir.destination.clone(),
                    planned,
                    moved,
                });
            }
            CategoryKind::Series => {
                if !dir.source.is_dir() {
                    warn!("Source directory does not exist: {}", dir.source.display());
                    continue;
                }
                let audits = organize::audit_series(&dir.source, &config.scan)?;
                print_attention(&audits);
                series.extend(audits);
            }
        }
    }

    let errors = ops.into_errors();
    if let Some(path) = report_path
        .or_else(|| config.options.generate_report.then(|| config.options.report_path.clone()))
    {
        let report = serde_json::json!({
            "generated_at": chrono::Local::now(),
            "dry_run": dry_run,
            "movies": movies,
            "series": series,
            "categories": categories,
            "errors": errors,
        });
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!("Report saved to {}", path.display());
    }

    if !errors.is_empty() {
        anyhow::bail!("{} file operation(s) failed", errors.len());
    }
    Ok(())
}

fn sparse_folders(
    config: &Config,
    dir: Option<PathBuf>,
    max_files: usize,
    show_files: bool,
) -> Result<()> {
    let root = dir
        .or_else(|| config.paths.series.clone())
        .context("No directory given and paths.series is not set")?;

    let found = sparse::find_sparse(&root, &config.scan, max_files)?;
    for folder in &found {
        println!("{} ({} video file(s))", folder.path.display(), folder.videos());
        if show_files {
            for file in &folder.files {
                let name = file.strip_prefix(&folder.path).unwrap_or(file);
                println!("    {}", name.display());
            }
        }
    }
    println!("{} folder(s) with at most {max_files} video file(s)", found.len());
    Ok(())
}

fn check_config(config: &Config) -> Result<()> {
    config::validate_config(config)?;
    let text = toml::to_string_pretty(config).context("Failed to render config")?;
    println!("{text}");
    Ok(())
}
