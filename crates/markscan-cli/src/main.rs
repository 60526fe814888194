//! Markscan CLI
//!
//! Command-line consumer of the markscan scan engine: one-shot scans,
//! filtered listings, statistics, and a watch mode that rescans on
//! file changes.

mod export;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use markscan_core::{query, FilterSpec, ScanConfig, SortMode};
use markscan_indexer::{
    CancelFlag, ChangeSet, FileWatcher, NoProgress, ScanEngine, ScanReport, WatcherOptions,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "markscan")]
#[command(about = "Markscan - incremental marker comment scanner")]
#[command(version)]
struct Cli {
    /// YAML configuration file (default: markscan.yaml in the scanned
    /// root, when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a tree and print a summary
    Scan {
        /// Root to scan (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Scan a tree and list matching entries
    List {
        /// Root to scan (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Keep only entries with this keyword (case-insensitive)
        #[arg(long)]
        keyword: Option<String>,

        /// Keep only entries whose text or line contains this
        #[arg(long)]
        text: Option<String>,

        /// Keep only entries whose file path contains this
        #[arg(long)]
        in_path: Option<String>,

        /// Sort order
        #[arg(long, value_enum, default_value_t = SortArg::File)]
        sort: SortArg,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// Scan a tree and print per-keyword statistics
    Stats {
        /// Root to scan (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Scan, then rescan on file changes until interrupted
    Watch {
        /// Root to watch (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    /// File path, then line
    File,
    /// Keyword, then file path
    Keyword,
    /// Line-oriented grouping; same order as file
    Line,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::File => SortMode::FileThenLine,
            SortArg::Keyword => SortMode::KeywordThenFile,
            SortArg::Line => SortMode::LineThenFile,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Markdown,
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Simple logging for CLI
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { path } => cmd_scan(&path, cli.config.as_deref()).await,
        Commands::List {
            path,
            keyword,
            text,
            in_path,
            sort,
            format,
        } => cmd_list(&path, cli.config.as_deref(), keyword, text, in_path, sort, format).await,
        Commands::Stats { path } => cmd_stats(&path, cli.config.as_deref()).await,
        Commands::Watch { path } => cmd_watch(&path, cli.config.as_deref()).await,
    }
}

fn load_config(root: &Path, explicit: Option<&Path>) -> Result<ScanConfig> {
    if let Some(path) = explicit {
        return ScanConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let local = root.join("markscan.yaml");
    if local.exists() {
        return ScanConfig::load_from(&local)
            .with_context(|| format!("Failed to load config from {}", local.display()));
    }

    Ok(ScanConfig::default())
}

fn print_summary(report: &ScanReport) {
    println!(
        "✓ Scanned {} files in {} ms: {} entries ({} fresh, {} cached, {} skipped, {} errors)",
        report.total,
        report.duration_ms,
        report.index.len(),
        report.scanned,
        report.reused,
        report.skipped,
        report.errored,
    );
}

async fn cmd_scan(path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(path, config_path)?;
    let engine = ScanEngine::new();

    let report = engine
        .run_scan(path, &config, &NoProgress, &CancelFlag::new())
        .await
        .context("Scan failed")?;

    print_summary(&report);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_list(
    path: &Path,
    config_path: Option<&Path>,
    keyword: Option<String>,
    text: Option<String>,
    in_path: Option<String>,
    sort: SortArg,
    format: Format,
) -> Result<()> {
    let config = load_config(path, config_path)?;
    let engine = ScanEngine::new();

    engine
        .run_scan(path, &config, &NoProgress, &CancelFlag::new())
        .await
        .context("Scan failed")?;

    let index = engine.index();
    let filter = FilterSpec {
        keyword,
        text,
        path: in_path,
        ..Default::default()
    };
    let entries = query(&index, &filter, sort.into());

    let rendered = match format {
        Format::Table => export::to_table(&entries),
        Format::Markdown => export::to_markdown(&entries),
        Format::Json => export::to_json(&entries),
        Format::Csv => export::to_csv(&entries),
    };
    print!("{rendered}");

    Ok(())
}

async fn cmd_stats(path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(path, config_path)?;
    let engine = ScanEngine::new();

    let report = engine
        .run_scan(path, &config, &NoProgress, &CancelFlag::new())
        .await
        .context("Scan failed")?;

    let index = engine.index();
    println!(
        "{} entries across {} files",
        index.len(),
        index.file_count()
    );
    for (keyword, count) in index.counts_by_keyword() {
        println!("  {keyword:<8} {count}");
    }
    if report.errored > 0 || report.skipped > 0 {
        println!(
            "({} skipped, {} errors)",
            report.skipped, report.errored
        );
    }

    Ok(())
}

async fn cmd_watch(path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(path, config_path)?;
    let engine = ScanEngine::new();

    let report = engine
        .run_scan(path, &config, &NoProgress, &CancelFlag::new())
        .await
        .context("Initial scan failed")?;
    print_summary(&report);

    let mut watcher = FileWatcher::new(WatcherOptions {
        debounce: Duration::from_millis(config.debounce_ms),
        recursive: true,
    });
    watcher.watch(path).context("Failed to start watcher")?;
    println!("Watching {} (Ctrl+C to stop)", path.display());

    loop {
        tokio::select! {
            change = watcher.next() => {
                let Some(change) = change else { break };

                // Fold the whole burst into one invalidation batch.
                let mut changes = ChangeSet::new();
                changes.add(change);
                while let Some(more) = watcher.try_next() {
                    changes.add(more);
                }

                for change in changes.drain() {
                    engine.invalidate(&change.path);
                }

                if config.scan_on_save {
                    let report = engine
                        .run_scan(path, &config, &NoProgress, &CancelFlag::new())
                        .await
                        .context("Rescan failed")?;
                    print_summary(&report);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\n✓ Stopped watching.");
                break;
            }
        }
    }

    Ok(())
}
