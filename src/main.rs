use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use musicdb::catalog::Catalog;
use musicdb::common::{initialize_logging, LogOutput};
use musicdb::config::Config;
use musicdb::miner::{mine, MiningReport};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogTarget {
    Stderr,
    File,
}

#[derive(Parser, Debug)]
#[command(name = "musicdb")]
#[command(about = "Mine MP3 tags from a directory tree into a SQLite catalog")]
struct Args {
    /// Directory to mine. Defaults to music_source_dir from the config file.
    root: Option<PathBuf>,

    /// Catalog database to write into. Defaults to database_path from the config file.
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Configuration file (default: <user config dir>/musicdb/config.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to send logs.
    #[arg(long, value_enum, default_value = "stderr")]
    log: LogTarget,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FailureSummary {
    path: PathBuf,
    error: String,
}

#[derive(Serialize)]
struct RunSummary {
    root: PathBuf,
    database: PathBuf,
    processed: usize,
    failures: Vec<FailureSummary>,
    catalog: musicdb::catalog::CatalogStats,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.root {
        Some(root) => Config::parse_with_root(args.config.as_deref(), root)?,
        None => Config::parse(args.config.as_deref())?,
    };
    if let Some(database) = &args.database {
        config.database_path = database.clone();
    }
    Ok(config)
}

fn summarize(config: &Config, report: MiningReport) -> Result<RunSummary> {
    let catalog = Catalog::open(&config.database_path)?;
    let stats = catalog.stats()?;
    catalog.close()?;
    Ok(RunSummary {
        root: config.music_source_dir.clone(),
        database: config.database_path.clone(),
        processed: report.processed,
        failures: report
            .failures
            .into_iter()
            .map(|f| FailureSummary {
                path: f.path,
                error: f.error.to_string(),
            })
            .collect(),
        catalog: stats,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let output = match args.log {
        LogTarget::Stderr => LogOutput::Stderr,
        LogTarget::File => LogOutput::File,
    };
    let _guard = initialize_logging(output)?;

    let config = load_config(&args)?;
    let report = mine(&config).with_context(|| format!("Failed to mine {}", config.music_source_dir.display()))?;
    let summary = summarize(&config, report)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Mined {} files from {}", summary.processed, summary.root.display());
    println!(
        "Catalog {}: {} performers, {} albums, {} rolas",
        summary.database.display(),
        summary.catalog.performers,
        summary.catalog.albums,
        summary.catalog.rolas
    );
    if !summary.failures.is_empty() {
        println!("{} files failed:", summary.failures.len());
        for failure in &summary.failures {
            println!("  {}: {}", failure.path.display(), failure.error);
        }
    }
    Ok(())
}
