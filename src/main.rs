//! pdf-trawler main entry point
//!
//! This is the command-line interface for the pdf-trawler harvester.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use pdf_trawler::config::{load_config, Config, OutputMode, SortBy};
use pdf_trawler::filter::FilterConfig;
use pdf_trawler::output::{print_report, ProgressObserver};
use pdf_trawler::{Harvester, SchemaRegistry};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// pdf-trawler: harvest PDF documents from a web page
///
/// Crawls outward from URL to a bounded depth, downloads every linked PDF
/// that passes the filters, and either keeps the files separate or merges
/// them into one document.
#[derive(Parser, Debug)]
#[command(name = "pdf-trawler")]
#[command(version)]
#[command(about = "Harvest PDF documents reachable from a web page", long_about = None)]
struct Cli {
    /// Seed page to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Apply the site schema with this name from the config file
    #[arg(long, value_name = "NAME")]
    schema: Option<String>,

    /// Apply the first site schema whose pattern matches URL
    #[arg(long, conflicts_with = "schema")]
    auto_schema: bool,

    /// How many link hops to follow from the seed page
    #[arg(short, long)]
    depth: Option<u32>,

    /// Keep files separate or merge them into one PDF
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Directory to write PDFs into
    #[arg(short, long, value_name = "DIR")]
    write_dir: Option<PathBuf>,

    /// File name of the merged PDF (merge mode)
    #[arg(long, value_name = "NAME")]
    output_name: Option<String>,

    /// Only keep files whose name matches this glob (repeatable)
    #[arg(long = "include", value_name = "PATTERN")]
    include: Vec<String>,

    /// Drop files whose name matches this glob (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Only keep files whose URL matches this glob (repeatable)
    #[arg(long, value_name = "PATTERN")]
    url_include: Vec<String>,

    /// Drop files whose URL matches this glob (repeatable)
    #[arg(long, value_name = "PATTERN")]
    url_exclude: Vec<String>,

    /// Minimum file size in bytes
    #[arg(long, value_name = "BYTES")]
    min_size: Option<u64>,

    /// Maximum file size in bytes
    #[arg(long, value_name = "BYTES")]
    max_size: Option<u64>,

    /// Order in which files are downloaded and merged
    #[arg(long, value_enum)]
    sort_by: Option<SortArg>,

    /// Honor robots.txt
    #[arg(long)]
    respect_robots: bool,

    /// Number of PDFs downloaded at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// List the PDFs that would be downloaded without downloading them
    #[arg(long)]
    dry_run: bool,

    /// Show a progress bar instead of per-file log lines
    #[arg(long, conflicts_with = "quiet")]
    progress: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Separate,
    Merge,
}

impl From<ModeArg> for OutputMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Separate => OutputMode::Separate,
            ModeArg::Merge => OutputMode::Merge,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    None,
    Numeric,
    Alpha,
    AlphaDesc,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::None => SortBy::None,
            SortArg::Numeric => SortBy::Numeric,
            SortArg::Alpha => SortBy::Alpha,
            SortArg::AlphaDesc => SortBy::AlphaDesc,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.progress);

    let config = build_config(&cli)?;
    let mut harvester = Harvester::new(config)?.with_cancellation(cancel_on_ctrl_c());
    if cli.progress && !cli.dry_run {
        harvester = harvester.with_observer(Arc::new(ProgressObserver::new()));
    }

    if cli.dry_run {
        return handle_dry_run(&harvester, &cli.url).await;
    }

    let report = harvester.harvest(&cli.url).await?;
    if !cli.quiet {
        print_report(&report);
    }

    if report.any_persisted() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!("No PDFs were saved");
        Ok(ExitCode::FAILURE)
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// With a progress bar the default level drops to warnings, since the bar
/// replaces the per-file info lines.
fn setup_logging(verbose: u8, quiet: bool, progress: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 if progress => EnvFilter::new("warn"),
            0 => EnvFilter::new("pdf_trawler=info,warn"),
            1 => EnvFilter::new("pdf_trawler=debug,info"),
            2 => EnvFilter::new("pdf_trawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies a site schema, then layers
/// command-line flags on top
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    apply_schema(cli, &mut config)?;

    if let Some(depth) = cli.depth {
        config.crawler.recursion_depth = depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if cli.respect_robots {
        config.crawler.respect_robots = true;
    }
    if let Some(mode) = cli.mode {
        config.output.mode = mode.into();
    }
    if let Some(dir) = &cli.write_dir {
        config.output.write_dir = dir.clone();
    }
    if let Some(name) = &cli.output_name {
        config.output.output_name = name.clone();
    }
    if let Some(sort_by) = cli.sort_by {
        config.output.sort_by = sort_by.into();
    }

    let mut filter = config.filter.to_spec();
    if !cli.include.is_empty() {
        filter.filename_include = cli.include.clone();
    }
    if !cli.exclude.is_empty() {
        filter.filename_exclude = cli.exclude.clone();
    }
    if !cli.url_include.is_empty() {
        filter.url_include = cli.url_include.clone();
    }
    if !cli.url_exclude.is_empty() {
        filter.url_exclude = cli.url_exclude.clone();
    }
    if cli.min_size.is_some() {
        filter.min_size = cli.min_size;
    }
    if cli.max_size.is_some() {
        filter.max_size = cli.max_size;
    }
    config.filter = FilterConfig::try_from(filter)?;

    Ok(config)
}

/// Folds the schema picked by `--schema` or `--auto-schema` into `config`
fn apply_schema(cli: &Cli, config: &mut Config) -> anyhow::Result<()> {
    if cli.schema.is_none() && !cli.auto_schema {
        return Ok(());
    }

    let registry = SchemaRegistry::from_schemas(config.schemas.iter().cloned())?;
    let schema = match &cli.schema {
        Some(name) => Some(registry.get(name).with_context(|| {
            format!(
                "unknown schema '{}' (configured: {})",
                name,
                registry.names().join(", ")
            )
        })?),
        None => registry.detect(&cli.url),
    };

    match schema {
        Some(schema) => {
            tracing::info!("Using site schema {}", schema);
            schema.apply_to(config)?;
        }
        None => tracing::info!("No site schema matches {}", cli.url),
    }
    Ok(())
}

/// Returns a token that is cancelled on the first Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing up");
            signal.cancel();
        }
    });
    cancel
}

/// Handles the --dry-run mode: lists what would be downloaded
async fn handle_dry_run(harvester: &Harvester, url: &str) -> anyhow::Result<ExitCode> {
    let config = harvester.config();
    let candidates = harvester.discover(url).await?;

    println!("=== pdf-trawler Dry Run ===\n");
    println!("Seed: {}", url);
    println!("Depth: {}", config.effective_depth());
    println!("Mode: {}", config.output.mode);
    println!("Write dir: {}", config.output.write_dir.display());
    if config.filter.has_size_limits() {
        println!("Note: size limits are only checked after download");
    }

    println!("\nWould download ({}):", candidates.len());
    for candidate in &candidates {
        println!("  - {}", candidate);
    }

    if candidates.is_empty() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
