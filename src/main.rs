//! Site-Mirror main entry point
//!
//! This is the command-line interface for the Site-Mirror offline website mirror.

use anyhow::Context;
use clap::Parser;
use site_mirror::config::{resolve_config, Config, Overrides};
use site_mirror::output::{generate_markdown_report, print_statistics, MirrorStats};
use site_mirror::Mirror;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Site-Mirror: an offline website mirror
///
/// Site-Mirror downloads a website from a root URL, following same-host links
/// and assets up to a maximum depth, and rewrites references between the
/// saved files so the copy can be browsed from disk.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version = "1.0.0")]
#[command(about = "Mirror a website for offline browsing", long_about = None)]
struct Cli {
    /// Root URL to mirror
    #[arg(value_name = "URL")]
    url: String,

    /// Output directory [default: mirror_output]
    #[arg(short, long, value_name = "DIR")]
    out: Option<String>,

    /// Maximum link depth from the root URL [default: 2]
    #[arg(short, long, value_name = "N")]
    depth: Option<u32>,

    /// Per-request timeout in seconds [default: 15]
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a markdown report of the run to this path
    #[arg(long, value_name = "FILE")]
    report: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let overrides = Overrides {
        out_dir: cli.out,
        max_depth: cli.depth,
        timeout_secs: cli.timeout,
        report_path: cli.report,
    };

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = resolve_config(cli.config.as_deref(), overrides)
        .context("Failed to load configuration")?;

    let result = handle_mirror(&config, &cli.url).await;

    println!("Finished in {:?}", start.elapsed());
    result
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mirror=info,warn"),
            1 => EnvFilter::new("site_mirror=debug,info"),
            2 => EnvFilter::new("site_mirror=trace,debug"),
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

/// Runs the mirror and reports its outcome
async fn handle_mirror(config: &Config, root_url: &str) -> anyhow::Result<()> {
    let mut mirror = Mirror::new(config)?;

    let stats = match mirror.run(root_url).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Mirror failed: {}", e);
            return Err(e.into());
        }
    };

    println!();
    print_statistics(&stats);

    if let Some(report) = &config.mirror.report_path {
        write_report(&stats, Path::new(report))?;
    }

    Ok(())
}

fn write_report(stats: &MirrorStats, path: &Path) -> anyhow::Result<()> {
    generate_markdown_report(stats, path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    println!("\n✓ Report written to: {}", path.display());
    Ok(())
}
