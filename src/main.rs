//! Doc-Harvester main entry point
//!
//! This is the command-line interface for the Doc-Harvester document crawler.

use anyhow::Context;
use clap::Parser;
use doc_harvester::config::{load_config_with_hash, Config};
use doc_harvester::crawler::run_crawl;
use doc_harvester::driver::ChromiumDriver;
use doc_harvester::oracle::HttpOracle;
use doc_harvester::output::print_summary;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Doc-Harvester: an oracle-guided document crawler
///
/// Doc-Harvester crawls a single domain in a real browser, asks a
/// selector-inference service which elements reveal documents, clicks
/// them, and downloads every document it finds.
#[derive(Parser, Debug)]
#[command(name = "doc-harvester")]
#[command(version = "1.0.0")]
#[command(about = "An oracle-guided document crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without launching a browser
    #[arg(long)]
    dry_run: bool,

    /// Override the configured start URL
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let config = match cli.start_url {
        Some(url) => config
            .with_start_url(&url)
            .with_context(|| format!("Invalid --start-url '{}'", url))?,
        None => config,
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_harvester=info,warn"),
            1 => EnvFilter::new("doc_harvester=debug,info"),
            2 => EnvFilter::new("doc_harvester=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Doc-Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Target domain: {}", config.target_domain()?);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max documents: {}", config.crawler.max_documents);
    println!("  Document extension: .{}", config.crawler.document_extension);
    println!(
        "  Waits: {}ms after navigation, {}ms before click, {}ms after click",
        config.crawler.page_settle_ms, config.crawler.click_settle_ms, config.crawler.post_click_wait_ms
    );

    println!("\nOracle:");
    println!("  Endpoint: {}", config.oracle.endpoint);
    println!("  Timeout: {}s", config.oracle.timeout_secs);
    println!(
        "  Chunks: {} chars, {} chars overlap",
        config.oracle.chunk_size, config.oracle.chunk_overlap
    );

    println!("\nOutput:");
    println!("  Documents: {}", config.download.directory.display());
    println!("  Audit log: {}", config.download.audit_log.display());
    match &config.download.snapshot_directory {
        Some(dir) => println!("  Snapshots: {}", dir.display()),
        None => println!("  Snapshots: disabled"),
    }

    println!("\nBrowser:");
    println!("  Headless: {}", config.browser.headless);
    println!(
        "  Window: {}x{}",
        config.browser.window_width, config.browser.window_height
    );
    if let Some(exe) = &config.browser.chrome_executable {
        println!("  Executable: {}", exe.display());
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let oracle = HttpOracle::from_config(&config.oracle).context("Failed to build oracle client")?;
    tracing::info!("Using selector oracle at {}", oracle.endpoint());

    let mut driver = match ChromiumDriver::launch(&config.browser).await {
        Ok(driver) => driver,
        Err(e) => {
            tracing::error!("Failed to start browser: {}", e);
            return Err(e.into());
        }
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current page");
            interrupt.cancel();
        }
    });

    match run_crawl(config, &mut driver, &oracle, cancel).await {
        Ok(summary) => {
            tracing::info!("Crawl completed successfully");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
