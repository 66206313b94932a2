//! News Harvester main entry point
//!
//! Command-line interface for crawling newspaper listings, scraping the
//! articles they link to and maintaining the local document store.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use news_harvester::browser::HttpSessionFactory;
use news_harvester::config::{load_config_with_hash, Config};
use news_harvester::output::{load_statistics, print_run_summary, print_statistics};
use news_harvester::pipeline::{crawl_links, deduplicate, sanitize_links, scrape_articles};
use news_harvester::sites::{build_crawler_registry, build_scraper_registry, HarvestContext};
use news_harvester::storage::{open_store, share, with_store};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// News Harvester: concurrent news link and article acquisition
///
/// Crawls newspaper listing pages for article links, scrapes the articles
/// behind them and stores both in a local SQLite database.
#[derive(Parser, Debug)]
#[command(name = "news-harvester")]
#[command(version)]
#[command(about = "Concurrent news link and article acquisition", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl newspaper listings for article links
    Crawl {
        /// Listing URLs to crawl instead of the configured newspapers
        #[arg(value_name = "URL")]
        urls: Vec<String>,
    },

    /// Scrape articles for links that have none yet
    Scrape {
        /// Maximum number of links to scrape (defaults to scrape.max-articles)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Remove links that do not look like news articles
    Sanitize,

    /// Remove duplicate links and articles
    Dedupe,

    /// Show statistics from the database
    Stats,

    /// List the sites with a registered crawler and scraper
    Sites,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let ctx = build_context(config)?;

    match cli.command {
        Command::Crawl { urls } => {
            let targets = if urls.is_empty() {
                ctx.config.crawl.newspapers.clone()
            } else {
                urls
            };
            if targets.is_empty() {
                bail!("No newspapers to crawl: set crawl.newspapers or pass URLs");
            }

            let summary = crawl_links(&ctx, &config_hash, &targets).await?;
            print_run_summary(&summary);
        }
        Command::Scrape { limit } => {
            let max_articles = limit.unwrap_or(ctx.config.scrape.max_articles);
            let summary = scrape_articles(&ctx, &config_hash, max_articles).await?;
            print_run_summary(&summary);
        }
        Command::Sanitize => {
            let report = sanitize_links(&ctx.store)?;
            println!(
                "Examined {} links: removed {}, failed {}",
                report.examined, report.removed, report.failed
            );
        }
        Command::Dedupe => {
            let report = deduplicate(&ctx.store)?;
            println!(
                "Removed {} duplicate links and {} duplicate articles",
                report.links_removed, report.articles_removed
            );
        }
        Command::Stats => {
            let cap = ctx.config.scrape.max_articles;
            let stats = with_store(&ctx.store, |store| load_statistics(store, cap))?;
            print_statistics(&stats);
        }
        Command::Sites => {
            let crawlers = build_crawler_registry(&ctx)?;
            let scrapers = build_scraper_registry(&ctx)?;
            println!("Crawlers ({}):", crawlers.len());
            for key in crawlers.list_registered() {
                println!("  - {}", key);
            }
            println!("Scrapers ({}):", scrapers.len());
            for key in scrapers.list_registered() {
                println!("  - {}", key);
            }
        }
    }

    Ok(())
}

/// Opens the store and session factory described by the configuration
fn build_context(config: Config) -> anyhow::Result<HarvestContext> {
    let database_path = Path::new(&config.storage.database_path);
    let store = open_store(database_path)
        .with_context(|| format!("Failed to open database {}", database_path.display()))?;
    let sessions = Arc::new(HttpSessionFactory::new(&config.browser));

    Ok(HarvestContext::new(config, share(store), sessions))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("news_harvester=info,warn"),
            1 => EnvFilter::new("news_harvester=debug,info"),
            2 => EnvFilter::new("news_harvester=trace,debug"),
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
