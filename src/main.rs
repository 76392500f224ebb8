use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hemnet_scout::config::load_config;
use hemnet_scout::models::RecordStore;
use hemnet_scout::scrapers::{ChromeSession, CrawlMode, Crawler, SnapshotSite};

#[derive(Parser)]
#[command(name = "hemnet-scout")]
#[command(about = "Scrape Hemnet listings into an address-keyed JSON store")]
#[command(version)]
struct Cli {
    /// YAML config file
    #[arg(short, long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a result list
    Crawl {
        #[arg(long, value_enum, default_value = "sold")]
        mode: Mode,

        /// Stop after this many new records
        #[arg(long)]
        max: Option<usize>,

        /// Existing store to extend
        #[arg(long)]
        seed: Option<PathBuf>,

        #[arg(short, long, default_value = "scraped_properties.json")]
        out: PathBuf,

        /// Run Chrome with a visible window
        #[arg(long)]
        show_browser: bool,
    },

    /// Scrape a single for-sale listing
    Listing {
        url: String,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Parse a saved HTML page
    Parse {
        file: PathBuf,

        #[arg(long, value_enum, default_value = "for-sale")]
        mode: Mode,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    ForSale,
    Sold,
}

impl From<Mode> for CrawlMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::ForSale => CrawlMode::ForSale,
            Mode::Sold => CrawlMode::Sold,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("🏠 Hemnet Scout");

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Crawl {
            mode,
            max,
            seed,
            out,
            show_browser,
        } => {
            let mode = CrawlMode::from(mode);
            let seed = match seed {
                Some(path) => {
                    let json = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read seed store {}", path.display()))?;
                    RecordStore::from_json(&json)?
                }
                None => RecordStore::new(),
            };
            info!("Starting from {} known properties", seed.len());

            let mut crawl_config = config.crawl.clone();
            if max.is_some() {
                crawl_config.max_new = max;
            }
            if show_browser {
                crawl_config.headless = false;
            }
            let start_url = match &crawl_config.start_url {
                Some(url) => url.clone(),
                None => config.search.result_url(mode)?.to_string(),
            };

            let report = tokio::task::spawn_blocking(move || -> Result<_> {
                let session = ChromeSession::launch(crawl_config.headless)?;
                let crawler = Crawler::new(session, crawl_config);
                Ok(crawler.crawl(mode, &start_url, seed)?)
            })
            .await
            .context("Crawl task panicked")??;

            info!(
                "✅ Added {} properties ({} looked at, {} pages)",
                report.added, report.looked_at, report.pages
            );
            print_store(&report.store);
            write_store(&out, &report.store).await?;
        }
        Commands::Listing { url, out } => {
            let crawl_config = config.crawl.clone();
            let store = tokio::task::spawn_blocking(move || -> Result<_> {
                let session = ChromeSession::launch(crawl_config.headless)?;
                Ok(Crawler::new(session, crawl_config).scrape_listing(&url)?)
            })
            .await
            .context("Listing task panicked")??;

            print_store(&store);
            if let Some(out) = out {
                write_store(&out, &store).await?;
            }
        }
        Commands::Parse { file, mode, out } => {
            let mut site = SnapshotSite::new();
            let url = site
                .add_file(&file)
                .with_context(|| format!("Failed to load {}", file.display()))?;
            let store = Crawler::new(site, config.crawl.clone()).parse_page(mode.into(), &url)?;

            print_store(&store);
            if let Some(out) = out {
                write_store(&out, &store).await?;
            }
        }
    }

    Ok(())
}

fn print_store(store: &RecordStore) {
    for (i, (address, record)) in store.iter().enumerate() {
        let price = record.get_str("final_price").or(record.get_str("price"));
        println!("{}. {} ({})", i + 1, address, price.unwrap_or("no price"));
        if let Some(kind) = record.kind() {
            println!("   Type: {}", kind);
        }
        if let Some(broker) = record.get_str("mäklare") {
            println!("   Mäklare: {}", broker);
        }
        println!();
    }
}

async fn write_store(path: &Path, store: &RecordStore) -> Result<()> {
    let json = store.to_json_pretty()?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Saved {} properties to {}", store.len(), path.display());
    Ok(())
}
