use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use trawl_common::TrawlError;
use trawl_common::observability::init_logging;
use trawl_config::{OutputFormat, TrawlConfig, TrawlConfigLoader};
use trawl_core::{ExtractionBatch, ReviewScraper};
use trawl_drivers::browser::driver::BrowserSession;
use wiring::Overrides;
mod wiring;

const DEFAULT_CONFIG_FILE: &str = "trawl.yaml";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Tsv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Tsv => OutputFormat::Tsv,
        }
    }
}

/// Collect every review of a map place page into a table.
#[derive(Debug, Parser)]
#[command(name = "trawl", version)]
struct Cli {
    /// Place page URL.
    url: String,

    /// Upper bound on scroll attempts while loading reviews.
    #[arg(long, env = "TRAWL_MAX_SCROLL_ATTEMPTS")]
    max_scroll_attempts: Option<u32>,

    /// YAML configuration file. `trawl.yaml` is read if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file; the extension is appended when missing.
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Run the browser without a window.
    #[arg(long)]
    headless: bool,

    /// WebDriver endpoint, e.g. http://localhost:9515.
    #[arg(long, env = "WEBDRIVER_URL")]
    webdriver: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins), then flags
    let loader = match &cli.config {
        Some(path) => TrawlConfigLoader::new().with_file(path),
        None => TrawlConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let mut cfg: TrawlConfig = loader
        .load()
        .map_err(|e| TrawlError::Config(e.to_string()))?;
    wiring::apply_overrides(
        &mut cfg,
        Overrides {
            max_scroll_attempts: cli.max_scroll_attempts,
            output: cli.output,
            format: cli.format.map(Into::into),
            headless: cli.headless,
            webdriver_url: cli.webdriver,
        },
    );

    let log_path = init_logging(wiring::log_config(&cfg.logging))?;
    tracing::debug!(log = %log_path.display(), "logging initialised");

    // 2) Scrape
    let batch = collect(&cfg, &cli.url).await;

    // 3) Export
    if batch.is_empty() {
        println!("No reviews data was collected.");
        return Ok(());
    }

    let format = wiring::table_format(cfg.output.format);
    println!("{}", wiring::saving_notice(format));
    let path = trawl_export::export_batch(&batch, cfg.output.path.as_deref(), format)
        .map_err(|e| TrawlError::Export(e.to_string()))?;
    println!("Saved {} reviews to {}", batch.len(), path.display());

    Ok(())
}

/// Open a session and scrape `url`; a session that cannot be opened yields
/// an empty batch.
async fn collect(cfg: &TrawlConfig, url: &str) -> ExtractionBatch {
    let session = match BrowserSession::connect(&wiring::launch_options(&cfg.browser)).await {
        Ok(session) => session,
        Err(err) => {
            let err = TrawlError::Driver(err);
            tracing::error!(error = %err, "could not start browser session");
            eprintln!("An error occurred: {err}");
            return ExtractionBatch::new();
        }
    };

    let scraper = ReviewScraper::new(wiring::scrape_options(&cfg.scrape, &cfg.selectors));
    scraper.scrape_and_close(session, url).await
}
