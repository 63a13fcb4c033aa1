use std::path::PathBuf;
use std::time::Duration;

use trawl_common::observability::{LogConfig, LogFormat};
use trawl_config::{
    BrowserConfig, LoggingConfig, OutputFormat, ScrapeConfig, SelectorConfig, TrawlConfig,
};
use trawl_core::{ScrapeOptions, Selectors};
use trawl_drivers::browser::launch::LaunchOptions;
use trawl_export::TableFormat;

/// Command-line values that win over the loaded configuration.
#[derive(Debug, Default)]
pub struct Overrides {
    pub max_scroll_attempts: Option<u32>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub headless: bool,
    pub webdriver_url: Option<String>,
}

pub fn apply_overrides(cfg: &mut TrawlConfig, overrides: Overrides) {
    if let Some(n) = overrides.max_scroll_attempts {
        cfg.scrape.max_scroll_attempts = n;
    }
    if let Some(path) = overrides.output {
        cfg.output.path = Some(path);
    }
    if let Some(format) = overrides.format {
        cfg.output.format = format;
    }
    if overrides.headless {
        cfg.browser.headless = true;
    }
    if let Some(url) = overrides.webdriver_url {
        cfg.browser.webdriver_url = url;
    }
}

pub fn log_config(cfg: &LoggingConfig) -> LogConfig {
    LogConfig {
        app_name: "trawl",
        log_dir: cfg.dir.clone(),
        emit_stderr: cfg.stderr,
        format: LogFormat::from_name(&cfg.format),
        default_filter: cfg.filter.clone(),
    }
}

pub fn launch_options(cfg: &BrowserConfig) -> LaunchOptions {
    LaunchOptions {
        webdriver_url: cfg.webdriver_url.clone(),
        headless: cfg.headless,
        window_size: cfg.window_size,
        lang: cfg.lang.clone(),
        extra_args: cfg.args.clone(),
    }
}

fn selectors(cfg: &SelectorConfig) -> Selectors {
    Selectors {
        page_ready: cfg.page_ready.clone(),
        scroll_panel: cfg.scroll_panel.clone(),
        expand_button: cfg.expand_button.clone(),
        review_block: cfg.review_block.clone(),
        author: cfg.author.clone(),
        rating: cfg.rating.clone(),
        rating_attribute: cfg.rating_attribute.clone(),
        date: cfg.date.clone(),
        text: cfg.text.clone(),
        extras: cfg.extras.clone(),
    }
}

pub fn scrape_options(scrape: &ScrapeConfig, sel: &SelectorConfig) -> ScrapeOptions {
    let ms = Duration::from_millis;
    ScrapeOptions {
        selectors: selectors(sel),
        max_scroll_attempts: scrape.max_scroll_attempts,
        no_change_threshold: scrape.no_change_threshold,
        settle: ms(scrape.settle_ms),
        click_delay: ms(scrape.click_delay_ms),
        poll_interval: ms(scrape.poll_interval_ms),
        page_timeout: ms(scrape.page_timeout_ms),
        container_timeout: ms(scrape.container_timeout_ms),
        expand_discovery_timeout: ms(scrape.expand_discovery_timeout_ms),
        clickable_timeout: ms(scrape.clickable_timeout_ms),
        items_timeout: ms(scrape.items_timeout_ms),
    }
}

pub fn table_format(format: OutputFormat) -> TableFormat {
    match format {
        OutputFormat::Csv => TableFormat::Csv,
        OutputFormat::Tsv => TableFormat::Tsv,
    }
}

pub fn saving_notice(format: TableFormat) -> String {
    format!(
        "Saving reviews data to {}...",
        format.extension().to_uppercase()
    )
}
