use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{error, info, warn};
use trawl_drivers::{RenderSurface, SurfaceResult};

use crate::expander::TruncationExpander;
use crate::extractor::RecordExtractor;
use crate::loader::{LoadOutcome, StabilizationLoader};
use crate::options::ScrapeOptions;
use crate::record::ExtractionBatch;
use crate::wait::wait_for_element;

/// Runs navigation, loading, expansion and extraction for one place page.
#[derive(Debug, Clone)]
pub struct ReviewScraper {
    options: ScrapeOptions,
}

impl ReviewScraper {
    pub fn new(options: ScrapeOptions) -> Self {
        Self { options }
    }

    pub fn loader(&self) -> StabilizationLoader {
        StabilizationLoader {
            settle: self.options.settle,
            no_change_threshold: self.options.no_change_threshold,
            container_wait: self.options.wait(self.options.container_timeout),
        }
    }

    pub fn expander(&self) -> TruncationExpander {
        TruncationExpander {
            selector: self.options.selectors.expand_button.clone(),
            discovery_wait: self.options.wait(self.options.expand_discovery_timeout),
            clickable_wait: self.options.wait(self.options.clickable_timeout),
            click_delay: self.options.click_delay,
        }
    }

    pub fn extractor(&self) -> RecordExtractor {
        RecordExtractor {
            selectors: self.options.selectors.clone(),
            items_wait: self.options.wait(self.options.items_timeout),
        }
    }

    /// Scrape `url` on an already-open session.
    ///
    /// Failures that are not tied to one element or field (the page never
    /// loading, a dead session) are logged and produce an empty batch.
    pub async fn scrape<S: RenderSurface>(&self, surface: &S, url: &str) -> ExtractionBatch {
        match self.run(surface, url).await {
            Ok(batch) => batch,
            Err(err) => {
                error!(target: "trawl.scrape", %url, error = %err, "an error occurred during scraping");
                ExtractionBatch::new()
            }
        }
    }

    /// [`ReviewScraper::scrape`], then release the session exactly once.
    ///
    /// The session is closed even if scraping panics; the panic is logged and
    /// an empty batch returned.
    pub async fn scrape_and_close<S: RenderSurface>(&self, surface: S, url: &str) -> ExtractionBatch {
        let batch = match AssertUnwindSafe(self.scrape(&surface, url))
            .catch_unwind()
            .await
        {
            Ok(batch) => batch,
            Err(_) => {
                error!(target: "trawl.scrape", %url, "scrape panicked");
                ExtractionBatch::new()
            }
        };

        if let Err(err) = surface.close().await {
            warn!(target: "trawl.scrape", error = %err, "failed to close browser session");
        }
        batch
    }

    async fn run<S: RenderSurface>(&self, surface: &S, url: &str) -> SurfaceResult<ExtractionBatch> {
        let opts = &self.options;

        info!(target: "trawl.scrape", %url, "loading place page");
        surface.navigate(url).await?;
        wait_for_element(
            surface,
            None,
            &opts.selectors.page_ready,
            opts.wait(opts.page_timeout),
        )
        .await?;

        let outcome: LoadOutcome = self
            .loader()
            .load(surface, &opts.selectors.scroll_panel, opts.max_scroll_attempts)
            .await;
        let expanded = self.expander().expand(surface, None).await;
        let batch = self.extractor().extract_all(surface, None).await;

        info!(
            target: "trawl.scrape",
            scroll_attempts = outcome.attempts,
            stop = ?outcome.stop,
            expanded,
            reviews = batch.len(),
            "scrape finished"
        );
        Ok(batch)
    }
}
