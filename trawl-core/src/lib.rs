//! Review collection pipeline for map place pages.
//!
//! A scrape runs three phases in order against one [`RenderSurface`]:
//!
//! - [`loader`]: scroll the review panel until it stops growing
//! - [`expander`]: click every "more" button so review text is complete
//! - [`extractor`]: read each review block into a flat [`ReviewRecord`]
//!
//! [`scrape::ReviewScraper`] wires the phases together. All waiting goes
//! through the bounded poll in [`wait`].
//!
//! [`RenderSurface`]: trawl_drivers::RenderSurface
pub mod expander;
pub mod extractor;
pub mod loader;
pub mod options;
pub mod record;
pub mod scrape;
pub mod wait;

pub use options::{ScrapeOptions, Selectors};
pub use record::{ExtractionBatch, Field, ReviewRecord, SENTINEL};
pub use scrape::ReviewScraper;
