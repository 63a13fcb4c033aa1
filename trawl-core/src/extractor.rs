//! Turns rendered review blocks into [`ReviewRecord`]s.
//!
//! Every field is read on its own; a field that cannot be read becomes
//! [`Field::Missing`] and the record is still produced. Blocks are visited in
//! document order and the batch keeps that order.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};
use trawl_drivers::{RenderSurface, SurfaceError, SurfaceResult};

use crate::options::Selectors;
use crate::record::{ExtractionBatch, Field, ReviewRecord};
use crate::wait::{wait_for_all_elements, WaitPolicy};

#[derive(Debug, Clone)]
pub struct RecordExtractor {
    pub selectors: Selectors,
    pub items_wait: WaitPolicy,
}

impl RecordExtractor {
    pub async fn extract_all<S: RenderSurface>(
        &self,
        surface: &S,
        root: Option<&S::Element>,
    ) -> ExtractionBatch {
        let blocks = match wait_for_all_elements(
            surface,
            root,
            &self.selectors.review_block,
            self.items_wait,
        )
        .await
        {
            Ok(blocks) => blocks,
            Err(err) => {
                info!(target: "trawl.extractor", reason = %err, "no review blocks found");
                return ExtractionBatch::new();
            }
        };

        let mut batch = ExtractionBatch::with_capacity(blocks.len());
        for block in &blocks {
            batch.push(self.extract_record(surface, block).await);
        }

        info!(target: "trawl.extractor", count = batch.len(), "extracted reviews");
        batch
    }

    /// Read one block. Never fails; unreadable fields are [`Field::Missing`].
    pub async fn extract_record<S: RenderSurface>(
        &self,
        surface: &S,
        block: &S::Element,
    ) -> ReviewRecord {
        let sel = &self.selectors;

        let author = sentinel_on_error(
            "author",
            read_child_text(surface, block, &sel.author).await,
        );
        let rating: Field<f64> = match self.read_rating_label(surface, block).await {
            Ok(Some(label)) => parse_rating(&label).into(),
            Ok(None) => Field::Missing,
            Err(err) => sentinel_on_error("rating", Err(err)),
        };
        let date = sentinel_on_error("date", read_child_text(surface, block, &sel.date).await);
        let text = sentinel_on_error("text", read_child_text(surface, block, &sel.text).await);
        let extras = self.read_extras(surface, block).await;

        ReviewRecord {
            author,
            rating,
            date,
            text,
            extras,
        }
    }

    async fn read_rating_label<S: RenderSurface>(
        &self,
        surface: &S,
        block: &S::Element,
    ) -> SurfaceResult<Option<String>> {
        let el = surface.find_within(block, &self.selectors.rating).await?;
        surface
            .read_attribute(&el, &self.selectors.rating_attribute)
            .await
    }

    async fn read_extras<S: RenderSurface>(&self, surface: &S, block: &S::Element) -> String {
        let elements = match surface
            .find_all_within(block, &self.selectors.extras)
            .await
        {
            Ok(elements) => elements,
            Err(err) => {
                debug!(target: "trawl.extractor", error = %err, "extras lookup failed");
                return String::new();
            }
        };

        let mut lines = Vec::with_capacity(elements.len());
        for el in &elements {
            match surface.read_text(el).await {
                Ok(raw) => lines.extend(format_extra(&raw)),
                Err(err) => debug!(target: "trawl.extractor", error = %err, "skipping extra"),
            }
        }
        lines.join("\n")
    }
}

async fn read_child_text<S: RenderSurface>(
    surface: &S,
    block: &S::Element,
    selector: &str,
) -> SurfaceResult<String> {
    let el = surface.find_within(block, selector).await?;
    surface.read_text(&el).await
}

fn sentinel_on_error<T>(field: &'static str, result: Result<T, SurfaceError>) -> Field<T> {
    match result {
        Ok(value) => Field::Value(value),
        Err(err) => {
            if !err.is_miss() {
                debug!(target: "trawl.extractor", field, error = %err, "field read failed");
            }
            Field::Missing
        }
    }
}

fn rating_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("rating pattern compiles"))
}

/// First number in a rating label such as `"4,5 de 5 estrelas"` or
/// `"Rated 4.0 out of 5"`. A comma is read as the decimal separator.
///
/// Only the first number counts, even when a label carries several.
pub fn parse_rating(label: &str) -> Option<f64> {
    let found = rating_pattern().find(label)?;
    found.as_str().replace(',', ".").parse().ok()
}

/// Normalise one supplementary-info block to `label: value`.
///
/// Two-line blocks (`"Comida\n5"`) become `"Comida: 5"`; single-line blocks
/// are kept as they are. Blank blocks yield `None`.
pub fn format_extra(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    let mut lines = text.split('\n');
    match (lines.next(), lines.next()) {
        (Some(label), Some(value)) => {
            let label = label.trim().trim_end_matches(':').trim_end();
            Some(format!("{}: {}", label, value.trim()))
        }
        _ => Some(text.to_string()),
    }
}
