use std::time::Duration;

use crate::wait::WaitPolicy;

pub const DEFAULT_MAX_SCROLL_ATTEMPTS: u32 = 1000;
/// Consecutive scrolls without growth before the panel counts as loaded.
pub const MAX_NO_CHANGE: u32 = 4;
/// Pause after each scroll so new reviews can render.
pub const SCROLL_WAIT: Duration = Duration::from_secs(2);
/// Pause after clicking a "more" button.
pub const BUTTON_CLICK_DELAY: Duration = Duration::from_millis(300);

/// CSS selectors for the parts of the place page the pipeline touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub page_ready: String,
    pub scroll_panel: String,
    pub expand_button: String,
    pub review_block: String,
    pub author: String,
    pub rating: String,
    /// Attribute on the rating element holding the descriptive label.
    pub rating_attribute: String,
    pub date: String,
    pub text: String,
    pub extras: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            page_ready: "body".into(),
            scroll_panel: "div.m6QErb.DxyBCb".into(),
            expand_button: "button[aria-label='Ver mais']".into(),
            review_block: "div.jJc9Ad".into(),
            author: "div.d4r55".into(),
            rating: "span.kvMYJc[role='img']".into(),
            rating_attribute: "aria-label".into(),
            date: "span.rsqaWe".into(),
            text: "span.wiI7pd".into(),
            extras: "div.PBK6be".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub selectors: Selectors,
    pub max_scroll_attempts: u32,
    pub no_change_threshold: u32,
    pub settle: Duration,
    pub click_delay: Duration,
    pub poll_interval: Duration,
    pub page_timeout: Duration,
    pub container_timeout: Duration,
    pub expand_discovery_timeout: Duration,
    pub clickable_timeout: Duration,
    pub items_timeout: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            max_scroll_attempts: DEFAULT_MAX_SCROLL_ATTEMPTS,
            no_change_threshold: MAX_NO_CHANGE,
            settle: SCROLL_WAIT,
            click_delay: BUTTON_CLICK_DELAY,
            poll_interval: Duration::from_millis(250),
            page_timeout: Duration::from_secs(10),
            container_timeout: Duration::from_secs(10),
            expand_discovery_timeout: Duration::from_secs(5),
            clickable_timeout: Duration::from_secs(2),
            items_timeout: Duration::from_secs(10),
        }
    }
}

impl ScrapeOptions {
    /// A [`WaitPolicy`] with the shared poll interval.
    pub fn wait(&self, timeout: Duration) -> WaitPolicy {
        WaitPolicy::new(timeout, self.poll_interval)
    }
}
