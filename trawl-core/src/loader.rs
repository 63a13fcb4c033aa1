//! Scrolls the review panel until it stops growing.
//!
//! The panel renders reviews lazily as it is scrolled. There is no "end of
//! list" signal, so the loader watches the panel's `scrollHeight`: after
//! [`MAX_NO_CHANGE`](crate::options::MAX_NO_CHANGE) consecutive scrolls
//! without growth the content is taken as fully loaded. A panel that pauses
//! longer than that between bursts is cut short; the scroll-attempt ceiling
//! bounds the run either way.

use std::time::Duration;

use tracing::{debug, info, warn};
use trawl_drivers::RenderSurface;

use crate::wait::{wait_for_element, WaitPolicy};

/// Why a load stopped. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The extent stayed flat for the no-change threshold.
    Converged,
    /// The scroll-attempt ceiling was reached.
    AttemptsExhausted,
    /// The panel never appeared.
    ContainerMissing,
    /// Scrolling or measuring failed part-way.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub attempts: u32,
    pub stop: StopReason,
    pub final_extent: Option<u64>,
}

/// No-change streak bookkeeping, independent of any surface.
#[derive(Debug, Clone)]
pub struct StabilizationTracker {
    last: u64,
    streak: u32,
    threshold: u32,
    attempts: u32,
    max_attempts: u32,
}

impl StabilizationTracker {
    /// `threshold` is clamped to at least 1.
    pub fn new(initial: u64, threshold: u32, max_attempts: u32) -> Self {
        Self {
            last: initial,
            streak: 0,
            threshold: threshold.max(1),
            attempts: 0,
            max_attempts,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn last(&self) -> u64 {
        self.last
    }

    pub fn exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Record the extent read after one scroll. Returns `Some` once the
    /// loop must stop.
    pub fn observe(&mut self, extent: u64) -> Option<StopReason> {
        self.attempts += 1;
        if extent == self.last {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        self.last = extent;

        if self.streak >= self.threshold {
            Some(StopReason::Converged)
        } else if self.exhausted() {
            Some(StopReason::AttemptsExhausted)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct StabilizationLoader {
    pub settle: Duration,
    pub no_change_threshold: u32,
    pub container_wait: WaitPolicy,
}

impl StabilizationLoader {
    /// Drive the panel matched by `container_selector` to its loaded state.
    pub async fn load<S: RenderSurface>(
        &self,
        surface: &S,
        container_selector: &str,
        max_attempts: u32,
    ) -> LoadOutcome {
        let container =
            match wait_for_element(surface, None, container_selector, self.container_wait).await {
                Ok(el) => el,
                Err(err) => {
                    warn!(
                        target: "trawl.loader",
                        selector = %container_selector,
                        error = %err,
                        "review section not found"
                    );
                    return LoadOutcome {
                        attempts: 0,
                        stop: StopReason::ContainerMissing,
                        final_extent: None,
                    };
                }
            };

        info!(target: "trawl.loader", "scrolling review section");

        let initial = match surface.current_extent(&container).await {
            Ok(extent) => extent,
            Err(err) => {
                warn!(target: "trawl.loader", error = %err, "could not measure review section");
                return LoadOutcome {
                    attempts: 0,
                    stop: StopReason::Interrupted,
                    final_extent: None,
                };
            }
        };

        let mut tracker =
            StabilizationTracker::new(initial, self.no_change_threshold, max_attempts);

        let stop = loop {
            if tracker.exhausted() {
                break StopReason::AttemptsExhausted;
            }

            if let Err(err) = surface.scroll_to_end(&container).await {
                warn!(target: "trawl.loader", error = %err, "scroll failed");
                break StopReason::Interrupted;
            }
            debug!(
                target: "trawl.loader",
                attempt = tracker.attempts() + 1,
                max_attempts,
                "scroll attempt"
            );
            surface.sleep(self.settle).await;

            let extent = match surface.current_extent(&container).await {
                Ok(extent) => extent,
                Err(err) => {
                    warn!(target: "trawl.loader", error = %err, "could not measure review section");
                    break StopReason::Interrupted;
                }
            };

            let verdict = tracker.observe(extent);
            if tracker.streak() > 0 {
                debug!(
                    target: "trawl.loader",
                    streak = tracker.streak(),
                    threshold = self.no_change_threshold,
                    "no new content loaded"
                );
            }
            if let Some(reason) = verdict {
                break reason;
            }
        };

        info!(
            target: "trawl.loader",
            attempts = tracker.attempts(),
            stop = ?stop,
            extent = tracker.last(),
            "finished scrolling"
        );

        LoadOutcome {
            attempts: tracker.attempts(),
            stop,
            final_extent: Some(tracker.last()),
        }
    }
}
