use std::time::Duration;

use tracing::{debug, info};
use trawl_drivers::{RenderSurface, SurfaceResult};

use crate::wait::{wait_for_all_elements, wait_until_interactable, WaitPolicy};

/// Clicks every "more" button so truncated review text is shown in full.
#[derive(Debug, Clone)]
pub struct TruncationExpander {
    pub selector: String,
    pub discovery_wait: WaitPolicy,
    pub clickable_wait: WaitPolicy,
    pub click_delay: Duration,
}

impl TruncationExpander {
    /// Activate every button under `root` (the whole document when `None`).
    /// Returns how many were clicked; a button that fails is skipped.
    pub async fn expand<S: RenderSurface>(&self, surface: &S, root: Option<&S::Element>) -> usize {
        let buttons =
            match wait_for_all_elements(surface, root, &self.selector, self.discovery_wait).await {
                Ok(buttons) => buttons,
                Err(err) => {
                    info!(target: "trawl.expander", reason = %err, "no expand buttons found");
                    return 0;
                }
            };
        info!(target: "trawl.expander", found = buttons.len(), "found expand buttons");

        let mut clicked = 0;
        for (index, button) in buttons.iter().enumerate() {
            match self.activate(surface, button).await {
                Ok(()) => clicked += 1,
                Err(err) => {
                    debug!(target: "trawl.expander", index, error = %err, "skipping expand button")
                }
            }
        }

        info!(target: "trawl.expander", clicked, "clicked expand buttons");
        clicked
    }

    async fn activate<S: RenderSurface>(&self, surface: &S, button: &S::Element) -> SurfaceResult<()> {
        surface.scroll_into_view(button).await?;
        wait_until_interactable(surface, button, self.clickable_wait).await?;
        surface.click(button).await?;
        surface.sleep(self.click_delay).await;
        Ok(())
    }
}
