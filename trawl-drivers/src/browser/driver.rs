use crate::browser::launch::{build_capabilities, LaunchOptions};
use crate::surface::{RenderSurface, SurfaceError, SurfaceResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// A live WebDriver session, exclusively owned by one scrape.
///
/// Dropping the value does not end the browser session; call
/// [`RenderSurface::close`] exactly once when done.
pub struct BrowserSession {
    client: Client,
}

impl BrowserSession {
    /// Connect to a running WebDriver service (Chromedriver by default).
    pub async fn connect(options: &LaunchOptions) -> Result<Self> {
        info!(
            target: "trawl.driver",
            endpoint = %options.webdriver_url,
            headless = options.headless,
            "connecting to webdriver"
        );
        let client = ClientBuilder::native()
            .capabilities(build_capabilities(options))
            .connect(&options.webdriver_url)
            .await
            .with_context(|| format!("failed to connect to {}", options.webdriver_url))?;

        Ok(Self { client })
    }
}

impl From<CmdError> for SurfaceError {
    fn from(err: CmdError) -> Self {
        match &err {
            CmdError::Standard(wd) => match wd.error {
                ErrorStatus::NoSuchElement => SurfaceError::NotFound(err.to_string()),
                ErrorStatus::StaleElementReference => SurfaceError::Stale(err.to_string()),
                ErrorStatus::ElementNotInteractable | ErrorStatus::ElementClickIntercepted => {
                    SurfaceError::NotInteractable(err.to_string())
                }
                ErrorStatus::JavascriptError => SurfaceError::Script(err.to_string()),
                _ => SurfaceError::Session(err.to_string()),
            },
            _ => SurfaceError::Session(err.to_string()),
        }
    }
}

#[async_trait]
impl RenderSurface for BrowserSession {
    type Element = Element;

    async fn navigate(&self, url: &str) -> SurfaceResult<()> {
        let parsed = Url::parse(url).map_err(|e| SurfaceError::Session(format!("{url}: {e}")))?;
        debug!(target: "trawl.driver", url = %parsed, "navigating");
        self.client.goto(parsed.as_str()).await?;
        Ok(())
    }

    async fn find(&self, selector: &str) -> SurfaceResult<Element> {
        Ok(self.client.find(Locator::Css(selector)).await?)
    }

    async fn find_all(&self, selector: &str) -> SurfaceResult<Vec<Element>> {
        Ok(self.client.find_all(Locator::Css(selector)).await?)
    }

    async fn find_within(&self, scope: &Element, selector: &str) -> SurfaceResult<Element> {
        Ok(scope.find(Locator::Css(selector)).await?)
    }

    async fn find_all_within(
        &self,
        scope: &Element,
        selector: &str,
    ) -> SurfaceResult<Vec<Element>> {
        Ok(scope.find_all(Locator::Css(selector)).await?)
    }

    async fn read_text(&self, element: &Element) -> SurfaceResult<String> {
        Ok(element.text().await?)
    }

    async fn read_attribute(&self, element: &Element, name: &str) -> SurfaceResult<Option<String>> {
        Ok(element.attr(name).await?)
    }

    async fn is_interactable(&self, element: &Element) -> SurfaceResult<bool> {
        Ok(element.is_displayed().await? && element.is_enabled().await?)
    }

    async fn click(&self, element: &Element) -> SurfaceResult<()> {
        element.click().await?;
        Ok(())
    }

    async fn run_script(&self, script: &str, args: Vec<Value>) -> SurfaceResult<Value> {
        Ok(self.client.execute(script, args).await?)
    }

    fn element_arg(&self, element: &Element) -> SurfaceResult<Value> {
        serde_json::to_value(element).map_err(|e| SurfaceError::Script(e.to_string()))
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn close(self) -> SurfaceResult<()> {
        info!(target: "trawl.driver", "closing browser session");
        self.client.close().await?;
        Ok(())
    }
}
