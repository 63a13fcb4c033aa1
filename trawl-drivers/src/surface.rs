use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Failures reported by a [`RenderSurface`].
///
/// Callers in the scrape pipeline treat everything except session-level
/// failures as local: the element or field involved is skipped.
#[derive(thiserror::Error, Debug)]
pub enum SurfaceError {
    /// A selector matched nothing.
    #[error("element not found: {0}")]
    NotFound(String),

    /// The element reference is no longer attached to the document.
    #[error("stale element reference: {0}")]
    Stale(String),

    /// The element exists but cannot receive the interaction.
    #[error("element not interactable: {0}")]
    NotInteractable(String),

    /// A bounded wait elapsed.
    #[error("timed out after {0:?} waiting for {1}")]
    Timeout(Duration, String),

    /// A script failed or returned something unusable.
    #[error("script error: {0}")]
    Script(String),

    /// The session or its transport failed.
    #[error("session error: {0}")]
    Session(String),
}

impl SurfaceError {
    /// `true` for failures that just mean "nothing there (yet)".
    pub fn is_miss(&self) -> bool {
        matches!(self, SurfaceError::NotFound(_) | SurfaceError::Timeout(..))
    }
}

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

const SCROLL_INTO_VIEW_SCRIPT: &str = "arguments[0].scrollIntoView({block: 'center'});";
const SCROLL_TO_END_SCRIPT: &str = "arguments[0].scrollTop = arguments[0].scrollHeight;";
const EXTENT_SCRIPT: &str = "return arguments[0].scrollHeight;";

/// Capability set the scrape pipeline needs from a rendered page.
///
/// Lookups are immediate: a miss returns [`SurfaceError::NotFound`] (or an
/// empty vector for the `_all` variants). Waiting for elements to appear is
/// layered on top by the caller, using [`RenderSurface::sleep`] between
/// probes so that test surfaces can run on virtual time.
///
/// The session is released by [`RenderSurface::close`], which consumes it.
#[async_trait]
pub trait RenderSurface: Send + Sync {
    type Element: Clone + Send + Sync;

    async fn navigate(&self, url: &str) -> SurfaceResult<()>;

    async fn find(&self, selector: &str) -> SurfaceResult<Self::Element>;

    async fn find_all(&self, selector: &str) -> SurfaceResult<Vec<Self::Element>>;

    async fn find_within(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> SurfaceResult<Self::Element>;

    async fn find_all_within(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> SurfaceResult<Vec<Self::Element>>;

    async fn read_text(&self, element: &Self::Element) -> SurfaceResult<String>;

    async fn read_attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> SurfaceResult<Option<String>>;

    /// Whether the element is displayed and enabled.
    async fn is_interactable(&self, element: &Self::Element) -> SurfaceResult<bool>;

    async fn click(&self, element: &Self::Element) -> SurfaceResult<()>;

    /// Run a script; elements are passed as `args` via [`RenderSurface::element_arg`].
    async fn run_script(&self, script: &str, args: Vec<Value>) -> SurfaceResult<Value>;

    /// Encode an element so it can be handed to [`RenderSurface::run_script`].
    fn element_arg(&self, element: &Self::Element) -> SurfaceResult<Value>;

    async fn sleep(&self, duration: Duration);

    async fn close(self) -> SurfaceResult<()>
    where
        Self: Sized;

    async fn scroll_into_view(&self, element: &Self::Element) -> SurfaceResult<()> {
        let arg = self.element_arg(element)?;
        self.run_script(SCROLL_INTO_VIEW_SCRIPT, vec![arg]).await?;
        Ok(())
    }

    /// Scroll a scrollable element to its current maximum extent.
    async fn scroll_to_end(&self, element: &Self::Element) -> SurfaceResult<()> {
        let arg = self.element_arg(element)?;
        self.run_script(SCROLL_TO_END_SCRIPT, vec![arg]).await?;
        Ok(())
    }

    /// Rendered extent (`scrollHeight`) of a scrollable element.
    async fn current_extent(&self, element: &Self::Element) -> SurfaceResult<u64> {
        let arg = self.element_arg(element)?;
        let value = self.run_script(EXTENT_SCRIPT, vec![arg]).await?;
        extent_from_value(&value)
    }
}

fn extent_from_value(value: &Value) -> SurfaceResult<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
        .ok_or_else(|| SurfaceError::Script(format!("scrollHeight is not a number: {value}")))
}
