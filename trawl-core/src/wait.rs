//! Bounded polling shared by every pipeline phase.
//!
//! All waits go through [`poll_until`]: probe, and if the probe reports
//! "not yet", sleep one poll interval on the surface and try again until the
//! timeout budget is spent. Sleeping through [`RenderSurface::sleep`] keeps
//! the accounting on the surface's clock, so a test surface can run the
//! whole pipeline on virtual time.
//!
//! The budget counts only time spent sleeping. Time spent inside the probe
//! itself (a WebDriver round trip, say) is not charged, so against a real
//! browser a wait can overrun its timeout by one probe's latency per poll.

use std::future::Future;
use std::time::Duration;

use trawl_drivers::{RenderSurface, SurfaceError, SurfaceResult};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Timeout and poll interval for one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitPolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

/// Failures worth another probe. Anything else ends the wait immediately.
fn retryable(err: &SurfaceError) -> bool {
    matches!(
        err,
        SurfaceError::NotFound(_)
            | SurfaceError::Stale(_)
            | SurfaceError::NotInteractable(_)
            | SurfaceError::Timeout(..)
    )
}

/// Run `probe` until it yields a value or `policy.timeout` elapses.
///
/// The probe is always run at least once, even with a zero timeout.
/// `Ok(None)` and retryable errors mean "not yet"; session and script
/// errors are returned as-is. On expiry the result is
/// [`SurfaceError::Timeout`] labelled with `what`.
pub async fn poll_until<S, T, F, Fut>(
    surface: &S,
    policy: WaitPolicy,
    what: &str,
    mut probe: F,
) -> SurfaceResult<T>
where
    S: RenderSurface,
    F: FnMut() -> Fut,
    Fut: Future<Output = SurfaceResult<Option<T>>>,
{
    let step = policy.poll_interval.max(MIN_POLL_INTERVAL);
    let mut waited = Duration::ZERO;

    loop {
        match probe().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(err) if retryable(&err) => {}
            Err(err) => return Err(err),
        }

        if waited >= policy.timeout {
            return Err(SurfaceError::Timeout(policy.timeout, what.to_string()));
        }

        let nap = step.min(policy.timeout - waited);
        surface.sleep(nap).await;
        waited += nap;
    }
}

async fn find_one<S: RenderSurface>(
    surface: &S,
    scope: Option<&S::Element>,
    selector: &str,
) -> SurfaceResult<S::Element> {
    match scope {
        Some(root) => surface.find_within(root, selector).await,
        None => surface.find(selector).await,
    }
}

async fn find_many<S: RenderSurface>(
    surface: &S,
    scope: Option<&S::Element>,
    selector: &str,
) -> SurfaceResult<Vec<S::Element>> {
    match scope {
        Some(root) => surface.find_all_within(root, selector).await,
        None => surface.find_all(selector).await,
    }
}

/// Wait for the first element matching `selector`, in `scope` or the whole document.
pub async fn wait_for_element<S: RenderSurface>(
    surface: &S,
    scope: Option<&S::Element>,
    selector: &str,
    policy: WaitPolicy,
) -> SurfaceResult<S::Element> {
    poll_until(surface, policy, selector, move || async move {
        find_one(surface, scope, selector).await.map(Some)
    })
    .await
}

/// Wait until at least one element matches, then return all current matches
/// in document order.
pub async fn wait_for_all_elements<S: RenderSurface>(
    surface: &S,
    scope: Option<&S::Element>,
    selector: &str,
    policy: WaitPolicy,
) -> SurfaceResult<Vec<S::Element>> {
    poll_until(surface, policy, selector, move || async move {
        let found = find_many(surface, scope, selector).await?;
        Ok((!found.is_empty()).then_some(found))
    })
    .await
}

/// Wait until `element` is displayed and enabled.
pub async fn wait_until_interactable<S: RenderSurface>(
    surface: &S,
    element: &S::Element,
    policy: WaitPolicy,
) -> SurfaceResult<()> {
    poll_until(surface, policy, "interactable element", move || async move {
        Ok(surface.is_interactable(element).await?.then_some(()))
    })
    .await
}
