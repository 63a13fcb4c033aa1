//! WebDriver-backed [`crate::RenderSurface`] implementation.
pub mod driver;
pub mod launch;
