//! Driver layer for browser automation.
//!
//! The scrape pipeline never touches WebDriver directly; it is written
//! against [`surface::RenderSurface`], the small capability set it needs from
//! a rendered page. This crate provides that trait and the production
//! backend.
//!
//! - [`surface::RenderSurface`]: capabilities used by the loader/expander/extractor
//! - [`surface::SurfaceError`]: failure taxonomy for surface operations
//! - [`browser::driver::BrowserSession`]: `fantoccini` WebDriver implementation
//! - [`browser::launch`]: Chrome capabilities and command-line switches
pub mod browser;
pub mod surface;

pub use surface::{RenderSurface, SurfaceError, SurfaceResult};
