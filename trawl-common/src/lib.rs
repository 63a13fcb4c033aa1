//! Common types and utilities shared across trawl crates.
//!
//! This crate holds the observability setup and the workspace-level error
//! type. It stays dependency-light so every other crate can depend on it.
//!
//! # Overview
//!
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`TrawlError`] and [`Result`]: application-level error handling
//!
//! # Examples
//!
//! ```rust
//! use trawl_common::TrawlError;
//!
//! let err = TrawlError::Config("missing webdriver_url".into());
//! assert_eq!(err.to_string(), "Configuration error: missing webdriver_url");
//! ```

pub mod observability;

/// Error types surfaced at the application layer.
///
/// Library crates keep their own narrow error enums; this one is what the
/// binary and orchestration code speak.
#[derive(thiserror::Error, Debug)]
pub enum TrawlError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The browser driver (WebDriver session, transport) reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Writing the exported table failed.
    #[error("Export error: {0}")]
    Export(String),
}

/// Convenient alias for results that use [`TrawlError`].
pub type Result<T> = std::result::Result<T, TrawlError>;
