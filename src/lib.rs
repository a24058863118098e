//! har-scout: a bounded, renderer-driven HAR crawler
//!
//! This crate drives an external page renderer to crawl a small, bounded set
//! of pages from a website and produces a validated HTTP Archive (HAR 1.2)
//! document describing each page and the network traffic it generated.
//!
//! The renderer itself (DOM construction, script execution, network capture)
//! lives behind the [`renderer::Renderer`] trait and is not part of this
//! crate. What this crate owns is the crawl controller: deduplicating and
//! filtering candidate links, choosing the next page via a popularity/depth
//! heuristic, and assembling the per-page and per-request records into one
//! validated HAR log.

pub mod config;
pub mod crawler;
pub mod har;
pub mod renderer;
pub mod url;

use thiserror::Error;

/// Main error type for har-scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The renderer process crashed or the transport to it was lost.
    /// This aborts the crawl; no HAR is produced.
    #[error("Renderer failure: {0}")]
    Renderer(#[from] renderer::RendererError),

    #[error("Failed to serialize HAR document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The assembled document does not conform to HAR 1.2. Carries the
    /// offending document and the field-level violations so callers can tell
    /// "the tool broke" apart from "the tool produced a bad document".
    #[error("Assembled HAR document failed validation ({} violation(s))", violations.len())]
    HarValidation {
        document: serde_json::Value,
        violations: Vec<har::Violation>,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid crawl URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid filter pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for har-scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{load_config, CrawlConfig, Pattern};
pub use crawler::{CrawlState, Crawler, FrontierTracker};
pub use har::{Entry, Failure, Har, Page};
pub use renderer::{
    BrowserInfo, NavigationOutcome, PageCapture, RenderOptions, Renderer, RendererError,
};
