//! Crawl orchestration
//!
//! The controller drives one renderer navigation at a time, the frontier
//! tracker decides what to fetch next, and link classification feeds the
//! tracker from each rendered page.

mod controller;
mod frontier;
mod links;

pub use controller::{CrawlState, Crawler};
pub use frontier::{FrontierEntry, FrontierTracker};
pub use links::classify_links;

use crate::har::Har;
use crate::renderer::Renderer;
use crate::CrawlConfig;

/// Runs a complete crawl: validates the configuration, drives the renderer
/// until termination, and returns the assembled, validated HAR document.
pub async fn crawl<R: Renderer>(config: CrawlConfig, renderer: R) -> crate::Result<Har> {
    Crawler::new(config, renderer)?.run().await
}
