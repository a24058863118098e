//! Crawl controller - the top-level sequential state machine
//!
//! Owns the visited set, applies include/exclude filtering, drives one page
//! fetch at a time through the renderer adapter, decides termination, and
//! hands the accumulated records to the HAR assembler. The crawl is
//! strictly sequential: the frontier's selection decision depends on the
//! complete result of every prior fetch, and a single renderer instance
//! handles one navigation at a time.

use crate::config::{self, CrawlConfig};
use crate::crawler::frontier::FrontierTracker;
use crate::crawler::links::classify_links;
use crate::har::{self, CrawlRecord, EntryBuilder, Failure, Har, Page, PageTimings};
use crate::renderer::{NavigationOutcome, PageCapture, Renderer};
use crate::url::{canonical_base_id, parse_url, UrlFilter};
use crate::{ConfigError, Result, ScoutError, UrlError};
use std::collections::HashSet;
use url::Url;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    /// Constructed, not yet started
    Idle,
    /// A navigation is in flight
    Fetching,
    /// Deciding whether and what to fetch next
    Selecting,
    /// Ran to completion; a HAR was (or is being) assembled
    Done,
    /// Hard renderer error; no HAR produced
    Failed,
}

impl CrawlState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// The crawl controller. Construct with a config and a renderer, then call
/// [`Crawler::run`] for the single terminal outcome: a validated HAR
/// document or an error.
pub struct Crawler<R: Renderer> {
    config: CrawlConfig,
    start_url: Url,
    filter: UrlFilter,
    renderer: R,
    tracker: FrontierTracker,
    visited: HashSet<String>,
    record: CrawlRecord,
    state: CrawlState,
}

impl<R: Renderer> Crawler<R> {
    /// Validates the configuration and prepares a crawl. Configuration
    /// problems surface here, before any navigation is attempted.
    pub fn new(config: CrawlConfig, renderer: R) -> Result<Self> {
        config::validate(&config)?;

        let start_url =
            parse_url(&config.url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
        let filter = UrlFilter::new(
            start_url.clone(),
            config.exclude.clone(),
            config.include.clone(),
        );

        Ok(Self {
            config,
            start_url,
            filter,
            renderer,
            tracker: FrontierTracker::new(),
            visited: HashSet::new(),
            record: CrawlRecord::default(),
            state: CrawlState::Idle,
        })
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Runs the crawl to its terminal state and assembles the HAR.
    ///
    /// Terminates when `max` pages have been recorded or when no unvisited
    /// candidate survives filtering. A failed navigation becomes a
    /// `_failures[]` record and the crawl continues; a renderer process
    /// error aborts immediately with no HAR.
    pub async fn run(mut self) -> Result<Har> {
        tracing::info!(url = %self.start_url, max = self.config.max, "starting crawl");

        let mut next = self.start_url.to_string();
        self.state = CrawlState::Fetching;

        loop {
            tracing::debug!(url = %next, "fetching");
            let capture = match self.renderer.render(&next, &self.config.render).await {
                Ok(capture) => capture,
                Err(e) => {
                    tracing::error!(url = %next, error = %e, "renderer failure, aborting crawl");
                    self.state = CrawlState::Failed;
                    return Err(ScoutError::Renderer(e));
                }
            };

            self.record_capture(&next, capture);
            self.state = CrawlState::Selecting;

            if self.record.pages.len() as u32 >= self.config.max {
                tracing::info!(pages = self.record.pages.len(), "fetch budget reached");
                self.state = CrawlState::Done;
                break;
            }

            match self.select_next() {
                Some(id) => {
                    next = id;
                    self.state = CrawlState::Fetching;
                }
                None => {
                    tracing::info!("no unvisited candidate survives filtering, crawl complete");
                    self.state = CrawlState::Done;
                    break;
                }
            }
        }

        let browser = self.renderer.identity();
        har::assemble(self.record, browser)
    }

    /// Folds one navigation result into the crawl record. The requested id
    /// always enters the visited set, success or not, so it is never
    /// re-picked.
    fn record_capture(&mut self, requested: &str, capture: PageCapture) {
        self.visited.insert(requested.to_string());

        match capture.outcome.clone() {
            NavigationOutcome::Success => match self.build_page(&capture) {
                Ok(page) => {
                    self.visited.insert(page.id.clone());
                    if let Ok(page_url) = Url::parse(&page.id) {
                        self.visited.insert(canonical_base_id(&page_url));
                    }

                    // Two candidates can redirect to the same final URL; the
                    // second navigation lands on a page already in the log
                    // and must not append a duplicate id.
                    if self.tracker.has_page(&page.id) {
                        tracing::debug!(id = %page.id, "redirected to an already-recorded page");
                        return;
                    }

                    self.record
                        .entries
                        .extend(build_entries(&page.id, &capture));

                    tracing::info!(id = %page.id, links = page.links.len(), "page recorded");
                    self.tracker.record_page(&page);
                    self.record.pages.push(page);
                }
                Err(e) => {
                    tracing::warn!(url = %capture.final_url, error = %e, "unusable final URL");
                    self.push_failure(requested, &capture, format!("invalid final URL: {}", e));
                }
            },
            NavigationOutcome::Failure { detail } => {
                tracing::warn!(url = %requested, detail = %detail, "navigation failed");
                self.push_failure(requested, &capture, detail);
            }
        }
    }

    fn push_failure(&mut self, requested: &str, capture: &PageCapture, detail: String) {
        // Resources that completed before the navigation failed are kept,
        // referenced by the failure's id.
        self.record.entries.extend(build_entries(requested, capture));
        self.record.failures.push(Failure {
            id: requested.to_string(),
            started_date_time: Some(capture.started_at),
            detail,
        });
    }

    fn build_page(&self, capture: &PageCapture) -> std::result::Result<Page, UrlError> {
        let page_url = parse_url(&capture.final_url)?;
        let links = classify_links(&page_url, &self.start_url, &capture.anchors);

        let on_load = (capture.finished_at - capture.started_at).num_milliseconds();
        let on_content_load = capture
            .content_loaded_at
            .map(|t| (t - capture.started_at).num_milliseconds())
            .unwrap_or(-1);

        Ok(Page {
            id: capture.final_url.clone(),
            started_date_time: capture.started_at,
            title: capture.title.clone(),
            page_timings: PageTimings {
                on_content_load,
                on_load,
            },
            links,
            rendered_source: capture.rendered_source.clone(),
            redirects: capture.redirects.clone(),
            console_messages: capture.console_messages.clone(),
            errors: capture.page_errors.clone(),
            screenshot: capture.screenshot.clone(),
        })
    }

    /// Asks the frontier for the next candidate, restricted to ids that
    /// survive include/exclude filtering. Re-evaluated fresh after every
    /// fetch; never cached.
    fn select_next(&self) -> Option<String> {
        let filter = &self.filter;
        self.tracker
            .pick_next(&self.visited, |entry| {
                Url::parse(&entry.id)
                    .map(|url| filter.allows(&url))
                    .unwrap_or(false)
            })
            .map(|entry| entry.id.clone())
    }
}

/// Runs every resource event of a capture through the entry lifecycle.
fn build_entries(pageref: &str, capture: &PageCapture) -> Vec<har::Entry> {
    let mut builder = EntryBuilder::new(pageref);
    for event in &capture.resource_events {
        builder.apply(event);
    }
    builder.finish()
}
