//! Frontier / link history tracking
//!
//! Aggregates link occurrences across every visited page and implements the
//! next-link selection heuristic: popularity-weighted and shallow-first,
//! not strict BFS. Designed to surface the most-referenced, shallowest
//! pages first within a small fetch budget.
//!
//! A tracker is owned by a single crawl run and mutated only from the
//! controller's sequential path; it is never shared across crawls.

use crate::har::Page;
use crate::url::{path_segment_count, query_param_count};
use std::collections::{HashMap, HashSet};
use url::Url;

/// Aggregated occurrence history for one canonical base id.
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    /// Canonical base id (scheme+host+path)
    pub id: String,
    /// Per-page occurrence counts, one element per page the id appeared on
    counts: Vec<u32>,
    /// First observed on the very first page of the crawl
    pub in_home: bool,
    /// Path-segment count of the URL the id was first observed with
    pub path_parts: u32,
    /// Query-parameter count of that same URL
    pub query_params: u32,
}

impl FrontierEntry {
    /// Total occurrences across every page seen so far.
    pub fn total_count(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Tracks visited pages and aggregated link history for one crawl run.
#[derive(Debug, Default)]
pub struct FrontierTracker {
    /// Recorded page ids and how often each was recorded
    pages: HashMap<String, u32>,
    /// Aggregated link history keyed by canonical base id
    links: HashMap<String, FrontierEntry>,
}

impl FrontierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages recorded so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn has_page(&self, id: &str) -> bool {
        self.pages.contains_key(id)
    }

    /// Records a fetched page: counts it and folds every internal link
    /// group into the aggregated history. The first time an id is seen, its
    /// shape (path segments, query params) and whether it surfaced on the
    /// home page are fixed from that first observation.
    pub fn record_page(&mut self, page: &Page) {
        *self.pages.entry(page.id.clone()).or_insert(0) += 1;
        let on_home_page = self.pages.len() == 1;

        for group in page.links.iter().filter(|g| g.internal) {
            if let Some(entry) = self.links.get_mut(&group.id) {
                entry.counts.push(group.count);
                continue;
            }

            let Some(instance_url) = group
                .instances
                .first()
                .and_then(|link| Url::parse(&link.url).ok())
            else {
                tracing::debug!(id = %group.id, "link group without parseable instance, skipping");
                continue;
            };

            self.links.insert(
                group.id.clone(),
                FrontierEntry {
                    id: group.id.clone(),
                    counts: vec![group.count],
                    in_home: on_home_page,
                    path_parts: path_segment_count(&instance_url),
                    query_params: query_param_count(&instance_url),
                },
            );
        }
    }

    /// Chooses the next link to navigate. Deterministic, evaluated fresh at
    /// every selection point:
    ///
    /// 1. restrict to ids not in `visited` that pass `allowed`;
    /// 2. if any candidate surfaced on the home page, narrow to those;
    /// 3. keep only the minimum path-segment count;
    /// 4. order by total occurrence count descending, then id ascending.
    pub fn pick_next<F>(&self, visited: &HashSet<String>, allowed: F) -> Option<&FrontierEntry>
    where
        F: Fn(&FrontierEntry) -> bool,
    {
        let mut candidates: Vec<&FrontierEntry> = self
            .links
            .values()
            .filter(|entry| !visited.contains(&entry.id) && allowed(entry))
            .collect();

        if candidates.is_empty() {
            return None;
        }

        if candidates.iter().any(|entry| entry.in_home) {
            candidates.retain(|entry| entry.in_home);
        }

        let min_parts = candidates.iter().map(|entry| entry.path_parts).min()?;
        candidates.retain(|entry| entry.path_parts == min_parts);

        candidates.sort_by(|a, b| {
            b.total_count()
                .cmp(&a.total_count())
                .then_with(|| a.id.cmp(&b.id))
        });

        candidates.first().copied()
    }
}
