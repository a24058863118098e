use crate::renderer::RenderOptions;
use crate::url::Pattern;
use serde::Deserialize;

/// Configuration for one crawl run.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// The start URL (required)
    pub url: String,

    /// Maximum number of pages to fetch, at least 1
    #[serde(default = "default_max")]
    pub max: u32,

    /// Candidates surviving `exclude` must match at least one of these,
    /// unless the list is empty
    #[serde(default)]
    pub include: Vec<Pattern>,

    /// Candidates matching any of these are dropped unconditionally
    #[serde(default)]
    pub exclude: Vec<Pattern>,

    /// Options passed through to the renderer adapter
    #[serde(default)]
    pub render: RenderOptions,
}

impl CrawlConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max: default_max(),
            include: Vec::new(),
            exclude: Vec::new(),
            render: RenderOptions::default(),
        }
    }

    pub fn with_max(mut self, max: u32) -> Self {
        self.max = max;
        self
    }

    pub fn with_include(mut self, patterns: Vec<Pattern>) -> Self {
        self.include = patterns;
        self
    }

    pub fn with_exclude(mut self, patterns: Vec<Pattern>) -> Self {
        self.exclude = patterns;
        self
    }
}

fn default_max() -> u32 {
    1
}
