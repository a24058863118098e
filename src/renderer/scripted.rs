//! A deterministic in-memory renderer
//!
//! Replays pre-scripted captures keyed by requested URL. Used by this
//! crate's own tests and useful to embedders who want to exercise a crawl
//! without a real renderer process.

use super::{BrowserInfo, PageCapture, RenderOptions, Renderer, RendererError};
use std::collections::HashMap;

pub struct ScriptedRenderer {
    identity: BrowserInfo,
    captures: HashMap<String, PageCapture>,
    errors: HashMap<String, RendererError>,
    rendered: Vec<String>,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self {
            identity: BrowserInfo {
                name: "ScriptedRenderer".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            captures: HashMap::new(),
            errors: HashMap::new(),
            rendered: Vec::new(),
        }
    }

    pub fn with_identity(mut self, name: &str, version: &str) -> Self {
        self.identity = BrowserInfo {
            name: name.to_string(),
            version: version.to_string(),
        };
        self
    }

    /// Registers a capture to replay when its `requested_url` is rendered.
    pub fn script(mut self, capture: PageCapture) -> Self {
        self.captures.insert(capture.requested_url.clone(), capture);
        self
    }

    /// Registers a hard renderer failure for the given URL.
    pub fn script_error(mut self, url: &str, error: RendererError) -> Self {
        self.errors.insert(url.to_string(), error);
        self
    }

    /// URLs rendered so far, in order.
    pub fn rendered(&self) -> &[String] {
        &self.rendered
    }
}

impl Default for ScriptedRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for ScriptedRenderer {
    fn identity(&self) -> BrowserInfo {
        self.identity.clone()
    }

    async fn render(
        &mut self,
        url: &str,
        _options: &RenderOptions,
    ) -> Result<PageCapture, RendererError> {
        self.rendered.push(url.to_string());

        if let Some(error) = self.errors.get(url) {
            return Err(error.clone());
        }

        // An unscripted URL behaves like a navigation that failed to load.
        Ok(self
            .captures
            .get(url)
            .cloned()
            .unwrap_or_else(|| PageCapture::failed(url, "no scripted capture for URL")))
    }
}
