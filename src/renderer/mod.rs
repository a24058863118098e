//! The renderer adapter contract
//!
//! Everything about actually rendering a page (DOM construction, script
//! execution, network capture) is delegated to an external renderer behind
//! the [`Renderer`] trait: one URL in, one [`PageCapture`] out. The core
//! treats that boundary as a process that can crash or hang independently
//! of page content. [`RendererError`] models the crash case and aborts the
//! crawl, while a navigation that merely failed to load comes back as a
//! capture with a [`NavigationOutcome::Failure`].

pub mod scripted;

pub use scripted::ScriptedRenderer;

use crate::har::{ConsoleMessage, Header, PageError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Identity of the external renderer, reported into the HAR `browser` field.
#[derive(Debug, Clone)]
pub struct BrowserInfo {
    pub name: String,
    pub version: String,
}

/// Options recognized by the renderer for a single navigation.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    /// Viewport width in pixels
    #[serde(rename = "viewport-width", default = "defaults::viewport_width")]
    pub viewport_width: u32,

    /// Viewport height in pixels
    #[serde(rename = "viewport-height", default = "defaults::viewport_height")]
    pub viewport_height: u32,

    /// Bounded wait per resource; an unanswered request past this becomes an
    /// incomplete (ignored) entry rather than an error
    #[serde(
        rename = "per-resource-timeout-ms",
        default = "defaults::per_resource_timeout_ms"
    )]
    pub per_resource_timeout_ms: u64,

    /// User agent string override
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    /// How long to wait after load before reading the rendered source
    #[serde(rename = "post-load-delay-ms", default)]
    pub post_load_delay_ms: u64,

    /// Capture a base64 PNG screenshot of the rendered page
    #[serde(rename = "capture-screenshot", default)]
    pub capture_screenshot: bool,
}

mod defaults {
    pub fn viewport_width() -> u32 {
        400
    }

    pub fn viewport_height() -> u32 {
        300
    }

    pub fn per_resource_timeout_ms() -> u64 {
        10_000
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            viewport_width: defaults::viewport_width(),
            viewport_height: defaults::viewport_height(),
            per_resource_timeout_ms: defaults::per_resource_timeout_ms(),
            user_agent: None,
            post_load_delay_ms: 0,
            capture_screenshot: false,
        }
    }
}

/// An anchor element observed in the rendered DOM.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub href: String,
    pub text: String,
    pub title: Option<String>,
    pub target: Option<String>,
}

impl Anchor {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
            title: None,
            target: None,
        }
    }
}

/// An outgoing request observed by the renderer.
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    /// Renderer-assigned id correlating requests with their replies
    pub id: u64,
    pub method: String,
    pub url: String,
    pub headers: Vec<Header>,
    pub time: DateTime<Utc>,
}

/// Which stage of the response this reply describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStage {
    /// Headers received, body still streaming
    Start,
    /// Body complete
    End,
}

/// A response observation for one request, at one stage.
#[derive(Debug, Clone)]
pub struct ResourceReply {
    pub id: u64,
    pub stage: ReplyStage,
    pub status: Option<u16>,
    pub status_text: Option<String>,
    pub headers: Vec<Header>,
    pub body_size: Option<i64>,
    pub content_type: Option<String>,
    pub time: DateTime<Utc>,
}

/// Ordered network activity observed during one navigation.
#[derive(Debug, Clone)]
pub enum ResourceEvent {
    Requested(ResourceRequest),
    Received(ResourceReply),
    /// Timeout or resource-level error; the request will never complete
    Failed { id: u64, detail: String },
}

/// Whether the navigation reached a success state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Success,
    Failure { detail: String },
}

/// Everything the renderer reports for a single navigation.
#[derive(Debug, Clone)]
pub struct PageCapture {
    /// The URL the controller asked for
    pub requested_url: String,
    /// The final URL after any redirects; becomes the page id
    pub final_url: String,
    /// Intermediate URLs passed through on the way to `final_url`
    pub redirects: Vec<String>,
    pub title: String,
    pub rendered_source: String,
    /// Anchor elements found in the rendered DOM
    pub anchors: Vec<Anchor>,
    /// Network activity, in observation order
    pub resource_events: Vec<ResourceEvent>,
    pub started_at: DateTime<Utc>,
    /// When DOMContentLoaded fired, if the renderer observed it
    pub content_loaded_at: Option<DateTime<Utc>>,
    pub finished_at: DateTime<Utc>,
    pub console_messages: Vec<ConsoleMessage>,
    pub page_errors: Vec<PageError>,
    /// Base64 PNG, present when `capture_screenshot` was requested
    pub screenshot: Option<String>,
    pub outcome: NavigationOutcome,
}

impl PageCapture {
    /// A capture for a navigation that never reached a success state.
    pub fn failed(requested_url: impl Into<String>, detail: impl Into<String>) -> Self {
        let requested_url = requested_url.into();
        let now = Utc::now();
        Self {
            final_url: requested_url.clone(),
            requested_url,
            redirects: Vec::new(),
            title: String::new(),
            rendered_source: String::new(),
            anchors: Vec::new(),
            resource_events: Vec::new(),
            started_at: now,
            content_loaded_at: None,
            finished_at: now,
            console_messages: Vec::new(),
            page_errors: Vec::new(),
            screenshot: None,
            outcome: NavigationOutcome::Failure {
                detail: detail.into(),
            },
        }
    }
}

/// Hard failures of the renderer process itself. Any of these aborts the
/// crawl immediately; no HAR is produced.
#[derive(Debug, Clone, Error)]
pub enum RendererError {
    #[error("renderer process crashed: {0}")]
    ProcessCrashed(String),

    #[error("renderer transport lost: {0}")]
    TransportLost(String),
}

/// The adapter contract consumed by the crawl controller.
///
/// Single-call, single-result semantics: one URL in, one capture out. The
/// renderer handles one navigation at a time; the controller never issues a
/// second `render` before the first resolves.
pub trait Renderer {
    /// Name and version of the underlying renderer, for HAR metadata.
    fn identity(&self) -> BrowserInfo;

    /// Navigates to `url` and reports the resulting page and network
    /// activity. `Err` means the renderer process itself is gone.
    fn render(
        &mut self,
        url: &str,
        options: &RenderOptions,
    ) -> impl std::future::Future<Output = std::result::Result<PageCapture, RendererError>> + Send;
}
