//! HAR 1.2 document model
//!
//! Serde representation of the assembled archive. Field names follow the
//! published HAR 1.2 property names; non-standard extensions carry the
//! conventional `_` prefix (`_links`, `_renderedSource`, `_failures`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The terminal artifact of a crawl: `{ "log": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Har {
    pub log: HarLog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarLog {
    pub version: String,
    pub creator: Creator,
    pub browser: Browser,
    pub pages: Vec<Page>,
    pub entries: Vec<Entry>,
    /// Navigations that never reached a success state
    #[serde(rename = "_failures", default)]
    pub failures: Vec<Failure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    pub version: String,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Browser {
    pub name: String,
    pub version: String,
}

/// One successfully fetched page. Immutable once appended to the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Canonical URL after any redirects; the dedup key
    pub id: String,
    #[serde(rename = "startedDateTime")]
    pub started_date_time: DateTime<Utc>,
    pub title: String,
    #[serde(rename = "pageTimings")]
    pub page_timings: PageTimings,
    /// Links extracted from the rendered DOM, grouped by canonical base id
    #[serde(rename = "_links", default)]
    pub links: Vec<LinkGroup>,
    #[serde(rename = "_renderedSource", default)]
    pub rendered_source: String,
    /// URLs passed through before landing on `id`
    #[serde(rename = "_redirects", default, skip_serializing_if = "Vec::is_empty")]
    pub redirects: Vec<String>,
    #[serde(
        rename = "_consoleMessages",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub console_messages: Vec<ConsoleMessage>,
    #[serde(rename = "_errors", default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<PageError>,
    /// Base64 PNG, present when screenshots were requested
    #[serde(
        rename = "_screenshot",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub screenshot: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTimings {
    /// Milliseconds until DOMContentLoaded, -1 when not observed
    #[serde(rename = "onContentLoad")]
    pub on_content_load: i64,
    /// Milliseconds until the load event
    #[serde(rename = "onLoad")]
    pub on_load: i64,
}

/// Links sharing a canonical base id, aggregated per page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkGroup {
    /// Canonical base id (scheme+host+path) shared by all instances
    pub id: String,
    /// Occurrences of this id on the owning page
    pub count: u32,
    /// Same host as the owning page
    pub internal: bool,
    /// Internal and within the crawl's base path
    pub subpage: bool,
    pub instances: Vec<Link>,
}

/// A single anchor occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    /// Absolute URL after resolution against the owning page
    pub url: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// One request/response pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Owning Page.id (or Failure.id for entries of a failed navigation)
    pub pageref: String,
    #[serde(rename = "startedDateTime")]
    pub started_date_time: DateTime<Utc>,
    /// Total elapsed milliseconds, -1 until the entry completes
    pub time: i64,
    pub request: Request,
    pub response: Option<Response>,
    pub cache: Cache,
    pub timings: Timings,
    pub connection: String,
    /// Entries that never completed both reply stages, or data: URIs.
    /// Never serialized; resolved before assembly and filtered out.
    #[serde(skip)]
    pub ignore: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: String,
    #[serde(rename = "httpVersion")]
    pub http_version: String,
    pub headers: Vec<Header>,
    #[serde(rename = "queryString")]
    pub query_string: Vec<Header>,
    pub cookies: Vec<Cookie>,
    #[serde(rename = "headersSize")]
    pub headers_size: i64,
    #[serde(rename = "bodySize")]
    pub body_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(rename = "statusText")]
    pub status_text: String,
    #[serde(rename = "httpVersion")]
    pub http_version: String,
    pub cookies: Vec<Cookie>,
    pub headers: Vec<Header>,
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
    #[serde(rename = "headersSize")]
    pub headers_size: i64,
    #[serde(rename = "bodySize")]
    pub body_size: i64,
    pub content: Content,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub size: i64,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Name/value pair used for headers and query string items alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Cache state around the request. The adapter cannot observe it, so both
/// sides stay empty, but HAR 1.2 requires the object to be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cache {}

/// Per-phase timings in milliseconds. Phases the adapter cannot observe are
/// fixed at -1 (dns, connect, ssl) or 0 (blocked, send).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timings {
    pub blocked: i64,
    pub dns: i64,
    pub connect: i64,
    pub send: i64,
    pub wait: i64,
    pub receive: i64,
    pub ssl: i64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            blocked: 0,
            dns: -1,
            connect: -1,
            send: 0,
            wait: -1,
            receive: -1,
            ssl: -1,
        }
    }
}

/// A navigation that never reached a success state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    /// The URL that was requested
    pub id: String,
    #[serde(
        rename = "startedDateTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub started_date_time: Option<DateTime<Utc>>,
    pub detail: String,
}

/// A console message the page emitted while rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(rename = "sourceId", default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

/// A script error the page raised while rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageError {
    pub message: String,
}
