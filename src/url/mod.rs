//! URL canonicalization and resolution
//!
//! Candidate links are deduplicated on a *canonical base id*: the URL
//! reduced to scheme + host + path, with query string and fragment
//! stripped. The helpers here compute that id plus the path-segment and
//! query-parameter counts the frontier heuristic sorts on.

mod matcher;

pub use matcher::{Pattern, UrlFilter};

use crate::UrlError;
use url::Url;

/// Reduces a URL to its canonical base id: scheme + host (+ port) + path.
///
/// Query string and fragment are dropped; everything else is preserved
/// verbatim. Two links that differ only in query or fragment share one id
/// and are grouped together in the frontier.
pub fn canonical_base_id(url: &Url) -> String {
    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);
    base.to_string()
}

/// Parses a URL string, surfacing failures as [`UrlError`].
pub fn parse_url(input: &str) -> Result<Url, UrlError> {
    let url = Url::parse(input).map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Resolves an anchor's href against the page it appeared on.
///
/// Relative hrefs are joined against the page URL; fragments are removed
/// from the result since fragment-only differences never identify a new
/// page.
pub fn resolve_href(page_url: &Url, href: &str) -> Result<Url, UrlError> {
    let mut resolved = page_url
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;
    resolved.set_fragment(None);
    Ok(resolved)
}

/// Number of path segments, counted the way the frontier heuristic expects:
/// split on `/` including the leading empty segment, so `/` is 2, `/a` is 2
/// and `/a/b` is 3. Shallower paths have smaller counts.
pub fn path_segment_count(url: &Url) -> u32 {
    url.path().split('/').count() as u32
}

/// Number of query parameters on the URL.
pub fn query_param_count(url: &Url) -> u32 {
    url.query_pairs().count() as u32
}

/// Computes a candidate's path relative to the start URL, used as the text
/// the include/exclude patterns are matched against.
///
/// The start URL's path is stripped as a prefix when present; otherwise the
/// candidate's full path is returned. The start URL itself reduces to the
/// empty string.
pub fn relative_path(start_url: &Url, candidate: &Url) -> String {
    let candidate_path = candidate.path();
    match candidate_path.strip_prefix(start_url.path()) {
        Some(rest) => rest.to_string(),
        None => candidate_path.to_string(),
    }
}

/// True when both URLs point at the same host.
pub fn same_host(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str()
}
