//! Link extraction and classification
//!
//! Turns the anchors the renderer observed into per-page link groups:
//! anchors are resolved to absolute URLs, deduplicated on their canonical
//! base id, and flagged as internal (same host as the owning page) and
//! subpage (within the crawl's base path).

use crate::har::{Link, LinkGroup};
use crate::renderer::Anchor;
use crate::url::{canonical_base_id, resolve_href, same_host};
use url::Url;

/// Groups a page's anchors by canonical base id.
///
/// Anchors with no href, fragment-only hrefs and `mailto:` links are
/// skipped, as are hrefs that fail to resolve. Order of first occurrence is
/// preserved.
pub fn classify_links(page_url: &Url, start_url: &Url, anchors: &[Anchor]) -> Vec<LinkGroup> {
    let mut groups: Vec<LinkGroup> = Vec::new();

    for anchor in anchors {
        if skip_href(&anchor.href) {
            continue;
        }

        let resolved = match resolve_href(page_url, &anchor.href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(href = %anchor.href, error = %e, "unresolvable href, skipping");
                continue;
            }
        };

        let id = canonical_base_id(&resolved);
        let link = Link {
            href: anchor.href.clone(),
            url: resolved.to_string(),
            text: anchor.text.replace('\n', ""),
            title: anchor.title.clone(),
            target: anchor.target.clone(),
        };

        if let Some(group) = groups.iter_mut().find(|g| g.id == id) {
            group.count += 1;
            group.instances.push(link);
        } else {
            let internal = same_host(page_url, &resolved);
            let subpage = internal && resolved.path().starts_with(start_url.path());
            groups.push(LinkGroup {
                id,
                count: 1,
                internal,
                subpage,
                instances: vec![link],
            });
        }
    }

    groups
}

fn skip_href(href: &str) -> bool {
    href.is_empty() || href.starts_with('#') || href.starts_with("mailto:")
}
