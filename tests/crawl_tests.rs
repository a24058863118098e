//! End-to-end crawl tests
//!
//! These drive the full controller loop against a scripted in-memory
//! renderer and assert on the assembled HAR document.

use chrono::{DateTime, Duration, TimeZone, Utc};
use har_scout::har::Header;
use har_scout::renderer::{
    Anchor, NavigationOutcome, PageCapture, ReplyStage, ResourceEvent, ResourceReply,
    ResourceRequest, ScriptedRenderer,
};
use har_scout::{CrawlConfig, Crawler, Pattern, RendererError, ScoutError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn t(offset_ms: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::milliseconds(offset_ms)
}

/// A request/start/end cycle for one resource.
fn resource_cycle(
    id: u64,
    url: &str,
    status: u16,
    body_size: Option<i64>,
    mime: &str,
) -> Vec<ResourceEvent> {
    vec![
        ResourceEvent::Requested(ResourceRequest {
            id,
            method: "GET".to_string(),
            url: url.to_string(),
            headers: vec![Header::new("Accept", "*/*")],
            time: t(0),
        }),
        ResourceEvent::Received(ResourceReply {
            id,
            stage: ReplyStage::Start,
            status: Some(status),
            status_text: None,
            headers: vec![Header::new("Content-Type", mime)],
            body_size: None,
            content_type: Some(mime.to_string()),
            time: t(20),
        }),
        ResourceEvent::Received(ResourceReply {
            id,
            stage: ReplyStage::End,
            status: Some(status),
            status_text: None,
            headers: vec![Header::new("Content-Type", mime)],
            body_size,
            content_type: Some(mime.to_string()),
            time: t(50),
        }),
    ]
}

/// A successfully loaded page whose document request returned 200.
fn page_capture(url: &str, title: &str, anchors: Vec<Anchor>) -> PageCapture {
    let mut capture = PageCapture::failed(url, "");
    capture.outcome = NavigationOutcome::Success;
    capture.title = title.to_string();
    capture.rendered_source = format!("<html><head><title>{}</title></head></html>", title);
    capture.anchors = anchors;
    capture.started_at = t(0);
    capture.content_loaded_at = Some(t(90));
    capture.finished_at = t(150);
    capture.resource_events = resource_cycle(1, url, 200, Some(1024), "text/html");
    capture
}

fn anchors(hrefs: &[(&str, &str)]) -> Vec<Anchor> {
    hrefs
        .iter()
        .map(|(href, text)| Anchor::new(*href, *text))
        .collect()
}

#[tokio::test]
async fn test_single_page_crawl_classifies_links() {
    init_tracing();

    let renderer = ScriptedRenderer::new().script(page_capture(
        "https://example.com/",
        "Home",
        anchors(&[
            ("/about.html", "About Us"),
            ("https://twitter.com/x", "Twitter"),
        ]),
    ));

    let config = CrawlConfig::new("https://example.com/");
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    assert_eq!(har.log.pages.len(), 1);
    let page = &har.log.pages[0];
    assert_eq!(page.id, "https://example.com/");
    assert_eq!(page.title, "Home");
    assert_eq!(page.links.len(), 2);
    assert!(page.links[0].internal);
    assert!(!page.links[1].internal);
    assert_eq!(page.page_timings.on_load, 150);
    assert_eq!(page.page_timings.on_content_load, 90);
}

#[tokio::test]
async fn test_two_page_site_follows_internal_link() {
    let renderer = ScriptedRenderer::new()
        .script(page_capture(
            "https://example.com/",
            "Home",
            anchors(&[("/about.html", "About Us")]),
        ))
        .script(page_capture(
            "https://example.com/about.html",
            "About",
            vec![],
        ));

    let config = CrawlConfig::new("https://example.com/").with_max(2);
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    assert_eq!(har.log.pages.len(), 2);
    assert_eq!(har.log.pages[1].id, "https://example.com/about.html");
    assert!(har.log.failures.is_empty());
}

#[tokio::test]
async fn test_max_one_never_follows_links() {
    let renderer = ScriptedRenderer::new().script(page_capture(
        "https://example.com/",
        "Home",
        anchors(&[("/a", "A"), ("/b", "B")]),
    ));

    let config = CrawlConfig::new("https://example.com/");
    let har = har_scout::crawler::crawl(config, renderer).await.unwrap();
    assert_eq!(har.log.pages.len(), 1);
}

#[tokio::test]
async fn test_crawl_stops_when_frontier_exhausted() {
    // Two reachable pages but a budget of five: length is min(max, reachable).
    let renderer = ScriptedRenderer::new()
        .script(page_capture(
            "https://example.com/",
            "Home",
            anchors(&[("/a", "A")]),
        ))
        .script(page_capture(
            "https://example.com/a",
            "A",
            anchors(&[("/", "Back home")]),
        ));

    let config = CrawlConfig::new("https://example.com/").with_max(5);
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    assert_eq!(har.log.pages.len(), 2);

    // No page id appears twice
    let mut ids: Vec<&str> = har.log.pages.iter().map(|p| p.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), har.log.pages.len());
}

#[tokio::test]
async fn test_shared_redirect_target_is_recorded_once() {
    // /a and /b both redirect to /c; the second navigation lands on a page
    // already in the log and must not append a duplicate id.
    let mut via_a = page_capture("https://example.com/a", "C", vec![]);
    via_a.final_url = "https://example.com/c".to_string();
    via_a.redirects = vec!["https://example.com/a".to_string()];

    let mut via_b = page_capture("https://example.com/b", "C", vec![]);
    via_b.final_url = "https://example.com/c".to_string();
    via_b.redirects = vec!["https://example.com/b".to_string()];

    let renderer = ScriptedRenderer::new()
        .script(page_capture(
            "https://example.com/",
            "Home",
            anchors(&[("/a", "A"), ("/b", "B")]),
        ))
        .script(via_a)
        .script(via_b);

    let config = CrawlConfig::new("https://example.com/").with_max(3);
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    let ids: Vec<&str> = har.log.pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["https://example.com/", "https://example.com/c"]);

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), har.log.pages.len());
}

#[tokio::test]
async fn test_popular_shallow_link_is_picked_first() {
    let mut home_anchors = anchors(&[("/deep/nested/page", "Deep")]);
    for _ in 0..4 {
        home_anchors.push(Anchor::new("/popular", "Popular"));
    }
    home_anchors.push(Anchor::new("/quiet", "Quiet"));

    let renderer = ScriptedRenderer::new()
        .script(page_capture("https://example.com/", "Home", home_anchors))
        .script(page_capture("https://example.com/popular", "Popular", vec![]))
        .script(page_capture("https://example.com/quiet", "Quiet", vec![]));

    let config = CrawlConfig::new("https://example.com/").with_max(2);
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    // /popular and /quiet share the minimum depth; /popular has the higher
    // aggregated count and wins over the deeper, equally-referenced page.
    assert_eq!(har.log.pages[1].id, "https://example.com/popular");
}

#[tokio::test]
async fn test_403_page_yields_one_entry_with_status() {
    let mut capture = page_capture("https://example.com/forbidden", "Forbidden", vec![]);
    capture.resource_events = resource_cycle(1, "https://example.com/forbidden", 403, None, "");
    capture.content_loaded_at = None;

    let renderer = ScriptedRenderer::new().script(capture);
    let config = CrawlConfig::new("https://example.com/forbidden");
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    assert_eq!(har.log.pages.len(), 1);
    assert_eq!(har.log.pages[0].page_timings.on_content_load, -1);
    assert_eq!(har.log.entries.len(), 1);

    let response = har.log.entries[0].response.as_ref().unwrap();
    assert_eq!(response.status, 403);
    assert_eq!(response.status_text, "Forbidden");
    assert_eq!(response.body_size, -1);
}

#[tokio::test]
async fn test_incomplete_and_data_uri_entries_are_excluded() {
    let mut capture = page_capture("https://example.com/", "Home", vec![]);
    // A request that never completes both stages
    capture.resource_events.push(ResourceEvent::Requested(ResourceRequest {
        id: 2,
        method: "GET".to_string(),
        url: "https://example.com/hangs.js".to_string(),
        headers: vec![],
        time: t(10),
    }));
    // A data URI request, complete but never eligible
    capture
        .resource_events
        .extend(resource_cycle(3, "data:image/png;base64,AAAA", 200, Some(4), "image/png"));

    let renderer = ScriptedRenderer::new().script(capture);
    let config = CrawlConfig::new("https://example.com/");
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    assert_eq!(har.log.entries.len(), 1);
    assert!(har.log.entries.iter().all(|e| e.response.is_some()));
    assert!(!har.log.entries.iter().any(|e| e.request.url.starts_with("data:")));
}

#[tokio::test]
async fn test_navigation_failure_is_recorded_and_crawl_continues() {
    init_tracing();

    // Home links to /broken (more referenced) and /fine; /broken fails to
    // load, the crawl records the failure and moves on to /fine.
    let mut home_anchors = anchors(&[("/fine", "Fine")]);
    home_anchors.push(Anchor::new("/broken", "Broken"));
    home_anchors.push(Anchor::new("/broken", "Broken again"));

    let renderer = ScriptedRenderer::new()
        .script(page_capture("https://example.com/", "Home", home_anchors))
        .script(PageCapture::failed(
            "https://example.com/broken",
            "FAIL to load the address",
        ))
        .script(page_capture("https://example.com/fine", "Fine", vec![]));

    let config = CrawlConfig::new("https://example.com/").with_max(3);
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    assert_eq!(har.log.pages.len(), 2);
    assert_eq!(har.log.failures.len(), 1);
    assert_eq!(har.log.failures[0].id, "https://example.com/broken");

    // Every retained entry references a page or a failure
    for entry in &har.log.entries {
        let in_pages = har.log.pages.iter().any(|p| p.id == entry.pageref);
        let in_failures = har.log.failures.iter().any(|f| f.id == entry.pageref);
        assert!(in_pages || in_failures, "dangling pageref {}", entry.pageref);
    }
}

#[tokio::test]
async fn test_renderer_crash_aborts_without_har() {
    let renderer = ScriptedRenderer::new().script_error(
        "https://example.com/",
        RendererError::ProcessCrashed("exit code 1".to_string()),
    );

    let config = CrawlConfig::new("https://example.com/");
    let result = Crawler::new(config, renderer).unwrap().run().await;
    assert!(matches!(result, Err(ScoutError::Renderer(_))));
}

#[tokio::test]
async fn test_renderer_crash_mid_crawl_aborts() {
    let renderer = ScriptedRenderer::new()
        .script(page_capture(
            "https://example.com/",
            "Home",
            anchors(&[("/next", "Next")]),
        ))
        .script_error(
            "https://example.com/next",
            RendererError::TransportLost("stdout closed".to_string()),
        );

    let config = CrawlConfig::new("https://example.com/").with_max(2);
    let result = Crawler::new(config, renderer).unwrap().run().await;
    assert!(matches!(result, Err(ScoutError::Renderer(_))));
}

#[tokio::test]
async fn test_exclude_pattern_prunes_candidates() {
    let renderer = ScriptedRenderer::new()
        .script(page_capture(
            "https://example.com/",
            "Home",
            anchors(&[("/admin/secret", "Admin"), ("/keep", "Keep")]),
        ))
        .script(page_capture("https://example.com/keep", "Keep", vec![]))
        .script(page_capture(
            "https://example.com/admin/secret",
            "Admin",
            vec![],
        ));

    let config = CrawlConfig::new("https://example.com/")
        .with_max(5)
        .with_exclude(vec![Pattern::literal("admin")]);
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    let ids: Vec<&str> = har.log.pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["https://example.com/", "https://example.com/keep"]);
}

#[tokio::test]
async fn test_include_pattern_restricts_candidates() {
    let renderer = ScriptedRenderer::new()
        .script(page_capture(
            "https://example.com/",
            "Home",
            anchors(&[("/docs/intro", "Docs"), ("/blog/post", "Blog")]),
        ))
        .script(page_capture(
            "https://example.com/docs/intro",
            "Docs",
            vec![],
        ));

    let config = CrawlConfig::new("https://example.com/")
        .with_max(5)
        .with_include(vec![Pattern::literal("docs")]);
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    let ids: Vec<&str> = har.log.pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        ["https://example.com/", "https://example.com/docs/intro"]
    );
}

#[tokio::test]
async fn test_creator_and_browser_metadata() {
    let renderer = ScriptedRenderer::new()
        .with_identity("PhantomRenderer", "2.1.1")
        .script(page_capture("https://example.com/", "Home", vec![]));

    let config = CrawlConfig::new("https://example.com/");
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    assert_eq!(har.log.version, "1.2");
    assert_eq!(har.log.creator.name, "har-scout");
    assert_eq!(har.log.browser.name, "PhantomRenderer");
    assert_eq!(har.log.browser.version, "2.1.1");
}

#[tokio::test]
async fn test_redirected_page_records_final_id() {
    let mut capture = page_capture("https://example.com/old", "Moved", vec![]);
    capture.final_url = "https://example.com/new".to_string();
    capture.redirects = vec!["https://example.com/old".to_string()];

    let renderer = ScriptedRenderer::new().script(capture);
    let config = CrawlConfig::new("https://example.com/old");
    let har = Crawler::new(config, renderer).unwrap().run().await.unwrap();

    assert_eq!(har.log.pages[0].id, "https://example.com/new");
    assert_eq!(har.log.pages[0].redirects, ["https://example.com/old"]);
}
