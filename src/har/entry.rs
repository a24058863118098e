//! Entry lifecycle: from raw resource observations to HAR entries
//!
//! An entry is created when its request is observed, receives a provisional
//! "start" reply (headers arrived), then a final "end" reply (body
//! complete), at which point it is finalized. Entries that never complete
//! both stages (timeouts, aborted navigations, resource errors) are marked
//! `ignore` and excluded from the final document, but are not crawl errors.

use crate::har::model::{Cache, Content, Entry, Header, Request, Response, Timings};
use crate::renderer::{ReplyStage, ResourceEvent, ResourceReply, ResourceRequest};
use std::collections::HashMap;
use url::Url;

/// Builds entries for one navigation, keyed by the renderer's request ids.
pub struct EntryBuilder {
    pageref: String,
    pending: HashMap<u64, PendingEntry>,
    order: Vec<u64>,
}

struct PendingEntry {
    entry: Entry,
    start_reply: Option<ResourceReply>,
    end_reply: Option<ResourceReply>,
}

impl EntryBuilder {
    pub fn new(pageref: &str) -> Self {
        Self {
            pageref: pageref.to_string(),
            pending: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Feeds one observed resource event into the builder.
    pub fn apply(&mut self, event: &ResourceEvent) {
        match event {
            ResourceEvent::Requested(request) => self.request_started(request),
            ResourceEvent::Received(reply) => self.reply_received(reply),
            ResourceEvent::Failed { id, detail } => self.request_failed(*id, detail),
        }
    }

    fn request_started(&mut self, request: &ResourceRequest) {
        let entry = create_entry(&self.pageref, request);
        self.order.push(request.id);
        self.pending.insert(
            request.id,
            PendingEntry {
                entry,
                start_reply: None,
                end_reply: None,
            },
        );
    }

    fn reply_received(&mut self, reply: &ResourceReply) {
        let Some(pending) = self.pending.get_mut(&reply.id) else {
            tracing::debug!(id = reply.id, "reply for unknown request, dropping");
            return;
        };

        match reply.stage {
            ReplyStage::Start => pending.start_reply = Some(reply.clone()),
            ReplyStage::End => {
                pending.end_reply = Some(reply.clone());
                process_entry(pending);
            }
        }
    }

    fn request_failed(&mut self, id: u64, detail: &str) {
        let Some(pending) = self.pending.get_mut(&id) else {
            tracing::debug!(id, "failure for unknown request, dropping");
            return;
        };
        tracing::debug!(id, detail, url = %pending.entry.request.url, "request never completed");
        // Finalizing without an end reply resolves the entry as ignored.
        process_entry(pending);
    }

    /// Resolves every entry and returns them in request order. Entries that
    /// never saw both reply stages come back with `ignore == true`.
    pub fn finish(mut self) -> Vec<Entry> {
        let mut entries = Vec::with_capacity(self.order.len());
        for id in &self.order {
            if let Some(mut pending) = self.pending.remove(id) {
                if pending.entry.response.is_none() && !pending.entry.ignore {
                    process_entry(&mut pending);
                }
                entries.push(pending.entry);
            }
        }
        entries
    }
}

/// Creates the provisional entry for a new outgoing request.
fn create_entry(pageref: &str, request: &ResourceRequest) -> Entry {
    let query_string = query_string_of(&request.url);

    // Data URIs never enter the final output.
    let ignore = request.url.starts_with("data:");

    Entry {
        pageref: pageref.to_string(),
        started_date_time: request.time,
        time: -1,
        request: Request {
            method: request.method.clone(),
            url: request.url.clone(),
            http_version: "HTTP/1.1".to_string(),
            headers: request.headers.clone(),
            query_string,
            cookies: Vec::new(),
            headers_size: -1,
            body_size: 0,
        },
        response: None,
        cache: Cache::default(),
        timings: Timings::default(),
        connection: String::new(),
        ignore,
    }
}

/// Computes the response, total time and phase timings once the entry is
/// final. An entry missing either reply stage is resolved as ignored.
fn process_entry(pending: &mut PendingEntry) {
    let entry = &mut pending.entry;

    if entry.ignore {
        return;
    }

    let (Some(start), Some(end)) = (&pending.start_reply, &pending.end_reply) else {
        entry.ignore = true;
        return;
    };

    let status = end.status.unwrap_or(0);
    let status_text = end
        .status_text
        .clone()
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| status_text(status).to_string());
    let body_size = reported_body_size(end).or_else(|| reported_body_size(start)).unwrap_or(-1);

    entry.response = Some(Response {
        status,
        status_text,
        http_version: "HTTP/1.1".to_string(),
        cookies: Vec::new(),
        headers: end.headers.clone(),
        redirect_url: String::new(),
        headers_size: -1,
        body_size,
        content: Content {
            size: body_size,
            mime_type: end.content_type.clone().unwrap_or_default(),
        },
    });

    entry.time = (end.time - entry.started_date_time).num_milliseconds();
    entry.timings = Timings {
        blocked: 0,
        dns: -1,
        connect: -1,
        send: 0,
        wait: (start.time - entry.started_date_time).num_milliseconds(),
        receive: (end.time - start.time).num_milliseconds(),
        ssl: -1,
    };
}

/// Body size as reported by the renderer; zero means "not reported" in the
/// capture format, so it falls through to the other stage.
fn reported_body_size(reply: &ResourceReply) -> Option<i64> {
    reply.body_size.filter(|size| *size != 0)
}

/// Standard status-text table, used when the renderer omits a reason phrase.
pub fn status_text(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

fn query_string_of(url: &str) -> Vec<Header> {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .query_pairs()
            .map(|(name, value)| Header::new(name, value))
            .collect(),
        Err(_) => Vec::new(),
    }
}
