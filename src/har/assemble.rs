//! Final HAR assembly
//!
//! Merges the accumulated pages, entries and failures into one document,
//! normalizes it through an encode/decode round-trip, and gates it behind
//! validation. Exactly one terminal outcome per crawl: a valid document or
//! an error, never a document known to be non-conformant.

use crate::har::model::{Browser, Creator, Entry, Failure, Har, Page};
use crate::har::validate;
use crate::renderer::BrowserInfo;
use crate::ScoutError;

/// The accumulated result of a completed crawl, before assembly.
#[derive(Debug, Clone, Default)]
pub struct CrawlRecord {
    pub pages: Vec<Page>,
    pub entries: Vec<Entry>,
    pub failures: Vec<Failure>,
}

/// Assembles and validates the final document.
///
/// Entries flagged `ignore` or lacking a response are dropped here; they
/// represent data URIs and requests that never completed both reply stages.
pub fn assemble(record: CrawlRecord, browser: BrowserInfo) -> Result<Har, ScoutError> {
    let entries: Vec<Entry> = record
        .entries
        .into_iter()
        .filter(|entry| !entry.ignore && entry.response.is_some())
        .collect();

    tracing::debug!(
        pages = record.pages.len(),
        entries = entries.len(),
        failures = record.failures.len(),
        "assembling HAR document"
    );

    let har = Har {
        log: crate::har::model::HarLog {
            version: "1.2".to_string(),
            creator: Creator {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                comment: env!("CARGO_PKG_DESCRIPTION").to_string(),
            },
            browser: Browser {
                name: browser.name,
                version: browser.version,
            },
            pages: record.pages,
            entries,
            failures: record.failures,
        },
    };

    // Encode-then-decode round-trip: normalizes temporal/value types before
    // validation and guarantees the returned document equals what a caller
    // would read back from disk.
    let document = serde_json::to_value(&har)?;

    let violations = validate::validate(&document);
    if !violations.is_empty() {
        return Err(ScoutError::HarValidation {
            document,
            violations,
        });
    }

    Ok(serde_json::from_value(document)?)
}
