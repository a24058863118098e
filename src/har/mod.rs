//! HTTP Archive production
//!
//! This module owns everything HAR-shaped:
//! - the serde document model (`model`)
//! - the per-request entry lifecycle (`entry`)
//! - final assembly with the validation gate (`assemble`)
//! - HAR 1.2 conformance checking (`validate`)

mod assemble;
mod entry;
mod model;
mod validate;

pub use assemble::{assemble, CrawlRecord};
pub use entry::{status_text, EntryBuilder};
pub use model::{
    Browser, Cache, ConsoleMessage, Content, Cookie, Creator, Entry, Failure, Har, HarLog, Header,
    Link, LinkGroup, Page, PageError, PageTimings, Request, Response, Timings,
};
pub use validate::{validate, Violation};
