//! Crawl configuration
//!
//! Configuration arrives either programmatically (an embedding layer builds
//! a [`CrawlConfig`]) or from a TOML file via [`load_config`]. Either way
//! it is validated before a crawl starts, and filter patterns are
//! normalized to their compiled form exactly once at load.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::CrawlConfig;
pub use validation::validate;

// Patterns are part of the configuration surface even though they live
// with the URL machinery.
pub use crate::url::Pattern;
