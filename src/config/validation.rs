use crate::config::CrawlConfig;
use crate::url::parse_url;
use crate::ConfigError;

/// Validates a configuration before the crawl starts.
///
/// Everything rejected here is a [`ConfigError`], surfaced synchronously:
/// the crawl never begins with a configuration that could not complete.
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawl URL must not be empty".to_string(),
        ));
    }

    parse_url(&config.url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;

    if config.max < 1 {
        return Err(ConfigError::Validation(
            "max must be at least 1".to_string(),
        ));
    }

    if config.render.viewport_width == 0 || config.render.viewport_height == 0 {
        return Err(ConfigError::Validation(
            "viewport dimensions must be at least 1x1".to_string(),
        ));
    }

    Ok(())
}
