use crate::config::validation::validate;
use crate::config::CrawlConfig;
use crate::ConfigError;
use std::path::Path;

/// Loads, parses and validates a TOML configuration file.
pub fn load_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: CrawlConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}
