use crate::config::types::{
    BrowserConfig, Config, CrawlConfig, ExecutorConfig, PaginationConfig, ScrapeConfig,
    StorageConfig,
};
use crate::url::parse_target;
use crate::ConfigError;

const MAX_CONCURRENT_HANDLERS: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_executor_config(&config.executor)?;
    validate_pagination_config(&config.pagination)?;
    validate_browser_config(&config.browser)?;
    validate_storage_config(&config.storage)?;
    validate_crawl_config(&config.crawl)?;
    validate_scrape_config(&config.scrape)?;
    Ok(())
}

/// Validates executor limits
///
/// `max_workers` may exceed `max_concurrent_handlers`: the surplus tasks
/// queue for a handler slot without holding a browser session.
pub fn validate_executor_config(config: &ExecutorConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_handlers < 1 || config.max_concurrent_handlers > MAX_CONCURRENT_HANDLERS
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_handlers must be between 1 and {}, got {}",
            MAX_CONCURRENT_HANDLERS, config.max_concurrent_handlers
        )));
    }

    if config.max_workers < 1 {
        return Err(ConfigError::Validation(format!(
            "max_workers must be >= 1, got {}",
            config.max_workers
        )));
    }

    Ok(())
}

fn validate_pagination_config(config: &PaginationConfig) -> Result<(), ConfigError> {
    if config.scroll_limit == Some(0) {
        return Err(ConfigError::Validation(
            "scroll_limit must be >= 1 when set".to_string(),
        ));
    }

    if config.crawl_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "crawl_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.element_wait_secs > config.crawl_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "element_wait_secs ({}) cannot exceed crawl_timeout_secs ({})",
            config.element_wait_secs, config.crawl_timeout_secs
        )));
    }

    Ok(())
}

fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    for newspaper in &config.newspapers {
        parse_target(newspaper).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid newspaper URL '{}': {}", newspaper, e))
        })?;
    }

    Ok(())
}

fn validate_scrape_config(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.max_articles < 1 {
        return Err(ConfigError::Validation(format!(
            "max_articles must be >= 1, got {}",
            config.max_articles
        )));
    }

    Ok(())
}
