//! Configuration module for News Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional and falls back to defaults, so a file holding
//! only the `[crawl]` newspaper list is a complete configuration.
//!
//! # Example
//!
//! ```no_run
//! use news_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Handlers in flight: {}", config.executor.max_concurrent_handlers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, CrawlConfig, ExecutorConfig, PaginationConfig, ScrapeConfig,
    StorageConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_executor_config};
