//! News Harvester: concurrent acquisition of news links and articles
//!
//! This crate discovers article links on newspaper listing pages, scrapes the
//! articles behind them, and persists both to a local document store. Every
//! target URL is dispatched to a site-specific handler through a registry and
//! executed under bounded concurrency; one failing site never stalls a batch.

pub mod browser;
pub mod config;
pub mod dispatch;
pub mod handler;
pub mod output;
pub mod pipeline;
pub mod sites;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for News Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Registry error: {0}")]
    Registry(#[from] dispatch::RegistryError),

    #[error("Handler error: {0}")]
    Handler(#[from] handler::HandlerError),

    #[error("Browser session error: {0}")]
    Session(#[from] browser::SessionError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for News Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{Executor, RateCalculator, Registry, ResultMap};
pub use handler::{Handler, HandlerKind};
pub use url::{parse_target, site_key};
