//! Site handlers
//!
//! A [`Handler`] performs one unit of site-specific work against one target:
//! a crawler discovers and stores the article links of a listing page, a
//! scraper extracts and stores the article behind one link. Handlers report
//! failure by returning an error; they have no other output.

mod article;
mod crawler;
mod links;
mod pagination;
mod strategy;

pub use article::ArticleScraper;
pub use crawler::NewspaperCrawler;
pub use links::{date_from_url, extract_links, title_from_slug};
pub use pagination::{
    paginate, LoadMoreControl, MarkerSource, PaginationOutcome, PaginationPolicy, Termination,
};
pub use strategy::{select_attr, select_joined_text, select_text, ArticleSite, ListingSite, Site};

use crate::browser::SessionError;
use crate::storage::StorageError;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Errors that fail a handler invocation
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Browser session error: {0}")]
    Session(#[from] SessionError),

    #[error("Could not load {url}: {source}")]
    Navigation { url: String, source: SessionError },

    #[error("Missing mandatory field '{field}' at {url}")]
    MissingField { field: &'static str, url: String },

    #[error("No content found at {0}")]
    EmptyPage(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The two shapes of handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Discovers links on a listing page
    Crawler,
    /// Extracts one article from a link
    Scraper,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crawler => "crawler",
            Self::Scraper => "scraper",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One site-specific unit of work
///
/// Instances are created fresh for every target and own their browser
/// session; a handler is never shared between tasks.
#[async_trait]
pub trait Handler: Send {
    fn kind(&self) -> HandlerKind;

    /// Processes `target`, persisting whatever it produces
    ///
    /// On success the records are stored before this returns. On failure
    /// nothing partial is left behind.
    async fn process(&mut self, target: &Url) -> Result<(), HandlerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_kind_display() {
        assert_eq!(HandlerKind::Crawler.to_string(), "crawler");
        assert_eq!(HandlerKind::Scraper.to_string(), "scraper");
    }

    #[test]
    fn test_missing_field_message_names_field() {
        let err = HandlerError::MissingField {
            field: "title",
            url: "https://g1.globo.com/x".to_string(),
        };
        assert!(err.to_string().contains("'title'"));
    }
}
