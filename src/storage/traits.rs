//! Storage traits and error types
//!
//! This module defines the trait interface for document store backends and
//! associated error types.

use crate::storage::{ArticleRecord, LinkRecord, RunKind, RunRecord, RunTotals, StoredLink};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Store lock poisoned by a panicking writer")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document store implementations
///
/// Writes are all-or-nothing: a failed call leaves no partial record behind.
pub trait DocumentStore: Send {
    // ===== Links =====

    /// Inserts a batch of links in one transaction
    ///
    /// # Returns
    ///
    /// The number of links inserted
    fn bulk_insert_links(&mut self, links: &[LinkRecord]) -> StorageResult<usize>;

    /// Lists every stored link
    fn list_links(&self) -> StorageResult<Vec<StoredLink>>;

    /// Deletes a single link row
    fn delete_link(&mut self, id: i64) -> StorageResult<()>;

    /// Counts the stored links
    fn count_links(&self) -> StorageResult<u64>;

    /// Returns up to `limit` distinct link URLs that have no article yet
    fn pending_links(&self, limit: usize) -> StorageResult<Vec<String>>;

    // ===== Articles =====

    /// Persists one article
    ///
    /// # Returns
    ///
    /// The ID of the stored article
    fn save_article(&mut self, article: &ArticleRecord) -> StorageResult<i64>;

    /// Gets the first article stored for a URL
    fn get_article_by_url(&self, url: &str) -> StorageResult<Option<ArticleRecord>>;

    /// Counts the stored articles
    fn count_articles(&self) -> StorageResult<u64>;

    // ===== Maintenance =====

    /// Removes links sharing a URL, keeping the first stored row
    fn remove_duplicate_links(&mut self) -> StorageResult<u64>;

    /// Removes articles sharing a URL, keeping the first stored row
    fn remove_duplicate_articles(&mut self) -> StorageResult<u64>;

    // ===== Runs =====

    /// Creates a run record and returns its ID
    fn create_run(&mut self, kind: RunKind, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run as finished with its totals
    fn complete_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()>;

    /// Gets the most recent runs, newest first
    fn latest_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>>;
}
