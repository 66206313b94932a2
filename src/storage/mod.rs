//! Storage module for persisting harvested documents
//!
//! This module handles all database operations for the harvester, including:
//! - SQLite database initialization and schema management
//! - Bulk insertion of discovered links (all-or-nothing per crawl)
//! - Article persistence
//! - Run metadata (per-target statuses, totals, elapsed time)
//! - Maintenance queries (duplicate removal, pending links)

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, StorageError, StorageResult};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A store shared between concurrently running handlers
///
/// Handlers hold the lock only for the duration of a single store call and
/// never across an `.await`.
pub type SharedStore = Arc<Mutex<dyn DocumentStore>>;

/// Wraps a store so it can be handed to many handlers
pub fn share<S: DocumentStore + 'static>(store: S) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Runs `f` against the shared store while holding its lock
pub fn with_store<T>(
    store: &SharedStore,
    f: impl FnOnce(&mut dyn DocumentStore) -> StorageResult<T>,
) -> StorageResult<T> {
    let mut guard = store.lock().map_err(|_| StorageError::LockPoisoned)?;
    f(&mut *guard)
}

/// Opens (or creates) the SQLite document store at `path`
pub fn open_store(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::new(path)
}

/// A link discovered on a listing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRecord {
    pub url: String,
    pub title: String,
    /// Listing page the link was found on
    pub source: Option<String>,
    /// Publication date inferred from the URL, if any
    pub published_at: Option<NaiveDateTime>,
    pub extracted_at: DateTime<Utc>,
}

/// A persisted link row
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLink {
    pub id: i64,
    pub url: String,
    pub title: String,
}

/// A scraped article
///
/// `title` and `content` are mandatory; the remaining fields are best-effort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub content: String,
    pub publication_date: Option<NaiveDateTime>,
    pub scraped_at: DateTime<Utc>,
}

/// What a run processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RunKind {
    Crawl,
    Scrape,
}

impl RunKind {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Crawl => "crawl",
            Self::Scrape => "scrape",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "crawl" => Some(Self::Crawl),
            "scrape" => Some(Self::Scrape),
            _ => None,
        }
    }
}

/// Totals written when a run completes
#[derive(Debug, Clone, PartialEq)]
pub struct RunTotals {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub elapsed_ms: u64,
    /// JSON object mapping each target to "success" or "fail"
    pub statuses_json: String,
}

/// Represents a batch run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub kind: RunKind,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub totals: Option<RunTotals>,
}

/// Format used for naive timestamps in the database
pub(crate) const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
