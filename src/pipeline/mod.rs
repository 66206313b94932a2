//! Batch stages built on the executor
//!
//! This module provides:
//! - Link crawling over the configured newspapers
//! - Article scraping over links that have no article yet
//! - Link sanitization and duplicate removal
//!
//! Crawl and scrape runs are recorded in the store together with their
//! per-target statuses.

mod maintenance;
mod stages;

pub use maintenance::{deduplicate, is_unrelated_link, sanitize_links, DedupeReport, SanitizeReport};
pub use stages::{crawl_links, run_stage, scrape_articles};

use crate::dispatch::ResultMap;
use crate::storage::{RunKind, RunTotals, StorageError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// What one crawl or scrape run achieved
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub kind: RunKind,
    /// Per-target outcome, sorted by target
    pub statuses: BTreeMap<String, bool>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis() as u64)
}

impl RunSummary {
    pub fn new(kind: RunKind, results: ResultMap, elapsed: Duration) -> Self {
        let statuses: BTreeMap<String, bool> = results.into_iter().collect();
        let succeeded = statuses.values().filter(|ok| **ok).count();

        Self {
            kind,
            total: statuses.len(),
            succeeded,
            failed: statuses.len() - succeeded,
            statuses,
            elapsed,
        }
    }

    /// Statuses as a JSON object of `"success"` / `"fail"` strings
    pub fn statuses_json(&self) -> Result<String, StorageError> {
        let labelled: BTreeMap<&str, &str> = self
            .statuses
            .iter()
            .map(|(url, ok)| (url.as_str(), if *ok { "success" } else { "fail" }))
            .collect();

        serde_json::to_string(&labelled).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Totals stored with the run record
    pub fn totals(&self) -> Result<RunTotals, StorageError> {
        Ok(RunTotals {
            total: self.total as u64,
            succeeded: self.succeeded as u64,
            failed: self.failed as u64,
            elapsed_ms: self.elapsed.as_millis() as u64,
            statuses_json: self.statuses_json()?,
        })
    }

    /// Targets that failed, sorted
    pub fn failures(&self) -> Vec<&str> {
        self.statuses
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(url, _)| url.as_str())
            .collect()
    }
}
