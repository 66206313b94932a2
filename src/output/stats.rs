//! Statistics from the document store
//!
//! This module provides functionality for extracting and displaying
//! harvest statistics from the storage layer.

use crate::pipeline::RunSummary;
use crate::storage::{DocumentStore, RunRecord, StorageResult};

/// Number of runs shown by `print_statistics`
const RECENT_RUNS: usize = 5;

/// Harvest statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    /// Total number of stored links
    pub total_links: u64,

    /// Total number of stored articles
    pub total_articles: u64,

    /// Links still waiting for an article (capped by the scrape limit)
    pub pending_links: u64,

    /// Most recent runs, newest first
    pub recent_runs: Vec<RunRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The store to query
/// * `pending_cap` - Upper bound used when counting pending links
pub fn load_statistics(
    store: &dyn DocumentStore,
    pending_cap: usize,
) -> StorageResult<HarvestStatistics> {
    Ok(HarvestStatistics {
        total_links: store.count_links()?,
        total_articles: store.count_articles()?,
        pending_links: store.pending_links(pending_cap)?.len() as u64,
        recent_runs: store.latest_runs(RECENT_RUNS)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Links stored: {}", stats.total_links);
    println!("  Articles stored: {}", stats.total_articles);
    println!("  Links pending scrape: {}", stats.pending_links);
    println!();

    if stats.recent_runs.is_empty() {
        println!("No runs recorded yet.");
        return;
    }

    println!("Recent Runs:");
    for run in &stats.recent_runs {
        match &run.totals {
            Some(totals) => {
                let success_rate = if totals.total > 0 {
                    (totals.succeeded as f64 / totals.total as f64) * 100.0
                } else {
                    0.0
                };
                println!(
                    "  #{} {} started {}: {}/{} succeeded ({:.1}%) in {:.1}s",
                    run.id,
                    run.kind.to_db_string(),
                    run.started_at,
                    totals.succeeded,
                    totals.total,
                    success_rate,
                    totals.elapsed_ms as f64 / 1000.0
                );
            }
            None => println!(
                "  #{} {} started {}: unfinished",
                run.id,
                run.kind.to_db_string(),
                run.started_at
            ),
        }
    }
}

/// Prints the outcome of a crawl or scrape run
pub fn print_run_summary(summary: &RunSummary) {
    println!(
        "{} finished: {} of {} targets succeeded in {:.1}s",
        summary.kind.to_db_string(),
        summary.succeeded,
        summary.total,
        summary.elapsed.as_secs_f64()
    );

    let failures = summary.failures();
    if !failures.is_empty() {
        println!("Failed targets ({}):", failures.len());
        for url in failures {
            println!("  - {}", url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LinkRecord, RunKind, RunTotals, SqliteStore};
    use chrono::Utc;

    #[test]
    fn test_load_statistics() {
        let mut store = SqliteStore::in_memory().unwrap();
        store
            .bulk_insert_links(&[LinkRecord {
                url: "https://a.example/noticia/x".to_string(),
                title: "x".to_string(),
                source: None,
                published_at: None,
                extracted_at: Utc::now(),
            }])
            .unwrap();
        let run = store.create_run(RunKind::Crawl, "hash").unwrap();
        store
            .complete_run(
                run,
                &RunTotals {
                    total: 1,
                    succeeded: 1,
                    failed: 0,
                    elapsed_ms: 10,
                    statuses_json: "{}".to_string(),
                },
            )
            .unwrap();

        let stats = load_statistics(&store, 100).unwrap();

        assert_eq!(stats.total_links, 1);
        assert_eq!(stats.total_articles, 0);
        assert_eq!(stats.pending_links, 1);
        assert_eq!(stats.recent_runs.len(), 1);
    }

    #[test]
    fn test_pending_count_is_capped() {
        let mut store = SqliteStore::in_memory().unwrap();
        let links: Vec<_> = (0..5)
            .map(|i| LinkRecord {
                url: format!("https://a.example/{}", i),
                title: "x".to_string(),
                source: None,
                published_at: None,
                extracted_at: Utc::now(),
            })
            .collect();
        store.bulk_insert_links(&links).unwrap();

        let stats = load_statistics(&store, 3).unwrap();
        assert_eq!(stats.pending_links, 3);
    }
}
