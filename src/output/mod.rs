//! Console reports of harvest results
//!
//! This module handles:
//! - Statistics over stored links, articles and runs
//! - Summaries of a finished crawl or scrape run

pub mod stats;

pub use stats::{load_statistics, print_run_summary, print_statistics, HarvestStatistics};
