//! Integration tests for News Harvester
//!
//! Executor tests drive in-process handlers; crawl and scrape tests run the
//! real HTTP session against wiremock servers.

mod crawl_tests;
mod executor_tests;
mod scrape_tests;
