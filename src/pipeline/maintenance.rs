//! Store maintenance: unrelated-link removal and deduplication

use crate::storage::{with_store, SharedStore, StorageResult};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Links shorter than this are listing or section pages, not articles
const MIN_ARTICLE_URL_LEN: usize = 100;

/// Article slugs carry at least this many hyphens
const MIN_SLUG_HYPHENS: usize = 5;

fn news_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)noticia|news").ok())
        .as_ref()
}

/// Outcome of a sanitize pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub examined: usize,
    pub removed: usize,
    pub failed: usize,
}

/// Outcome of a deduplication pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupeReport {
    pub links_removed: u64,
    pub articles_removed: u64,
}

/// Whether a stored link is unlikely to be a news article
///
/// A link is unrelated when any of these hold:
/// - it mentions neither `noticia` nor `news` (case-insensitive)
/// - it has fewer than five hyphens
/// - it is shorter than 100 characters
/// - it points at a `/video/` page
pub fn is_unrelated_link(url: &str) -> bool {
    let mentions_news = news_pattern().map_or(true, |p| p.is_match(url));

    !mentions_news
        || url.matches('-').count() < MIN_SLUG_HYPHENS
        || url.chars().count() < MIN_ARTICLE_URL_LEN
        || url.contains("/video/")
}

/// Deletes every unrelated link from the store
///
/// A link that fails to delete is counted and skipped.
pub fn sanitize_links(store: &SharedStore) -> StorageResult<SanitizeReport> {
    let links = with_store(store, |s| s.list_links())?;
    let mut report = SanitizeReport {
        examined: links.len(),
        ..SanitizeReport::default()
    };

    for link in links.iter().filter(|link| is_unrelated_link(&link.url)) {
        match with_store(store, |s| s.delete_link(link.id)) {
            Ok(()) => {
                debug!(url = %link.url, "Removed unrelated link");
                report.removed += 1;
            }
            Err(e) => {
                warn!(url = %link.url, "Failed to remove link: {}", e);
                report.failed += 1;
            }
        }
    }

    info!(
        "Sanitized {} links: {} removed, {} failed",
        report.examined, report.removed, report.failed
    );
    Ok(report)
}

/// Removes duplicate links and articles, keeping the first stored copy
pub fn deduplicate(store: &SharedStore) -> StorageResult<DedupeReport> {
    let report = with_store(store, |s| {
        Ok(DedupeReport {
            links_removed: s.remove_duplicate_links()?,
            articles_removed: s.remove_duplicate_articles()?,
        })
    })?;

    info!(
        "Removed {} duplicate links and {} duplicate articles",
        report.links_removed, report.articles_removed
    );
    Ok(report)
}
