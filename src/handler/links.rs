//! Link extraction from listing pages
//!
//! Turns the rendered source of a listing page into [`LinkRecord`]s:
//! - Anchors inside `script`, `style`, `noscript`, `nav`, `header` and `footer` are ignored
//! - Relative hrefs are resolved against the listing URL
//! - `javascript:`, `mailto:` and other non-HTTP(S) targets are dropped
//! - Links are canonicalized and deduplicated by URL
//! - Short anchor texts are replaced by a title derived from the URL slug
//! - A publication date is inferred from the URL when it embeds one

use crate::storage::LinkRecord;
use crate::url::canonicalize_link;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

/// Containers whose anchors are site chrome, not articles
const SKIPPED_CONTAINERS: &[&str] = &["script", "style", "noscript", "nav", "header", "footer"];

/// Anchor texts shorter than this are replaced by the slug title
const MIN_TITLE_CHARS: usize = 5;

fn slash_date_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\d{4}/\d{2}/\d{2}").ok())
        .as_ref()
}

fn compact_date_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{8}").ok()).as_ref()
}

fn extension_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\.(g?html?|htm)$").ok())
        .as_ref()
}

/// Extracts article links from one or more page sources
///
/// # Arguments
///
/// * `pages` - Page sources captured while crawling the listing
/// * `listing_url` - The listing page the sources came from
///
/// # Returns
///
/// Links in document order, one per distinct canonical URL
pub fn extract_links(pages: &[String], listing_url: &Url) -> Vec<LinkRecord> {
    let anchor_selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let listing = canonicalize_link(listing_url);
    let extracted_at = Utc::now();
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for page in pages {
        let document = Html::parse_document(page);

        for element in document.select(&anchor_selector) {
            let in_chrome = element.ancestors().any(|node| {
                node.value()
                    .as_element()
                    .map_or(false, |e| SKIPPED_CONTAINERS.contains(&e.name()))
            });
            if in_chrome {
                continue;
            }

            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(url) = resolve_link(href, listing_url) else {
                continue;
            };
            if url == listing || !seen.insert(url.to_string()) {
                continue;
            }

            let text = element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");
            let title = if text.chars().count() < MIN_TITLE_CHARS {
                title_from_slug(url.as_str())
            } else {
                text
            };

            links.push(LinkRecord {
                published_at: date_from_url(url.as_str()),
                url: url.to_string(),
                title,
                source: Some(listing_url.to_string()),
                extracted_at,
            });
        }
    }

    links
}

/// Resolves an href against the listing URL, keeping only HTTP(S) targets
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let url = base_url.join(href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(canonicalize_link(&url)),
        _ => None,
    }
}

/// Infers a publication date embedded in a URL
///
/// Recognizes `YYYY/MM/DD` first, then an eight-digit `DDMMYYYY` run.
pub fn date_from_url(url: &str) -> Option<NaiveDateTime> {
    if let Some(m) = slash_date_pattern().and_then(|p| p.find(url)) {
        return NaiveDate::parse_from_str(m.as_str(), "%Y/%m/%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }

    compact_date_pattern()
        .and_then(|p| p.find(url))
        .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%d%m%Y").ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Builds a human-readable title from the last path segment of a URL
pub fn title_from_slug(url: &str) -> String {
    let trimmed = url.split(&['?', '#'][..]).next().unwrap_or(url);
    let segment = trimmed.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    let segment = match extension_pattern() {
        Some(pattern) => pattern.replace(segment, "").into_owned(),
        None => segment.to_string(),
    };

    segment
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
