//! Per-site extraction strategies
//!
//! Sites describe their pages declaratively; the generic crawler and scraper
//! drive the session and handle failures.

use crate::handler::LoadMoreControl;
use chrono::NaiveDateTime;
use scraper::{Html, Selector};

/// Identity shared by listing and article strategies
pub trait Site: Send + Sync + 'static {
    /// Human-readable name used in logs
    fn name(&self) -> &'static str;
}

/// How to page through a site's listing
pub trait ListingSite: Site {
    /// Element whose presence means the listing finished loading
    fn ready_selector(&self) -> &'static str {
        "footer"
    }

    /// Consent button dismissed before paginating, if the site shows one
    fn cookie_banner(&self) -> Option<&'static str> {
        None
    }

    fn load_more(&self) -> LoadMoreControl;

    /// Default number of successful "load more" steps
    fn scroll_limit(&self) -> u32 {
        50
    }

    /// Whether every page replaces the previous one instead of growing it
    fn snapshot_each_page(&self) -> bool {
        false
    }
}

/// How to read an article page
///
/// `title` and `content` are mandatory. The other fields are best-effort.
pub trait ArticleSite: Site {
    fn title(&self, document: &Html) -> Option<String>;

    fn subtitle(&self, document: &Html) -> Option<String>;

    fn author(&self, document: &Html) -> Option<String>;

    fn content(&self, document: &Html) -> Option<String>;

    fn publication_date(&self, document: &Html) -> Option<NaiveDateTime>;
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the first element matching `selector`, whitespace-collapsed
pub fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(|element| collapse(&element.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

/// Texts of every element matching `selector`, one per line
pub fn select_joined_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let parts: Vec<String> = document
        .select(&selector)
        .map(|element| collapse(&element.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

/// Value of `attr` on the first element matching `selector`
pub fn select_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .find_map(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
