//! R7 (noticias.r7.com)

use crate::handler::{
    select_attr, select_joined_text, select_text, ArticleSite, ListingSite, LoadMoreControl,
    MarkerSource, Site,
};
use crate::sites::parse_iso_datetime;
use chrono::NaiveDateTime;
use scraper::Html;

pub const SITE_KEY: &str = "https://noticias.r7.com/";

/// R7's "últimas" button carries no page number, so progress is the document height
#[derive(Debug, Clone, Copy, Default)]
pub struct R7;

impl Site for R7 {
    fn name(&self) -> &'static str {
        "r7"
    }
}

impl ListingSite for R7 {
    fn cookie_banner(&self) -> Option<&'static str> {
        Some("button[data-testid='button']")
    }

    fn load_more(&self) -> LoadMoreControl {
        LoadMoreControl {
            selector: "button.b-ultimas__btn",
            marker: MarkerSource::PageHeight,
        }
    }
}

impl ArticleSite for R7 {
    fn title(&self, document: &Html) -> Option<String> {
        select_text(document, "h1.base-font-primary")
    }

    fn subtitle(&self, document: &Html) -> Option<String> {
        select_text(document, "h2.base-font-primary")
    }

    fn author(&self, document: &Html) -> Option<String> {
        select_text(document, "span.article-text-editorial-color ~ span")
    }

    fn content(&self, document: &Html) -> Option<String> {
        select_joined_text(document, "article.b-article-body span.b-article-body__text")
    }

    /// Prefers the modification time when the page has one
    fn publication_date(&self, document: &Html) -> Option<NaiveDateTime> {
        select_attr(document, "time[itemprop='dateModified']", "datetime")
            .or_else(|| select_attr(document, "time[itemprop='datePublished']", "datetime"))
            .and_then(|value| parse_iso_datetime(&value))
    }
}
