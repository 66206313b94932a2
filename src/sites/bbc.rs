//! BBC News Brasil (www.bbc.com/portuguese)

use crate::handler::{
    select_attr, select_joined_text, select_text, ArticleSite, ListingSite, LoadMoreControl, Site,
};
use crate::sites::{page_marker, parse_iso_datetime};
use chrono::NaiveDateTime;
use scraper::Html;

pub const SITE_KEY: &str = "https://www.bbc.com/";

/// BBC topic pages are paginated, so every page is captured before moving on
#[derive(Debug, Clone, Copy, Default)]
pub struct BbcBrasil;

impl Site for BbcBrasil {
    fn name(&self) -> &'static str {
        "bbc-brasil"
    }
}

impl ListingSite for BbcBrasil {
    fn load_more(&self) -> LoadMoreControl {
        LoadMoreControl {
            selector: "a[aria-labelledby='pagination-next-page']",
            marker: page_marker(r"\?page=(\d+)"),
        }
    }

    fn scroll_limit(&self) -> u32 {
        40
    }

    fn snapshot_each_page(&self) -> bool {
        true
    }
}

impl ArticleSite for BbcBrasil {
    fn title(&self, document: &Html) -> Option<String> {
        select_text(document, "h1.bbc-14gqcmb")
    }

    fn subtitle(&self, document: &Html) -> Option<String> {
        select_text(document, "span[data-testid='caption-paragraph']")
    }

    fn author(&self, document: &Html) -> Option<String> {
        select_text(document, "span.bbc-1ypcc2")
    }

    fn content(&self, document: &Html) -> Option<String> {
        select_joined_text(document, "div.bbc-19j92fr")
    }

    fn publication_date(&self, document: &Html) -> Option<NaiveDateTime> {
        select_attr(document, "time.bbc-1dafq0j", "datetime")
            .and_then(|value| parse_iso_datetime(&value))
    }
}
