//! G1 (globo.com)

use crate::handler::{
    select_attr, select_joined_text, select_text, ArticleSite, ListingSite, LoadMoreControl, Site,
};
use crate::sites::{page_marker, parse_iso_datetime};
use chrono::NaiveDateTime;
use scraper::Html;

pub const SITE_KEY: &str = "https://g1.globo.com/";

/// G1 listings page with a "veja mais" link pointing at `pagina-N`
#[derive(Debug, Clone, Copy, Default)]
pub struct G1;

impl Site for G1 {
    fn name(&self) -> &'static str {
        "g1"
    }
}

impl ListingSite for G1 {
    fn cookie_banner(&self) -> Option<&'static str> {
        Some("button.cookie-banner-lgpd_accept-button")
    }

    fn load_more(&self) -> LoadMoreControl {
        LoadMoreControl {
            selector: "div.load-more a",
            marker: page_marker(r"pagina-(\d+)"),
        }
    }
}

impl ArticleSite for G1 {
    fn title(&self, document: &Html) -> Option<String> {
        select_text(document, "h1.content-head__title")
    }

    fn subtitle(&self, document: &Html) -> Option<String> {
        select_text(document, "h2.content-head__subtitle")
    }

    fn author(&self, document: &Html) -> Option<String> {
        select_text(document, "a.multi_signatures")
    }

    fn content(&self, document: &Html) -> Option<String> {
        select_joined_text(document, "div.mc-article-body p")
    }

    fn publication_date(&self, document: &Html) -> Option<NaiveDateTime> {
        select_attr(document, "time[itemprop='datePublished']", "datetime")
            .and_then(|value| parse_iso_datetime(&value))
    }
}
