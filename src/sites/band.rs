//! Band News (bandnewstv.uol.com.br)

use crate::handler::{
    select_joined_text, select_text, ArticleSite, ListingSite, LoadMoreControl, MarkerSource, Site,
};
use crate::sites::parse_portuguese_date;
use chrono::NaiveDateTime;
use scraper::Html;

pub const SITE_KEY: &str = "https://bandnewstv.uol.com.br/";

#[derive(Debug, Clone, Copy, Default)]
pub struct Band;

impl Site for Band {
    fn name(&self) -> &'static str {
        "band"
    }
}

impl ListingSite for Band {
    fn load_more(&self) -> LoadMoreControl {
        LoadMoreControl {
            selector: "button.cs-load-more",
            marker: MarkerSource::Attribute("data-page"),
        }
    }
}

impl ArticleSite for Band {
    fn title(&self, document: &Html) -> Option<String> {
        select_text(document, "h1.cs-entry__title span")
    }

    fn subtitle(&self, document: &Html) -> Option<String> {
        select_text(document, "div.cs-entry__subtitle")
    }

    fn author(&self, document: &Html) -> Option<String> {
        select_text(document, "span.cs-meta-author-name")
    }

    fn content(&self, document: &Html) -> Option<String> {
        select_joined_text(document, "div.cs-entry__content-wrap p")
    }

    fn publication_date(&self, document: &Html) -> Option<NaiveDateTime> {
        select_text(document, "div.cs-meta-date").and_then(|text| parse_portuguese_date(&text))
    }
}
