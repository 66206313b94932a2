//! CNN Brasil (www.cnnbrasil.com.br)

use crate::handler::{
    select_joined_text, select_text, ArticleSite, ListingSite, LoadMoreControl, MarkerSource, Site,
};
use chrono::NaiveDateTime;
use scraper::Html;

pub const SITE_KEY: &str = "https://www.cnnbrasil.com.br/";

const DATE_FORMAT: &str = "%d/%m/%Y às %H:%M";

#[derive(Debug, Clone, Copy, Default)]
pub struct CnnBrasil;

impl Site for CnnBrasil {
    fn name(&self) -> &'static str {
        "cnn-brasil"
    }
}

impl ListingSite for CnnBrasil {
    fn cookie_banner(&self) -> Option<&'static str> {
        Some("button.cookie-banner-lgpd_accept-button")
    }

    fn load_more(&self) -> LoadMoreControl {
        LoadMoreControl {
            selector: "button.block-list-get-more-btn",
            marker: MarkerSource::Attribute("data-limit"),
        }
    }
}

impl ArticleSite for CnnBrasil {
    fn title(&self, document: &Html) -> Option<String> {
        select_text(document, "h1.single-header__title")
    }

    fn subtitle(&self, document: &Html) -> Option<String> {
        select_text(document, "p.single-header__excerpt")
    }

    fn author(&self, document: &Html) -> Option<String> {
        select_text(document, "span.author__group a")
    }

    fn content(&self, document: &Html) -> Option<String> {
        select_joined_text(document, "div.single-content p")
    }

    fn publication_date(&self, document: &Html) -> Option<NaiveDateTime> {
        select_text(document, "time.single-header__time").and_then(|text| parse_header_time(&text))
    }
}

/// Parses `06/05/2024 às 14:30 | Atualizado 06/05/2024 às 15:00`; the update time wins
fn parse_header_time(text: &str) -> Option<NaiveDateTime> {
    let mut parts = text.split('|').map(str::trim);
    let published = parts.next()?;
    let chosen = parts
        .find_map(|part| part.strip_prefix("Atualizado"))
        .map(str::trim)
        .unwrap_or(published);

    NaiveDateTime::parse_from_str(chosen, DATE_FORMAT).ok()
}
