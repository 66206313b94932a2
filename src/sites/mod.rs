//! Newspaper strategies and the registries that dispatch to them
//!
//! Each site module provides a unit struct implementing both
//! [`ListingSite`] and [`ArticleSite`]. The registries are built explicitly
//! from a [`HarvestContext`] at start-up; there is no global registration.

pub mod band;
pub mod bbc;
pub mod cnn_brasil;
pub mod g1;
pub mod r7;

use crate::browser::SessionFactory;
use crate::config::Config;
use crate::dispatch::{Registry, RegistryError};
use crate::handler::{
    ArticleScraper, ArticleSite, Handler, ListingSite, MarkerSource, NewspaperCrawler,
};
use crate::storage::SharedStore;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::Arc;

pub use band::Band;
pub use bbc::BbcBrasil;
pub use cnn_brasil::CnnBrasil;
pub use g1::G1;
pub use r7::R7;

/// Everything a handler needs besides its target
#[derive(Clone)]
pub struct HarvestContext {
    pub config: Config,
    pub store: SharedStore,
    pub sessions: Arc<dyn SessionFactory>,
}

impl HarvestContext {
    pub fn new(config: Config, store: SharedStore, sessions: Arc<dyn SessionFactory>) -> Self {
        Self {
            config,
            store,
            sessions,
        }
    }
}

/// Registers a crawler for `site` under `site_key`
///
/// Every resolution opens a new browser session for a new crawler.
pub fn register_crawler<S>(
    registry: &mut Registry,
    ctx: &HarvestContext,
    site_key: &str,
    site: S,
) -> Result<(), RegistryError>
where
    S: ListingSite + Clone,
{
    let sessions = Arc::clone(&ctx.sessions);
    let store = ctx.store.clone();
    let pagination = ctx.config.pagination.clone();

    registry.register(site_key, move || {
        let session = sessions.create()?;
        let crawler = NewspaperCrawler::new(site.clone(), session, store.clone(), &pagination);
        Ok(Box::new(crawler) as Box<dyn Handler>)
    })
}

/// Registers a scraper for `site` under `site_key`
pub fn register_scraper<S>(
    registry: &mut Registry,
    ctx: &HarvestContext,
    site_key: &str,
    site: S,
) -> Result<(), RegistryError>
where
    S: ArticleSite + Clone,
{
    let sessions = Arc::clone(&ctx.sessions);
    let store = ctx.store.clone();

    registry.register(site_key, move || {
        let session = sessions.create()?;
        let scraper = ArticleScraper::new(site.clone(), session, store.clone());
        Ok(Box::new(scraper) as Box<dyn Handler>)
    })
}

/// Builds the registry of link crawlers for every supported newspaper
///
/// # Returns
///
/// * `Ok(Registry)` - One crawler per newspaper
/// * `Err(RegistryError)` - Two sites share a key
pub fn build_crawler_registry(ctx: &HarvestContext) -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    register_crawler(&mut registry, ctx, g1::SITE_KEY, G1)?;
    register_crawler(&mut registry, ctx, band::SITE_KEY, Band)?;
    register_crawler(&mut registry, ctx, r7::SITE_KEY, R7)?;
    register_crawler(&mut registry, ctx, bbc::SITE_KEY, BbcBrasil)?;
    register_crawler(&mut registry, ctx, cnn_brasil::SITE_KEY, CnnBrasil)?;
    Ok(registry)
}

/// Builds the registry of article scrapers for every supported newspaper
pub fn build_scraper_registry(ctx: &HarvestContext) -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    register_scraper(&mut registry, ctx, g1::SITE_KEY, G1)?;
    register_scraper(&mut registry, ctx, band::SITE_KEY, Band)?;
    register_scraper(&mut registry, ctx, r7::SITE_KEY, R7)?;
    register_scraper(&mut registry, ctx, bbc::SITE_KEY, BbcBrasil)?;
    register_scraper(&mut registry, ctx, cnn_brasil::SITE_KEY, CnnBrasil)?;
    Ok(registry)
}

/// Marker taken from the first capture group of `pattern` applied to the control's href
///
/// Falls back to the page height if the pattern does not compile.
pub(crate) fn page_marker(pattern: &str) -> MarkerSource {
    match Regex::new(pattern) {
        Ok(regex) => MarkerSource::HrefPattern(regex),
        Err(_) => MarkerSource::PageHeight,
    }
}

/// Parses an ISO-8601 timestamp as found in `datetime` attributes
pub(crate) fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

const PORTUGUESE_MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Parses dates like `maio 06, 2024`
pub(crate) fn parse_portuguese_date(value: &str) -> Option<NaiveDateTime> {
    let lowered = value.trim().to_lowercase();
    let mut parts = lowered.split_whitespace();

    let month_name = parts.next()?;
    let day: u32 = parts.next()?.trim_end_matches(',').parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    let month = PORTUGUESE_MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;

    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}
