//! Generic listing-page crawler

use crate::browser::{BrowserSession, SessionGuard};
use crate::config::PaginationConfig;
use crate::handler::{
    extract_links, paginate, Handler, HandlerError, HandlerKind, ListingSite, PaginationPolicy,
};
use crate::storage::{with_store, SharedStore};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Discovers article links on a listing page and stores them in bulk
///
/// The site strategy supplies selectors and pagination style; this type
/// drives the session. The session is released when `process` returns,
/// whatever the outcome.
pub struct NewspaperCrawler<S: ListingSite> {
    site: S,
    session: SessionGuard,
    store: SharedStore,
    policy: PaginationPolicy,
    element_wait: Duration,
}

impl<S: ListingSite> NewspaperCrawler<S> {
    pub fn new(
        site: S,
        session: Box<dyn BrowserSession>,
        store: SharedStore,
        pagination: &PaginationConfig,
    ) -> Self {
        let policy = PaginationPolicy::from_config(pagination, site.scroll_limit());
        Self {
            site,
            session: SessionGuard::new(session),
            store,
            policy,
            element_wait: pagination.element_wait(),
        }
    }

    /// Loads the listing, pages through it and stores the links
    ///
    /// # Returns
    ///
    /// The number of links stored
    async fn crawl(&mut self, target: &Url) -> Result<usize, HandlerError> {
        let session = self.session.get_mut()?;
        let navigation_error = |source| HandlerError::Navigation {
            url: target.to_string(),
            source,
        };

        debug!(url = %target, site = self.site.name(), "Crawling listing");
        session.navigate(target).await.map_err(navigation_error)?;
        session
            .wait_for_element(self.site.ready_selector(), self.element_wait)
            .await
            .map_err(navigation_error)?;

        if let Some(banner) = self.site.cookie_banner() {
            match session.wait_for_element(banner, self.element_wait).await {
                Ok(button) => {
                    if let Err(e) = session.click(&button).await {
                        debug!("Could not dismiss cookie banner: {}", e);
                    }
                }
                Err(e) => debug!("No cookie banner: {}", e),
            }
        }

        let outcome = paginate(
            session,
            &self.site.load_more(),
            &self.policy,
            self.site.snapshot_each_page(),
        )
        .await;

        let mut pages = outcome.snapshots;
        pages.push(session.page_source().await?);

        let links = extract_links(&pages, target);
        if links.is_empty() {
            warn!(url = %target, "No links found on listing");
            return Err(HandlerError::EmptyPage(target.to_string()));
        }

        let stored = with_store(&self.store, |store| store.bulk_insert_links(&links))?;
        debug!(
            url = %target,
            load_more = outcome.load_more_count,
            termination = ?outcome.termination,
            "Found {} links", stored
        );
        Ok(stored)
    }
}

#[async_trait]
impl<S: ListingSite> Handler for NewspaperCrawler<S> {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Crawler
    }

    async fn process(&mut self, target: &Url) -> Result<(), HandlerError> {
        let result = self.crawl(target).await;
        self.session.release();

        let stored = result?;
        info!(url = %target, site = self.site.name(), "Stored {} links", stored);
        Ok(())
    }
}
