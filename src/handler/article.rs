//! Generic article scraper

use crate::browser::{BrowserSession, SessionGuard};
use crate::handler::{ArticleSite, Handler, HandlerError, HandlerKind};
use crate::storage::{with_store, ArticleRecord, SharedStore};
use async_trait::async_trait;
use chrono::Utc;
use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

/// Extracts one article and stores it
pub struct ArticleScraper<S: ArticleSite> {
    site: S,
    session: SessionGuard,
    store: SharedStore,
}

impl<S: ArticleSite> ArticleScraper<S> {
    pub fn new(site: S, session: Box<dyn BrowserSession>, store: SharedStore) -> Self {
        Self {
            site,
            session: SessionGuard::new(session),
            store,
        }
    }

    async fn scrape(&mut self, target: &Url) -> Result<i64, HandlerError> {
        let session = self.session.get_mut()?;

        debug!(url = %target, site = self.site.name(), "Scraping article");
        session
            .navigate(target)
            .await
            .map_err(|source| HandlerError::Navigation {
                url: target.to_string(),
                source,
            })?;
        let source = session.page_source().await?;

        let article = build_article(&self.site, &source, target)?;
        let id = with_store(&self.store, |store| store.save_article(&article))?;
        Ok(id)
    }
}

/// Reads an article out of a page source
///
/// Missing title or content fails; missing optional fields are logged and left empty.
fn build_article<S: ArticleSite>(
    site: &S,
    source: &str,
    url: &Url,
) -> Result<ArticleRecord, HandlerError> {
    let document = Html::parse_document(source);

    let mandatory = |field: &'static str, value: Option<String>| {
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| HandlerError::MissingField {
                field,
                url: url.to_string(),
            })
    };
    let optional = |field: &'static str, value: Option<String>| {
        if value.is_none() {
            warn!(url = %url, "Article has no {}", field);
        }
        value
    };

    let title = mandatory("title", site.title(&document))?;
    let content = mandatory("content", site.content(&document))?;
    let subtitle = optional("subtitle", site.subtitle(&document));
    let author = optional("author", site.author(&document));

    let publication_date = site.publication_date(&document);
    if publication_date.is_none() {
        warn!(url = %url, "Article has no publication date");
    }

    Ok(ArticleRecord {
        url: url.to_string(),
        title,
        subtitle,
        author,
        content,
        publication_date,
        scraped_at: Utc::now(),
    })
}

#[async_trait]
impl<S: ArticleSite> Handler for ArticleScraper<S> {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Scraper
    }

    async fn process(&mut self, target: &Url) -> Result<(), HandlerError> {
        let result = self.scrape(target).await;
        self.session.release();

        let id = result?;
        info!(url = %target, site = self.site.name(), id, "Stored article");
        Ok(())
    }
}
