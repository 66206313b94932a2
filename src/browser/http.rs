//! HTTP-backed browser session
//!
//! Emulates the small part of browser automation the handlers rely on:
//! - Navigation is a GET request
//! - Element lookup evaluates a CSS selector over the last loaded document
//! - Clicking a control follows its `href` and appends the fetched document,
//!   the way a "load more" button grows the rendered page
//! - Each session owns its own client and cookie jar

use crate::browser::{BrowserSession, ElementHandle, SessionError, SessionFactory};
use crate::config::BrowserConfig;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Builds sessions from the browser configuration
#[derive(Debug, Clone)]
pub struct HttpSessionFactory {
    config: BrowserConfig,
}

impl HttpSessionFactory {
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl SessionFactory for HttpSessionFactory {
    fn create(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        let session = HttpSession::new(&self.config)?;
        Ok(Box::new(session))
    }
}

#[derive(Debug)]
struct LoadedPage {
    url: Url,
    html: String,
}

/// A browser session driven over plain HTTP
pub struct HttpSession {
    client: Client,
    pages: Vec<LoadedPage>,
    closed: bool,
}

impl HttpSession {
    /// Creates a session with its own HTTP client
    ///
    /// # Returns
    ///
    /// * `Ok(HttpSession)` - Session ready for navigation
    /// * `Err(SessionError::Unavailable)` - The client could not be built
    pub fn new(config: &BrowserConfig) -> Result<Self, SessionError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            pages: Vec::new(),
            closed: false,
        })
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    async fn fetch(&self, url: &Url) -> Result<LoadedPage, SessionError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let final_url = response.url().clone();
        let html = response.text().await?;
        debug!(url = %final_url, bytes = html.len(), "Loaded document");

        Ok(LoadedPage {
            url: final_url,
            html,
        })
    }
}

/// Finds the first element matching `selector` in `html`
pub(crate) fn locate(html: &str, selector: &str) -> Result<Option<ElementHandle>, SessionError> {
    let parsed = Selector::parse(selector)
        .map_err(|_| SessionError::InvalidSelector(selector.to_string()))?;
    let document = Html::parse_document(html);

    let handle = document.select(&parsed).next().map(|element| {
        let attributes = element
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let text = element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");

        ElementHandle {
            selector: selector.to_string(),
            tag: element.value().name().to_string(),
            attributes,
            text,
        }
    });

    Ok(handle)
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn navigate(&mut self, url: &Url) -> Result<(), SessionError> {
        self.ensure_open()?;
        let page = self.fetch(url).await?;
        self.pages = vec![page];
        Ok(())
    }

    fn current_url(&self) -> Option<&Url> {
        self.pages.last().map(|page| &page.url)
    }

    async fn page_source(&mut self) -> Result<String, SessionError> {
        self.ensure_open()?;
        Ok(self
            .pages
            .iter()
            .map(|page| page.html.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), SessionError> {
        // Static documents have nothing to lazy-load.
        self.ensure_open()
    }

    async fn page_height(&mut self) -> Result<u64, SessionError> {
        self.ensure_open()?;
        Ok(self.pages.iter().map(|page| page.html.len() as u64).sum())
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, SessionError> {
        self.ensure_open()?;
        let started = Instant::now();

        let found = match self.pages.last() {
            Some(page) => locate(&page.html, selector)?,
            None => None,
        };

        // A fetched document never changes, so there is nothing to poll for.
        found.ok_or_else(|| SessionError::Timeout {
            selector: selector.to_string(),
            waited: started.elapsed().min(timeout),
        })
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        self.ensure_open()?;

        let href = element.attribute("href").ok_or_else(|| {
            SessionError::Unsupported(format!(
                "'{}' is a scripted control without href",
                element.selector
            ))
        })?;

        let base = self
            .current_url()
            .cloned()
            .ok_or_else(|| SessionError::StaleElement(element.selector.clone()))?;

        let target = base.join(href).map_err(|e| SessionError::Navigation {
            url: href.to_string(),
            message: e.to_string(),
        })?;

        let page = self.fetch(&target).await?;
        self.pages.push(page);
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.pages.clear();
            debug!("Closed HTTP session");
        }
    }
}
