//! In-memory session used by unit tests

use crate::browser::http::locate;
use crate::browser::{BrowserSession, ElementHandle, SessionError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Serves one fixed document for every navigation
pub(crate) struct StaticSession {
    html: String,
    current: Option<Url>,
    fail_navigation: bool,
    closes: Arc<AtomicUsize>,
}

impl StaticSession {
    pub(crate) fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            current: None,
            fail_navigation: false,
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            fail_navigation: true,
            ..Self::new("")
        }
    }

    /// Counter incremented each time the session is closed
    pub(crate) fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

#[async_trait]
impl BrowserSession for StaticSession {
    async fn navigate(&mut self, url: &Url) -> Result<(), SessionError> {
        if self.fail_navigation {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }
        self.current = Some(url.clone());
        Ok(())
    }

    fn current_url(&self) -> Option<&Url> {
        self.current.as_ref()
    }

    async fn page_source(&mut self) -> Result<String, SessionError> {
        Ok(self.html.clone())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn page_height(&mut self) -> Result<u64, SessionError> {
        Ok(self.html.len() as u64)
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, SessionError> {
        locate(&self.html, selector)?.ok_or_else(|| SessionError::Timeout {
            selector: selector.to_string(),
            waited: timeout,
        })
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        Err(SessionError::Unsupported(element.selector.clone()))
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
