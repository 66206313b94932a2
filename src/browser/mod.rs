//! Browser session abstraction
//!
//! Handlers drive pages through the [`BrowserSession`] trait. Each handler
//! instance owns exactly one session, obtained from a [`SessionFactory`] and
//! wrapped in a [`SessionGuard`] so it is closed exactly once on every exit path.

#[cfg(test)]
pub(crate) mod fake;
mod http;

pub use http::{HttpSession, HttpSessionFactory};

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Timed out after {waited:?} waiting for '{selector}'")]
    Timeout { selector: String, waited: Duration },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Element '{0}' is no longer attached to the page")]
    StaleElement(String),

    #[error("Unsupported interaction: {0}")]
    Unsupported(String),

    #[error("Session already closed")]
    Closed,

    #[error("Could not start a browser session: {0}")]
    Unavailable(String),
}

/// A snapshot of a located page element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementHandle {
    /// Selector the element was located with
    pub selector: String,
    pub tag: String,
    pub attributes: HashMap<String, String>,
    /// Whitespace-collapsed text content
    pub text: String,
}

impl ElementHandle {
    /// Returns the value of an attribute, if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// An isolated browser automation handle
///
/// Sessions are not safe to share; every handler instance gets its own.
#[async_trait]
pub trait BrowserSession: Send {
    /// Loads `url`, replacing the current document
    async fn navigate(&mut self, url: &Url) -> Result<(), SessionError>;

    /// URL of the document currently loaded
    fn current_url(&self) -> Option<&Url>;

    /// Full source of everything currently rendered
    async fn page_source(&mut self) -> Result<String, SessionError>;

    async fn scroll_to_bottom(&mut self) -> Result<(), SessionError>;

    /// Rendered document height, used as a progress marker by some sites
    async fn page_height(&mut self) -> Result<u64, SessionError>;

    /// Waits up to `timeout` for an element matching `selector`
    ///
    /// # Returns
    ///
    /// * `Ok(ElementHandle)` - The first matching element
    /// * `Err(SessionError::Timeout)` - Nothing matched within `timeout`
    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, SessionError>;

    /// Activates a previously located element
    async fn click(&mut self, element: &ElementHandle) -> Result<(), SessionError>;

    /// Releases the session; calling it again is a no-op
    fn close(&mut self);
}

/// Produces fresh sessions for handler instances
pub trait SessionFactory: Send + Sync {
    /// Returns a working session or an error
    fn create(&self) -> Result<Box<dyn BrowserSession>, SessionError>;
}

/// Owns a session and closes it exactly once
///
/// Closing happens on [`SessionGuard::release`] or, failing that, on drop.
pub struct SessionGuard {
    session: Option<Box<dyn BrowserSession>>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn BrowserSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Borrows the live session
    ///
    /// Fails with [`SessionError::Closed`] once the guard has been released.
    pub fn get_mut(&mut self) -> Result<&mut (dyn BrowserSession + 'static), SessionError> {
        match self.session.as_deref_mut() {
            Some(session) => Ok(session),
            None => Err(SessionError::Closed),
        }
    }

    /// Closes the session if it is still open
    pub fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
        }
    }

    pub fn is_released(&self) -> bool {
        self.session.is_none()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.release();
    }
}
