//! Bounded "load more" loop shared by every crawler
//!
//! Each iteration scrolls to the bottom, waits for the site's load-more control,
//! reads a progress marker from it and clicks it. The loop ends when the scroll
//! limit is reached, when the marker stops advancing, when the control keeps
//! failing to appear, when the session cannot drive the control, or when the
//! wall-clock ceiling is hit. Ending is never an error: the caller keeps
//! whatever the page accumulated.

use crate::browser::{BrowserSession, ElementHandle, SessionError};
use crate::config::PaginationConfig;
use regex::Regex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Where the progress marker of a load-more control is read from
#[derive(Debug, Clone)]
pub enum MarkerSource {
    /// First capture group of a pattern applied to the control's `href`
    HrefPattern(Regex),
    /// A numeric attribute on the control, e.g. `data-page`
    Attribute(&'static str),
    /// The rendered document height
    PageHeight,
}

/// A site's load-more control
#[derive(Debug, Clone)]
pub struct LoadMoreControl {
    pub selector: &'static str,
    pub marker: MarkerSource,
}

/// Limits applied to one pagination run
#[derive(Debug, Clone)]
pub struct PaginationPolicy {
    pub scroll_limit: u32,
    pub max_retries: u32,
    pub max_repeated_pages: u32,
    pub element_wait: Duration,
    pub timeout: Duration,
    pub settle_delay: Duration,
}

impl PaginationPolicy {
    /// Builds the policy for a site
    ///
    /// A `scroll-limit` set in the configuration overrides the site default.
    pub fn from_config(config: &PaginationConfig, site_scroll_limit: u32) -> Self {
        Self {
            scroll_limit: config.scroll_limit.unwrap_or(site_scroll_limit),
            max_retries: config.max_retries,
            max_repeated_pages: config.max_repeated_pages,
            element_wait: config.element_wait(),
            timeout: config.crawl_timeout(),
            settle_delay: config.settle_delay(),
        }
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    ScrollLimitReached,
    /// The marker did not advance for more than `max_repeated_pages` iterations
    StalledPage,
    RetriesExhausted,
    TimedOut,
    /// The session cannot operate the control (e.g. a scripted button over HTTP)
    Unsupported(String),
    /// An unexpected session error ended the loop early
    Interrupted(String),
}

/// Result of a pagination run
#[derive(Debug, Clone)]
pub struct PaginationOutcome {
    pub termination: Termination,
    pub load_more_count: u32,
    /// Page sources captured before each click, when requested
    pub snapshots: Vec<String>,
}

#[derive(Debug, Default)]
struct LoopState {
    load_more_count: u32,
    last_marker: Option<u64>,
    repeated_pages: u32,
    retries: u32,
}

impl LoopState {
    /// Counts a failed attempt and reports whether the budget is spent
    fn retry(&mut self, max_retries: u32) -> bool {
        self.retries += 1;
        self.retries > max_retries
    }
}

async fn read_marker(
    session: &mut dyn BrowserSession,
    element: &ElementHandle,
    source: &MarkerSource,
) -> Option<u64> {
    match source {
        MarkerSource::HrefPattern(pattern) => element
            .attribute("href")
            .and_then(|href| pattern.captures(href))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok()),
        MarkerSource::Attribute(name) => element
            .attribute(name)
            .and_then(|value| value.trim().parse().ok()),
        MarkerSource::PageHeight => session.page_height().await.ok(),
    }
}

/// Runs the load-more loop against the current page
///
/// # Arguments
///
/// * `session` - Session with the listing page already loaded
/// * `control` - The site's load-more control
/// * `policy` - Loop limits
/// * `capture_snapshots` - Whether to keep the page source before every click
pub async fn paginate(
    session: &mut dyn BrowserSession,
    control: &LoadMoreControl,
    policy: &PaginationPolicy,
    capture_snapshots: bool,
) -> PaginationOutcome {
    let started = Instant::now();
    let mut state = LoopState::default();
    let mut snapshots = Vec::new();

    let termination = loop {
        if started.elapsed() >= policy.timeout {
            debug!("Crawl ceiling of {:?} reached", policy.timeout);
            break Termination::TimedOut;
        }

        if let Err(e) = session.scroll_to_bottom().await {
            break Termination::Interrupted(e.to_string());
        }

        let element = match session
            .wait_for_element(control.selector, policy.element_wait)
            .await
        {
            Ok(element) => element,
            Err(SessionError::Timeout { .. }) | Err(SessionError::StaleElement(_)) => {
                warn!(
                    retries = state.retries + 1,
                    "Load-more control '{}' not interactable", control.selector
                );
                if state.retry(policy.max_retries) {
                    break Termination::RetriesExhausted;
                }
                continue;
            }
            Err(e) => break Termination::Interrupted(e.to_string()),
        };

        let marker = match read_marker(session, &element, &control.marker).await {
            Some(marker) => marker,
            None => {
                warn!("Could not read a page marker from '{}'", control.selector);
                if state.retry(policy.max_retries) {
                    break Termination::RetriesExhausted;
                }
                continue;
            }
        };

        if state.last_marker == Some(marker) {
            state.repeated_pages += 1;
            warn!(
                "Seeing the same page marker {} for {} iterations",
                marker, state.repeated_pages
            );
            if state.repeated_pages > policy.max_repeated_pages {
                break Termination::StalledPage;
            }
        } else {
            state.repeated_pages = 0;
            state.last_marker = Some(marker);
            state.load_more_count += 1;
            debug!(marker, count = state.load_more_count, "New content loaded");
            if state.load_more_count >= policy.scroll_limit {
                break Termination::ScrollLimitReached;
            }
        }

        if capture_snapshots {
            match session.page_source().await {
                Ok(source) => snapshots.push(source),
                Err(e) => break Termination::Interrupted(e.to_string()),
            }
        }

        match session.click(&element).await {
            Ok(()) => {}
            Err(SessionError::Unsupported(reason)) => {
                info!(
                    selector = control.selector,
                    "Pagination unsupported by this session, keeping the first page: {}", reason
                );
                break Termination::Unsupported(reason);
            }
            Err(e) => break Termination::Interrupted(e.to_string()),
        }

        if !policy.settle_delay.is_zero() {
            tokio::time::sleep(policy.settle_delay).await;
        }
    };

    debug!(
        ?termination,
        load_more = state.load_more_count,
        "Pagination finished"
    );

    PaginationOutcome {
        termination,
        load_more_count: state.load_more_count,
        snapshots,
    }
}
