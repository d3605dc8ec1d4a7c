//! Rendering session capability
//!
//! The crawl never talks to a specific browser product. It drives anything that
//! implements [`RenderSession`]: navigate to a URL, wait for a selector, query
//! elements, enumerate frames. Queried content comes back as owned
//! [`HtmlFragment`]s that expose the uniform [`ContentRoot`] interface used by
//! the link extractor.
//!
//! [`HttpRenderer`] is the shipped implementation. It loads server-rendered
//! pages over HTTP and parses them with `scraper`.

mod html;
mod http;

pub use html::{Anchor, ContentRoot, HtmlFragment};
pub use http::HttpRenderer;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a rendering session
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Navigation to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("No element matched '{selector}' within {timeout:?}")]
    ContentNotFound { selector: String, timeout: Duration },

    #[error("No document is loaded")]
    NoDocument,
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Outcome of a successful navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// HTTP status of the main document
    pub status: u16,

    /// URL the session ended up on after redirects
    pub final_url: String,
}

/// A rendering surface the crawl can drive
///
/// Implementations hold one current document. Every query runs against the
/// document loaded by the most recent `navigate` call.
#[async_trait]
pub trait RenderSession: Send {
    /// Navigates to `url`, failing if it does not load within `timeout`
    async fn navigate(&mut self, url: &str, timeout: Duration) -> RenderResult<Navigation>;

    /// Waits until `selector` matches in the current document
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> RenderResult<()>;

    /// Returns the first element matching `selector`, if any
    async fn query(&mut self, selector: &str) -> RenderResult<Option<HtmlFragment>>;

    /// Returns every element matching `selector`, in document order
    async fn query_all(&mut self, selector: &str) -> RenderResult<Vec<HtmlFragment>>;

    /// Returns the main document followed by every attached sub-document
    async fn frames(&mut self) -> RenderResult<Vec<HtmlFragment>>;

    /// Source of the current document, used for failure captures
    fn snapshot(&self) -> Option<String>;
}
