//! HTTP-backed rendering session
//!
//! Loads server-rendered pages with `reqwest` and answers selector queries
//! with `scraper`. A fetched document does not change afterwards, so
//! `wait_for` decides presence immediately instead of polling.

use crate::config::Config;
use crate::crawler::client_builder;
use crate::render::{HtmlFragment, Navigation, RenderError, RenderResult, RenderSession};
use crate::LinkCheckError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// The document most recently loaded by [`HttpRenderer::navigate`]
#[derive(Debug, Clone)]
struct LoadedPage {
    final_url: Url,
    body: String,
}

/// A rendering session that fetches pages over HTTP
pub struct HttpRenderer {
    client: Client,
    current: Option<LoadedPage>,
    frame_timeout: Duration,
}

impl HttpRenderer {
    /// Creates a renderer around an existing client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            current: None,
            frame_timeout: Duration::from_secs(10),
        }
    }

    /// Builds a renderer from configuration
    ///
    /// The portal session cookie, when configured, is attached to every request.
    pub fn from_config(config: &Config) -> Result<Self, LinkCheckError> {
        let mut builder = client_builder(&config.user_agent);

        if let Some(cookie) = config.portal.session_cookie()? {
            let mut headers = HeaderMap::new();
            let mut value = HeaderValue::from_str(&cookie).map_err(|_| {
                crate::ConfigError::Validation("session cookie is not a valid header value".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
            builder = builder.default_headers(headers);
        }

        let mut renderer = Self::new(builder.build()?);
        renderer.frame_timeout = config.timeouts.frame_wait();
        Ok(renderer)
    }

    fn current(&self) -> RenderResult<&LoadedPage> {
        self.current.as_ref().ok_or(RenderError::NoDocument)
    }

    /// Fetches a URL and returns its final URL, status and body
    async fn fetch(&self, url: &str, timeout: Duration) -> RenderResult<(Url, u16, String)> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, timeout, e))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, timeout, e))?;

        Ok((final_url, status, body))
    }
}

#[async_trait]
impl RenderSession for HttpRenderer {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> RenderResult<Navigation> {
        // A failed navigation must not leave the previous page behind
        self.current = None;

        let (final_url, status, body) = self.fetch(url, timeout).await?;
        tracing::debug!("Loaded {} -> {} ({})", url, final_url, status);

        let navigation = Navigation {
            status,
            final_url: final_url.to_string(),
        };
        self.current = Some(LoadedPage { final_url, body });

        Ok(navigation)
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> RenderResult<()> {
        let page = self.current()?;
        let parsed_selector = parse_selector(selector)?;
        let document = Html::parse_document(&page.body);

        if document.select(&parsed_selector).next().is_some() {
            Ok(())
        } else {
            Err(RenderError::ContentNotFound {
                selector: selector.to_string(),
                timeout,
            })
        }
    }

    async fn query(&mut self, selector: &str) -> RenderResult<Option<HtmlFragment>> {
        let page = self.current()?;
        let parsed_selector = parse_selector(selector)?;
        let document = Html::parse_document(&page.body);

        Ok(document
            .select(&parsed_selector)
            .next()
            .map(|element| HtmlFragment::element(element.html())))
    }

    async fn query_all(&mut self, selector: &str) -> RenderResult<Vec<HtmlFragment>> {
        let page = self.current()?;
        let parsed_selector = parse_selector(selector)?;
        let document = Html::parse_document(&page.body);

        Ok(document
            .select(&parsed_selector)
            .map(|element| HtmlFragment::element(element.html()))
            .collect())
    }

    async fn frames(&mut self) -> RenderResult<Vec<HtmlFragment>> {
        let page = self.current()?.clone();
        let sources = frame_sources(&page.body, &page.final_url);

        let mut frames = vec![HtmlFragment::document(page.body)];
        for source in sources {
            match self.fetch(source.as_str(), self.frame_timeout).await {
                Ok((_, status, body)) if (200..300).contains(&status) => {
                    frames.push(HtmlFragment::document(body));
                }
                Ok((_, status, _)) => {
                    tracing::warn!("Frame {} returned HTTP {}, skipping", source, status);
                }
                Err(e) => {
                    tracing::warn!("Frame {} failed to load: {}", source, e);
                }
            }
        }

        Ok(frames)
    }

    fn snapshot(&self) -> Option<String> {
        self.current.as_ref().map(|page| page.body.clone())
    }
}

/// Resolves the `src` of every `iframe`/`frame` against the page URL
fn frame_sources(body: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(body);
    let selector = match Selector::parse("iframe[src], frame[src]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty() && !src.starts_with("about:") && !src.starts_with("javascript:"))
        .filter_map(|src| base.join(src).ok())
        .filter(|url| url.scheme() == "http" || url.scheme() == "https")
        .collect()
}

fn parse_selector(selector: &str) -> RenderResult<Selector> {
    Selector::parse(selector).map_err(|e| RenderError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn classify_error(url: &str, timeout: Duration, error: reqwest::Error) -> RenderError {
    if error.is_timeout() {
        RenderError::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else {
        RenderError::Navigation {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
