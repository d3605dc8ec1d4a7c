//! Shared fixtures for the integration tests

use async_trait::async_trait;
use kb_linkcheck::config::{parse_config, Config};
use kb_linkcheck::output::{DiagnosticSink, FailureContext, LinkSink, OutputResult, OutputRow};
use kb_linkcheck::render::{HtmlFragment, Navigation, RenderError, RenderResult, RenderSession};
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Creates a test configuration whose articles live under `base_url`
pub fn create_test_config(base_url: &str, links_path: &str, diagnostics_dir: &str) -> Config {
    let toml = format!(
        r##"
[portal]
article-url = "{base}/kb?sysparm_article={{id}}"
login-patterns = ["login.microsoftonline.com", "login_with_sso.do"]

[viewer]
container-selector = "#nested-content"

[timeouts]
navigation = 5
content-wait = 5
viewer-wait = 5
frame-wait = 5
probe = 2

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[output]
links-path = "{links}"
diagnostics-dir = "{diagnostics}"
"##,
        base = base_url,
        links = links_path,
        diagnostics = diagnostics_dir,
    );

    parse_config(&toml).expect("Test config should be valid")
}

/// Wraps article content the way the portal template does
pub fn article_page(content: &str) -> String {
    format!(
        r#"<html><head><title>KB</title></head><body>
        <nav><a href="https://portal.example.com/home">Home</a></nav>
        <article class="kb-article-content">{}</article>
        </body></html>"#,
        content
    )
}

struct ScriptedPage {
    status: u16,
    final_url: Option<String>,
    body: String,
    frames: Vec<String>,
}

/// An in-memory rendering session serving scripted pages
///
/// Unknown URLs fail navigation. `frames` returns the page followed by any
/// sub-documents attached with [`ScriptedSession::frame`]. Selectors registered with
/// [`ScriptedSession::fail_selector`] fail every query.
#[derive(Default)]
pub struct ScriptedSession {
    pages: HashMap<String, ScriptedPage>,
    failing_selectors: HashSet<String>,
    current: Option<String>,
    current_frames: Vec<String>,
    pub visited: Vec<String>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.status_page(url, 200, body)
    }

    pub fn status_page(mut self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.pages.insert(
            url.into(),
            ScriptedPage {
                status,
                final_url: None,
                body: body.into(),
                frames: Vec::new(),
            },
        );
        self
    }

    pub fn redirect(mut self, url: impl Into<String>, final_url: impl Into<String>) -> Self {
        self.pages.insert(
            url.into(),
            ScriptedPage {
                status: 200,
                final_url: Some(final_url.into()),
                body: "<html><body><form id=\"login\"></form></body></html>".to_string(),
                frames: Vec::new(),
            },
        );
        self
    }

    /// Attaches a sub-document to an already scripted page
    pub fn frame(mut self, url: &str, body: impl Into<String>) -> Self {
        if let Some(page) = self.pages.get_mut(url) {
            page.frames.push(body.into());
        }
        self
    }

    pub fn fail_selector(mut self, selector: impl Into<String>) -> Self {
        self.failing_selectors.insert(selector.into());
        self
    }

    fn select(&self, selector: &str) -> RenderResult<Vec<HtmlFragment>> {
        if self.failing_selectors.contains(selector) {
            return Err(RenderError::InvalidSelector {
                selector: selector.to_string(),
                message: "scripted failure".to_string(),
            });
        }

        let body = self.current.as_ref().ok_or(RenderError::NoDocument)?;
        let parsed = Selector::parse(selector).map_err(|e| RenderError::InvalidSelector {
            selector: selector.to_string(),
            message: e.to_string(),
        })?;
        let document = Html::parse_document(body);

        Ok(document
            .select(&parsed)
            .map(|element| HtmlFragment::element(element.html()))
            .collect())
    }
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> RenderResult<Navigation> {
        self.current = None;
        self.current_frames.clear();
        self.visited.push(url.to_string());

        let page = self.pages.get(url).ok_or_else(|| RenderError::Navigation {
            url: url.to_string(),
            message: "connection refused".to_string(),
        })?;
        self.current = Some(page.body.clone());
        self.current_frames = page.frames.clone();

        Ok(Navigation {
            status: page.status,
            final_url: page.final_url.clone().unwrap_or_else(|| url.to_string()),
        })
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> RenderResult<()> {
        if self.select(selector)?.is_empty() {
            Err(RenderError::ContentNotFound {
                selector: selector.to_string(),
                timeout,
            })
        } else {
            Ok(())
        }
    }

    async fn query(&mut self, selector: &str) -> RenderResult<Option<HtmlFragment>> {
        Ok(self.select(selector)?.into_iter().next())
    }

    async fn query_all(&mut self, selector: &str) -> RenderResult<Vec<HtmlFragment>> {
        self.select(selector)
    }

    async fn frames(&mut self) -> RenderResult<Vec<HtmlFragment>> {
        let body = self.current.as_ref().ok_or(RenderError::NoDocument)?;
        let mut frames = vec![HtmlFragment::document(body.clone())];
        frames.extend(self.current_frames.iter().cloned().map(HtmlFragment::document));
        Ok(frames)
    }

    fn snapshot(&self) -> Option<String> {
        self.current.clone()
    }
}

/// Collects ledger rows in memory
#[derive(Default)]
pub struct MemorySink {
    pub rows: Vec<OutputRow>,
}

impl LinkSink for MemorySink {
    fn append(&mut self, row: &OutputRow) -> OutputResult<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}

/// Records which captures were requested
#[derive(Clone, Default)]
pub struct RecordingDiagnostics {
    captures: Arc<Mutex<Vec<(String, FailureContext)>>>,
}

impl RecordingDiagnostics {
    pub fn captures(&self) -> Vec<(String, FailureContext)> {
        self.captures.lock().expect("Capture lock poisoned").clone()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn capture(
        &self,
        identifier: &str,
        context: FailureContext,
        _snapshot: Option<&str>,
    ) -> OutputResult<()> {
        self.captures
            .lock()
            .expect("Capture lock poisoned")
            .push((identifier.to_string(), context));
        Ok(())
    }
}
