//! Crawler coordinator - per-identifier crawl orchestration
//!
//! For each identifier, strictly in order:
//! 1. Navigate to the article URL
//! 2. Stop on login redirects, navigation errors, non-200 responses, or a
//!    content container that never appears (with a failure capture)
//! 3. Extract the article's anchor links and verify + emit each one
//! 4. Open every attachment viewer, run the viewer strategies, and verify +
//!    emit what they found
//!
//! Rows for an identifier come out in extraction order: article links in
//! document order, then each attachment's links in discovery order. Nothing
//! short of a ledger write failure stops the run.

use crate::config::Config;
use crate::crawler::fetcher::verify_link;
use crate::crawler::parser::{extract_anchor_links, CandidateLink, LinkOrigin};
use crate::crawler::status::interpret;
use crate::crawler::viewer::explore_viewer;
use crate::output::{DiagnosticSink, FailureContext, LinkSink, OutputRow, RunStats};
use crate::render::RenderSession;
use crate::state::{CrawlOutcome, CrawlState, IdentifierCrawl};
use crate::url::is_auth_redirect;
use crate::LinkCheckError;
use reqwest::Client;

/// Main crawl coordinator
///
/// Owns the two sessions shared by the whole run: the rendering session and
/// the verification HTTP client. Both are used strictly sequentially.
pub struct Coordinator<R: RenderSession> {
    config: Config,
    renderer: R,
    client: Client,
    diagnostics: Box<dyn DiagnosticSink + Send>,
}

impl<R: RenderSession> Coordinator<R> {
    /// Creates a coordinator around already-acquired sessions
    pub fn new(
        config: Config,
        renderer: R,
        client: Client,
        diagnostics: Box<dyn DiagnosticSink + Send>,
    ) -> Self {
        Self {
            config,
            renderer,
            client,
            diagnostics,
        }
    }

    /// Releases the rendering session at the end of the run
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Crawls every identifier in order, appending rows to `sink`
    ///
    /// # Returns
    ///
    /// * `Ok(RunStats)` - All identifiers were attempted
    /// * `Err(LinkCheckError)` - The ledger could not be written
    pub async fn run(
        &mut self,
        identifiers: &[String],
        sink: &mut dyn LinkSink,
    ) -> Result<RunStats, LinkCheckError> {
        let mut stats = RunStats::new();
        tracing::info!("Starting crawl of {} identifiers", identifiers.len());

        for (index, identifier) in identifiers.iter().enumerate() {
            stats.identifiers += 1;
            let crawl = self.process_identifier(identifier, sink, &mut stats).await?;

            tracing::debug!(
                "{} finished in state {} ({}/{})",
                identifier,
                crawl.state(),
                index + 1,
                identifiers.len()
            );
        }

        stats.finish();
        tracing::info!(
            "Crawl completed: {} identifiers, {} rows, {} broken",
            stats.identifiers,
            stats.rows_written,
            stats.links_broken
        );

        Ok(stats)
    }

    /// Drives one identifier through the crawl state machine
    async fn process_identifier(
        &mut self,
        identifier: &str,
        sink: &mut dyn LinkSink,
        stats: &mut RunStats,
    ) -> Result<IdentifierCrawl, LinkCheckError> {
        let mut crawl = IdentifierCrawl::new(identifier);

        crawl.advance(CrawlState::Navigating)?;
        let (outcome, context) = self.navigate_article(identifier).await;

        if let Some(terminal) = outcome.terminal_state() {
            crawl.advance(terminal)?;
            match &outcome {
                CrawlOutcome::AuthRedirected => {
                    stats.auth_redirected += 1;
                    tracing::warn!("Redirected to login for KB {}", identifier);
                }
                CrawlOutcome::NavigationError(cause) => {
                    stats.navigation_failed += 1;
                    tracing::warn!("Error loading KB {}: {}", identifier, cause);
                }
                CrawlOutcome::Loaded(_) => {}
            }
            if let Some(context) = context {
                self.capture(identifier, context);
            }
            return Ok(crawl);
        }

        crawl.advance(CrawlState::Loaded)?;
        stats.loaded += 1;
        tracing::info!("Loaded KB {}", identifier);

        // Article links
        crawl.advance(CrawlState::Extracting)?;
        let links = match self.extract_article_links(identifier).await {
            Ok(links) => links,
            Err(e) => {
                stats.extraction_failed += 1;
                tracing::warn!("Error extracting links in KB {}: {}", identifier, e);
                self.capture(identifier, FailureContext::Extraction);
                crawl.advance(CrawlState::Done)?;
                return Ok(crawl);
            }
        };

        crawl.advance(CrawlState::Verifying)?;
        for link in &links {
            self.verify_and_emit(link, sink, stats).await?;
        }

        // Attachment viewers
        let attachments: Vec<&CandidateLink> = links.iter().filter(|l| l.is_attachment).collect();
        for attachment in attachments {
            crawl.advance(CrawlState::Extracting)?;
            stats.viewers_explored += 1;

            let explored =
                explore_viewer(&mut self.renderer, &self.config, identifier, &attachment.url).await;

            crawl.advance(CrawlState::Verifying)?;
            match explored {
                Ok(report) => {
                    stats.strategy_failures += report.failures.len() as u64;
                    for link in &report.links {
                        self.verify_and_emit(link, sink, stats).await?;
                    }
                }
                Err(e) => {
                    stats.viewers_failed += 1;
                    tracing::warn!("Viewer error for KB {} ({}): {}", identifier, attachment.url, e);
                    self.capture(identifier, FailureContext::Viewer);
                }
            }
        }

        crawl.advance(CrawlState::Done)?;
        Ok(crawl)
    }

    /// Navigates to the article and waits for its content container
    ///
    /// Returns the outcome and, for failures, the capture context to record.
    async fn navigate_article(
        &mut self,
        identifier: &str,
    ) -> (CrawlOutcome, Option<FailureContext>) {
        let url = self.config.portal.article_url_for(identifier);
        tracing::info!("Fetching KB: {} -> {}", identifier, url);

        let navigation = match self
            .renderer
            .navigate(&url, self.config.timeouts.navigation())
            .await
        {
            Ok(navigation) => navigation,
            Err(e) => {
                return (
                    CrawlOutcome::NavigationError(e.to_string()),
                    Some(FailureContext::Navigation),
                )
            }
        };

        if is_auth_redirect(&navigation.final_url, &self.config.portal.login_patterns) {
            return (
                CrawlOutcome::AuthRedirected,
                Some(FailureContext::LoginRedirect),
            );
        }

        if navigation.status != 200 {
            return (
                CrawlOutcome::NavigationError(format!("HTTP {}", navigation.status)),
                Some(FailureContext::HttpStatus),
            );
        }

        if let Err(e) = self
            .renderer
            .wait_for(
                &self.config.portal.content_selector,
                self.config.timeouts.content_wait(),
            )
            .await
        {
            return (
                CrawlOutcome::NavigationError(e.to_string()),
                Some(FailureContext::Extraction),
            );
        }

        (CrawlOutcome::Loaded(navigation.status), None)
    }

    /// Runs the anchor extractor against the article content container
    async fn extract_article_links(
        &mut self,
        identifier: &str,
    ) -> Result<Vec<CandidateLink>, LinkCheckError> {
        let root = self
            .renderer
            .query(&self.config.portal.content_selector)
            .await?;

        Ok(extract_anchor_links(
            identifier,
            root.as_ref(),
            LinkOrigin::TopLevel,
            &self.config.viewer.url_marker,
        ))
    }

    /// Probes one link and appends its row to the ledger
    async fn verify_and_emit(
        &self,
        link: &CandidateLink,
        sink: &mut dyn LinkSink,
        stats: &mut RunStats,
    ) -> Result<(), LinkCheckError> {
        let outcome = verify_link(&self.client, &link.url, self.config.timeouts.probe()).await;
        let label = interpret(outcome);

        if link.is_nested() {
            tracing::info!("  [viewer] {} -> {}", link.url, label);
        } else {
            tracing::info!("  {} -> {}", link.url, label);
        }

        sink.append(&OutputRow::new(link, label))?;
        stats.record_label(&label);
        Ok(())
    }

    /// Records a failure capture; capture errors are logged and ignored
    fn capture(&self, identifier: &str, context: FailureContext) {
        let snapshot = self.renderer.snapshot();
        if let Err(e) = self
            .diagnostics
            .capture(identifier, context, snapshot.as_deref())
        {
            tracing::warn!(
                "Failed to capture {} for {}: {}",
                context.suffix(),
                identifier,
                e
            );
        }
    }
}
