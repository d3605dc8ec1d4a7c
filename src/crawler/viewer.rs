//! Nested document viewer exploration
//!
//! After navigating to an attachment, a fixed, ordered list of independent
//! strategies runs against the viewer. Each one is isolated: its failure is
//! recorded and the next strategy still runs. Whatever the strategies produce
//! is concatenated in strategy order.

use crate::config::Config;
use crate::crawler::parser::{extract_anchor_links, extract_text_links, CandidateLink, LinkOrigin};
use crate::render::{RenderError, RenderResult, RenderSession};

/// One way of recovering links from a viewer page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerStrategy {
    /// Anchors inside the fixed nested content container of the viewer shell
    Container,

    /// Anchors across every frame attached to the page
    Frames,

    /// URLs painted as text by the viewer's text layer
    TextLayer,

    /// Anchors inside the alternate template's content section
    Section,
}

impl ViewerStrategy {
    /// Strategies in the order they run
    pub const ORDERED: [ViewerStrategy; 4] = [
        ViewerStrategy::Container,
        ViewerStrategy::Frames,
        ViewerStrategy::TextLayer,
        ViewerStrategy::Section,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Frames => "frames",
            Self::TextLayer => "text_layer",
            Self::Section => "section",
        }
    }

    /// Runs the strategy against the page currently loaded in `session`
    pub async fn run<R: RenderSession + ?Sized>(
        &self,
        session: &mut R,
        config: &Config,
        owner: &str,
    ) -> RenderResult<Vec<CandidateLink>> {
        let viewer = &config.viewer;
        let marker = viewer.url_marker.as_str();
        let origin = LinkOrigin::NestedAttachment;

        match self {
            Self::Container => {
                session
                    .wait_for(&viewer.container_selector, config.timeouts.viewer_wait())
                    .await?;
                let root = session.query(&viewer.container_selector).await?;
                Ok(extract_anchor_links(owner, root.as_ref(), origin, marker))
            }
            Self::Frames => {
                session
                    .wait_for(&viewer.frame_selector, config.timeouts.frame_wait())
                    .await?;
                let frames = session.frames().await?;
                Ok(frames
                    .iter()
                    .flat_map(|frame| extract_anchor_links(owner, Some(frame), origin, marker))
                    .collect())
            }
            Self::TextLayer => {
                let spans = session.query_all(&viewer.text_layer_selector).await?;
                Ok(extract_text_links(owner, &spans, origin, marker))
            }
            Self::Section => {
                let root = session.query(&viewer.section_selector).await?;
                Ok(extract_anchor_links(owner, root.as_ref(), origin, marker))
            }
        }
    }
}

/// Links recovered from one attachment, plus the strategies that failed
#[derive(Debug, Default)]
pub struct ViewerReport {
    pub links: Vec<CandidateLink>,
    pub failures: Vec<(ViewerStrategy, RenderError)>,
}

/// Navigates to an attachment and runs every viewer strategy against it
///
/// # Returns
///
/// * `Ok(ViewerReport)` - Links from every strategy that succeeded, in order
/// * `Err(RenderError)` - The viewer page itself could not be loaded
pub async fn explore_viewer<R: RenderSession + ?Sized>(
    session: &mut R,
    config: &Config,
    owner: &str,
    attachment_url: &str,
) -> RenderResult<ViewerReport> {
    tracing::info!("Opening viewer: {}", attachment_url);

    let navigation = session
        .navigate(attachment_url, config.timeouts.navigation())
        .await?;
    if navigation.status != 200 {
        tracing::warn!(
            "Viewer {} answered HTTP {}, trying strategies anyway",
            attachment_url,
            navigation.status
        );
    }

    let mut report = ViewerReport::default();
    for strategy in ViewerStrategy::ORDERED {
        match strategy.run(session, config, owner).await {
            Ok(links) => {
                tracing::debug!(
                    "Viewer strategy {} found {} links in {}",
                    strategy.name(),
                    links.len(),
                    attachment_url
                );
                report.links.extend(links);
            }
            Err(e) => {
                tracing::warn!(
                    "Viewer strategy {} failed for {}: {}",
                    strategy.name(),
                    attachment_url,
                    e
                );
                report.failures.push((strategy, e));
            }
        }
    }

    if report.links.is_empty() {
        tracing::warn!("No embedded links found inside viewer {}", attachment_url);
    }

    Ok(report)
}
