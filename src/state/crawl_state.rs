/// Per-identifier crawl states
///
/// ```text
/// Start -> Navigating -> { AuthRedirected | NavigationError | Loaded }
/// Loaded -> Extracting -> Verifying -> Done
/// ```
use crate::LinkCheckError;
use std::fmt;

/// Represents the current state of one identifier in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Nothing attempted yet
    Start,

    /// Navigation to the article URL is in flight
    Navigating,

    /// Article loaded with status 200 and its content container is present
    Loaded,

    /// Links are being enumerated from the article and its attachments
    Extracting,

    /// Extracted links are being probed and emitted
    Verifying,

    // ===== Terminal States =====
    /// Session was bounced to a login page
    AuthRedirected,

    /// Navigation raised, returned non-200, or content never appeared
    NavigationError,

    /// All links for the identifier were processed
    Done,
}

impl CrawlState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::AuthRedirected | Self::NavigationError | Self::Done
        )
    }

    /// Returns true if the machine permits moving from `self` to `next`
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        use CrawlState::*;

        matches!(
            (self, next),
            (Start, Navigating)
                | (Navigating, AuthRedirected)
                | (Navigating, NavigationError)
                | (Navigating, Loaded)
                | (Loaded, Extracting)
                | (Extracting, Verifying)
                | (Verifying, Extracting)
                | (Verifying, Done)
                | (Extracting, Done)
        )
    }

    /// Short lowercase label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Navigating => "navigating",
            Self::Loaded => "loaded",
            Self::Extracting => "extracting",
            Self::Verifying => "verifying",
            Self::AuthRedirected => "auth_redirected",
            Self::NavigationError => "navigation_error",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the attempt to reach a document ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Document loaded with the given HTTP status
    Loaded(u16),

    /// Session was redirected to an identity provider
    AuthRedirected,

    /// Navigation failed; the cause is kept for logs
    NavigationError(String),
}

impl CrawlOutcome {
    /// Terminal state this outcome drives the machine into, if any
    pub fn terminal_state(&self) -> Option<CrawlState> {
        match self {
            Self::Loaded(_) => None,
            Self::AuthRedirected => Some(CrawlState::AuthRedirected),
            Self::NavigationError(_) => Some(CrawlState::NavigationError),
        }
    }
}

/// Tracks a single identifier through the crawl state machine
#[derive(Debug, Clone)]
pub struct IdentifierCrawl {
    identifier: String,
    state: CrawlState,
}

impl IdentifierCrawl {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            state: CrawlState::Start,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Moves to `next`, rejecting transitions the machine does not allow
    pub fn advance(&mut self, next: CrawlState) -> Result<(), LinkCheckError> {
        if !self.state.can_transition_to(next) {
            return Err(LinkCheckError::InvalidTransition {
                identifier: self.identifier.clone(),
                from: self.state,
                to: next,
            });
        }

        tracing::trace!("{}: {} -> {}", self.identifier, self.state, next);
        self.state = next;
        Ok(())
    }
}
