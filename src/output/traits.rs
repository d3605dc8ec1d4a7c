//! Output sink traits and types
//!
//! The link ledger is append-only: rows are written as links are verified
//! and never updated or removed. Duplicates are kept.

use crate::crawler::{CandidateLink, StatusLabel};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Column headers of the link ledger
pub const LINK_HEADERS: [&str; 6] = [
    "KB Number",
    "Link Text",
    "URL",
    "is_Attachment",
    "inside_Attachment",
    "Status",
];

/// Column headers of the broken-links ledger
pub const BROKEN_HEADERS: [&str; 4] = ["KB Number", "Link Text", "URL", "Status"];

/// One verified link as persisted in the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub identifier: String,
    pub text: String,
    pub url: String,
    pub is_attachment: bool,
    pub inside_attachment: bool,
    pub status: StatusLabel,
}

impl OutputRow {
    /// Projects a verified candidate link into a ledger row
    pub fn new(link: &CandidateLink, status: StatusLabel) -> Self {
        Self {
            identifier: link.owner.clone(),
            text: link.text.clone(),
            url: link.url.clone(),
            is_attachment: link.is_attachment,
            inside_attachment: link.is_nested(),
            status,
        }
    }

    /// Cells in [`LINK_HEADERS`] order
    pub fn to_record(&self) -> [String; 6] {
        [
            self.identifier.clone(),
            self.text.clone(),
            self.url.clone(),
            yes_no(self.is_attachment).to_string(),
            yes_no(self.inside_attachment).to_string(),
            self.status.to_string(),
        ]
    }

    /// Cells in [`BROKEN_HEADERS`] order
    pub fn to_broken_record(&self) -> [String; 4] {
        [
            self.identifier.clone(),
            self.text.clone(),
            self.url.clone(),
            self.status.to_string(),
        ]
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Receives verified rows as they are produced
pub trait LinkSink {
    /// Appends one row; the row must be durable when this returns
    fn append(&mut self, row: &OutputRow) -> OutputResult<()>;
}

/// Point in the crawl at which a failure capture was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureContext {
    /// Navigation to the article raised
    Navigation,

    /// Navigation landed on a login page
    LoginRedirect,

    /// Article answered with a non-200 status
    HttpStatus,

    /// Article content never appeared or could not be read
    Extraction,

    /// Attachment viewer could not be opened
    Viewer,
}

impl FailureContext {
    /// Suffix used when naming capture files
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Navigation => "error",
            Self::LoginRedirect => "login_redirect",
            Self::HttpStatus => "http_status",
            Self::Extraction => "link_error",
            Self::Viewer => "viewer_error",
        }
    }
}

/// Persists a point-in-time capture when an identifier fails
pub trait DiagnosticSink {
    /// Records a capture for `identifier`; `snapshot` is the page source, if any
    fn capture(
        &self,
        identifier: &str,
        context: FailureContext,
        snapshot: Option<&str>,
    ) -> OutputResult<()>;
}
