//! Reachability labels for probed links
//!
//! | Outcome | Label |
//! |---------|-------|
//! | probe failed | `Broken (Timeout)`, `Broken (Client Error)`, `Broken (Unknown Error)` |
//! | 200-299 | `OK` |
//! | 300-399 | `OK - Redirected` |
//! | 401, 403, 405, 407, 423 | `OK - Access Required` |
//! | anything else | `Broken (<code>)` |

use std::fmt;

/// Status codes meaning the resource exists but needs elevated access
pub const ACCESS_REQUIRED_CODES: [u16; 5] = [401, 403, 405, 407, 423];

/// Why a probe produced no HTTP status at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeFailure {
    Timeout,
    ClientError,
    UnknownError,
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Timeout => "Timeout",
            Self::ClientError => "Client Error",
            Self::UnknownError => "Unknown Error",
        };
        f.write_str(text)
    }
}

/// Raw result of probing a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered with this status
    Status(u16),

    /// Both probes failed before a status was received
    Failed(ProbeFailure),
}

/// What made a link broken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrokenReason {
    Status(u16),
    Probe(ProbeFailure),
}

impl fmt::Display for BrokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "{}", code),
            Self::Probe(failure) => write!(f, "{}", failure),
        }
    }
}

/// Verification label attached to every emitted link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLabel {
    Ok,
    Redirected,
    AccessRequired,
    Broken(BrokenReason),
}

impl StatusLabel {
    /// Returns true for every label except `Broken`
    pub fn is_reachable(&self) -> bool {
        !matches!(self, Self::Broken(_))
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Redirected => f.write_str("OK - Redirected"),
            Self::AccessRequired => f.write_str("OK - Access Required"),
            Self::Broken(reason) => write!(f, "Broken ({})", reason),
        }
    }
}

/// Maps a probe outcome to its label
///
/// Access-restricted responses count as reachable: the resource exists.
///
/// # Examples
///
/// ```
/// use kb_linkcheck::crawler::{interpret, ProbeOutcome};
///
/// assert_eq!(interpret(ProbeOutcome::Status(204)).to_string(), "OK");
/// assert_eq!(interpret(ProbeOutcome::Status(403)).to_string(), "OK - Access Required");
/// assert_eq!(interpret(ProbeOutcome::Status(404)).to_string(), "Broken (404)");
/// ```
pub fn interpret(outcome: ProbeOutcome) -> StatusLabel {
    match outcome {
        ProbeOutcome::Failed(failure) => StatusLabel::Broken(BrokenReason::Probe(failure)),
        ProbeOutcome::Status(code) if (200..300).contains(&code) => StatusLabel::Ok,
        ProbeOutcome::Status(code) if (300..400).contains(&code) => StatusLabel::Redirected,
        ProbeOutcome::Status(code) if ACCESS_REQUIRED_CODES.contains(&code) => {
            StatusLabel::AccessRequired
        }
        ProbeOutcome::Status(code) => StatusLabel::Broken(BrokenReason::Status(code)),
    }
}
