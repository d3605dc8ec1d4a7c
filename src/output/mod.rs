//! Output module for the link ledger, failure captures and run statistics
//!
//! This module handles:
//! - Appending verified links to CSV ledgers
//! - Capturing page state when an identifier fails
//! - Collecting and printing run statistics

mod csv_output;
mod diagnostics;
pub mod stats;
mod traits;

pub use csv_output::CsvLinkSink;
pub use diagnostics::FileDiagnostics;
pub use stats::{print_statistics, RunStats};
pub use traits::{
    DiagnosticSink, FailureContext, LinkSink, OutputError, OutputResult, OutputRow,
    BROKEN_HEADERS, LINK_HEADERS,
};
