//! Crawler module for link harvesting and verification
//!
//! This module contains the core crawling logic, including:
//! - Link extraction from article bodies and viewer text layers
//! - Embedded document viewer exploration
//! - HEAD/GET link verification and status interpretation
//! - Per-identifier crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod status;
mod viewer;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, client_builder, verify_link, MAX_REDIRECTS};
pub use parser::{
    extract_anchor_links, extract_text_links, find_text_urls, CandidateLink, LinkOrigin, TextUrl,
};
pub use status::{
    interpret, BrokenReason, ProbeFailure, ProbeOutcome, StatusLabel, ACCESS_REQUIRED_CODES,
};
pub use viewer::{explore_viewer, ViewerReport, ViewerStrategy};

use crate::config::Config;
use crate::input::{read_identifiers, InputSource};
use crate::output::{CsvLinkSink, FileDiagnostics, RunStats};
use crate::render::HttpRenderer;
use crate::LinkCheckError;

/// Runs a complete link audit
///
/// This is the main entry point for a run. It will:
/// 1. Acquire the rendering session and the verification client
/// 2. Read the identifiers of each input in turn
/// 3. Crawl them into that input's ledger
/// 4. Release the sessions and return the merged statistics
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `inputs` - Identifier lists and their ledgers, processed in order
///
/// # Returns
///
/// * `Ok(RunStats)` - Every readable input was processed; unreadable inputs
///   are skipped and counted
/// * `Err(LinkCheckError)` - A session could not be created or a ledger
///   could not be written
pub async fn crawl(config: Config, inputs: &[InputSource]) -> Result<RunStats, LinkCheckError> {
    let renderer = HttpRenderer::from_config(&config)?;
    let client = build_http_client(&config.user_agent)?;
    let diagnostics = FileDiagnostics::new(&config.output.diagnostics_dir)?;

    let mut coordinator = Coordinator::new(config, renderer, client, Box::new(diagnostics));
    let mut totals = RunStats::new();

    for input in inputs {
        let identifiers = match read_identifiers(&input.path) {
            Ok(identifiers) => identifiers,
            Err(e) => {
                tracing::warn!("Skipping unreadable input {}: {}", input.path.display(), e);
                totals.inputs_failed += 1;
                continue;
            }
        };
        if identifiers.is_empty() {
            tracing::warn!("No identifiers in {}, skipping", input.path.display());
            continue;
        }

        tracing::info!(
            "Processing {} ({} identifiers)",
            input.path.display(),
            identifiers.len()
        );

        let mut sink = CsvLinkSink::create(&input.output_path, input.broken_path.as_deref())?;
        let stats = coordinator.run(&identifiers, &mut sink).await?;
        tracing::info!(
            "Saved {} rows to {}",
            sink.rows_written(),
            input.output_path.display()
        );
        totals.merge(&stats);
    }

    totals.finish();
    Ok(totals)
}
