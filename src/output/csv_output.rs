//! CSV link ledger
//!
//! The header is written when the ledger is created; every row is flushed as
//! soon as it is appended so an interrupted run keeps what it verified.

use crate::output::traits::{LinkSink, OutputResult, OutputRow, BROKEN_HEADERS, LINK_HEADERS};
use csv::Writer;
use std::fs::{self, File};
use std::path::Path;

/// Append-only CSV ledger of verified links
pub struct CsvLinkSink {
    links: Writer<File>,
    broken: Option<Writer<File>>,
    rows_written: u64,
}

impl CsvLinkSink {
    /// Creates the ledger at `path`, truncating any previous file
    ///
    /// # Arguments
    ///
    /// * `path` - Main ledger receiving every row
    /// * `broken_path` - Optional second ledger receiving only broken rows
    pub fn create(path: &Path, broken_path: Option<&Path>) -> OutputResult<Self> {
        let links = open_ledger(path, &LINK_HEADERS)?;
        let broken = broken_path
            .map(|p| open_ledger(p, &BROKEN_HEADERS))
            .transpose()?;

        tracing::info!("Writing link ledger to {}", path.display());

        Ok(Self {
            links,
            broken,
            rows_written: 0,
        })
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl LinkSink for CsvLinkSink {
    fn append(&mut self, row: &OutputRow) -> OutputResult<()> {
        self.links.write_record(row.to_record())?;
        self.links.flush()?;

        if let Some(broken) = self.broken.as_mut() {
            if !row.status.is_reachable() {
                broken.write_record(row.to_broken_record())?;
                broken.flush()?;
            }
        }

        self.rows_written += 1;
        Ok(())
    }
}

/// Creates parent directories, the file, and writes the header once
fn open_ledger(path: &Path, headers: &[&str]) -> OutputResult<Writer<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = Writer::from_path(path)?;
    writer.write_record(headers)?;
    writer.flush()?;
    Ok(writer)
}
