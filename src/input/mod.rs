//! Identifier input
//!
//! Identifiers come from CSV exports of the knowledge-base listing. The
//! column headed `Number` is used when present, otherwise the first column.
//! A directory input expands to every `*.csv` file in it, each with its own
//! ledger.

use crate::config::OutputConfig;
use csv::ReaderBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Header of the identifier column
pub const IDENTIFIER_COLUMN: &str = "Number";

/// Errors raised while reading identifiers
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse CSV {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("No CSV inputs found in {0}")]
    Empty(String),
}

/// One identifier list and the ledgers it produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    pub path: PathBuf,
    pub output_path: PathBuf,
    pub broken_path: Option<PathBuf>,
}

/// Reads the identifiers of a CSV file, trimmed, in file order
///
/// Blank cells are skipped. Duplicates are kept: each occurrence is crawled.
pub fn read_identifiers(path: &Path) -> Result<Vec<String>, InputError> {
    let csv_error = |source| InputError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let column = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(IDENTIFIER_COLUMN))
        .unwrap_or_else(|| {
            tracing::warn!(
                "{}: no '{}' column, using the first column",
                path.display(),
                IDENTIFIER_COLUMN
            );
            0
        });

    let mut identifiers = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if let Some(cell) = record.get(column) {
            let cell = cell.trim();
            if !cell.is_empty() {
                identifiers.push(cell.to_string());
            }
        }
    }

    Ok(identifiers)
}

/// Expands an input path into the identifier lists to process
///
/// # Arguments
///
/// * `input` - A CSV file, or a directory of CSV files
/// * `output` - The configured ledger paths
///
/// A file input writes to the configured paths. Each file in a directory
/// input writes to `<file stem>_All_Links.csv` next to the configured ledger
/// (and `<file stem>_Broken_Links.csv` next to the broken ledger, when one is
/// configured), spaces in the stem replaced by `_`.
pub fn discover_inputs(input: &Path, output: &OutputConfig) -> Result<Vec<InputSource>, InputError> {
    let links_path = Path::new(&output.links_path);
    let broken_path = output.broken_links_path.as_deref().map(Path::new);

    if !input.is_dir() {
        return Ok(vec![InputSource {
            path: input.to_path_buf(),
            output_path: links_path.to_path_buf(),
            broken_path: broken_path.map(Path::to_path_buf),
        }]);
    }

    let io_error = |source| InputError::Io {
        path: input.display().to_string(),
        source,
    };

    let mut files: Vec<PathBuf> = fs::read_dir(input)
        .map_err(io_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(InputError::Empty(input.display().to_string()));
    }

    Ok(files
        .into_iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().replace(' ', "_"))
                .unwrap_or_default();
            InputSource {
                output_path: sibling(links_path, &format!("{}_All_Links.csv", stem)),
                broken_path: broken_path
                    .map(|p| sibling(p, &format!("{}_Broken_Links.csv", stem))),
                path,
            }
        })
        .collect())
}

fn sibling(path: &Path, file_name: &str) -> PathBuf {
    path.parent().unwrap_or_else(|| Path::new("")).join(file_name)
}
