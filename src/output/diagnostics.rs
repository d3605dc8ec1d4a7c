//! File-based failure captures
//!
//! Each capture is the page source the rendering session held when the
//! failure happened, written to `<dir>/<identifier>_<context>.html`.

use crate::output::traits::{DiagnosticSink, FailureContext, OutputResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes failure captures into a directory
#[derive(Debug, Clone)]
pub struct FileDiagnostics {
    dir: PathBuf,
}

impl FileDiagnostics {
    /// Creates the sink, creating `dir` if needed
    pub fn new(dir: impl Into<PathBuf>) -> OutputResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the capture for an identifier and failure context
    pub fn capture_path(&self, identifier: &str, context: FailureContext) -> PathBuf {
        let safe: String = identifier
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}_{}.html", safe, context.suffix()))
    }
}

impl DiagnosticSink for FileDiagnostics {
    fn capture(
        &self,
        identifier: &str,
        context: FailureContext,
        snapshot: Option<&str>,
    ) -> OutputResult<()> {
        let path = self.capture_path(identifier, context);
        let body = snapshot.unwrap_or("<!-- no document was loaded -->");
        fs::write(&path, body)?;
        tracing::debug!("Captured {} for {} at {}", context.suffix(), identifier, path.display());
        Ok(())
    }
}
