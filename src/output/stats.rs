//! Run statistics
//!
//! Counters collected while the crawl runs and printed when it ends.

use crate::crawler::StatusLabel;
use chrono::{DateTime, Utc};

/// Counters for one crawl run
#[derive(Debug, Clone)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Input files that could not be read
    pub inputs_failed: u64,

    // Identifier outcomes
    pub identifiers: u64,
    pub loaded: u64,
    pub auth_redirected: u64,
    pub navigation_failed: u64,
    pub extraction_failed: u64,

    // Viewer exploration
    pub viewers_explored: u64,
    pub viewers_failed: u64,
    pub strategy_failures: u64,

    // Links
    pub rows_written: u64,
    pub links_ok: u64,
    pub links_redirected: u64,
    pub links_access_required: u64,
    pub links_broken: u64,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            inputs_failed: 0,
            identifiers: 0,
            loaded: 0,
            auth_redirected: 0,
            navigation_failed: 0,
            extraction_failed: 0,
            viewers_explored: 0,
            viewers_failed: 0,
            strategy_failures: 0,
            rows_written: 0,
            links_ok: 0,
            links_redirected: 0,
            links_access_required: 0,
            links_broken: 0,
        }
    }

    /// Counts an emitted row by its label
    pub fn record_label(&mut self, label: &StatusLabel) {
        self.rows_written += 1;
        match label {
            StatusLabel::Ok => self.links_ok += 1,
            StatusLabel::Redirected => self.links_redirected += 1,
            StatusLabel::AccessRequired => self.links_access_required += 1,
            StatusLabel::Broken(_) => self.links_broken += 1,
        }
    }

    /// Adds the counters of another run segment (one input file) to this one
    pub fn merge(&mut self, other: &RunStats) {
        self.started_at = self.started_at.min(other.started_at);
        self.finished_at = match (self.finished_at, other.finished_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.inputs_failed += other.inputs_failed;
        self.identifiers += other.identifiers;
        self.loaded += other.loaded;
        self.auth_redirected += other.auth_redirected;
        self.navigation_failed += other.navigation_failed;
        self.extraction_failed += other.extraction_failed;
        self.viewers_explored += other.viewers_explored;
        self.viewers_failed += other.viewers_failed;
        self.strategy_failures += other.strategy_failures;
        self.rows_written += other.rows_written;
        self.links_ok += other.links_ok;
        self.links_redirected += other.links_redirected;
        self.links_access_required += other.links_access_required;
        self.links_broken += other.links_broken;
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Percentage of emitted rows whose link was reachable
    pub fn reachable_rate(&self) -> f64 {
        if self.rows_written == 0 {
            return 0.0;
        }
        ((self.rows_written - self.links_broken) as f64 / self.rows_written as f64) * 100.0
    }
}

/// Prints run statistics to stdout
pub fn print_statistics(stats: &RunStats) {
    println!("=== KB-Linkcheck Run Summary ===\n");

    println!("Started:  {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration_seconds() {
        println!("Duration: {}s", duration);
    }

    if stats.inputs_failed > 0 {
        println!("\nUnreadable inputs: {}", stats.inputs_failed);
    }

    println!("\nArticles:");
    println!("  Processed:          {}", stats.identifiers);
    println!("  Loaded:             {}", stats.loaded);
    println!("  Login redirects:    {}", stats.auth_redirected);
    println!("  Navigation errors:  {}", stats.navigation_failed);
    println!("  Extraction errors:  {}", stats.extraction_failed);

    println!("\nViewers:");
    println!("  Explored:           {}", stats.viewers_explored);
    println!("  Failed to open:     {}", stats.viewers_failed);
    println!("  Strategy failures:  {}", stats.strategy_failures);

    println!("\nLinks:");
    println!("  Rows written:       {}", stats.rows_written);
    println!("  OK:                 {}", stats.links_ok);
    println!("  OK - Redirected:    {}", stats.links_redirected);
    println!("  OK - Access Req.:   {}", stats.links_access_required);
    println!("  Broken:             {}", stats.links_broken);
    println!("  Reachable:          {:.2}%", stats.reachable_rate());
}
