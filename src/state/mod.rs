//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the per-identifier crawl state machine
//! - `CrawlOutcome`: how the attempt to reach a document ended
//! - `IdentifierCrawl`: one identifier walking through the machine

mod crawl_state;

pub use crawl_state::{CrawlOutcome, CrawlState, IdentifierCrawl};
