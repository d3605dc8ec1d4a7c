//! Configuration module for KB-Linkcheck
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use kb_linkcheck::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkcheck.toml")).unwrap();
//! println!("Articles load from: {}", config.portal.article_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, PortalConfig, TimeoutConfig, UserAgentConfig, ViewerConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
