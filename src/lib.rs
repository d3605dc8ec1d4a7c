//! KB-Linkcheck: a knowledge-base hyperlink auditor
//!
//! This crate harvests the hyperlinks embedded in knowledge-base articles,
//! follows links into embedded document viewers to recover the links nested
//! inside them, and probes every discovered link over HTTP to classify its
//! reachability.

pub mod config;
pub mod crawler;
pub mod input;
pub mod output;
pub mod render;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for KB-Linkcheck operations
#[derive(Debug, Error)]
pub enum LinkCheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] input::InputError),

    #[error("Rendering error: {0}")]
    Render(#[from] render::RenderError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition for {identifier}: {from:?} -> {to:?}")]
    InvalidTransition {
        identifier: String,
        from: state::CrawlState,
        to: state::CrawlState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),

    #[error("Environment variable {0} is not set")]
    MissingEnv(String),
}

/// Result type alias for KB-Linkcheck operations
pub type Result<T> = std::result::Result<T, LinkCheckError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CandidateLink, LinkOrigin, StatusLabel};
pub use state::{CrawlOutcome, CrawlState};
pub use self::url::{is_attachment, is_auth_redirect, is_excluded};
