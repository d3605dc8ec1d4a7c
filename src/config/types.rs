use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for KB-Linkcheck
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Knowledge-base portal configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Article URL template; `{id}` is replaced by the document identifier
    #[serde(rename = "article-url")]
    pub article_url: String,

    /// Selector of the primary article content container
    #[serde(rename = "content-selector")]
    pub content_selector: String,

    /// Substrings of a final URL that indicate a login redirect
    #[serde(rename = "login-patterns")]
    pub login_patterns: Vec<String>,

    /// Environment variable holding a `Cookie` header for the portal session
    #[serde(rename = "cookie-env")]
    pub cookie_env: Option<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            article_url: "https://kb.service-now.com/esc?id=kb_article&sysparm_article={id}"
                .to_string(),
            content_selector: "article.kb-article-content".to_string(),
            login_patterns: vec![
                "login.microsoftonline.com".to_string(),
                "login_with_sso.do".to_string(),
            ],
            cookie_env: None,
        }
    }
}

impl PortalConfig {
    /// Builds the canonical article URL for a document identifier
    pub fn article_url_for(&self, identifier: &str) -> String {
        self.article_url.replace("{id}", identifier)
    }

    /// Reads the session cookie from the configured environment variable
    ///
    /// Returns `Ok(None)` when no variable is configured.
    pub fn session_cookie(&self) -> Result<Option<String>, ConfigError> {
        match &self.cookie_env {
            Some(var) => std::env::var(var)
                .map(Some)
                .map_err(|_| ConfigError::MissingEnv(var.clone())),
            None => Ok(None),
        }
    }
}

/// Embedded document viewer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Substring that marks a link as a viewer attachment
    #[serde(rename = "url-marker")]
    pub url_marker: String,

    /// Fixed nested content container inside the viewer shell
    #[serde(rename = "container-selector")]
    pub container_selector: String,

    /// Element whose presence signals that the viewer renders into frames
    #[serde(rename = "frame-selector")]
    pub frame_selector: String,

    /// Text spans painted by the viewer's text layer
    #[serde(rename = "text-layer-selector")]
    pub text_layer_selector: String,

    /// Content section used by the alternate viewer template
    #[serde(rename = "section-selector")]
    pub section_selector: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            url_marker: "$viewer.do".to_string(),
            container_selector: "body > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(8) > div > div:nth-of-type(1) > div:nth-of-type(2)".to_string(),
            frame_selector: "iframe".to_string(),
            text_layer_selector: "#viewer .textLayer span".to_string(),
            section_selector: "div.panel-body.m-b-lg.wrapper-lg".to_string(),
        }
    }
}

/// Timeouts, in seconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Page navigation timeout
    pub navigation: u64,

    /// Wait for the article content container
    #[serde(rename = "content-wait")]
    pub content_wait: u64,

    /// Wait for the viewer's nested content container
    #[serde(rename = "viewer-wait")]
    pub viewer_wait: u64,

    /// Wait for viewer frames to attach
    #[serde(rename = "frame-wait")]
    pub frame_wait: u64,

    /// HTTP probe timeout (applies to HEAD and to the GET fallback)
    pub probe: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            navigation: 60,
            content_wait: 50,
            viewer_wait: 30,
            frame_wait: 10,
            probe: 10,
        }
    }
}

impl TimeoutConfig {
    pub fn navigation(&self) -> Duration {
        Duration::from_secs(self.navigation)
    }

    pub fn content_wait(&self) -> Duration {
        Duration::from_secs(self.content_wait)
    }

    pub fn viewer_wait(&self) -> Duration {
        Duration::from_secs(self.viewer_wait)
    }

    pub fn frame_wait(&self) -> Duration {
        Duration::from_secs(self.frame_wait)
    }

    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the link ledger CSV file
    #[serde(rename = "links-path")]
    pub links_path: String,

    /// Optional ledger that receives only broken links
    #[serde(rename = "broken-links-path", default)]
    pub broken_links_path: Option<String>,

    /// Directory receiving page captures on failure
    #[serde(rename = "diagnostics-dir", default = "default_diagnostics_dir")]
    pub diagnostics_dir: String,
}

fn default_diagnostics_dir() -> String {
    "screenshots".to_string()
}
