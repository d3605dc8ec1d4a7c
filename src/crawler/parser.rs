//! Link extraction from content roots
//!
//! Two complementary strategies:
//! - **Anchors**: every `<a>` under a content root, href and visible text
//! - **Text patterns**: URLs painted as plain text (viewer text layers), found
//!   with a pattern that accepts `http(s)://…` and bare `www.…`
//!
//! Both apply the exclusion policy and tolerate an absent root.

use crate::render::ContentRoot;
use crate::url::{is_attachment, is_excluded};
use regex::Regex;
use std::sync::OnceLock;

/// Where a candidate link was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkOrigin {
    /// In the article body itself
    TopLevel,

    /// Inside a document viewer opened from an attachment link
    NestedAttachment,
}

/// A link discovered in a document, ready for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    /// Identifier of the article the link belongs to
    pub owner: String,

    /// Visible text of the link
    pub text: String,

    /// URL, trimmed
    pub url: String,

    pub origin: LinkOrigin,

    /// True when the URL opens an embedded document viewer
    pub is_attachment: bool,
}

impl CandidateLink {
    pub fn is_nested(&self) -> bool {
        self.origin == LinkOrigin::NestedAttachment
    }
}

/// Extracts anchor links from a content root
///
/// # Arguments
///
/// * `owner` - Identifier of the article being crawled
/// * `root` - The content root; `None` yields no links
/// * `origin` - Origin recorded on every produced link
/// * `marker` - Substring marking viewer attachment URLs
pub fn extract_anchor_links<R: ContentRoot + ?Sized>(
    owner: &str,
    root: Option<&R>,
    origin: LinkOrigin,
    marker: &str,
) -> Vec<CandidateLink> {
    let Some(root) = root else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for anchor in root.anchors() {
        let href = anchor.href.trim();
        if is_excluded(href) {
            tracing::debug!("Skipped: {:?}", href);
            continue;
        }

        links.push(CandidateLink {
            owner: owner.to_string(),
            text: anchor.text.trim().to_string(),
            url: href.to_string(),
            origin,
            is_attachment: is_attachment(href, marker),
        });
    }

    links
}

/// Extracts URLs written as plain text in a sequence of content roots
///
/// The link text of each produced candidate is the URL itself.
pub fn extract_text_links<R: ContentRoot>(
    owner: &str,
    roots: &[R],
    origin: LinkOrigin,
    marker: &str,
) -> Vec<CandidateLink> {
    let mut links = Vec::new();

    for root in roots {
        for found in find_text_urls(&root.text()) {
            let attachment = is_attachment(&found.raw, marker);
            let url = found.into_url();
            if is_excluded(&url) {
                tracing::debug!("Skipped text URL: {:?}", url);
                continue;
            }

            links.push(CandidateLink {
                owner: owner.to_string(),
                text: url.clone(),
                url,
                origin,
                is_attachment: attachment,
            });
        }
    }

    links
}

/// A URL found in rendered text, cleaned of rendering artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUrl {
    /// The match without whitespace artifacts, before any scheme is added
    pub raw: String,
}

impl TextUrl {
    /// Final URL, with `https://` added to bare `www.` matches
    pub fn into_url(self) -> String {
        if self.raw.starts_with("www.") {
            format!("https://{}", self.raw)
        } else {
            self.raw
        }
    }
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"https?://[^\s<>"']+|www\.[^\s<>"']+"#).expect("URL pattern is valid")
    })
}

/// Characters text layers insert inside URLs
const RENDER_ARTIFACTS: [char; 4] = ['\u{202f}', '\u{00a0}', '\u{200b}', ' '];

/// Finds every URL in a piece of rendered text
///
/// # Examples
///
/// ```
/// use kb_linkcheck::crawler::find_text_urls;
///
/// let found: Vec<String> = find_text_urls("See www.example.com/help or https://example.org/a")
///     .into_iter()
///     .map(|u| u.into_url())
///     .collect();
/// assert_eq!(found, vec!["https://www.example.com/help", "https://example.org/a"]);
/// ```
pub fn find_text_urls(text: &str) -> Vec<TextUrl> {
    url_pattern()
        .find_iter(text)
        .map(|m| {
            let raw: String = m
                .as_str()
                .trim()
                .chars()
                .filter(|c| !RENDER_ARTIFACTS.contains(c))
                .collect();
            TextUrl { raw }
        })
        .filter(|found| !found.raw.is_empty())
        .collect()
}
