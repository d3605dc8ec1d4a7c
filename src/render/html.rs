//! Owned HTML content roots
//!
//! `scraper::Html` cannot cross an `.await`, so sessions hand out the source
//! of the matched element and it is re-parsed on demand.

use scraper::{Html, Selector};

/// An anchor-like element read from a content root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    /// Raw `href` attribute, empty when absent
    pub href: String,

    /// Visible text, whitespace-collapsed, empty when absent
    pub text: String,
}

/// Uniform interface over anything links can be extracted from
pub trait ContentRoot {
    /// Every `<a>` element under the root, in document order
    fn anchors(&self) -> Vec<Anchor>;

    /// Visible text of the root
    fn text(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FragmentKind {
    Document,
    Element,
}

/// Source of a document or of a single element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlFragment {
    html: String,
    kind: FragmentKind,
}

impl HtmlFragment {
    /// Wraps a complete HTML document (a page or a frame)
    pub fn document(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            kind: FragmentKind::Document,
        }
    }

    /// Wraps the outer HTML of a single element
    pub fn element(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            kind: FragmentKind::Element,
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    fn parse(&self) -> Html {
        match self.kind {
            FragmentKind::Document => Html::parse_document(&self.html),
            FragmentKind::Element => Html::parse_fragment(&self.html),
        }
    }
}

impl ContentRoot for HtmlFragment {
    fn anchors(&self) -> Vec<Anchor> {
        let parsed = self.parse();
        let selector = match Selector::parse("a") {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };

        parsed
            .select(&selector)
            .map(|element| Anchor {
                href: element.value().attr("href").unwrap_or_default().to_string(),
                text: collapse_whitespace(element.text()),
            })
            .collect()
    }

    fn text(&self) -> String {
        collapse_whitespace(self.parse().root_element().text())
    }
}

/// Joins text nodes and collapses runs of ASCII whitespace, the way rendered
/// text reads
fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    // No separator between nodes: inline markup can split a word or URL
    let joined: String = parts.collect();
    joined
        .split(|c: char| c.is_ascii_whitespace())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
