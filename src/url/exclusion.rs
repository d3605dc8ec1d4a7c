/// Keywords that disqualify a URL wherever they appear in it
///
/// Matching is a case-insensitive substring test, so `.js` also rejects
/// `https://example.com/.jsonfeed` and `/docs.json`.
pub const EXCLUDED_KEYWORDS: [&str; 8] = [
    ".png",
    ".jpg",
    ".jpeg",
    ".svg",
    ".gif",
    "javascript:",
    ".css",
    ".js",
];

/// Decides whether a candidate URL is ineligible for extraction and verification
///
/// Rejects:
/// - empty strings (after trimming)
/// - `mailto:` targets
/// - fragment-only targets (`#section`)
/// - anything containing one of [`EXCLUDED_KEYWORDS`], case-insensitively
///
/// # Examples
///
/// ```
/// use kb_linkcheck::url::is_excluded;
///
/// assert!(is_excluded(""));
/// assert!(is_excluded("mailto:help@example.com"));
/// assert!(is_excluded("#top"));
/// assert!(is_excluded("https://cdn.example.com/logo.PNG"));
/// assert!(!is_excluded("https://example.com/doc.pdf"));
/// ```
pub fn is_excluded(url: &str) -> bool {
    let url = url.trim();

    if url.is_empty() || url.starts_with("mailto:") || url.starts_with('#') {
        return true;
    }

    let lowered = url.to_lowercase();
    EXCLUDED_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}
