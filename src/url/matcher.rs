/// Checks whether a link opens an embedded document viewer
///
/// Evaluated on the link exactly as extracted, before any scheme is added.
///
/// # Examples
///
/// ```
/// use kb_linkcheck::url::is_attachment;
///
/// assert!(is_attachment("https://esm.example.com/$viewer.do?sys_id=42", "$viewer.do"));
/// assert!(!is_attachment("https://example.com/doc.pdf", "$viewer.do"));
/// ```
pub fn is_attachment(url: &str, marker: &str) -> bool {
    !marker.is_empty() && url.contains(marker)
}

/// Checks whether a navigation landed on an identity-provider login page
///
/// # Arguments
///
/// * `final_url` - The URL the rendering session ended up on
/// * `patterns` - Substrings identifying login pages
pub fn is_auth_redirect<S: AsRef<str>>(final_url: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|pattern| {
        let pattern = pattern.as_ref();
        !pattern.is_empty() && final_url.contains(pattern)
    })
}
