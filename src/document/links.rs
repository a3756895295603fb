use url::Url;

/// A hyperlink found in a document, resolved against the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub url: Url,
    pub nofollow: bool,
    pub text: String,
}

/// An `<img>` element's relevant attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub src: Option<String>,
    pub alt: Option<String>,
}

impl ImageRef {
    /// Alt text is present and not blank
    pub fn has_alt(&self) -> bool {
        self.alt.as_deref().map(|a| !a.trim().is_empty()).unwrap_or(false)
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url)
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" =>
        {
            Some(absolute_url)
        }
        _ => None,
    }
}

/// Returns true if a `rel` attribute value contains `nofollow`
pub fn rel_is_nofollow(rel: Option<&str>) -> bool {
    rel.map(|r| {
        r.split_whitespace()
            .any(|token| token.eq_ignore_ascii_case("nofollow"))
    })
    .unwrap_or(false)
}
