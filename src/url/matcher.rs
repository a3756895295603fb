use crate::url::normalize::site_domain;

/// Checks if a host belongs to a target site
///
/// The host matches when, after dropping `www.` and ports on both sides, it
/// equals the target domain or is one of its subdomains.
///
/// # Examples
///
/// ```
/// use seo_audit::url::matches_site;
///
/// assert!(matches_site("example.com", "example.com"));
/// assert!(matches_site("example.com", "www.example.com"));
/// assert!(matches_site("example.com", "shop.example.com"));
/// assert!(!matches_site("example.com", "notexample.com"));
/// assert!(!matches_site("example.com", "example.com.evil.net"));
/// ```
pub fn matches_site(target: &str, candidate: &str) -> bool {
    let base = site_domain(target);
    let candidate = site_domain(candidate);

    if base.is_empty() {
        return false;
    }

    candidate == base || candidate.ends_with(&format!(".{}", base))
}
