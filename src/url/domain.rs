use url::Url;

use crate::url::matcher::matches_site;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use seo_audit::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `link` points at the same site as `base`
///
/// `www.` differences are ignored, and subdomains of the base site count as
/// internal.
pub fn is_internal(base: &Url, link: &Url) -> bool {
    match (extract_domain(base), extract_domain(link)) {
        (Some(base_host), Some(link_host)) => matches_site(&base_host, &link_host),
        _ => false,
    }
}

/// Origin of a URL with a trailing slash, e.g. `https://example.com:8443/`
pub fn origin_url(url: &Url) -> Option<Url> {
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin.set_username("").ok()?;
    origin.set_password(None).ok()?;
    origin.host_str()?;
    Some(origin)
}
