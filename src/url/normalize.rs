use crate::UrlError;
use url::Url;

/// Normalizes user-supplied audit input into a bare domain
///
/// # Normalization Steps
///
/// 1. Trim whitespace and lowercase
/// 2. Strip an `http://` or `https://` scheme; reject any other scheme
/// 3. Drop path, query, fragment and credentials
/// 4. Keep an explicit port (`example.com:8080`)
/// 5. Remove a trailing dot from the host
///
/// The `www.` prefix is kept so the audit fetches exactly the requested host.
/// Use [`site_domain`] when comparing hosts.
///
/// # Examples
///
/// ```
/// use seo_audit::url::normalize_domain;
///
/// assert_eq!(normalize_domain("https://Example.COM/about?x=1").unwrap(), "example.com");
/// assert_eq!(normalize_domain("www.example.com").unwrap(), "www.example.com");
/// assert!(normalize_domain("not a domain").is_err());
/// ```
pub fn normalize_domain(input: &str) -> Result<String, UrlError> {
    let trimmed = input.trim().to_lowercase();

    if trimmed.is_empty() {
        return Err(UrlError::Malformed("domain cannot be empty".to_string()));
    }

    if trimmed.chars().any(char::is_whitespace) {
        return Err(UrlError::Malformed(format!(
            "'{}' contains whitespace",
            input.trim()
        )));
    }

    let url = if trimmed.contains("://") {
        let url = Url::parse(&trimmed).map_err(|e| UrlError::Parse(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }
        url
    } else {
        Url::parse(&format!("http://{}", trimmed)).map_err(|e| UrlError::Parse(e.to_string()))?
    };

    let host = url
        .host_str()
        .ok_or(UrlError::MissingDomain)?
        .trim_end_matches('.')
        .to_string();

    validate_host(&host)?;

    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Reduces a domain to the form used for site comparisons: no `www.`, no port
pub fn site_domain(domain: &str) -> String {
    let host = domain.split(':').next().unwrap_or(domain).to_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

/// Returns the label before the first dot of a domain, ignoring `www.`
///
/// Used as the keyword fallback when a homepage cannot be fetched.
///
/// ```
/// use seo_audit::url::leading_label;
///
/// assert_eq!(leading_label("www.acme-widgets.co.uk"), "acme-widgets");
/// assert_eq!(leading_label("example.com"), "example");
/// ```
pub fn leading_label(domain: &str) -> String {
    let site = site_domain(domain);
    site.split('.').next().unwrap_or(&site).to_string()
}

fn validate_host(host: &str) -> Result<(), UrlError> {
    if host.is_empty() {
        return Err(UrlError::MissingDomain);
    }

    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(UrlError::Malformed(format!(
            "Domain '{}' contains invalid characters",
            host
        )));
    }

    if host.starts_with('.') || host.starts_with('-') || host.ends_with('-') {
        return Err(UrlError::Malformed(format!(
            "Domain '{}' cannot start with '.' or '-' or end with '-'",
            host
        )));
    }

    if host.contains("..") {
        return Err(UrlError::Malformed(format!(
            "Domain '{}' cannot contain consecutive dots",
            host
        )));
    }

    if !host.contains('.') {
        return Err(UrlError::Malformed(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            host
        )));
    }

    Ok(())
}
