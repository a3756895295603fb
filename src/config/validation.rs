use crate::config::types::{
    AuditConfig, BlockDetectionConfig, Config, FetcherConfig, ProvidersConfig,
    ScraperSourceConfig, UserAgentConfig,
};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_audit_config(&config.audit)?;
    validate_block_detection(&config.block_detection)?;
    validate_providers(&config.providers)?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    if let Some(email) = &config.contact_email {
        validate_email(email)?;
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.probe_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "probe_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be at most 20, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

fn validate_audit_config(config: &AuditConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("deadline_secs", config.deadline_secs),
        ("performance_timeout_secs", config.performance_timeout_secs),
        (
            "background_performance_timeout_secs",
            config.background_performance_timeout_secs,
        ),
        ("backlink_timeout_secs", config.backlink_timeout_secs),
        ("ranking_timeout_secs", config.ranking_timeout_secs),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!("{} must be >= 1", name)));
        }
    }

    if config.tracked_keywords > 20 {
        return Err(ConfigError::Validation(format!(
            "tracked_keywords must be at most 20, got {}",
            config.tracked_keywords
        )));
    }

    Ok(())
}

fn validate_block_detection(config: &BlockDetectionConfig) -> Result<(), ConfigError> {
    if config.strong_markers.iter().any(|m| m.trim().is_empty()) {
        return Err(ConfigError::InvalidPattern(
            "strong markers cannot be empty".to_string(),
        ));
    }

    for group in &config.weak_signatures {
        if group.is_empty() || group.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::InvalidPattern(
                "weak signature groups need at least one non-empty phrase".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_providers(config: &ProvidersConfig) -> Result<(), ConfigError> {
    if let Some(pagespeed) = &config.pagespeed {
        validate_endpoint("pagespeed", &pagespeed.endpoint)?;
        if pagespeed.strategy != "mobile" && pagespeed.strategy != "desktop" {
            return Err(ConfigError::Validation(format!(
                "pagespeed strategy must be 'mobile' or 'desktop', got '{}'",
                pagespeed.strategy
            )));
        }
    }

    if let Some(moz) = &config.moz {
        require_secret("moz access-id", &moz.access_id)?;
        require_secret("moz secret-key", &moz.secret_key)?;
        validate_endpoint("moz", &moz.endpoint)?;
    }

    if let Some(ahrefs) = &config.ahrefs {
        require_secret("ahrefs api-token", &ahrefs.api_token)?;
        validate_endpoint("ahrefs", &ahrefs.endpoint)?;
    }

    for scraper in &config.backlink_scrapers {
        validate_scraper(scraper)?;
    }

    for (name, serp) in [("serpapi", &config.serpapi), ("valueserp", &config.valueserp)] {
        if let Some(serp) = serp {
            require_secret(&format!("{} api-key", name), &serp.api_key)?;
            if let Some(endpoint) = &serp.endpoint {
                validate_endpoint(name, endpoint)?;
            }
        }
    }

    Ok(())
}

fn validate_scraper(config: &ScraperSourceConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "backlink scraper name cannot be empty".to_string(),
        ));
    }

    if !config.url_template.contains("{domain}") {
        return Err(ConfigError::InvalidUrl(format!(
            "backlink scraper '{}' url-template must contain {{domain}}",
            config.name
        )));
    }
    validate_endpoint(&config.name, &config.url_template.replace("{domain}", "example.com"))?;

    for pattern in [&config.total_pattern, &config.domains_pattern] {
        let regex = Regex::new(pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!(
                "backlink scraper '{}' pattern '{}': {}",
                config.name, pattern, e
            ))
        })?;
        if regex.captures_len() < 2 {
            return Err(ConfigError::InvalidPattern(format!(
                "backlink scraper '{}' pattern '{}' needs a capture group",
                config.name, pattern
            )));
        }
    }

    Ok(())
}

fn validate_endpoint(name: &str, endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("{} endpoint '{}': {}", name, endpoint, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} endpoint '{}' must use http or https",
            name, endpoint
        )));
    }

    Ok(())
}

fn require_secret(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
