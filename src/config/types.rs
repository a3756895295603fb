use serde::Deserialize;

use crate::fetcher::{DEFAULT_STRONG_MARKERS, DEFAULT_WEAK_SIGNATURES};

/// Main configuration structure
///
/// Every section is optional. Provider sections double as the on/off switch
/// for their enrichment source: a missing section means "unconfigured".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default, rename = "block-detection")]
    pub block_detection: BlockDetectionConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the auditing bot
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the auditing bot
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the bot
    #[serde(default, rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for bot-related contact
    #[serde(default, rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn user_agent_string(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        match (&self.contact_url, &self.contact_email) {
            (Some(url), Some(email)) => format!("{} (+{}; {})", base, url, email),
            (Some(url), None) => format!("{} (+{})", base, url),
            (None, Some(email)) => format!("{} ({})", base, email),
            (None, None) => base,
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SeoAuditBot".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

/// Page fetching behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Timeout for each page request (seconds)
    #[serde(default = "default_request_timeout", rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Timeout for robots.txt and sitemap probes (seconds)
    #[serde(default = "default_probe_timeout", rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,

    /// Maximum redirect hops to follow
    #[serde(default = "default_max_redirects", rename = "max-redirects")]
    pub max_redirects: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Orchestration budgets
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Deadline for all foreground work of one audit (seconds)
    #[serde(default = "default_deadline", rename = "deadline-secs")]
    pub deadline_secs: u64,

    /// Foreground performance-metrics timeout (seconds)
    #[serde(default = "default_performance_timeout", rename = "performance-timeout-secs")]
    pub performance_timeout_secs: u64,

    /// Background performance-metrics retry timeout (seconds)
    #[serde(
        default = "default_background_performance_timeout",
        rename = "background-performance-timeout-secs"
    )]
    pub background_performance_timeout_secs: u64,

    /// Timeout for each backlink source (seconds)
    #[serde(default = "default_backlink_timeout", rename = "backlink-timeout-secs")]
    pub backlink_timeout_secs: u64,

    /// Timeout for each keyword ranking lookup (seconds)
    #[serde(default = "default_ranking_timeout", rename = "ranking-timeout-secs")]
    pub ranking_timeout_secs: u64,

    /// Number of the page's own top keywords to rank during an audit (0 = off)
    #[serde(default, rename = "tracked-keywords")]
    pub tracked_keywords: usize,

    /// Search location passed to the ranking provider
    #[serde(default, rename = "ranking-location")]
    pub ranking_location: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            deadline_secs: default_deadline(),
            performance_timeout_secs: default_performance_timeout(),
            background_performance_timeout_secs: default_background_performance_timeout(),
            backlink_timeout_secs: default_backlink_timeout(),
            ranking_timeout_secs: default_ranking_timeout(),
            tracked_keywords: 0,
            ranking_location: None,
        }
    }
}

/// Content analysis tuning
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentConfig {
    /// Terms added to the built-in stop-word denylist
    #[serde(default, rename = "extra-stopwords")]
    pub extra_stopwords: Vec<String>,
}

/// Bot-protection page signatures
///
/// One strong marker is enough to flag a block page. Weak signatures are
/// grouped; two different groups must match.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockDetectionConfig {
    #[serde(default = "default_strong_markers", rename = "strong-markers")]
    pub strong_markers: Vec<String>,

    #[serde(default = "default_weak_signatures", rename = "weak-signatures")]
    pub weak_signatures: Vec<Vec<String>>,
}

impl Default for BlockDetectionConfig {
    fn default() -> Self {
        Self {
            strong_markers: default_strong_markers(),
            weak_signatures: default_weak_signatures(),
        }
    }
}

/// Third-party enrichment providers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub pagespeed: Option<PageSpeedConfig>,

    #[serde(default)]
    pub moz: Option<MozConfig>,

    #[serde(default)]
    pub ahrefs: Option<AhrefsConfig>,

    #[serde(default, rename = "backlink-scrapers")]
    pub backlink_scrapers: Vec<ScraperSourceConfig>,

    #[serde(default)]
    pub serpapi: Option<SerpProviderConfig>,

    #[serde(default)]
    pub valueserp: Option<SerpProviderConfig>,
}

/// PageSpeed Insights API
#[derive(Debug, Clone, Deserialize)]
pub struct PageSpeedConfig {
    #[serde(default, rename = "api-key")]
    pub api_key: Option<String>,

    #[serde(default = "default_pagespeed_endpoint")]
    pub endpoint: String,

    /// "mobile" or "desktop"
    #[serde(default = "default_pagespeed_strategy")]
    pub strategy: String,
}

/// Moz Links API (primary paid backlink source)
#[derive(Debug, Clone, Deserialize)]
pub struct MozConfig {
    #[serde(rename = "access-id")]
    pub access_id: String,

    #[serde(rename = "secret-key")]
    pub secret_key: String,

    #[serde(default = "default_moz_endpoint")]
    pub endpoint: String,
}

/// Ahrefs API v3 (secondary paid backlink source)
#[derive(Debug, Clone, Deserialize)]
pub struct AhrefsConfig {
    #[serde(rename = "api-token")]
    pub api_token: String,

    #[serde(default = "default_ahrefs_endpoint")]
    pub endpoint: String,
}

/// A free backlink checker page scraped with regular expressions
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSourceConfig {
    pub name: String,

    /// Page URL with a `{domain}` placeholder
    #[serde(rename = "url-template")]
    pub url_template: String,

    /// Regex whose first capture group is the total backlink count
    #[serde(rename = "total-pattern")]
    pub total_pattern: String,

    /// Regex whose first capture group is the referring domain count
    #[serde(rename = "domains-pattern")]
    pub domains_pattern: String,
}

/// SerpApi / ValueSERP search result providers
#[derive(Debug, Clone, Deserialize)]
pub struct SerpProviderConfig {
    #[serde(rename = "api-key")]
    pub api_key: String,

    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database used to persist audits
    #[serde(default, rename = "database-path")]
    pub database_path: Option<String>,
}

fn default_request_timeout() -> u64 {
    20
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_max_redirects() -> usize {
    10
}

fn default_deadline() -> u64 {
    60
}

fn default_performance_timeout() -> u64 {
    30
}

fn default_background_performance_timeout() -> u64 {
    60
}

fn default_backlink_timeout() -> u64 {
    15
}

fn default_ranking_timeout() -> u64 {
    20
}

fn default_strong_markers() -> Vec<String> {
    DEFAULT_STRONG_MARKERS.iter().map(|s| s.to_string()).collect()
}

fn default_weak_signatures() -> Vec<Vec<String>> {
    DEFAULT_WEAK_SIGNATURES
        .iter()
        .map(|group| group.iter().map(|s| s.to_string()).collect())
        .collect()
}

fn default_pagespeed_endpoint() -> String {
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed".to_string()
}

fn default_pagespeed_strategy() -> String {
    "mobile".to_string()
}

fn default_moz_endpoint() -> String {
    "https://lsapi.seomoz.com".to_string()
}

fn default_ahrefs_endpoint() -> String {
    "https://api.ahrefs.com".to_string()
}
