//! seo-audit: on-page, technical and content SEO auditing
//!
//! This crate fetches a site's homepage, extracts structural signals, scores
//! them under a fixed weighting model and enriches the result with best-effort
//! third-party data (performance metrics, backlinks, keyword rankings).

pub mod analysis;
pub mod audit;
pub mod config;
pub mod document;
pub mod enrichment;
pub mod fetcher;
pub mod issues;
pub mod model;
pub mod report;
pub mod robots;
pub mod scoring;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for audit operations
///
/// `Fetch`, `AuthRequired`, `Blocked` and `InsufficientContent` are the
/// terminal audit failures. Enrichment providers never surface here.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("{url} requires authentication (HTTP {status}); only publicly accessible pages can be audited")]
    AuthRequired { url: String, status: u16 },

    #[error("{url} returned a bot-protection page ({}); the site must allow public, non-JavaScript access to be audited", signals.join(", "))]
    Blocked { url: String, signals: Vec<String> },

    #[error("{url} has too little content to audit: no title, no meta description and under 50 characters of text")]
    InsufficientContent { url: String },

    #[error("Invalid domain: {0}")]
    InvalidDomain(#[from] UrlError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl AuditError {
    /// Returns true for the failures that end an audit run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. }
                | Self::AuthRequired { .. }
                | Self::Blocked { .. }
                | Self::InsufficientContent { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern in config: {0}")]
    InvalidPattern(String),
}

/// URL and domain errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed domain: {0}")]
    Malformed(String),
}

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use audit::{AuditPipeline, AuditRun};
pub use config::Config;
pub use model::{AuditResult, BacklinkData, Issue, KeywordRanking, PerformanceMetrics, Severity};
pub use state::AuditState;
pub use url::{leading_label, normalize_domain};
