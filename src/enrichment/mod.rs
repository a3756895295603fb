//! External enrichment providers
//!
//! Everything in this module talks to unreliable third parties. Calls are
//! best-effort: callers wrap them in timeouts and treat every error as
//! "field stays absent". Nothing here can fail an audit.
//!
//! - [`performance`] - PageSpeed Insights timing metrics
//! - [`backlinks`] - ordered fallback chain of backlink sources
//! - [`ranking`] - keyword position lookups through a SERP API
//! - [`competitor`] - keyword extraction from a competitor's homepage

pub mod backlinks;
pub mod competitor;
pub mod performance;
pub mod ranking;

pub use backlinks::{AhrefsSource, BacklinkChain, BacklinkSource, MozSource, ScraperSource};
pub use competitor::KeywordExtractor;
pub use performance::{PageSpeedClient, PerformanceSource};
pub use ranking::{KeywordTracker, OrganicResult, RankProvider, RankingError};

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

/// Errors raised by a single enrichment provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Http { provider: String, message: String },

    #[error("{provider} returned HTTP {status}")]
    Status { provider: String, status: u16 },

    #[error("{provider} response could not be parsed: {message}")]
    Parse { provider: String, message: String },

    #[error("{provider} timed out after {secs}s")]
    Timeout { provider: String, secs: u64 },

    #[error("{provider} has no data")]
    NoData { provider: String },
}

impl ProviderError {
    pub(crate) fn parse(provider: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn no_data(provider: &str) -> Self {
        Self::NoData {
            provider: provider.to_string(),
        }
    }
}

/// Result type for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Builds the HTTP client shared by the enrichment providers
///
/// Providers are slower than a homepage fetch, so the client timeout is the
/// largest enrichment budget. Individual calls are still bounded by their
/// own `tokio::time::timeout`.
pub fn build_provider_client(config: &Config) -> Result<Client, reqwest::Error> {
    let audit = &config.audit;
    let longest = audit
        .background_performance_timeout_secs
        .max(audit.performance_timeout_secs)
        .max(audit.backlink_timeout_secs)
        .max(audit.ranking_timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.user_agent_string())
        .timeout(Duration::from_secs(longest))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a request and decodes a JSON body, mapping failures per provider
pub(crate) async fn send_json(provider: &str, request: RequestBuilder) -> ProviderResult<Value> {
    let response = request.send().await.map_err(|e| ProviderError::Http {
        provider: provider.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status {
            provider: provider.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| ProviderError::parse(provider, e.to_string()))
}

/// Reads a non-negative integer that providers sometimes send as a float
pub(crate) fn json_count(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_count() {
        assert_eq!(json_count(&json!(42)), Some(42));
        assert_eq!(json_count(&json!(42.6)), Some(43));
        assert_eq!(json_count(&json!(-1)), None);
        assert_eq!(json_count(&json!("42")), None);
        assert_eq!(json_count(&Value::Null), None);
    }

    #[test]
    fn test_provider_client_builds() {
        assert!(build_provider_client(&Config::default()).is_ok());
    }

    #[test]
    fn test_error_messages_name_the_provider() {
        let err = ProviderError::Timeout {
            provider: "moz".to_string(),
            secs: 15,
        };
        assert_eq!(err.to_string(), "moz timed out after 15s");
        assert_eq!(ProviderError::no_data("ahrefs").to_string(), "ahrefs has no data");
    }
}
