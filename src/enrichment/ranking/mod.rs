//! Keyword ranking lookups
//!
//! A single SERP provider is chosen when the tracker is built: SerpApi when
//! configured, otherwise ValueSERP. There is no fallback between them at
//! runtime.

mod serpapi;
mod valueserp;

pub use serpapi::SerpApiProvider;
pub use valueserp::ValueSerpProvider;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::enrichment::{ProviderError, ProviderResult};
use crate::model::KeywordRanking;
use crate::url::matches_site;

/// Number of organic results scanned for the target domain
pub const SCAN_DEPTH: usize = 100;

/// Errors from a ranking lookup
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("No keyword ranking provider is configured")]
    Unconfigured,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// One organic search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganicResult {
    /// 1-based position reported by the provider
    pub position: Option<u32>,
    pub link: String,
    pub title: Option<String>,
}

/// A search engine results provider
#[async_trait]
pub trait RankProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Returns organic results for a query, best first
    async fn search(&self, keyword: &str, location: Option<&str>)
        -> ProviderResult<Vec<OrganicResult>>;
}

/// Looks up where a domain ranks for keywords
#[derive(Clone)]
pub struct KeywordTracker {
    provider: Option<Arc<dyn RankProvider>>,
    timeout: Duration,
}

impl KeywordTracker {
    pub fn new(provider: Option<Arc<dyn RankProvider>>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Picks SerpApi when configured, else ValueSERP, else nothing
    pub fn from_config(client: Client, config: &Config) -> Self {
        let providers = &config.providers;
        let provider: Option<Arc<dyn RankProvider>> = if let Some(serpapi) = &providers.serpapi {
            Some(Arc::new(SerpApiProvider::new(client, serpapi.clone())))
        } else {
            providers
                .valueserp
                .as_ref()
                .map(|valueserp| {
                    Arc::new(ValueSerpProvider::new(client, valueserp.clone())) as Arc<dyn RankProvider>
                })
        };

        Self::new(
            provider,
            Duration::from_secs(config.audit.ranking_timeout_secs),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Name of the selected provider, if any
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Finds the position of `domain` for `keyword`
    ///
    /// # Returns
    ///
    /// * `Ok(KeywordRanking)` - `rank` is `None` when the domain is not in the
    ///   first [`SCAN_DEPTH`] organic results
    /// * `Err(RankingError::Unconfigured)` - No provider is configured
    /// * `Err(RankingError::Provider)` - The provider failed or timed out
    pub async fn get_ranking(
        &self,
        keyword: &str,
        domain: &str,
        location: Option<&str>,
    ) -> Result<KeywordRanking, RankingError> {
        let provider = self.provider.as_ref().ok_or(RankingError::Unconfigured)?;

        let results = tokio::time::timeout(self.timeout, provider.search(keyword, location))
            .await
            .map_err(|_| ProviderError::Timeout {
                provider: provider.name().to_string(),
                secs: self.timeout.as_secs(),
            })??;

        let found = find_position(&results, domain);
        tracing::debug!(
            "Rank of {} for '{}' via {}: {:?}",
            domain,
            keyword,
            provider.name(),
            found.as_ref().map(|(rank, _)| *rank)
        );

        Ok(match found {
            Some((rank, result)) => KeywordRanking {
                keyword: keyword.to_string(),
                rank: Some(rank),
                url: Some(result.link.clone()),
                title: result.title.clone(),
                date: Utc::now(),
            },
            None => KeywordRanking {
                keyword: keyword.to_string(),
                rank: None,
                url: None,
                title: None,
                date: Utc::now(),
            },
        })
    }
}

/// Finds the first result whose host belongs to `domain`
///
/// Only the first [`SCAN_DEPTH`] results are considered. The provider's own
/// position is used when present, else the 1-based index.
pub fn find_position<'a>(
    results: &'a [OrganicResult],
    domain: &str,
) -> Option<(u32, &'a OrganicResult)> {
    results
        .iter()
        .take(SCAN_DEPTH)
        .enumerate()
        .find(|(_, result)| {
            Url::parse(&result.link)
                .ok()
                .and_then(|url| url.host_str().map(|host| matches_site(domain, host)))
                .unwrap_or(false)
        })
        .map(|(index, result)| (result.position.unwrap_or(index as u32 + 1), result))
}

/// Reads `organic_results[{position, link, title}]`, the shape SerpApi and
/// ValueSERP share
pub(crate) fn parse_organic_results(provider: &str, body: &Value) -> ProviderResult<Vec<OrganicResult>> {
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return Err(ProviderError::parse(provider, error));
    }

    let Some(results) = body.get("organic_results") else {
        // Providers omit the array when a query has no organic results
        return Ok(Vec::new());
    };
    let results = results
        .as_array()
        .ok_or_else(|| ProviderError::parse(provider, "organic_results is not an array"))?;

    Ok(results
        .iter()
        .filter_map(|entry| {
            Some(OrganicResult {
                position: entry
                    .get("position")
                    .and_then(Value::as_u64)
                    .and_then(|p| u32::try_from(p).ok()),
                link: entry.get("link")?.as_str()?.to_string(),
                title: entry.get("title").and_then(Value::as_str).map(str::to_string),
            })
        })
        .collect())
}
