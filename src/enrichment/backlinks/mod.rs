//! Backlink source chain
//!
//! Sources are tried strictly in order, one at a time. A source that errors,
//! times out or reports no data hands over to the next one; the first source
//! with a nonzero count wins. When every source is exhausted the chain
//! returns the no-data sentinel, which is distinct from a verified zero.

mod ahrefs;
mod moz;
mod scrape;

pub use ahrefs::AhrefsSource;
pub use moz::MozSource;
pub use scrape::ScraperSource;

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::enrichment::ProviderResult;
use crate::model::BacklinkData;
use crate::ConfigError;

/// Number of anchor texts requested from sources that report them
pub const ANCHOR_LIMIT: usize = 10;

/// One backlink data provider
#[async_trait]
pub trait BacklinkSource: Send + Sync {
    /// Short identifier used in logs and in `BacklinkData::source`
    fn name(&self) -> &str;

    /// Looks up backlink counts for a normalized domain
    async fn fetch(&self, domain: &str) -> ProviderResult<BacklinkData>;
}

/// Ordered list of backlink sources with a per-source timeout
#[derive(Clone)]
pub struct BacklinkChain {
    sources: Vec<Arc<dyn BacklinkSource>>,
    timeout: Duration,
}

impl BacklinkChain {
    /// Creates an empty chain
    pub fn new(timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            timeout,
        }
    }

    /// Builds the chain from provider config: Moz, Ahrefs, then the scrapers
    /// in file order
    ///
    /// # Errors
    ///
    /// Returns an error if a scraper pattern does not compile
    pub fn from_config(client: Client, config: &Config) -> Result<Self, ConfigError> {
        let providers = &config.providers;
        let mut chain = Self::new(Duration::from_secs(config.audit.backlink_timeout_secs));

        if let Some(moz) = &providers.moz {
            chain.push(Arc::new(MozSource::new(client.clone(), moz.clone())));
        }
        if let Some(ahrefs) = &providers.ahrefs {
            chain.push(Arc::new(AhrefsSource::new(client.clone(), ahrefs.clone())));
        }
        for scraper in &providers.backlink_scrapers {
            chain.push(Arc::new(ScraperSource::from_config(client.clone(), scraper)?));
        }

        tracing::debug!(
            "Backlink chain: [{}]",
            chain
                .sources
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(chain)
    }

    /// Appends a source at the lowest priority
    pub fn push(&mut self, source: Arc<dyn BacklinkSource>) {
        self.sources.push(source);
    }

    /// Builder form of [`push`](Self::push)
    pub fn with_source(mut self, source: Arc<dyn BacklinkSource>) -> Self {
        self.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Walks the chain and returns the first nonzero result
    ///
    /// Never fails: an exhausted chain yields [`BacklinkData::no_data`].
    pub async fn get_backlinks(&self, domain: &str) -> BacklinkData {
        for source in &self.sources {
            let name = source.name();

            match tokio::time::timeout(self.timeout, source.fetch(domain)).await {
                Err(_) => {
                    tracing::warn!(
                        "Backlink source {} timed out after {:?} for {}",
                        name,
                        self.timeout,
                        domain
                    );
                }
                Ok(Err(e)) => {
                    tracing::warn!("Backlink source {} failed for {}: {}", name, domain, e);
                }
                Ok(Ok(data)) if data.is_no_data() => {
                    tracing::info!("Backlink source {} has no data for {}", name, domain);
                }
                Ok(Ok(mut data)) => {
                    tracing::info!(
                        "Backlinks for {} from {}: {} links, {} domains",
                        domain,
                        name,
                        data.total_count,
                        data.domain_count
                    );
                    if data.source.is_none() {
                        data.source = Some(name.to_string());
                    }
                    return data;
                }
            }
        }

        tracing::info!("No backlink source had data for {}", domain);
        BacklinkData::no_data()
    }
}

/// Parses a human-formatted count such as `1,234` or `12 345`
pub(crate) fn parse_count(raw: &str) -> Option<u64> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}' | '_'))
        .collect();
    digits.trim().parse().ok()
}
