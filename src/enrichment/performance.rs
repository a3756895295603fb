//! Page performance metrics through the PageSpeed Insights v5 API

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::{Config, PageSpeedConfig};
use crate::enrichment::{send_json, ProviderError, ProviderResult};
use crate::model::PerformanceMetrics;

const PROVIDER: &str = "pagespeed";

/// Source of browser timing metrics for a URL
#[async_trait]
pub trait PerformanceSource: Send + Sync {
    /// Measures a page; timings come back in seconds
    async fn measure(&self, url: &str) -> ProviderResult<PerformanceMetrics>;
}

/// PageSpeed Insights client
#[derive(Debug, Clone)]
pub struct PageSpeedClient {
    client: Client,
    config: PageSpeedConfig,
}

impl PageSpeedClient {
    pub fn new(client: Client, config: PageSpeedConfig) -> Self {
        Self { client, config }
    }

    /// Returns a client when `[providers.pagespeed]` is configured
    pub fn from_config(client: Client, config: &Config) -> Option<Self> {
        config
            .providers
            .pagespeed
            .clone()
            .map(|pagespeed| Self::new(client, pagespeed))
    }
}

#[async_trait]
impl PerformanceSource for PageSpeedClient {
    async fn measure(&self, url: &str) -> ProviderResult<PerformanceMetrics> {
        let mut query = vec![
            ("url", url.to_string()),
            ("strategy", self.config.strategy.clone()),
            ("category", "performance".to_string()),
        ];
        if let Some(key) = &self.config.api_key {
            query.push(("key", key.clone()));
        }

        tracing::debug!("Requesting PageSpeed metrics for {}", url);
        let body = send_json(PROVIDER, self.client.get(&self.config.endpoint).query(&query)).await?;
        parse_lighthouse(&body)
    }
}

/// Extracts metrics from a PageSpeed response body
///
/// Lighthouse reports timings in milliseconds; they are converted to seconds.
/// A response with no usable metric is `NoData`.
pub fn parse_lighthouse(body: &Value) -> ProviderResult<PerformanceMetrics> {
    let audits = body
        .pointer("/lighthouseResult/audits")
        .ok_or_else(|| ProviderError::parse(PROVIDER, "missing lighthouseResult.audits"))?;

    let numeric = |id: &str| audits.get(id)?.get("numericValue")?.as_f64();
    let seconds = |id: &str| numeric(id).map(|ms| ms / 1000.0);

    let metrics = PerformanceMetrics {
        lcp: seconds("largest-contentful-paint"),
        fcp: seconds("first-contentful-paint"),
        tti: seconds("interactive"),
        cls: numeric("cumulative-layout-shift"),
    };

    if metrics.is_empty() {
        return Err(ProviderError::no_data(PROVIDER));
    }
    Ok(metrics)
}
