//! Ahrefs API v3 backlink source

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use crate::config::AhrefsConfig;
use crate::enrichment::backlinks::{BacklinkSource, ANCHOR_LIMIT};
use crate::enrichment::{json_count, send_json, ProviderError, ProviderResult};
use crate::model::{AnchorText, BacklinkData};

const PROVIDER: &str = "ahrefs";

/// Secondary paid backlink source, authenticated with a bearer token
#[derive(Debug, Clone)]
pub struct AhrefsSource {
    client: Client,
    config: AhrefsConfig,
}

impl AhrefsSource {
    pub fn new(client: Client, config: AhrefsConfig) -> Self {
        Self { client, config }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> ProviderResult<Value> {
        let url = format!(
            "{}/v3/site-explorer/{}",
            self.config.endpoint.trim_end_matches('/'),
            path
        );
        let request = self
            .client
            .get(url)
            .bearer_auth(&self.config.api_token)
            .query(query);
        send_json(PROVIDER, request).await
    }

    async fn anchors(&self, domain: &str) -> Vec<AnchorText> {
        let query = [
            ("target", domain.to_string()),
            ("mode", "domain".to_string()),
            ("limit", ANCHOR_LIMIT.to_string()),
            ("select", "anchor,links_to_target".to_string()),
        ];

        match self.get("anchors", &query).await {
            Ok(value) => parse_anchors(&value),
            Err(e) => {
                tracing::debug!("Ahrefs anchor lookup failed for {}: {}", domain, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl BacklinkSource for AhrefsSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch(&self, domain: &str) -> ProviderResult<BacklinkData> {
        let query = [
            ("target", domain.to_string()),
            ("mode", "domain".to_string()),
            ("date", Utc::now().format("%Y-%m-%d").to_string()),
        ];
        let stats = self.get("backlinks-stats", &query).await?;
        let (total_count, domain_count) = parse_backlinks_stats(&stats)?;

        let anchor_text = if total_count > 0 || domain_count > 0 {
            self.anchors(domain).await
        } else {
            Vec::new()
        };

        Ok(BacklinkData {
            total_count,
            domain_count,
            anchor_text,
            last_checked: Utc::now(),
            source: Some(PROVIDER.to_string()),
        })
    }
}

/// Reads `(live backlinks, live referring domains)` from a backlinks-stats body
fn parse_backlinks_stats(body: &Value) -> ProviderResult<(u64, u64)> {
    let metrics = body
        .get("metrics")
        .ok_or_else(|| ProviderError::parse(PROVIDER, "missing metrics"))?;

    let live = metrics.get("live").and_then(json_count);
    let refdomains = metrics.get("live_refdomains").and_then(json_count);

    match (live, refdomains) {
        (None, None) => Err(ProviderError::parse(PROVIDER, "missing live counts")),
        (live, refdomains) => Ok((live.unwrap_or(0), refdomains.unwrap_or(0))),
    }
}

fn parse_anchors(body: &Value) -> Vec<AnchorText> {
    body.get("anchors")
        .and_then(Value::as_array)
        .map(|anchors| {
            anchors
                .iter()
                .filter_map(|entry| {
                    let text = entry.get("anchor")?.as_str()?.trim();
                    let count = entry.get("links_to_target").and_then(json_count)?;
                    (!text.is_empty()).then(|| AnchorText {
                        text: text.to_string(),
                        count,
                    })
                })
                .take(ANCHOR_LIMIT)
                .collect()
        })
        .unwrap_or_default()
}
