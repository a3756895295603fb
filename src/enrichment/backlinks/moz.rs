//! Moz Links API v2 backlink source

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::MozConfig;
use crate::enrichment::backlinks::{BacklinkSource, ANCHOR_LIMIT};
use crate::enrichment::{json_count, send_json, ProviderError, ProviderResult};
use crate::model::{AnchorText, BacklinkData};

const PROVIDER: &str = "moz";

/// Primary paid backlink source, authenticated with access id and secret
#[derive(Debug, Clone)]
pub struct MozSource {
    client: Client,
    config: MozConfig,
}

impl MozSource {
    pub fn new(client: Client, config: MozConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v2/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    async fn post(&self, path: &str, body: Value) -> ProviderResult<Value> {
        let request = self
            .client
            .post(self.endpoint(path))
            .basic_auth(&self.config.access_id, Some(&self.config.secret_key))
            .json(&body);
        send_json(PROVIDER, request).await
    }

    /// Top anchor texts; a failure here does not discard the counts
    async fn anchors(&self, domain: &str) -> Vec<AnchorText> {
        let body = json!({
            "target": format!("{}/", domain),
            "scope": "root_domain",
            "limit": ANCHOR_LIMIT,
        });

        match self.post("anchor_text", body).await {
            Ok(value) => parse_anchor_text(&value),
            Err(e) => {
                tracing::debug!("Moz anchor text lookup failed for {}: {}", domain, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl BacklinkSource for MozSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch(&self, domain: &str) -> ProviderResult<BacklinkData> {
        let metrics = self
            .post("url_metrics", json!({ "targets": [domain] }))
            .await?;
        let (total_count, domain_count) = parse_url_metrics(&metrics)?;

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

/// Reads `(external pages, referring root domains)` from a url_metrics body
fn parse_url_metrics(body: &Value) -> ProviderResult<(u64, u64)> {
    let result = body
        .pointer("/results/0")
        .ok_or_else(|| ProviderError::parse(PROVIDER, "missing results[0]"))?;

    let total = result
        .get("external_pages_to_root_domain")
        .and_then(json_count);
    let domains = result
        .get("root_domains_to_root_domain")
        .and_then(json_count);

    match (total, domains) {
        (None, None) => Err(ProviderError::parse(PROVIDER, "missing link counts")),
        (total, domains) => Ok((total.unwrap_or(0), domains.unwrap_or(0))),
    }
}

fn parse_anchor_text(body: &Value) -> Vec<AnchorText> {
    body.get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|entry| {
                    let text = entry.get("anchor_text")?.as_str()?.trim();
                    let count = entry.get("external_pages").and_then(json_count)?;
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
