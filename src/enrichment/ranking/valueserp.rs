use async_trait::async_trait;
use reqwest::Client;

use crate::config::SerpProviderConfig;
use crate::enrichment::ranking::{parse_organic_results, OrganicResult, RankProvider, SCAN_DEPTH};
use crate::enrichment::{send_json, ProviderResult};

const PROVIDER: &str = "valueserp";
const DEFAULT_ENDPOINT: &str = "https://api.valueserp.com/search";

/// ValueSERP search results, used when SerpApi is not configured
#[derive(Debug, Clone)]
pub struct ValueSerpProvider {
    client: Client,
    config: SerpProviderConfig,
}

impl ValueSerpProvider {
    pub fn new(client: Client, config: SerpProviderConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl RankProvider for ValueSerpProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn search(
        &self,
        keyword: &str,
        location: Option<&str>,
    ) -> ProviderResult<Vec<OrganicResult>> {
        let endpoint = self.config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);

        let mut query = vec![
            ("api_key", self.config.api_key.clone()),
            ("q", keyword.to_string()),
            ("num", SCAN_DEPTH.to_string()),
            ("output", "json".to_string()),
        ];
        if let Some(location) = location {
            query.push(("location", location.to_string()));
        }

        let body = send_json(PROVIDER, self.client.get(endpoint).query(&query)).await?;
        parse_organic_results(PROVIDER, &body)
    }
}
