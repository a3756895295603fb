use async_trait::async_trait;
use reqwest::Client;

use crate::config::SerpProviderConfig;
use crate::enrichment::ranking::{parse_organic_results, OrganicResult, RankProvider, SCAN_DEPTH};
use crate::enrichment::{send_json, ProviderResult};

const PROVIDER: &str = "serpapi";
const DEFAULT_ENDPOINT: &str = "https://serpapi.com/search.json";

/// SerpApi Google search results
#[derive(Debug, Clone)]
pub struct SerpApiProvider {
    client: Client,
    config: SerpProviderConfig,
}

impl SerpApiProvider {
    pub fn new(client: Client, config: SerpProviderConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl RankProvider for SerpApiProvider {
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
            ("engine", "google".to_string()),
            ("q", keyword.to_string()),
            ("num", SCAN_DEPTH.to_string()),
            ("api_key", self.config.api_key.clone()),
        ];
        if let Some(location) = location {
            query.push(("location", location.to_string()));
        }

        let body = send_json(PROVIDER, self.client.get(endpoint).query(&query)).await?;
        parse_organic_results(PROVIDER, &body)
    }
}
