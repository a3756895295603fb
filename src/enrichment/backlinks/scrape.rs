//! Free backlink checker pages, scraped with configured regular expressions

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use reqwest::Client;

use crate::config::ScraperSourceConfig;
use crate::enrichment::backlinks::{parse_count, BacklinkSource};
use crate::enrichment::{ProviderError, ProviderResult};
use crate::model::BacklinkData;
use crate::ConfigError;

/// A backlink checker page whose counts are read out of its HTML
#[derive(Debug, Clone)]
pub struct ScraperSource {
    client: Client,
    name: String,
    url_template: String,
    total_pattern: Regex,
    domains_pattern: Regex,
}

impl ScraperSource {
    pub fn new(
        client: Client,
        name: impl Into<String>,
        url_template: impl Into<String>,
        total_pattern: Regex,
        domains_pattern: Regex,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            url_template: url_template.into(),
            total_pattern,
            domains_pattern,
        }
    }

    pub fn from_config(client: Client, config: &ScraperSourceConfig) -> Result<Self, ConfigError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                ConfigError::InvalidPattern(format!("{} pattern '{}': {}", config.name, pattern, e))
            })
        };

        Ok(Self::new(
            client,
            config.name.clone(),
            config.url_template.clone(),
            compile(&config.total_pattern)?,
            compile(&config.domains_pattern)?,
        ))
    }

    fn url_for(&self, domain: &str) -> String {
        self.url_template.replace("{domain}", domain)
    }

    fn capture_count(pattern: &Regex, html: &str) -> Option<u64> {
        pattern
            .captures(html)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_count(m.as_str()))
    }

    /// Reads both counts from a checker page; a page matching neither
    /// pattern has no data
    fn parse_page(&self, html: &str) -> ProviderResult<(u64, u64)> {
        let total = Self::capture_count(&self.total_pattern, html);
        let domains = Self::capture_count(&self.domains_pattern, html);

        match (total, domains) {
            (None, None) => Err(ProviderError::no_data(&self.name)),
            (total, domains) => Ok((total.unwrap_or(0), domains.unwrap_or(0))),
        }
    }
}

#[async_trait]
impl BacklinkSource for ScraperSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, domain: &str) -> ProviderResult<BacklinkData> {
        let response = self
            .client
            .get(self.url_for(domain))
            .send()
            .await
            .map_err(|e| ProviderError::Http {
                provider: self.name.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: self.name.clone(),
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| ProviderError::parse(&self.name, e.to_string()))?;
        let (total_count, domain_count) = self.parse_page(&html)?;

        Ok(BacklinkData {
            total_count,
            domain_count,
            anchor_text: Vec::new(),
            last_checked: Utc::now(),
            source: Some(self.name.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> ScraperSource {
        ScraperSource::new(
            Client::new(),
            "checker",
            "https://checker.example/check?site={domain}",
            Regex::new(r"Total backlinks:\s*<b>([\d,]+)</b>").unwrap(),
            Regex::new(r"Referring domains:\s*<b>([\d,]+)</b>").unwrap(),
        )
    }

    #[test]
    fn test_url_template() {
        assert_eq!(
            source().url_for("example.com"),
            "https://checker.example/check?site=example.com"
        );
    }

    #[test]
    fn test_parse_page() {
        let html = "<p>Total backlinks: <b>1,204</b></p><p>Referring domains: <b>96</b></p>";
        assert_eq!(source().parse_page(html).unwrap(), (1204, 96));
    }

    #[test]
    fn test_parse_page_partial() {
        let html = "<p>Referring domains: <b>4</b></p>";
        assert_eq!(source().parse_page(html).unwrap(), (0, 4));
    }

    #[test]
    fn test_unmatched_page_is_no_data() {
        assert!(matches!(
            source().parse_page("<p>Please solve the captcha</p>"),
            Err(ProviderError::NoData { .. })
        ));
    }

    #[test]
    fn test_from_config_rejects_bad_pattern() {
        let config = ScraperSourceConfig {
            name: "broken".to_string(),
            url_template: "https://x.example/{domain}".to_string(),
            total_pattern: "([".to_string(),
            domains_pattern: "(\\d+)".to_string(),
        };
        assert!(matches!(
            ScraperSource::from_config(Client::new(), &config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }
}
