//! robots.txt and sitemap probes
//!
//! Probes never fail: an error, a timeout or a non-success status all read as
//! "not present".

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use std::time::Duration;
use url::Url;

use crate::fetcher::{SiteFiles, SiteProbe};
use crate::robots::ParsedRobots;

/// Upper bound on `Sitemap:` directives checked when `/sitemap.xml` is missing
const MAX_DECLARED_SITEMAPS: usize = 3;

/// Probes well-known site files over HTTP with a short per-request timeout
#[derive(Debug, Clone)]
pub struct HttpSiteProbe {
    client: Client,
    timeout: Duration,
}

impl HttpSiteProbe {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn fetch_robots(&self, origin: &Url) -> Option<String> {
        let url = origin.join("/robots.txt").ok()?;
        let response = self.get(&url).await?;

        // Single-page apps answer every path with their HTML shell
        if is_html(&response) {
            tracing::debug!("{} served HTML, treating robots.txt as absent", url);
            return None;
        }

        response.text().await.ok()
    }

    /// HEAD first, then GET for servers that reject HEAD
    async fn exists(&self, url: &Url) -> bool {
        let head = self
            .client
            .head(url.as_str())
            .timeout(self.timeout)
            .send()
            .await;

        if let Ok(response) = head {
            if response.status().is_success() {
                return true;
            }
        }

        self.get(url).await.is_some()
    }

    async fn get(&self, url: &Url) -> Option<Response> {
        match self
            .client
            .get(url.as_str())
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => Some(response),
            Ok(response) => {
                tracing::debug!("Probe {} returned HTTP {}", url, response.status());
                None
            }
            Err(e) => {
                tracing::debug!("Probe {} failed: {}", url, e);
                None
            }
        }
    }
}

#[async_trait]
impl SiteProbe for HttpSiteProbe {
    async fn probe(&self, origin: &Url) -> SiteFiles {
        let sitemap_url = origin.join("/sitemap.xml").ok();
        let (robots_txt, default_sitemap) = tokio::join!(self.fetch_robots(origin), async {
            match &sitemap_url {
                Some(url) => self.exists(url).await,
                None => false,
            }
        });

        let mut sitemap_present = default_sitemap;
        if !sitemap_present {
            if let Some(content) = &robots_txt {
                let declared = ParsedRobots::from_content(content).sitemaps();
                for candidate in declared.iter().take(MAX_DECLARED_SITEMAPS) {
                    let Ok(url) = origin.join(candidate) else {
                        continue;
                    };
                    if self.exists(&url).await {
                        tracing::debug!("Sitemap found via robots.txt directive: {}", url);
                        sitemap_present = true;
                        break;
                    }
                }
            }
        }

        SiteFiles {
            robots_txt,
            sitemap_present,
        }
    }
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}
