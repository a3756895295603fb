//! Shared pages and stub sources

use async_trait::async_trait;
use seo_audit::enrichment::{PerformanceSource, ProviderResult};
use seo_audit::fetcher::{FetchedPage, PageSource, SiteFiles, SiteProbe};
use seo_audit::PerformanceMetrics;
use std::time::Duration;
use url::Url;

/// 45-character title, 140-character description, one H1, responsive viewport
pub const HOMEPAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Acme Widgets | Handmade Oak Widgets for Homes</title>
  <meta name="description" content="Acme Widgets builds handmade oak widgets for kitchens, workshops and gardens. Browse the full catalog, compare finishes, order online today.">
  <meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
  <h1>Handmade oak widgets</h1>
  <p>Every widget is cut, sanded and oiled by hand in our workshop. We use oak from
  local forests and ship each widget in recycled packaging.</p>
  <h2>Why oak</h2>
  <p>Oak widgets last for decades. They resist moisture, age into a warm color and
  can be refinished whenever they start to look tired.</p>
  <a href="/catalog">Catalog</a>
  <a href="https://woodworkers.example.org/">Woodworkers guild</a>
</body>
</html>"#;

/// Serves one page for every domain
pub struct StaticPage {
    pub html: String,
    pub url: String,
}

impl StaticPage {
    pub fn new(html: &str, url: &str) -> Self {
        Self {
            html: html.to_string(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl PageSource for StaticPage {
    async fn fetch(&self, _domain: &str) -> seo_audit::Result<FetchedPage> {
        Ok(FetchedPage {
            html: self.html.clone(),
            effective_url: Url::parse(&self.url).unwrap(),
            status: 200,
        })
    }
}

/// Reports fixed site files
pub struct FixedFiles(pub SiteFiles);

impl FixedFiles {
    /// robots.txt allowing everything, no sitemap
    pub fn robots_only() -> Self {
        Self(SiteFiles {
            robots_txt: Some("User-agent: *\nAllow: /".to_string()),
            sitemap_present: false,
        })
    }
}

#[async_trait]
impl SiteProbe for FixedFiles {
    async fn probe(&self, _origin: &Url) -> SiteFiles {
        self.0.clone()
    }
}

/// Returns the given metrics after an optional delay
pub struct StubMetrics {
    pub metrics: PerformanceMetrics,
    pub delay: Duration,
}

impl StubMetrics {
    pub fn fast() -> Self {
        Self {
            metrics: PerformanceMetrics {
                lcp: Some(1.2),
                fcp: Some(0.9),
                tti: Some(2.4),
                cls: Some(0.02),
            },
            delay: Duration::ZERO,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::fast()
        }
    }
}

#[async_trait]
impl PerformanceSource for StubMetrics {
    async fn measure(&self, _url: &str) -> ProviderResult<PerformanceMetrics> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.metrics)
    }
}
