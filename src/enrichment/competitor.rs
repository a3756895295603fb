//! Keyword extraction from a competitor's homepage

use std::sync::Arc;

use crate::analysis::{page_keywords, StopWords};
use crate::fetcher::PageSource;
use crate::url::{leading_label, normalize_domain};
use crate::Result;

/// Extracts the terms a site's homepage is built around
#[derive(Clone)]
pub struct KeywordExtractor {
    source: Arc<dyn PageSource>,
    stopwords: Arc<StopWords>,
}

impl KeywordExtractor {
    pub fn new(source: Arc<dyn PageSource>, stopwords: Arc<StopWords>) -> Self {
        Self { source, stopwords }
    }

    /// Returns up to `limit` top terms of the domain's homepage
    ///
    /// Terms are ranked from title, meta description, headings and body text
    /// with the same algorithm as keyword density.
    ///
    /// # Errors
    ///
    /// Only malformed input fails. When the homepage cannot be fetched, or
    /// yields no terms, the result is the domain's leading label
    /// (`example` for `www.example.com`).
    pub async fn extract_keywords(&self, domain: &str, limit: usize) -> Result<Vec<String>> {
        let domain = normalize_domain(domain)?;

        let keywords = match self.source.fetch(&domain).await {
            Ok(page) => page_keywords(&page.html, page.effective_url, &self.stopwords, limit),
            Err(e) => {
                tracing::warn!("Keyword extraction fetch failed for {}: {}", domain, e);
                Vec::new()
            }
        };

        if keywords.is_empty() {
            return Ok(vec![leading_label(&domain)]);
        }
        Ok(keywords)
    }
}
