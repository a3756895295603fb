//! Signal sets produced by the analyzers

use serde::{Deserialize, Serialize};

use crate::model::PerformanceMetrics;

/// Technical signals for a page
///
/// `https` is derived from the URL that served the final response, never from
/// the requested URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSignals {
    pub https: bool,
    pub mobile_viewport: bool,
    pub robots_txt_present: bool,
    pub sitemap_present: bool,
    /// robots.txt does not disallow the site root for generic crawlers
    pub crawlable: bool,
    /// Largest Contentful Paint, seconds
    pub lcp: Option<f64>,
    /// First Contentful Paint, seconds
    pub fcp: Option<f64>,
    /// Time To Interactive, seconds
    pub tti: Option<f64>,
    pub cls: Option<f64>,
}

impl TechnicalSignals {
    /// Overlays measured performance metrics, keeping existing values for
    /// any metric the measurement did not produce
    pub fn apply_metrics(&mut self, metrics: &PerformanceMetrics) {
        self.lcp = metrics.lcp.or(self.lcp);
        self.fcp = metrics.fcp.or(self.fcp);
        self.tti = metrics.tti.or(self.tti);
        self.cls = metrics.cls.or(self.cls);
    }

    pub fn has_metrics(&self) -> bool {
        self.lcp.is_some() || self.fcp.is_some() || self.tti.is_some() || self.cls.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleSignals {
    pub length: usize,
    pub optimal: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionSignals {
    pub missing: bool,
    pub too_long: bool,
    pub too_short: bool,
    pub length: usize,
}

/// Image alt-text accounting; `valid + missing == total`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSignals {
    pub total: usize,
    pub missing: usize,
    pub valid: usize,
}

/// Link accounting; `internal + external == total`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSignals {
    pub internal: usize,
    pub external: usize,
    pub external_nofollow: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnPageSignals {
    pub title: TitleSignals,
    pub description: DescriptionSignals,
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub images: ImageSignals,
    pub canonical: bool,
    pub open_graph: bool,
    pub twitter_card: bool,
    pub structured_data: bool,
    pub links: LinkSignals,
}

/// One ranked keyword with its share of the filtered body words
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDensity {
    pub term: String,
    pub pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSignals {
    pub word_count: usize,
    /// Flesch reading ease clamped to 0..=100
    pub readability: u8,
    /// Top five terms, descending frequency, ties in first-seen order
    pub keyword_density: Vec<KeywordDensity>,
    pub suggestions: Vec<String>,
    /// Identical body text is already on record for another domain
    pub duplicate: bool,
    /// Hex SHA-256 of the normalized body text
    pub content_hash: String,
}

/// Name/Address/Phone signals for local businesses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSeoSignals {
    pub phone_numbers: Vec<String>,
    pub has_address: bool,
    pub has_local_business_schema: bool,
    pub has_map_embed: bool,
    pub nap_consistent: bool,
}

impl LocalSeoSignals {
    /// Returns true when the page shows any local-business signal at all
    pub fn is_present(&self) -> bool {
        !self.phone_numbers.is_empty()
            || self.has_address
            || self.has_local_business_schema
            || self.has_map_embed
    }
}
