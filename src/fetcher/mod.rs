//! Page fetching module
//!
//! This module provides the network side of an audit:
//! - Homepage fetch with HTTPS to HTTP fallback
//! - Bot-protection page detection
//! - robots.txt and sitemap probes
//!
//! Both network seams are traits so an audit can run against stub sources.

mod block;
mod http;
mod probe;

pub use block::{BlockDetector, DEFAULT_STRONG_MARKERS, DEFAULT_WEAK_SIGNATURES};
pub use http::{build_http_client, served_over_https, HttpFetcher};
pub use probe::HttpSiteProbe;

use async_trait::async_trait;
use url::Url;

use crate::robots::ParsedRobots;

/// A successfully fetched homepage
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    /// URL of the final response after redirects
    pub effective_url: Url,
    pub status: u16,
}

/// Source of audit target pages
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the homepage of a normalized domain
    async fn fetch(&self, domain: &str) -> crate::Result<FetchedPage>;
}

/// What the well-known site files probe found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteFiles {
    /// Body of `/robots.txt`, when one was served
    pub robots_txt: Option<String>,
    pub sitemap_present: bool,
}

impl SiteFiles {
    /// Parsed robots rules; an absent file allows everything
    pub fn robots(&self) -> ParsedRobots {
        match &self.robots_txt {
            Some(content) => ParsedRobots::from_content(content),
            None => ParsedRobots::allow_all(),
        }
    }
}

/// Side-channel probe for robots.txt and the XML sitemap
#[async_trait]
pub trait SiteProbe: Send + Sync {
    async fn probe(&self, origin: &Url) -> SiteFiles;
}
