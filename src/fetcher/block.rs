//! Bot-protection page detection
//!
//! A response is treated as a block page when it contains one strong marker
//! (a challenge script or cookie name), or when two different groups of weak
//! phrases match. A single weak phrase never flags a page on its own, since
//! ordinary pages say "access denied" or mention a captcha often enough.

use crate::config::BlockDetectionConfig;

/// Challenge scripts and cookie names that only appear on block pages
pub const DEFAULT_STRONG_MARKERS: &[&str] = &[
    "cf-chl-bypass",
    "__cf_chl_",
    "_cf_chl_opt",
    "/cdn-cgi/challenge-platform/h/",
    "px-captcha",
    "captcha-delivery.com",
    "incapsula incident id",
    "distil_r_captcha",
];

/// Groups of phrases that hint at a block page; two groups must match
pub const DEFAULT_WEAK_SIGNATURES: &[&[&str]] = &[
    &["checking your browser", "just a moment..."],
    &["access denied"],
    &["verify you are human", "are you a robot", "bot detection"],
    &["captcha"],
    &["enable javascript and cookies"],
    &["ddos protection"],
];

/// Matches response content against configured block signatures
#[derive(Debug, Clone)]
pub struct BlockDetector {
    strong_markers: Vec<String>,
    weak_signatures: Vec<Vec<String>>,
}

impl BlockDetector {
    pub fn new(config: &BlockDetectionConfig) -> Self {
        Self {
            strong_markers: config
                .strong_markers
                .iter()
                .map(|m| m.to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
            weak_signatures: config
                .weak_signatures
                .iter()
                .map(|group| {
                    group
                        .iter()
                        .map(|s| s.to_lowercase())
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|group| !group.is_empty())
                .collect(),
        }
    }

    /// Checks a response body and its `Set-Cookie` values
    ///
    /// # Returns
    ///
    /// * `Some(signals)` - The markers or phrases that identified a block page
    /// * `None` - The response looks like a normal page
    pub fn detect(&self, body: &str, cookies: &[String]) -> Option<Vec<String>> {
        let mut haystack = body.to_lowercase();
        for cookie in cookies {
            haystack.push('\n');
            haystack.push_str(&cookie.to_lowercase());
        }

        if let Some(marker) = self
            .strong_markers
            .iter()
            .find(|marker| haystack.contains(marker.as_str()))
        {
            return Some(vec![marker.clone()]);
        }

        let matched: Vec<String> = self
            .weak_signatures
            .iter()
            .filter_map(|group| {
                group
                    .iter()
                    .find(|phrase| haystack.contains(phrase.as_str()))
                    .cloned()
            })
            .collect();

        (matched.len() >= 2).then_some(matched)
    }
}

impl Default for BlockDetector {
    fn default() -> Self {
        Self::new(&BlockDetectionConfig::default())
    }
}
