use crate::document::PageDocument;
use crate::fetcher::{served_over_https, SiteFiles};
use crate::model::TechnicalSignals;

/// Technical signals readable from the document itself
///
/// robots.txt and sitemap presence come from the site probe and are merged in
/// with [`apply_site_files`]. Until then the page is assumed crawlable.
pub fn analyze_technical(doc: &PageDocument) -> TechnicalSignals {
    TechnicalSignals {
        https: served_over_https(doc.base_url()),
        mobile_viewport: doc
            .meta_viewport()
            .map(|content| is_responsive_viewport(&content))
            .unwrap_or(false),
        crawlable: true,
        ..Default::default()
    }
}

/// Merges probe results into technical signals
pub fn apply_site_files(technical: &mut TechnicalSignals, files: &SiteFiles) {
    technical.robots_txt_present = files.robots_txt.is_some();
    technical.sitemap_present = files.sitemap_present;
    technical.crawlable = files.robots().allows_search_engines();
}

fn is_responsive_viewport(content: &str) -> bool {
    let compact: String = content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    compact.contains("width=device-width")
}
