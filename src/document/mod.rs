//! Parsed page document
//!
//! [`PageDocument`] is the immutable, typed handle every analyzer reads from.
//! Each signal has its own accessor so analyzers never walk the tree ad hoc.
//!
//! The underlying `scraper::Html` is not `Send`, so a document lives on one
//! thread for its whole life: parse it, analyze it, drop it, all without an
//! `.await` in between.

mod links;

pub use links::{rel_is_nofollow, resolve_link, ImageRef, LinkRef};

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text never counts as visible body content
const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg", "head"];

/// A fetched page parsed into an HTML tree, plus the URL that served it
pub struct PageDocument {
    html: Html,
    base_url: Url,
}

impl PageDocument {
    /// Parses HTML content against the effective base URL
    ///
    /// # Example
    ///
    /// ```
    /// use seo_audit::document::PageDocument;
    /// use url::Url;
    ///
    /// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
    /// let doc = PageDocument::parse(html, Url::parse("https://example.com/").unwrap());
    /// assert_eq!(doc.title(), Some("Test".to_string()));
    /// assert_eq!(doc.links().len(), 1);
    /// ```
    pub fn parse(html: &str, base_url: Url) -> Self {
        Self {
            html: Html::parse_document(html),
            base_url,
        }
    }

    /// The URL that served the final response
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Text of the first `<title>` element, trimmed
    pub fn title(&self) -> Option<String> {
        self.select_first("title")
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .filter(|s| !s.is_empty())
    }

    /// Content of `<meta name="...">`, matched case-insensitively
    pub fn meta_content(&self, name: &str) -> Option<String> {
        self.select_all("meta[name]")
            .into_iter()
            .find(|element| {
                element
                    .value()
                    .attr("name")
                    .map(|n| n.trim().eq_ignore_ascii_case(name))
                    .unwrap_or(false)
            })
            .and_then(|element| element.value().attr("content"))
            .map(collapse_whitespace)
            .filter(|s| !s.is_empty())
    }

    pub fn meta_description(&self) -> Option<String> {
        self.meta_content("description")
    }

    pub fn meta_viewport(&self) -> Option<String> {
        self.meta_content("viewport")
    }

    /// Number of `<h{level}>` elements
    pub fn heading_count(&self, level: u8) -> usize {
        self.select_all(&format!("h{}", level)).len()
    }

    /// Text of every h1-h6 heading, in document order
    pub fn headings(&self) -> Vec<String> {
        self.select_all("h1, h2, h3, h4, h5, h6")
            .into_iter()
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// All `<img>` elements
    pub fn images(&self) -> Vec<ImageRef> {
        self.select_all("img")
            .into_iter()
            .map(|element| ImageRef {
                src: element.value().attr("src").map(str::to_string),
                alt: element.value().attr("alt").map(str::to_string),
            })
            .collect()
    }

    /// All followable `<a href>` links, resolved against the base URL
    ///
    /// # Link Extraction Rules
    ///
    /// **Exclude:**
    /// - `javascript:`, `mailto:`, `tel:` links
    /// - Data URIs and fragment-only anchors
    ///
    /// `rel="nofollow"` links are included and flagged.
    pub fn links(&self) -> Vec<LinkRef> {
        self.select_all("a[href]")
            .into_iter()
            .filter_map(|element| {
                let href = element.value().attr("href")?;
                let url = resolve_link(href, &self.base_url)?;
                Some(LinkRef {
                    url,
                    nofollow: rel_is_nofollow(element.value().attr("rel")),
                    text: collapse_whitespace(&element.text().collect::<String>()),
                })
            })
            .collect()
    }

    /// `tel:` targets of phone links
    pub fn phone_links(&self) -> Vec<String> {
        self.select_all("a[href]")
            .into_iter()
            .filter_map(|element| {
                let href = element.value().attr("href")?.trim();
                let number = href
                    .get(..4)
                    .filter(|scheme| scheme.eq_ignore_ascii_case("tel:"))
                    .map(|_| href[4..].trim().to_string())?;
                (!number.is_empty()).then_some(number)
            })
            .collect()
    }

    /// Target of `<link rel="canonical">`
    pub fn canonical(&self) -> Option<Url> {
        self.select_all("link[rel][href]")
            .into_iter()
            .find(|element| {
                element
                    .value()
                    .attr("rel")
                    .map(|rel| {
                        rel.split_whitespace()
                            .any(|token| token.eq_ignore_ascii_case("canonical"))
                    })
                    .unwrap_or(false)
            })
            .and_then(|element| element.value().attr("href"))
            .and_then(|href| resolve_link(href, &self.base_url))
    }

    pub fn has_open_graph(&self) -> bool {
        !self.select_all("meta[property^='og:']").is_empty()
    }

    pub fn has_twitter_card(&self) -> bool {
        self.meta_content("twitter:card").is_some()
            || !self.select_all("meta[property='twitter:card']").is_empty()
    }

    /// Raw bodies of every non-empty `application/ld+json` script
    pub fn json_ld_blocks(&self) -> Vec<String> {
        self.select_all("script[type]")
            .into_iter()
            .filter(|element| {
                element
                    .value()
                    .attr("type")
                    .map(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
                    .unwrap_or(false)
            })
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn has_microdata(&self) -> bool {
        !self.select_all("[itemscope]").is_empty()
    }

    pub fn has_structured_data(&self) -> bool {
        !self.json_ld_blocks().is_empty() || self.has_microdata()
    }

    /// `src` of every iframe
    pub fn iframe_sources(&self) -> Vec<String> {
        self.select_all("iframe[src]")
            .into_iter()
            .filter_map(|element| element.value().attr("src").map(str::to_string))
            .collect()
    }

    /// Returns true if an `<address>` element is present
    pub fn has_address_element(&self) -> bool {
        !self.select_all("address").is_empty()
    }

    /// Visible text of the body, whitespace-collapsed
    ///
    /// Text inside script, style, noscript, template and svg elements is skipped.
    pub fn body_text(&self) -> String {
        let root = self
            .select_first("body")
            .unwrap_or_else(|| self.html.root_element());

        let mut parts: Vec<&str> = Vec::new();
        for node in root.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|element| HIDDEN_TEXT_TAGS.contains(&element.name()))
                    .unwrap_or(false)
            });
            if !hidden {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed);
                }
            }
        }

        collapse_whitespace(&parts.join(" "))
    }

    fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(css).ok()?;
        self.html.select(&selector).next()
    }

    fn select_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
