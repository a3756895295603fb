//! Page analyzers
//!
//! Every analyzer is a pure function of a [`PageDocument`]: no network, no
//! shared state. [`analyze_page`] runs all of them over a single parse.

mod content;
mod keywords;
mod local;
mod onpage;
mod stopwords;
mod technical;

pub use content::{
    analyze_content, content_hash, count_words, flesch_reading_ease, READABLE_SCORE,
    STUFFING_PCT, THIN_CONTENT_WORDS,
};
pub use keywords::{keyword_density, rank_terms, tokenize, TermRanking, DENSITY_TERMS};
pub use local::analyze_local;
pub use onpage::{analyze_onpage, DESCRIPTION_MAX, DESCRIPTION_MIN, TITLE_OPTIMAL};
pub use stopwords::StopWords;
pub use technical::{analyze_technical, apply_site_files};

use url::Url;

use crate::document::PageDocument;
use crate::model::{ContentSignals, LocalSeoSignals, OnPageSignals, TechnicalSignals};

/// Minimum visible body text (characters) for a page without title or description
pub const MIN_BODY_CHARS: usize = 50;

/// Everything the analyzers extracted from one page
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    pub technical: TechnicalSignals,
    pub onpage: OnPageSignals,
    pub content: ContentSignals,
    /// Present only when the page shows a local-business signal
    pub local: Option<LocalSeoSignals>,
    /// The page has no title, no description and almost no text
    pub insufficient: bool,
}

/// Parses `html` once and runs every analyzer over it
///
/// The document is dropped before returning, so the result can cross threads.
pub fn analyze_page(html: &str, base_url: Url, stopwords: &StopWords) -> PageAnalysis {
    let doc = PageDocument::parse(html, base_url);

    let technical = analyze_technical(&doc);
    let onpage = analyze_onpage(&doc);
    let content = analyze_content(&doc, stopwords);
    let local = Some(analyze_local(&doc)).filter(LocalSeoSignals::is_present);

    let insufficient = onpage.title.length == 0
        && onpage.description.missing
        && doc.body_text().chars().count() < MIN_BODY_CHARS;

    PageAnalysis {
        technical,
        onpage,
        content,
        local,
        insufficient,
    }
}

/// Ranks a page's terms the way keyword density does, over title,
/// description, headings and body
pub fn page_keywords(html: &str, base_url: Url, stopwords: &StopWords, limit: usize) -> Vec<String> {
    let doc = PageDocument::parse(html, base_url);
    let headings = doc.headings();

    let text = [
        doc.title().unwrap_or_default(),
        doc.meta_description().unwrap_or_default(),
        doc.body_text(),
    ]
    .join(" ");

    rank_terms(&text, &headings, stopwords)
        .terms
        .into_iter()
        .take(limit)
        .map(|(term, _)| term)
        .collect()
}
