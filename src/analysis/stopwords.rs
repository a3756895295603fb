//! Stop-word and markup-term denylist for keyword extraction
//!
//! Only words of four or more letters are ever ranked, so shorter stop words
//! are omitted. The markup vocabulary covers terms that leak into body text
//! from navigation, cookie banners and inline styling.

use std::collections::HashSet;

const NATURAL_LANGUAGE: &[&str] = &[
    "about", "above", "after", "again", "against", "almost", "along", "already", "also",
    "although", "always", "among", "another", "anyone", "anything", "around", "because",
    "been", "before", "being", "below", "best", "better", "between", "both", "came", "cannot",
    "come", "could", "does", "doing", "done", "down", "during", "each", "either", "else",
    "enough", "even", "ever", "every", "find", "first", "from", "further", "gets", "give",
    "goes", "going", "good", "great", "have", "having", "here", "hers", "herself", "high",
    "himself", "into", "itself", "just", "keep", "know", "last", "least", "less", "like",
    "little", "long", "look", "made", "make", "many", "more", "most", "much", "must", "myself",
    "need", "never", "next", "none", "only", "other", "others", "ours", "ourselves", "over",
    "own", "part", "same", "should", "since", "some", "something", "still", "such", "take",
    "than", "that", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "thing", "things", "this", "those", "though", "through", "thus", "together", "too",
    "under", "until", "upon", "very", "want", "well", "were", "what", "whatever", "when",
    "where", "whether", "which", "while", "whom", "whose", "will", "with", "within",
    "without", "would", "year", "years", "your", "yours", "yourself", "yourselves",
];

const MARKUP_TERMS: &[&str] = &[
    "accept", "account", "align", "array", "background", "block", "body", "border", "button",
    "cart", "center", "checkout", "class", "click", "color", "content", "cookie", "cookies",
    "copyright", "display", "div", "document", "false", "flex", "float", "font", "footer",
    "function", "header", "height", "hidden", "home", "href", "html", "icon", "image",
    "images", "important", "inline", "javascript", "left", "login", "margin", "menu", "more",
    "navigation", "none", "null", "padding", "page", "policy", "position", "privacy", "read",
    "reserved", "right", "rights", "script", "search", "section", "sign", "skip", "span",
    "style", "submit", "terms", "text", "toggle", "true", "undefined", "var", "view",
    "website", "width", "window", "wrapper",
];

/// A replaceable set of terms excluded from keyword ranking
#[derive(Debug, Clone)]
pub struct StopWords {
    terms: HashSet<String>,
}

impl StopWords {
    /// The built-in denylist extended with configured terms
    pub fn with_extra(extra: &[String]) -> Self {
        let mut terms: HashSet<String> = NATURAL_LANGUAGE
            .iter()
            .chain(MARKUP_TERMS.iter())
            .map(|s| s.to_string())
            .collect();
        terms.extend(extra.iter().map(|s| s.trim().to_lowercase()));
        Self { terms }
    }

    /// A denylist made of exactly the given terms
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}
