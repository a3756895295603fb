//! Heading-boosted term frequency ranking
//!
//! Shared by the content analyzer (keyword density) and competitor keyword
//! extraction.

use std::collections::HashMap;

use crate::analysis::StopWords;
use crate::model::KeywordDensity;

/// Shortest word considered a keyword candidate
pub const MIN_TERM_LENGTH: usize = 4;

/// Number of terms reported as keyword density
pub const DENSITY_TERMS: usize = 5;

/// Ranked terms for one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRanking {
    /// `(term, boosted count)`, descending count, ties in first-seen order
    pub terms: Vec<(String, usize)>,
    /// Number of filtered words in the text, before heading boosts
    pub total_words: usize,
}

/// Splits text into lowercase alphabetic words that survive the filters
pub fn tokenize<'a>(text: &'a str, stopwords: &'a StopWords) -> impl Iterator<Item = String> + 'a {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|word| word.chars().count() >= MIN_TERM_LENGTH)
        .map(str::to_lowercase)
        .filter(move |word| !stopwords.contains(word))
}

/// Ranks the terms of `text`
///
/// Each heading occurrence of a term that also appears in `text` adds one to
/// its count.
///
/// # Example
///
/// ```
/// use seo_audit::analysis::{rank_terms, StopWords};
///
/// let stopwords = StopWords::from_terms(Vec::<String>::new());
/// let ranking = rank_terms("fast shipping fast delivery fast service", &[], &stopwords);
/// assert_eq!(ranking.terms[0], ("fast".to_string(), 3));
/// assert_eq!(ranking.total_words, 6);
/// ```
pub fn rank_terms(text: &str, headings: &[String], stopwords: &StopWords) -> TermRanking {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total_words = 0;

    for word in tokenize(text, stopwords) {
        total_words += 1;
        match counts.get_mut(&word) {
            Some(count) => *count += 1,
            None => {
                counts.insert(word.clone(), 1);
                order.push(word);
            }
        }
    }

    for heading in headings {
        for word in tokenize(heading, stopwords) {
            if let Some(count) = counts.get_mut(&word) {
                *count += 1;
            }
        }
    }

    let mut terms: Vec<(String, usize)> = order
        .into_iter()
        .map(|term| {
            let count = counts.get(&term).copied().unwrap_or(0);
            (term, count)
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts
    terms.sort_by(|a, b| b.1.cmp(&a.1));

    TermRanking { terms, total_words }
}

/// Top terms as percentages of the filtered word count, rounded to 2 decimals
pub fn keyword_density(ranking: &TermRanking, limit: usize) -> Vec<KeywordDensity> {
    if ranking.total_words == 0 {
        return Vec::new();
    }

    ranking
        .terms
        .iter()
        .take(limit)
        .map(|(term, count)| KeywordDensity {
            term: term.clone(),
            pct: round2(*count as f64 / ranking.total_words as f64 * 100.0),
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
