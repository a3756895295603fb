use sha2::{Digest, Sha256};

use crate::analysis::keywords::{keyword_density, rank_terms, DENSITY_TERMS};
use crate::analysis::StopWords;
use crate::document::PageDocument;
use crate::model::{ContentSignals, KeywordDensity};

/// Pages with more words than this are not thin
pub const THIN_CONTENT_WORDS: usize = 300;

/// Readability scores above this are considered easy to read
pub const READABLE_SCORE: u8 = 50;

/// A single term above this share of the text looks stuffed
pub const STUFFING_PCT: f64 = 5.0;

pub fn analyze_content(doc: &PageDocument, stopwords: &StopWords) -> ContentSignals {
    let text = doc.body_text();
    let headings = doc.headings();

    let word_count = count_words(&text);
    let readability = flesch_reading_ease(&text);
    let keyword_density = keyword_density(&rank_terms(&text, &headings, stopwords), DENSITY_TERMS);
    let suggestions = suggestions(word_count, readability, &keyword_density, &headings);

    ContentSignals {
        word_count,
        readability,
        keyword_density,
        suggestions,
        duplicate: false,
        content_hash: content_hash(&text),
    }
}

/// Hex SHA-256 of lowercased, whitespace-collapsed text
pub fn content_hash(text: &str) -> String {
    let normalized = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Whitespace-separated tokens that contain at least one letter or digit
pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}

/// Flesch reading ease, clamped to 0..=100
///
/// `206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words)`.
/// Empty text scores 0.
pub fn flesch_reading_ease(text: &str) -> u8 {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|token| token.chars().any(char::is_alphabetic))
        .collect();
    if words.is_empty() {
        return 0;
    }

    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| s.chars().any(char::is_alphabetic))
        .count()
        .max(1);
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;
    let score = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;

    score.round().clamp(0.0, 100.0) as u8
}

/// Vowel-group syllable estimate with a silent trailing `e`
fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if letters.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut groups: usize = 0;
    let mut previous_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            groups += 1;
        }
        previous_vowel = vowel;
    }

    let len = letters.len();
    if len > 2 && letters[len - 1] == 'e' && letters[len - 2] != 'l' && !is_vowel(letters[len - 2]) {
        groups = groups.saturating_sub(1);
    }

    groups.max(1)
}

fn suggestions(
    word_count: usize,
    readability: u8,
    keywords: &[KeywordDensity],
    headings: &[String],
) -> Vec<String> {
    let mut out = Vec::new();

    if word_count <= THIN_CONTENT_WORDS {
        out.push(format!(
            "Expand the page to more than {} words of original copy (currently {})",
            THIN_CONTENT_WORDS, word_count
        ));
    }

    if readability <= READABLE_SCORE {
        out.push("Shorten sentences and prefer plain words to improve readability".to_string());
    }

    match keywords.first() {
        None => out.push("Focus the copy on a few descriptive topic terms".to_string()),
        Some(top) => {
            if top.pct > STUFFING_PCT {
                out.push(format!(
                    "Reduce repetition of \"{}\" ({:.2}% of words)",
                    top.term, top.pct
                ));
            }
            let in_headings = headings
                .iter()
                .any(|heading| heading.to_lowercase().contains(&top.term));
            if !in_headings {
                out.push(format!("Use \"{}\" in at least one heading", top.term));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Hello, world! 42 -- ok"), 4);
        assert_eq!(count_words("   "), 0);
    }

    #[test]
    fn test_syllables() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("water"), 2);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("readability"), 5);
    }

    #[test]
    fn test_readability_range() {
        assert_eq!(flesch_reading_ease(""), 0);

        let easy = flesch_reading_ease("The cat sat on the mat. The dog ran to the park.");
        assert!(easy > 80, "easy text scored {}", easy);

        let hard = flesch_reading_ease(
            "Institutional organizational considerations notwithstanding, \
             interdisciplinary collaboration necessitates comprehensive \
             methodological reconceptualization of epistemological presuppositions",
        );
        assert!(hard <= 50, "hard text scored {}", hard);
    }

    #[test]
    fn test_content_hash_normalizes() {
        assert_eq!(content_hash("Hello   World"), content_hash("hello world"));
        assert_ne!(content_hash("hello world"), content_hash("hello there"));
        assert_eq!(content_hash("x").len(), 64);
    }

    #[test]
    fn test_analyze_content() {
        let body = "Fresh bread baked daily. ".repeat(80);
        let html = format!(
            "<html><body><h1>Fresh bread</h1><p>{}</p></body></html>",
            body
        );
        let doc = PageDocument::parse(&html, Url::parse("https://bakery.com/").unwrap());
        let signals = analyze_content(&doc, &StopWords::default());

        assert!(signals.word_count > THIN_CONTENT_WORDS);
        assert!(!signals.duplicate);
        assert_eq!(signals.keyword_density.len(), 4);
        assert_eq!(signals.keyword_density[0].term, "fresh");
        assert!(signals
            .suggestions
            .iter()
            .any(|s| s.starts_with("Reduce repetition")));
    }

    #[test]
    fn test_thin_content_suggestion() {
        let doc = PageDocument::parse(
            "<html><body><p>Short page</p></body></html>",
            Url::parse("https://a.com/").unwrap(),
        );
        let signals = analyze_content(&doc, &StopWords::default());
        assert_eq!(signals.word_count, 2);
        assert!(signals.suggestions[0].contains("currently 2"));
    }
}
