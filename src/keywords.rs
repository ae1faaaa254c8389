//! Keyword extraction
//!
//! Two tokenizers live here:
//! - [`extract_keywords`]: normalized, stop-word filtered, position biased.
//!   Feeds the connection finder.
//! - [`title_keywords`]: raw title tokens split on single spaces. Feeds
//!   cluster detection in the synthesizer.

/// Function words never treated as keywords
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "up", "about", "into", "through", "during", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "do", "does", "did", "will", "would", "could", "should", "may",
    "might", "can", "this", "that", "these", "those", "i", "you", "he", "she", "it", "we", "they",
    "what", "which", "who", "when", "where", "why", "how",
];

/// Tokens this short or shorter are dropped
const MIN_TOKEN_LEN: usize = 3;

/// Default number of keywords kept
pub const DEFAULT_MAX_KEYWORDS: usize = 10;

/// Check whether a word is in the stop-word set
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Extracts the leading salient terms of a text
#[derive(Debug, Clone, Copy)]
pub struct KeywordExtractor {
    max_keywords: usize,
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self {
            max_keywords: DEFAULT_MAX_KEYWORDS,
        }
    }

    /// Set the number of keywords kept
    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    /// Extract keywords in order of appearance. Repeats are kept.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        normalized
            .split_whitespace()
            .filter(|word| word.len() > MIN_TOKEN_LEN && !is_stop_word(word))
            .take(self.max_keywords)
            .map(str::to_string)
            .collect()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract up to 10 keywords from a text
pub fn extract_keywords(text: &str) -> Vec<String> {
    KeywordExtractor::new().extract(text)
}

/// Lowercased title tokens longer than 3 characters (Unicode scalar values).
///
/// Splits on single spaces only and keeps punctuation attached, so
/// "pattern," and "pattern" are different tokens.
pub fn title_keywords(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split(' ')
        .filter(|word| word.chars().count() > MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}
