//! Emotional tone and importance classification
//!
//! Classification is a fixed rule table evaluated top to bottom. The first
//! rule with a keyword contained in the lowercased `content + title` wins;
//! notes matching nothing fall back to curiosity.

use crate::types::EmotionalTag;
use serde::{Deserialize, Serialize};

/// Ordered (keywords, tag) rules. Order is the tie-break.
const RULES: &[(&[&str], EmotionalTag)] = &[
    (
        &["breakthrough", "eureka", "discovered", "realize"],
        EmotionalTag::Breakthrough,
    ),
    (
        &["happy", "excited", "love", "amazing", "wonderful"],
        EmotionalTag::Joy,
    ),
    (
        &["stuck", "confused", "frustrated", "difficult", "hard"],
        EmotionalTag::Frustration,
    ),
    (
        &["thinking", "wonder", "exploring", "learning", "understand"],
        EmotionalTag::Curiosity,
    ),
    (
        &["reflect", "consider", "ponder", "contemplat"],
        EmotionalTag::Reflection,
    ),
];

const DEFAULT_TAG: EmotionalTag = EmotionalTag::Curiosity;

/// Characters of content per importance point
const CHARS_PER_IMPORTANCE: usize = 100;
const MIN_IMPORTANCE: u8 = 1;
const MAX_IMPORTANCE: u8 = 5;

/// Result of classifying a note
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub emotional_tag: EmotionalTag,
    pub importance: u8,
}

/// Rule-based classifier for incoming notes
pub struct Classifier;

impl Classifier {
    /// Classify a note by its body and title
    pub fn classify(content: &str, title: &str) -> Classification {
        Classification {
            emotional_tag: Self::emotional_tag(content, title),
            importance: Self::importance(content),
        }
    }

    /// Pick the emotional tag of the first matching rule
    pub fn emotional_tag(content: &str, title: &str) -> EmotionalTag {
        let text = format!("{content}{title}").to_lowercase();

        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
            .map(|(_, tag)| *tag)
            .unwrap_or(DEFAULT_TAG)
    }

    /// Length-based importance: one point per started 100 characters, 1..=5.
    /// Characters are Unicode scalar values, so an emoji counts once.
    pub fn importance(content: &str) -> u8 {
        let chars = content.chars().count();
        let points = chars.div_ceil(CHARS_PER_IMPORTANCE);
        points.clamp(MIN_IMPORTANCE as usize, MAX_IMPORTANCE as usize) as u8
    }
}

/// Classify a note with the default rule table
pub fn classify(content: &str, title: &str) -> Classification {
    Classifier::classify(content, title)
}
