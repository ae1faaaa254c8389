//! Memory types and graph structures

use crate::classifier::Classification;
use crate::error::{MemoryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for memories
pub type MemoryId = String;

/// Unique identifier for connections
pub type ConnectionId = String;

/// A single classified note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Memory {
    /// Unique identifier
    pub id: MemoryId,
    /// Short headline of the note
    pub title: String,
    /// The note body
    pub content: String,
    /// Emotional tone assigned at ingestion
    pub emotional_tag: EmotionalTag,
    /// Importance score (1 - 5)
    pub importance: u8,
    /// When the memory was created
    pub created_at: DateTime<Utc>,
}

impl Memory {
    /// Create a new memory from a classification result
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        classification: Classification,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            emotional_tag: classification.emotional_tag,
            importance: classification.importance,
            created_at: Utc::now(),
        }
    }

    /// Override the creation time (used when replaying dated notes)
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Text the keyword extractor sees for this memory
    pub fn keyword_text(&self) -> String {
        format!("{} {}", self.content, self.title)
    }

    /// Check if this memory was tagged as a breakthrough
    pub fn is_breakthrough(&self) -> bool {
        self.emotional_tag == EmotionalTag::Breakthrough
    }
}

/// Emotional tone of a memory
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalTag {
    Joy,
    Curiosity,
    Frustration,
    Breakthrough,
    Reflection,
}

impl EmotionalTag {
    /// All emotional tags
    pub const ALL: &[EmotionalTag] = &[
        EmotionalTag::Joy,
        EmotionalTag::Curiosity,
        EmotionalTag::Frustration,
        EmotionalTag::Breakthrough,
        EmotionalTag::Reflection,
    ];
}

impl std::fmt::Display for EmotionalTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmotionalTag::Joy => write!(f, "joy"),
            EmotionalTag::Curiosity => write!(f, "curiosity"),
            EmotionalTag::Frustration => write!(f, "frustration"),
            EmotionalTag::Breakthrough => write!(f, "breakthrough"),
            EmotionalTag::Reflection => write!(f, "reflection"),
        }
    }
}

/// Weighted edge between two memories (graph edge)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryConnection {
    /// Unique identifier
    pub id: ConnectionId,
    /// The newly ingested memory
    pub from_memory_id: MemoryId,
    /// The earlier memory it resembles
    pub to_memory_id: MemoryId,
    /// Strength of the connection (0 - 10)
    pub strength: u8,
    /// Type of relationship
    pub connection_type: ConnectionType,
    /// When the connection was created
    pub created_at: DateTime<Utc>,
}

impl MemoryConnection {
    /// Create a new connection
    pub fn new(
        from_memory_id: impl Into<MemoryId>,
        to_memory_id: impl Into<MemoryId>,
        connection_type: ConnectionType,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from_memory_id: from_memory_id.into(),
            to_memory_id: to_memory_id.into(),
            strength: 0,
            connection_type,
            created_at: Utc::now(),
        }
    }

    /// Set the strength
    pub fn with_strength(mut self, strength: u8) -> Self {
        self.strength = strength.min(10);
        self
    }

    /// Check if either endpoint is the given memory
    pub fn touches(&self, memory_id: &str) -> bool {
        self.from_memory_id == memory_id || self.to_memory_id == memory_id
    }
}

/// Types of relationships between memories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    /// Shared vocabulary
    Related,
    /// Conflicting information
    Contradicts,
    /// Builds on the target
    Expands,
    /// Puts the target into practice
    Applies,
}

impl std::fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionType::Related => write!(f, "related"),
            ConnectionType::Contradicts => write!(f, "contradicts"),
            ConnectionType::Expands => write!(f, "expands"),
            ConnectionType::Applies => write!(f, "applies"),
        }
    }
}

/// Raw note as submitted by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Trim both fields, rejecting notes with a blank title or body
    pub fn normalized(self) -> Result<Self> {
        let title = self.title.trim();
        let content = self.content.trim();

        if title.is_empty() {
            return Err(MemoryError::Validation("note title is empty".to_string()));
        }
        if content.is_empty() {
            return Err(MemoryError::Validation("note content is empty".to_string()));
        }

        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_fields() {
        let note = NoteInput::new("  Title ", "\tbody text\n").normalized().unwrap();
        assert_eq!(note.title, "Title");
        assert_eq!(note.content, "body text");
    }

    #[test]
    fn test_normalized_rejects_blank_title() {
        let err = NoteInput::new("   ", "content").normalized().unwrap_err();
        assert!(matches!(err, MemoryError::Validation(_)));
    }

    #[test]
    fn test_normalized_rejects_blank_content() {
        let err = NoteInput::new("title", "").normalized().unwrap_err();
        assert!(matches!(err, MemoryError::Validation(_)));
    }

    #[test]
    fn test_connection_strength_is_capped() {
        let conn = MemoryConnection::new("a", "b", ConnectionType::Related).with_strength(14);
        assert_eq!(conn.strength, 10);
        assert!(conn.touches("a"));
        assert!(conn.touches("b"));
        assert!(!conn.touches("c"));
    }

    #[test]
    fn test_every_tag_serializes_as_its_display_name() {
        for tag in EmotionalTag::ALL {
            let json = serde_json::to_string(tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag));
            let back: EmotionalTag = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *tag);
        }
    }

    #[test]
    fn test_emotional_tag_serde_is_snake_case() {
        let json = serde_json::to_string(&EmotionalTag::Breakthrough).unwrap();
        assert_eq!(json, "\"breakthrough\"");
        assert_eq!(EmotionalTag::Reflection.to_string(), "reflection");
    }
}
