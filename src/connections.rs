//! Lexical connection discovery between a new memory and earlier ones

use crate::keywords::KeywordExtractor;
use crate::types::{ConnectionType, Memory, MemoryConnection};
use std::collections::HashSet;

/// Default number of connections per ingested memory
pub const DEFAULT_MAX_CONNECTIONS: usize = 5;

/// Strength contributed by each shared keyword
const STRENGTH_PER_SHARED_KEYWORD: usize = 2;
const MAX_STRENGTH: usize = 10;

/// Finds keyword overlap between a new memory and the memories before it
#[derive(Debug, Clone, Copy)]
pub struct ConnectionFinder {
    extractor: KeywordExtractor,
    max_connections: usize,
}

impl ConnectionFinder {
    pub fn new() -> Self {
        Self {
            extractor: KeywordExtractor::new(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Use a custom keyword extractor
    pub fn with_extractor(mut self, extractor: KeywordExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Set the number of connections emitted
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Connect `new_memory` to every existing memory it shares keywords with.
    ///
    /// Results follow the order of `existing` and stop after
    /// `max_connections`; they are not ranked by strength. Callers pass all
    /// memories ingested strictly before `new_memory`.
    pub fn find_connections(
        &self,
        new_memory: &Memory,
        existing: &[Memory],
    ) -> Vec<MemoryConnection> {
        let new_words: HashSet<String> = self
            .extractor
            .extract(&new_memory.keyword_text())
            .into_iter()
            .collect();

        let mut connections = Vec::new();
        if new_words.is_empty() {
            return connections;
        }

        for memory in existing {
            if connections.len() >= self.max_connections {
                break;
            }
            if memory.id == new_memory.id {
                continue;
            }

            let existing_words: HashSet<String> = self
                .extractor
                .extract(&memory.keyword_text())
                .into_iter()
                .collect();
            let shared = new_words.intersection(&existing_words).count();

            if shared > 0 {
                let strength = (shared * STRENGTH_PER_SHARED_KEYWORD).min(MAX_STRENGTH) as u8;
                connections.push(
                    MemoryConnection::new(&new_memory.id, &memory.id, ConnectionType::Related)
                        .with_strength(strength),
                );
            }
        }

        tracing::debug!(
            memory_id = %new_memory.id,
            candidates = existing.len(),
            found = connections.len(),
            "Found connections"
        );
        connections
    }
}

impl Default for ConnectionFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Find connections with the default limits
pub fn find_connections(new_memory: &Memory, existing: &[Memory]) -> Vec<MemoryConnection> {
    ConnectionFinder::new().find_connections(new_memory, existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    fn memory(title: &str, content: &str) -> Memory {
        Memory::new(title, content, classify(content, title))
    }

    #[test]
    fn test_shared_keyword_forms_connection() {
        let a = memory("Eureka moment", "I finally discovered the pattern");
        let b = memory("Pattern exploration", "Still exploring this pattern deeply");

        let connections = find_connections(&b, std::slice::from_ref(&a));

        assert_eq!(connections.len(), 1);
        let conn = &connections[0];
        assert_eq!(conn.from_memory_id, b.id);
        assert_eq!(conn.to_memory_id, a.id);
        assert_eq!(conn.strength, 2);
        assert_eq!(conn.connection_type, ConnectionType::Related);
    }

    #[test]
    fn test_no_overlap_no_connection() {
        let a = memory("Cooking", "Tomatoes and basil");
        let b = memory("Running", "Morning jog around lake");

        assert!(find_connections(&b, &[a]).is_empty());
    }

    #[test]
    fn test_duplicates_collapse_in_intersection() {
        let a = memory("notes", "graph graph graph");
        let b = memory("more notes", "graph graph");

        // shared set is {graph, notes}
        let connections = find_connections(&b, &[a]);
        assert_eq!(connections[0].strength, 4);
    }

    #[test]
    fn test_strength_clamps_at_ten() {
        let text = "alpha bravo charlie delta echoes foxtrot";
        let a = memory("one", text);
        let b = memory("two", text);

        let connections = find_connections(&b, &[a]);
        assert_eq!(connections[0].strength, 10);
    }

    #[test]
    fn test_skips_self() {
        let a = memory("Graph theory", "Graph theory basics");
        let connections = find_connections(&a, std::slice::from_ref(&a));
        assert!(connections.is_empty());
    }

    #[test]
    fn test_truncates_in_input_order() {
        let existing: Vec<Memory> = (0..8)
            .map(|i| {
                // later memories share more keywords
                let extra = ["alpha", "bravo", "charlie", "delta"][..(i % 4)].join(" ");
                memory(&format!("entry{i}"), &format!("rust {extra}"))
            })
            .collect();
        let new_memory = memory("latest", "rust alpha bravo charlie delta");

        let connections = find_connections(&new_memory, &existing);

        assert_eq!(connections.len(), 5);
        let targets: Vec<&str> = connections.iter().map(|c| c.to_memory_id.as_str()).collect();
        let expected: Vec<&str> = existing[..5].iter().map(|m| m.id.as_str()).collect();
        assert_eq!(targets, expected);
        for conn in &connections {
            assert!(conn.strength <= 10);
            assert_eq!(conn.strength % 2, 0);
            assert_ne!(conn.to_memory_id, new_memory.id);
        }
    }

    #[test]
    fn test_custom_limit() {
        let existing = vec![memory("graph one", "graph"), memory("graph two", "graph")];
        let new_memory = memory("graph three", "graph");

        let connections = ConnectionFinder::new()
            .with_max_connections(1)
            .find_connections(&new_memory, &existing);
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].to_memory_id, existing[0].id);
    }

    #[test]
    fn test_empty_existing() {
        let a = memory("Graph", "Graph theory");
        assert!(find_connections(&a, &[]).is_empty());
    }
}
