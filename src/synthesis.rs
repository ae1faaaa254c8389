//! Insight synthesis
//!
//! This module turns the memory collection into narrative insights:
//! - Topic clusters: title keywords shared by several memories
//! - Breakthrough momentum: the most recent breakthrough-tagged memories
//!
//! Both rules run on every call and their outputs are concatenated, cluster
//! insights first. Nothing is de-duplicated across calls.

use crate::keywords::title_keywords;
use crate::types::{Memory, MemoryConnection, MemoryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for insights
pub type InsightId = String;

/// An insight generated from memory analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    /// Unique identifier
    pub id: InsightId,

    /// The insight text
    pub content: String,

    /// How novel the insight is (0 - 10)
    pub novelty_score: u8,

    /// Memories this insight was derived from, never empty
    pub source_memory_ids: Vec<MemoryId>,

    /// Type of insight
    pub insight_type: InsightType,

    /// When the insight was generated
    pub created_at: DateTime<Utc>,
}

impl Insight {
    fn new(
        content: String,
        novelty_score: u8,
        source_memory_ids: Vec<MemoryId>,
        insight_type: InsightType,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            novelty_score: novelty_score.min(MAX_NOVELTY),
            source_memory_ids,
            insight_type,
            created_at: Utc::now(),
        }
    }

    /// Star rating shown next to an insight (0 - 5)
    pub fn stars(&self) -> u8 {
        self.novelty_score.div_ceil(2).min(5)
    }
}

/// Types of insights
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Link between specific memories
    Connection,
    /// Recurring topic across memories
    Pattern,
    /// Topic cluster containing a breakthrough
    Breakthrough,
    /// Run of recent breakthroughs
    Evolution,
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightType::Connection => write!(f, "connection"),
            InsightType::Pattern => write!(f, "pattern"),
            InsightType::Breakthrough => write!(f, "breakthrough"),
            InsightType::Evolution => write!(f, "evolution"),
        }
    }
}

const MAX_NOVELTY: u8 = 10;
const EVOLUTION_NOVELTY: u8 = 9;

/// Fewest memories synthesis will look at
const MIN_MEMORIES: usize = 2;

/// A title keyword and the memories whose titles contain it
#[derive(Debug, Clone, PartialEq)]
pub struct TopicCluster {
    pub topic: String,
    pub memory_ids: Vec<MemoryId>,
}

/// Synthesis engine for analyzing memories
#[derive(Debug, Clone, Copy)]
pub struct SynthesisEngine {
    /// Members a topic needs to become a cluster
    min_cluster_size: usize,

    /// Breakthroughs cited by the momentum insight
    max_recent_breakthroughs: usize,
}

impl SynthesisEngine {
    /// Create a new synthesis engine
    pub fn new() -> Self {
        Self {
            min_cluster_size: 2,
            max_recent_breakthroughs: 3,
        }
    }

    /// Set minimum cluster size
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    /// Set how many breakthroughs the momentum insight cites
    pub fn with_max_recent_breakthroughs(mut self, max: usize) -> Self {
        self.max_recent_breakthroughs = max;
        self
    }

    /// Synthesize insights from the full memory and connection sets.
    ///
    /// Clusters come from shared title keywords only; `connections` is not
    /// consulted.
    // TODO: cluster on connected components of `connections` once callers
    // agree to the different cluster membership that produces.
    pub fn generate_insights(
        &self,
        memories: &[Memory],
        connections: &[MemoryConnection],
    ) -> Vec<Insight> {
        let mut insights = Vec::new();

        if memories.len() < MIN_MEMORIES {
            return insights;
        }

        let by_id: HashMap<&str, &Memory> =
            memories.iter().map(|m| (m.id.as_str(), m)).collect();

        for cluster in self.find_clusters(memories) {
            insights.push(self.cluster_insight(&cluster, &by_id));
        }

        if let Some(momentum) = self.breakthrough_momentum(memories) {
            insights.push(momentum);
        }

        tracing::debug!(
            memories = memories.len(),
            connections = connections.len(),
            insights = insights.len(),
            "Synthesized insights"
        );
        insights
    }

    /// Group memories by title keyword, keeping topics with enough members.
    ///
    /// Topics are ordered by first appearance, numeric topics included;
    /// members follow `memories`.
    pub fn find_clusters(&self, memories: &[Memory]) -> Vec<TopicCluster> {
        let mut clusters: Vec<TopicCluster> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for memory in memories {
            for keyword in title_keywords(&memory.title) {
                let slot = *index.entry(keyword.clone()).or_insert_with(|| {
                    clusters.push(TopicCluster {
                        topic: keyword,
                        memory_ids: Vec::new(),
                    });
                    clusters.len() - 1
                });

                let ids = &mut clusters[slot].memory_ids;
                if !ids.contains(&memory.id) {
                    ids.push(memory.id.clone());
                }
            }
        }

        clusters.retain(|c| c.memory_ids.len() >= self.min_cluster_size);
        clusters
    }

    fn cluster_insight(&self, cluster: &TopicCluster, by_id: &HashMap<&str, &Memory>) -> Insight {
        let size = cluster.memory_ids.len();
        let breakthroughs = cluster
            .memory_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()))
            .filter(|m| m.is_breakthrough())
            .count();

        let novelty = (size + 2 * breakthroughs).min(MAX_NOVELTY as usize) as u8;
        let insight_type = if breakthroughs > 0 {
            InsightType::Breakthrough
        } else {
            InsightType::Pattern
        };

        Insight::new(
            format!(
                "You're building a constellation of understanding around {}. {} connected ideas are forming a knowledge cluster.",
                cluster.topic, size
            ),
            novelty,
            cluster.memory_ids.clone(),
            insight_type,
        )
    }

    /// One evolution insight citing the newest breakthroughs, if any
    fn breakthrough_momentum(&self, memories: &[Memory]) -> Option<Insight> {
        let mut recent: Vec<&Memory> = memories.iter().filter(|m| m.is_breakthrough()).collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(self.max_recent_breakthroughs);

        if recent.is_empty() {
            return None;
        }

        Some(Insight::new(
            format!(
                "Breakthrough momentum detected! You've had {} major realizations recently. This is your evolution accelerating.",
                recent.len()
            ),
            EVOLUTION_NOVELTY,
            recent.iter().map(|m| m.id.clone()).collect(),
            InsightType::Evolution,
        ))
    }
}

impl Default for SynthesisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate insights with the default limits
pub fn generate_insights(memories: &[Memory], connections: &[MemoryConnection]) -> Vec<Insight> {
    SynthesisEngine::new().generate_insights(memories, connections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::connections::find_connections;
    use chrono::Duration;

    fn memory(title: &str, content: &str) -> Memory {
        Memory::new(title, content, classify(content, title))
    }

    #[test]
    fn test_fewer_than_two_memories_yields_nothing() {
        assert!(generate_insights(&[], &[]).is_empty());

        let lone = memory("Eureka moment", "I finally discovered the pattern");
        assert!(generate_insights(&[lone], &[]).is_empty());
    }

    #[test]
    fn test_pattern_cluster_with_breakthrough() {
        let a = memory("Eureka pattern", "I finally discovered the pattern");
        let b = memory("Pattern exploration", "Still exploring this pattern deeply");
        let connections = find_connections(&b, std::slice::from_ref(&a));
        let memories = vec![a.clone(), b.clone()];

        let insights = generate_insights(&memories, &connections);

        assert_eq!(insights.len(), 2);

        let cluster = &insights[0];
        assert_eq!(cluster.insight_type, InsightType::Breakthrough);
        assert_eq!(cluster.novelty_score, 4);
        assert_eq!(cluster.source_memory_ids, vec![a.id.clone(), b.id.clone()]);
        assert!(cluster.content.contains("around pattern"));
        assert!(cluster.content.contains("2 connected ideas"));

        let evolution = &insights[1];
        assert_eq!(evolution.insight_type, InsightType::Evolution);
        assert_eq!(evolution.novelty_score, 9);
        assert_eq!(evolution.source_memory_ids, vec![a.id]);
    }

    #[test]
    fn test_titles_without_shared_token_form_no_cluster() {
        // "Eureka moment" and "Pattern exploration" share content words but
        // no title token, so only the momentum insight appears.
        let a = memory("Eureka moment", "I finally discovered the pattern");
        let b = memory("Pattern exploration", "Still exploring this pattern deeply");
        let connections = find_connections(&b, std::slice::from_ref(&a));
        assert_eq!(connections.len(), 1);

        let insights = generate_insights(&[a.clone(), b], &connections);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].insight_type, InsightType::Evolution);
        assert_eq!(insights[0].source_memory_ids, vec![a.id]);
    }

    #[test]
    fn test_plain_pattern_cluster() {
        let a = memory("Garden notes", "Planted tomatoes");
        let b = memory("Garden plans", "Build raised beds");
        let c = memory("Unrelated", "Bought milk");

        let insights = generate_insights(&[a.clone(), b.clone(), c], &[]);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].insight_type, InsightType::Pattern);
        assert_eq!(insights[0].novelty_score, 2);
        assert_eq!(insights[0].source_memory_ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_title_tokens_are_not_normalized() {
        // "garden," and "garden" are different topics
        let a = memory("Garden, again", "Planted tomatoes");
        let b = memory("Garden plans", "Build raised beds");

        assert!(generate_insights(&[a, b], &[]).is_empty());
    }

    #[test]
    fn test_repeated_title_word_counts_memory_once() {
        let a = memory("loop loop loop", "first");
        let b = memory("loop", "second");

        let clusters = SynthesisEngine::new().find_clusters(&[a.clone(), b.clone()]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].memory_ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_clusters_follow_first_appearance() {
        let a = memory("rust async", "one");
        let b = memory("async rust", "two");

        let clusters = SynthesisEngine::new().find_clusters(&[a, b]);
        let topics: Vec<&str> = clusters.iter().map(|c| c.topic.as_str()).collect();
        assert_eq!(topics, vec!["rust", "async"]);
    }

    #[test]
    fn test_novelty_caps_at_ten() {
        let memories: Vec<Memory> = (0..6)
            .map(|i| memory("shared eureka", &format!("breakthrough number {i}")))
            .collect();

        let insights = generate_insights(&memories, &[]);
        let clusters: Vec<&Insight> = insights
            .iter()
            .filter(|i| i.insight_type == InsightType::Breakthrough)
            .collect();

        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|i| i.novelty_score == 10));
    }

    #[test]
    fn test_evolution_keeps_three_newest() {
        let base = Utc::now();
        let memories: Vec<Memory> = (0..5)
            .map(|i| {
                memory(&format!("idea{i}"), "a breakthrough")
                    .with_created_at(base + Duration::minutes(i))
            })
            .collect();

        let insights = generate_insights(&memories, &[]);

        assert_eq!(insights.len(), 1);
        let evolution = &insights[0];
        assert_eq!(evolution.insight_type, InsightType::Evolution);
        assert!(evolution.content.contains("3 major realizations"));
        let expected: Vec<MemoryId> = memories[2..].iter().rev().map(|m| m.id.clone()).collect();
        assert_eq!(evolution.source_memory_ids, expected);
    }

    #[test]
    fn test_zero_breakthrough_cap_emits_no_evolution() {
        let memories = vec![
            memory("first idea", "a breakthrough"),
            memory("second idea", "eureka again"),
        ];

        let insights = SynthesisEngine::new()
            .with_max_recent_breakthroughs(0)
            .generate_insights(&memories, &[]);

        assert!(insights
            .iter()
            .all(|i| i.insight_type != InsightType::Evolution));
        assert!(insights.iter().all(|i| !i.source_memory_ids.is_empty()));
    }

    #[test]
    fn test_numeric_topics_keep_first_appearance() {
        let a = memory("review 2024", "one");
        let b = memory("review 2024", "two");

        let clusters = SynthesisEngine::new().find_clusters(&[a, b]);
        let topics: Vec<&str> = clusters.iter().map(|c| c.topic.as_str()).collect();
        assert_eq!(topics, vec!["review", "2024"]);
    }

    #[test]
    fn test_sources_are_subset_of_memories() {
        let memories = vec![
            memory("Rust traits", "Thinking about trait objects"),
            memory("Rust lifetimes", "I realize lifetimes are regions"),
            memory("Traits again", "Stuck on coherence"),
        ];
        let ids: Vec<&str> = memories.iter().map(|m| m.id.as_str()).collect();

        for insight in generate_insights(&memories, &[]) {
            assert!(!insight.source_memory_ids.is_empty());
            for id in &insight.source_memory_ids {
                assert!(ids.contains(&id.as_str()));
            }
        }
    }

    #[test]
    fn test_repeated_calls_reemit() {
        let a = memory("Garden notes", "Planted tomatoes");
        let b = memory("Garden plans", "Build raised beds");
        let memories = vec![a, b];

        let first = generate_insights(&memories, &[]);
        let second = generate_insights(&memories, &[]);
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].content, second[0].content);
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn test_stars() {
        let a = memory("Garden notes", "Planted tomatoes");
        let b = memory("Garden plans", "Build raised beds");
        let mut insight = generate_insights(&[a, b], &[]).remove(0);

        insight.novelty_score = 0;
        assert_eq!(insight.stars(), 0);
        insight.novelty_score = 3;
        assert_eq!(insight.stars(), 2);
        insight.novelty_score = 10;
        assert_eq!(insight.stars(), 5);
    }
}
