//! # Knowledge graph orchestration
//!
//! `Nexus` owns the running memory, connection and insight collections and
//! drives each note through the pipeline:
//! - Classify the note (tag + importance)
//! - Connect it to every memory ingested before it
//! - Synthesize insights over the updated graph
//! - Recompute progress and announce level-ups
//!
//! The whole pipeline runs under one write lock, so concurrent callers are
//! serialized and note N always sees notes 1..N-1.

use crate::classifier::Classifier;
use crate::config::NexusConfig;
use crate::connections::ConnectionFinder;
use crate::error::{MemoryError, Result};
use crate::keywords::KeywordExtractor;
use crate::progress::{Progress, ProgressEngine};
use crate::pulses::{pulse, NexusPulses};
use crate::synthesis::{Insight, SynthesisEngine};
use crate::types::{Memory, MemoryConnection, NoteInput};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Outcome of ingesting one note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub memory: Memory,
    pub connections: Vec<MemoryConnection>,
    pub insights: Vec<Insight>,
    pub progress: Progress,
    pub leveled_up: bool,
}

/// Point-in-time copy of the whole graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub memories: Vec<Memory>,
    pub connections: Vec<MemoryConnection>,
    pub insights: Vec<Insight>,
    pub progress: Progress,
    pub motivation: String,
}

#[derive(Debug, Default)]
struct GraphState {
    memories: Vec<Memory>,
    connections: Vec<MemoryConnection>,
    insights: Vec<Insight>,
}

impl GraphState {
    fn progress(&self) -> Progress {
        ProgressEngine::calculate_progress(
            self.memories.len() as u64,
            self.insights.len() as u64,
            self.connections.len() as u64,
        )
    }
}

/// In-memory knowledge graph
pub struct Nexus {
    state: RwLock<GraphState>,
    finder: ConnectionFinder,
    synthesizer: SynthesisEngine,
    synthesize_on_ingest: bool,
    pulses: NexusPulses,
}

impl Nexus {
    /// Create an empty graph. The config is validated first.
    pub fn new(config: NexusConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(&config))
    }

    fn with_config(config: &NexusConfig) -> Self {
        let extractor = KeywordExtractor::new().with_max_keywords(config.max_keywords);
        let finder = ConnectionFinder::new()
            .with_extractor(extractor)
            .with_max_connections(config.max_connections);
        let synthesizer = SynthesisEngine::new()
            .with_min_cluster_size(config.min_cluster_size)
            .with_max_recent_breakthroughs(config.max_recent_breakthroughs);

        Self {
            state: RwLock::new(GraphState::default()),
            finder,
            synthesizer,
            synthesize_on_ingest: config.synthesize_on_ingest,
            pulses: NexusPulses::new(config.pulse_capacity),
        }
    }

    // ============ Ingestion ============

    /// Run one note through classify → connect → synthesize → progress
    pub async fn ingest(&self, note: NoteInput) -> Result<IngestReport> {
        let note = note.normalized()?;
        let classification = Classifier::classify(&note.content, &note.title);

        let mut memory = Memory::new(note.title, note.content, classification);
        if let Some(created_at) = note.created_at {
            memory = memory.with_created_at(created_at);
        }

        let mut state = self.state.write().await;
        let before = state.progress();

        let connections = self.finder.find_connections(&memory, &state.memories);
        state.memories.push(memory.clone());
        state.connections.extend(connections.iter().cloned());

        let insights = if self.synthesize_on_ingest {
            self.synthesizer
                .generate_insights(&state.memories, &state.connections)
        } else {
            Vec::new()
        };
        state.insights.extend(insights.iter().cloned());

        let progress = state.progress();
        let leveled_up = ProgressEngine::check_level_up(before.xp, progress.xp);

        tracing::debug!(
            memory_id = %memory.id,
            tag = %memory.emotional_tag,
            connections = connections.len(),
            insights = insights.len(),
            xp = progress.xp,
            "Ingested memory"
        );

        // Emit while still holding the lock so pulses keep ingestion order
        self.pulses.emit(pulse::memory_ingested(memory.clone())).await;
        if !connections.is_empty() {
            self.pulses
                .emit(pulse::connections_formed(
                    memory.id.clone(),
                    connections.clone(),
                ))
                .await;
        }
        for insight in &insights {
            self.pulses
                .emit(pulse::insight_generated(insight.clone()))
                .await;
        }
        if leveled_up {
            let motivation = ProgressEngine::generate_motivation(progress.level);
            tracing::info!(
                old_level = before.level,
                new_level = progress.level,
                "Level up"
            );
            self.pulses
                .emit(pulse::level_up(before.level, progress.level, motivation))
                .await;
        }

        Ok(IngestReport {
            memory,
            connections,
            insights,
            progress,
            leveled_up,
        })
    }

    /// Ingest notes in order, stopping at the first invalid one
    pub async fn ingest_all(
        &self,
        notes: impl IntoIterator<Item = NoteInput>,
    ) -> Result<Vec<IngestReport>> {
        let mut reports = Vec::new();
        for note in notes {
            reports.push(self.ingest(note).await?);
        }
        Ok(reports)
    }

    // ============ Queries ============

    /// All memories in ingestion order
    pub async fn memories(&self) -> Vec<Memory> {
        self.state.read().await.memories.clone()
    }

    /// All connections in creation order
    pub async fn connections(&self) -> Vec<MemoryConnection> {
        self.state.read().await.connections.clone()
    }

    /// All insights in creation order
    pub async fn insights(&self) -> Vec<Insight> {
        self.state.read().await.insights.clone()
    }

    /// Look up a memory by ID
    pub async fn memory(&self, id: &str) -> Option<Memory> {
        let state = self.state.read().await;
        state.memories.iter().find(|m| m.id == id).cloned()
    }

    /// Connections touching a memory, in either direction
    pub async fn connections_of(&self, id: &str) -> Result<Vec<MemoryConnection>> {
        let state = self.state.read().await;
        if !state.memories.iter().any(|m| m.id == id) {
            return Err(MemoryError::NotFound(id.to_string()));
        }

        Ok(state
            .connections
            .iter()
            .filter(|c| c.touches(id))
            .cloned()
            .collect())
    }

    /// Current progress
    pub async fn progress(&self) -> Progress {
        self.state.read().await.progress()
    }

    /// Motivational line for the current level
    pub async fn motivation(&self) -> &'static str {
        ProgressEngine::generate_motivation(self.progress().await.level)
    }

    /// Copy of the whole graph
    pub async fn snapshot(&self) -> GraphSnapshot {
        let state = self.state.read().await;
        let progress = state.progress();

        GraphSnapshot {
            memories: state.memories.clone(),
            connections: state.connections.clone(),
            insights: state.insights.clone(),
            progress,
            motivation: ProgressEngine::generate_motivation(progress.level).to_string(),
        }
    }

    /// Get the pulses system for subscribing to events
    pub fn pulses(&self) -> &NexusPulses {
        &self.pulses
    }
}

impl Default for Nexus {
    fn default() -> Self {
        Self::with_config(&NexusConfig::default())
    }
}

impl std::fmt::Debug for Nexus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nexus")
            .field("finder", &self.finder)
            .field("synthesizer", &self.synthesizer)
            .finish()
    }
}
