//! Pulses - Event system for knowledge graph changes
//!
//! A publish-subscribe channel the ingestion pipeline reports into, so a
//! front end can animate new stars, draw new edges, or announce a level-up
//! without polling.
//!
//! Example:
//! ```rust,no_run
//! use nexus::{Nexus, NoteInput, Pulse};
//!
//! #[tokio::main]
//! async fn main() {
//!     let nexus = Nexus::default();
//!     let mut subscriber = nexus.pulses().subscribe();
//!
//!     tokio::spawn(async move {
//!         while let Ok(pulse) = subscriber.recv().await {
//!             if let Pulse::LevelUp { new_level, .. } = pulse {
//!                 println!("Level {new_level}!");
//!             }
//!         }
//!     });
//!
//!     nexus.ingest(NoteInput::new("First", "Hello graph")).await.unwrap();
//! }
//! ```

use crate::synthesis::Insight;
use crate::types::{Memory, MemoryConnection, MemoryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// A pulse (event) emitted by the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Pulse {
    /// A note was classified and added
    MemoryIngested {
        memory: Memory,
        timestamp: DateTime<Utc>,
    },

    /// A new memory was linked to earlier ones
    ConnectionsFormed {
        memory_id: MemoryId,
        connections: Vec<MemoryConnection>,
        timestamp: DateTime<Utc>,
    },

    /// An insight was synthesized
    InsightGenerated {
        insight: Insight,
        timestamp: DateTime<Utc>,
    },

    /// Accumulated progress crossed a level boundary
    LevelUp {
        old_level: u32,
        new_level: u32,
        motivation: String,
        timestamp: DateTime<Utc>,
    },
}

impl Pulse {
    /// Get the timestamp of the pulse
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Pulse::MemoryIngested { timestamp, .. } => *timestamp,
            Pulse::ConnectionsFormed { timestamp, .. } => *timestamp,
            Pulse::InsightGenerated { timestamp, .. } => *timestamp,
            Pulse::LevelUp { timestamp, .. } => *timestamp,
        }
    }

    /// Get the memory ID if applicable
    pub fn memory_id(&self) -> Option<&str> {
        match self {
            Pulse::MemoryIngested { memory, .. } => Some(&memory.id),
            Pulse::ConnectionsFormed { memory_id, .. } => Some(memory_id),
            _ => None,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> String {
        match self {
            Pulse::MemoryIngested { memory, .. } => {
                format!("New {} memory: {}", memory.emotional_tag, memory.title)
            }
            Pulse::ConnectionsFormed {
                memory_id,
                connections,
                ..
            } => {
                format!("Memory {} formed {} connections", memory_id, connections.len())
            }
            Pulse::InsightGenerated { insight, .. } => {
                format!("Insight ({}): {}", insight.insight_type, insight.content)
            }
            Pulse::LevelUp {
                old_level,
                new_level,
                ..
            } => {
                format!("Level up: {} -> {}", old_level, new_level)
            }
        }
    }
}

/// Types of pulses (for filtering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PulseType {
    MemoryIngested,
    ConnectionsFormed,
    InsightGenerated,
    LevelUp,
}

impl From<&Pulse> for PulseType {
    fn from(pulse: &Pulse) -> Self {
        match pulse {
            Pulse::MemoryIngested { .. } => PulseType::MemoryIngested,
            Pulse::ConnectionsFormed { .. } => PulseType::ConnectionsFormed,
            Pulse::InsightGenerated { .. } => PulseType::InsightGenerated,
            Pulse::LevelUp { .. } => PulseType::LevelUp,
        }
    }
}

/// Filter for subscribing to specific pulse types
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PulseFilter {
    /// Only receive pulses of these types
    pub pulse_types: Option<Vec<PulseType>>,

    /// Only receive insights at or above this novelty
    pub min_novelty: Option<u8>,
}

impl PulseFilter {
    /// Create a new filter that accepts all pulses
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by pulse type
    pub fn with_pulse_type(mut self, pulse_type: PulseType) -> Self {
        self.pulse_types
            .get_or_insert_with(Vec::new)
            .push(pulse_type);
        self
    }

    /// Filter insights by minimum novelty
    pub fn with_min_novelty(mut self, novelty: u8) -> Self {
        self.min_novelty = Some(novelty);
        self
    }

    /// Check if a pulse matches this filter
    pub fn matches(&self, pulse: &Pulse) -> bool {
        if let Some(ref types) = self.pulse_types {
            let pulse_type: PulseType = pulse.into();
            if !types.contains(&pulse_type) {
                return false;
            }
        }

        if let Some(min) = self.min_novelty {
            if let Pulse::InsightGenerated { insight, .. } = pulse {
                if insight.novelty_score < min {
                    return false;
                }
            }
        }

        true
    }
}

/// Statistics for pulse monitoring
#[derive(Debug, Clone, Default)]
pub struct PulseStats {
    pub total_emitted: u64,
    pub last_emitted: Option<DateTime<Utc>>,
    pub by_type: HashMap<PulseType, u64>,
}

/// Event bus for the knowledge graph
#[derive(Debug, Clone)]
pub struct NexusPulses {
    sender: broadcast::Sender<Pulse>,
    stats: Arc<RwLock<PulseStats>>,
}

impl NexusPulses {
    /// Create a new pulse system with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));

        Self {
            sender,
            stats: Arc::new(RwLock::new(PulseStats::default())),
        }
    }

    /// Subscribe to all pulses
    pub fn subscribe(&self) -> broadcast::Receiver<Pulse> {
        self.sender.subscribe()
    }

    /// Subscribe with a filter
    pub fn subscribe_filtered(&self, filter: PulseFilter) -> FilteredSubscriber {
        FilteredSubscriber::new(self.sender.subscribe(), filter)
    }

    /// Emit a pulse
    pub async fn emit(&self, pulse: Pulse) {
        {
            let mut stats = self.stats.write().await;
            stats.total_emitted += 1;
            stats.last_emitted = Some(pulse.timestamp());
            *stats.by_type.entry((&pulse).into()).or_insert(0) += 1;
        }

        // No receivers is normal when nobody is listening
        if self.sender.send(pulse).is_err() {
            tracing::trace!("Pulse dropped, no subscribers");
        }
    }

    /// Get current stats
    pub async fn stats(&self) -> PulseStats {
        self.stats.read().await.clone()
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NexusPulses {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Filtered subscriber that only yields matching pulses
pub struct FilteredSubscriber {
    receiver: broadcast::Receiver<Pulse>,
    filter: PulseFilter,
}

impl FilteredSubscriber {
    fn new(receiver: broadcast::Receiver<Pulse>, filter: PulseFilter) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next matching pulse; `None` once the channel closes
    pub async fn recv(&mut self) -> Option<Pulse> {
        loop {
            match self.receiver.recv().await {
                Ok(pulse) if self.filter.matches(&pulse) => return Some(pulse),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Pulse subscriber lagged, skipped {} pulses", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive without blocking
    pub fn try_recv(&mut self) -> Option<Pulse> {
        loop {
            match self.receiver.try_recv() {
                Ok(pulse) if self.filter.matches(&pulse) => return Some(pulse),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Pulse subscriber lagged, skipped {} pulses", skipped);
                }
                Err(_) => return None,
            }
        }
    }
}

/// Helper functions for creating pulses
pub mod pulse {
    use super::*;

    pub fn memory_ingested(memory: Memory) -> Pulse {
        Pulse::MemoryIngested {
            memory,
            timestamp: Utc::now(),
        }
    }

    pub fn connections_formed(memory_id: MemoryId, connections: Vec<MemoryConnection>) -> Pulse {
        Pulse::ConnectionsFormed {
            memory_id,
            connections,
            timestamp: Utc::now(),
        }
    }

    pub fn insight_generated(insight: Insight) -> Pulse {
        Pulse::InsightGenerated {
            insight,
            timestamp: Utc::now(),
        }
    }

    pub fn level_up(old_level: u32, new_level: u32, motivation: impl Into<String>) -> Pulse {
        Pulse::LevelUp {
            old_level,
            new_level,
            motivation: motivation.into(),
            timestamp: Utc::now(),
        }
    }
}
