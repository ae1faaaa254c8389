//! # Nexus - Personal Knowledge Graph Engine
//!
//! Turns free-form notes into a growing graph:
//! - `classifier`: emotional tag and importance per note
//! - `keywords`: stop-word filtered keyword extraction
//! - `connections`: keyword-overlap edges to earlier notes
//! - `synthesis`: narrative insights over the whole collection
//! - `progress`: experience points, levels and motivation
//!
//! The core functions are pure. [`Nexus`] wires them into an in-memory,
//! ingestion-ordered graph and reports each step through [`NexusPulses`].

pub mod classifier;
pub mod config;
pub mod connections;
pub mod error;
pub mod keywords;
pub mod nexus;
pub mod progress;
pub mod pulses;
pub mod synthesis;
pub mod types;

pub use classifier::{classify, Classification, Classifier};
pub use config::{NexusConfig, NexusConfigBuilder};
pub use connections::{find_connections, ConnectionFinder, DEFAULT_MAX_CONNECTIONS};
pub use error::{MemoryError, Result};
pub use keywords::{
    extract_keywords, is_stop_word, title_keywords, KeywordExtractor, DEFAULT_MAX_KEYWORDS,
};
pub use nexus::{GraphSnapshot, IngestReport, Nexus};
pub use progress::{
    calculate_progress, check_level_up, generate_motivation, Progress, ProgressEngine,
};
pub use pulses::{
    pulse, FilteredSubscriber, NexusPulses, Pulse, PulseFilter, PulseStats, PulseType,
};
pub use synthesis::{
    generate_insights, Insight, InsightId, InsightType, SynthesisEngine, TopicCluster,
};
pub use types::{
    ConnectionId, ConnectionType, EmotionalTag, Memory, MemoryConnection, MemoryId, NoteInput,
};
