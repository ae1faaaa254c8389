//! Engine configuration

use crate::error::{MemoryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable limits for the knowledge graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NexusConfig {
    /// Keywords kept per extracted text
    pub max_keywords: usize,
    /// Connections emitted per ingested memory
    pub max_connections: usize,
    /// Members a title keyword needs before it forms a cluster
    pub min_cluster_size: usize,
    /// Breakthroughs cited by the evolution insight
    pub max_recent_breakthroughs: usize,
    /// Whether ingestion runs insight synthesis
    pub synthesize_on_ingest: bool,
    /// Pulse channel capacity (buffer size)
    pub pulse_capacity: usize,
}

impl Default for NexusConfig {
    fn default() -> Self {
        Self {
            max_keywords: 10,
            max_connections: 5,
            min_cluster_size: 2,
            max_recent_breakthroughs: 3,
            synthesize_on_ingest: true,
            pulse_capacity: 1000,
        }
    }
}

impl NexusConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limits that would make the engine degenerate
    pub fn validate(&self) -> Result<()> {
        if self.max_keywords == 0 {
            return Err(MemoryError::Configuration(
                "max_keywords must be at least 1".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(MemoryError::Configuration(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.min_cluster_size < 2 {
            return Err(MemoryError::Configuration(
                "min_cluster_size must be at least 2".to_string(),
            ));
        }
        if self.max_recent_breakthroughs == 0 {
            return Err(MemoryError::Configuration(
                "max_recent_breakthroughs must be at least 1".to_string(),
            ));
        }
        if self.pulse_capacity == 0 {
            return Err(MemoryError::Configuration(
                "pulse_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for nexus config
pub struct NexusConfigBuilder {
    config: NexusConfig,
}

impl NexusConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: NexusConfig::default(),
        }
    }

    pub fn max_keywords(mut self, max: usize) -> Self {
        self.config.max_keywords = max;
        self
    }

    pub fn max_connections(mut self, max: usize) -> Self {
        self.config.max_connections = max;
        self
    }

    pub fn min_cluster_size(mut self, size: usize) -> Self {
        self.config.min_cluster_size = size;
        self
    }

    pub fn max_recent_breakthroughs(mut self, max: usize) -> Self {
        self.config.max_recent_breakthroughs = max;
        self
    }

    pub fn synthesize_on_ingest(mut self, enable: bool) -> Self {
        self.config.synthesize_on_ingest = enable;
        self
    }

    pub fn pulse_capacity(mut self, capacity: usize) -> Self {
        self.config.pulse_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<NexusConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for NexusConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
