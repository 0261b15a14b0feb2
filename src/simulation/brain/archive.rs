//! Ranked collection of trained brains, ready to seed a boss encounter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NetworkWeights, NeuralNetwork};
use crate::simulation::error::LoadError;

/// Top brains of a training session, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrainArchive {
    /// When the session ended.
    pub saved_at: DateTime<Utc>,
    /// Generation the brains were taken from.
    pub generation: u32,
    /// Exported weights, ranked by score.
    pub brains: Vec<NetworkWeights>,
}

impl BrainArchive {
    /// Snapshots `brains` at `generation`.
    pub fn new(generation: u32, brains: &[NeuralNetwork]) -> Self {
        Self {
            saved_at: Utc::now(),
            generation,
            brains: brains.iter().map(NeuralNetwork::to_weights).collect(),
        }
    }

    /// Rebuilds every brain, failing on the first invalid one.
    pub fn networks(&self) -> Result<Vec<NeuralNetwork>, LoadError> {
        self.brains.iter().map(NeuralNetwork::from_weights).collect()
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses an archive and validates every brain in it.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let archive: Self = serde_json::from_str(json)?;
        archive.networks()?;
        Ok(archive)
    }
}
