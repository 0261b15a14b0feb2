//! Per-generation training summaries kept in a bounded window.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Summary of one finished generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation the numbers belong to.
    pub generation: u32,
    /// Highest raw fitness.
    pub best_fitness: f64,
    /// Mean raw fitness.
    pub mean_fitness: f64,
    /// Highest training score (neural predators only).
    pub best_score: f32,
    /// Individuals that reached the target.
    pub successes: usize,
}

impl GenerationStats {
    /// Aggregates raw fitness values of a generation.
    pub fn from_fitness(generation: u32, fitness: &[f64], best_score: f32, successes: usize) -> Self {
        let best_fitness = fitness.iter().copied().fold(0.0, f64::max);
        let mean_fitness = if fitness.is_empty() {
            0.0
        } else {
            fitness.iter().sum::<f64>() / fitness.len() as f64
        };
        Self {
            generation,
            best_fitness,
            mean_fitness,
            best_score,
            successes,
        }
    }
}

/// Rolling window of recent generation summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Recent generations, oldest first.
    pub records: VecDeque<GenerationStats>,
    /// Maximum number of generations to keep
    pub max_history: usize,
}

impl Default for TrainingHistory {
    fn default() -> Self {
        Self {
            records: VecDeque::new(),
            max_history: 100, // Track last 100 generations
        }
    }
}

impl TrainingHistory {
    /// Appends a generation, dropping the oldest past `max_history`.
    pub fn record(&mut self, stats: GenerationStats) {
        self.records.push_back(stats);
        if self.records.len() > self.max_history {
            self.records.pop_front();
        }
    }

    /// Most recent generation.
    pub fn latest(&self) -> Option<&GenerationStats> {
        self.records.back()
    }

    /// Generation with the highest best fitness still in the window.
    pub fn best_ever(&self) -> Option<&GenerationStats> {
        self.records
            .iter()
            .max_by(|a, b| a.best_fitness.total_cmp(&b.best_fitness))
    }
}
