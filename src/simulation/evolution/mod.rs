//! Evolutionary trainers.
//!
//! [`genetic::GeneticTrainer`] evolves rocket force genomes through a
//! fitness-proportional mating pool. [`neuro::NeuroTrainer`] evolves neural
//! predator brains through roulette selection and mutation only.

pub mod genetic;
pub mod neuro;

pub use genetic::GeneticTrainer;
pub use neuro::{NeuroTrainer, roulette_select};
