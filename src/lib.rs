//! # Globys Escape - Predator AI Core
//!
//! The decision layer of a 2D arcade survival game: predators hunt the player
//! across five escalating levels, the last one a neural-network-controlled boss.
//!
//! ## Features
//!
//! - Steering behaviors (seek, flee, arrive, pursue, wander, obstacle avoidance,
//!   boundary containment, separation)
//! - Feed-forward neural network brains (13 → 16 → 2, sigmoid activation)
//! - Genetic algorithm over per-tick force genomes (rockets)
//! - Neuroevolution over network weights (neural predators)
//! - Validated brain import/export as JSON
//! - A tick-driven arena resolving arrows, damage and player contact
//!
//! ## Core Modules
//!
//! - [`simulation::steering`] - Stateless steering forces
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::agent`] - Shared kinematics and decision dispatch
//! - [`simulation::evolution`] - Genetic and neuroevolution trainers
//! - [`simulation::arena`] - Live gameplay tick loop
//! - [`simulation::events`] - Event queue for cross-agent updates

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agents: kinematic body plus a tagged decision strategy.
    pub mod agent;
    /// Live gameplay loop advancing predators and arrows one tick at a time.
    pub mod arena;
    /// Neural network implementation for predator brains.
    pub mod brain;
    /// Per-tick world snapshot handed to every decision.
    pub mod context;
    /// Force-vector genomes driving rockets.
    pub mod dna;
    /// Error types surfaced by the core.
    pub mod error;
    /// Event queue for cross-agent state updates.
    pub mod events;
    /// Genetic and neuroevolution trainers.
    pub mod evolution;
    /// Vector helpers, ray casting and rectangle geometry.
    pub mod geometric_utils;
    /// Trait for locatable entities that can be updated.
    ///
    /// The [`locatable::Locatable`] trait is implemented by [`agent::Agent`], the
    /// single entity type every predator, rocket and arrow is built from.
    pub mod locatable;
    /// Network-driven boss predator: sensing and thinking.
    pub mod neural_predator;
    /// Steering configuration and training parameters.
    pub mod params;
    /// Steering-behavior driven predator.
    pub mod predator;
    /// Homing arrows fired by the player.
    pub mod projectile;
    /// Genome-driven rocket agents.
    pub mod rocket;
    /// K-d tree over agent positions.
    pub mod spatial;
    /// Per-generation training statistics.
    pub mod stats;
    /// Stateless steering forces.
    pub mod steering;
}
