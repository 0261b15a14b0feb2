//! Genome-driven agents trained by the genetic algorithm.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::agent::Body;
use super::context::{Target, TickContext};
use super::dna::Dna;
use super::geometric_utils::distance;

/// Speed cap.
pub const MAX_SPEED: f32 = 5.0;
/// Steering force cap.
pub const MAX_FORCE: f32 = 0.2;
/// Collision radius.
pub const RADIUS: f32 = 20.0;
/// Health at spawn.
pub const HEALTH: f32 = 10.0;
/// Closest distance before any observation.
pub const INITIAL_RECORD: f32 = 10_000.0;

/// Genome plus per-generation bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocketState {
    /// Per-tick forces.
    pub dna: Dna,
    /// Index of the next gene to apply.
    pub gene_counter: usize,
    /// Closest distance to the target so far.
    pub record_dist: f32,
    /// Ticks elapsed without touching the target.
    pub finish_time: u32,
    /// Set once the rocket enters a wall. The rocket stops moving.
    pub hit_obstacle: bool,
    /// Set once the rocket touches the target. Never cleared.
    pub hit_target: bool,
}

impl RocketState {
    /// Fresh state for a new generation.
    pub fn new(dna: Dna) -> Self {
        Self {
            dna,
            gene_counter: 0,
            record_dist: INITIAL_RECORD,
            finish_time: 0,
            hit_obstacle: false,
            hit_target: false,
        }
    }

    /// Updates the record distance and the contact flag.
    pub fn check_target(&mut self, body: &Body, target: &Target) {
        let d = distance(&body.pos, &target.pos);
        self.record_dist = self.record_dist.min(d);

        if self.hit_target {
            return;
        }
        if d < body.radius + target.radius {
            self.hit_target = true;
        } else {
            self.finish_time += 1;
        }
    }

    /// Returns the current gene and advances the counter, wrapping at the end.
    pub fn next_gene(&mut self) -> Array1<f32> {
        let gene = self.dna.gene(self.gene_counter);
        if !self.dna.is_empty() {
            self.gene_counter = (self.gene_counter + 1) % self.dna.len();
        }
        gene
    }

    /// Whether the rocket still applies genes.
    pub fn movable(&self) -> bool {
        !self.hit_obstacle && !self.hit_target
    }

    /// Flags wall entry and clamps the position into the world.
    pub fn check_obstacles(&mut self, body: &mut Body, ctx: &TickContext) {
        if body.inside_obstacle(&ctx.obstacles) {
            self.hit_obstacle = true;
        }
        if body.out_of_bounds(&ctx.bounds) {
            body.clamp_to(&ctx.bounds);
        }
    }

    /// Unnormalized fitness of this generation's run.
    pub fn fitness(&self) -> f64 {
        rocket_fitness(
            self.finish_time,
            self.record_dist,
            self.hit_obstacle,
            self.hit_target,
        )
    }
}

/// `(1 / (finish_time * record_dist))^4`, scaled by 0.1 after a wall hit and
/// doubled after touching the target.
///
/// Both factors are floored at 1.
pub fn rocket_fitness(finish_time: u32, record_dist: f32, hit_obstacle: bool, hit_target: bool) -> f64 {
    let time = f64::from(finish_time.max(1));
    let record = f64::from(record_dist.max(1.0));
    let mut fitness = (1.0 / (time * record)).powi(4);
    if hit_obstacle {
        fitness *= 0.1;
    }
    if hit_target {
        fitness *= 2.0;
    }
    fitness
}
