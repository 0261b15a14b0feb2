//! Steering-driven predators for the scripted levels.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::Body;
use super::context::TickContext;
use super::geometric_utils::zero;
use super::params::SteeringConfig;
use super::steering;

/// Collision radius of a steering predator.
pub const PREDATOR_RADIUS: f32 = 50.0;
/// From this level on predators cannot pass through walls.
pub const SOLID_OBSTACLE_LEVEL: u32 = 3;
/// Weight of the avoidance term.
pub const AVOID_WEIGHT: f32 = 2.5;
/// Weight of the separation term.
pub const SEPARATION_WEIGHT: f32 = 1.5;
/// Weight of the boundary term.
pub const BOUNDARY_WEIGHT: f32 = 3.0;
/// Distance from the world edge at which boundary steering kicks in.
pub const BOUNDARY_MARGIN: f32 = 50.0;

/// Health granted to a predator of `level`.
pub fn predator_health(level: u32) -> f32 {
    2.0 * level as f32
}

/// Per-predator steering state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredatorState {
    /// Behavior switches, fixed at spawn.
    pub config: SteeringConfig,
    /// Persistent wander angle.
    pub wander_theta: f32,
}

impl PredatorState {
    /// Creates the state for a freshly spawned predator.
    pub fn new(config: SteeringConfig) -> Self {
        Self {
            config,
            wander_theta: 0.0,
        }
    }

    /// Sums every enabled behavior into one force.
    ///
    /// Only one of pursue, arrive and seek contributes, in that priority.
    pub fn behaviors<R: Rng + ?Sized>(
        &mut self,
        body: &Body,
        ctx: &TickContext,
        neighbours: &[Array1<f32>],
        rng: &mut R,
    ) -> Array1<f32> {
        let config = self.config;
        let target = &ctx.target;
        let mut force = zero();

        if config.avoid_obstacles {
            force += &(steering::avoid_obstacles(body, &ctx.obstacles) * AVOID_WEIGHT);
        }

        let chase = if config.pursue {
            Some(steering::pursue(body, &target.pos, &target.vel))
        } else if config.arrive {
            Some(steering::arrive(body, &target.pos))
        } else if config.seek {
            Some(steering::seek(body, &target.pos))
        } else {
            None
        };
        if let Some(chase) = chase {
            force += &(chase * config.seek_weight);
        }

        if config.wander {
            let drift = steering::wander(body, &mut self.wander_theta, rng);
            force += &(drift * config.wander_weight);
        }

        if config.separation {
            let push = steering::separation(body, neighbours, body.radius * 2.0);
            force += &(push * SEPARATION_WEIGHT);
        }

        if ctx.boundaries_enabled {
            force += &(steering::boundaries(body, &ctx.bounds, BOUNDARY_MARGIN) * BOUNDARY_WEIGHT);
        }

        force
    }
}
