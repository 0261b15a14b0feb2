//! Network-driven boss: ray-cast perception, inference and training
//! bookkeeping.
//!
//! Perception produces a fixed 13-value observation:
//!
//! | index      | value                                                   |
//! |------------|---------------------------------------------------------|
//! | 0, 2, .. 8 | wall distance along ray / ray length (1 = nothing hit)  |
//! | 1, 3, .. 9 | `1 - d / 300` if the player sits in the ray's cone      |
//! | 10         | angle to target relative to heading, divided by PI      |
//! | 11         | `1 - clamp(d, 0, 800) / 800`                            |
//! | 12         | speed / max speed                                       |

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, PI};

use geo::Line;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::agent::Body;
use super::brain::{INPUT_NODES, NeuralNetwork};
use super::context::TickContext;
use super::error::PredictError;
use super::geometric_utils::{
    distance, from_angle, heading, limit, ray_rect_intersection, to_coord, vec2, wrap_angle,
};
use super::predator::{BOUNDARY_MARGIN, BOUNDARY_WEIGHT};
use super::steering;

/// Speed cap.
pub const MAX_SPEED: f32 = 5.0;
/// Steering force cap.
pub const MAX_FORCE: f32 = 0.2;
/// Collision radius.
pub const RADIUS: f32 = 45.0;
/// Health at spawn.
pub const HEALTH: f32 = 10.0;

/// Ray directions relative to the heading.
pub const RAY_ANGLES: [f32; 5] = [-FRAC_PI_2, -FRAC_PI_4, 0.0, FRAC_PI_4, FRAC_PI_2];
/// Length of the wall-sensing rays.
pub const RAY_LENGTH: f32 = 200.0;
/// Player detection range as a multiple of [`RAY_LENGTH`].
pub const DETECTION_FACTOR: f32 = 1.5;
/// Half-angle of each ray's player-detection cone.
pub const DETECTION_HALF_ANGLE: f32 = FRAC_PI_6;
/// Distance at which the normalized target distance bottoms out.
pub const MAX_TARGET_DISTANCE: f32 = 800.0;

/// Score added for every tick survived.
pub const SURVIVAL_REWARD: f32 = 0.1;
/// Bonus for coming within [`NEAR_DISTANCE`] of the target.
pub const NEAR_REWARD: f32 = 10.0;
/// Bonus for coming within [`CONTACT_DISTANCE`] of the target.
pub const CONTACT_REWARD: f32 = 50.0;
/// See [`NEAR_REWARD`].
pub const NEAR_DISTANCE: f32 = 50.0;
/// See [`CONTACT_REWARD`].
pub const CONTACT_DISTANCE: f32 = 30.0;
/// Closest distance before any observation.
pub const INITIAL_CLOSEST: f32 = 99_999.0;

/// What a neural predator perceives in one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Network input vector.
    pub inputs: Array1<f32>,
    /// Whether any ray cone contains the player.
    pub player_detected: bool,
    /// Distance to the target.
    pub target_distance: f32,
}

/// Casts the sensing rays and encodes the observation.
pub fn observe(body: &Body, ctx: &TickContext) -> Observation {
    let mut inputs: Array1<f32> = Array1::zeros(INPUT_NODES);
    let own_heading = body.heading();
    let start = to_coord(&body.pos);

    let to_target = &ctx.target.pos - &body.pos;
    let target_distance = distance(&body.pos, &ctx.target.pos);
    let target_heading = heading(&to_target);
    let detection_range = RAY_LENGTH * DETECTION_FACTOR;
    let mut player_detected = false;

    for (i, offset) in RAY_ANGLES.iter().enumerate() {
        let angle = own_heading + offset;
        let tip = &body.pos + &from_angle(angle, RAY_LENGTH);
        let ray = Line::new(start, to_coord(&tip));

        let wall = ctx
            .obstacles
            .iter()
            .filter_map(|rect| ray_rect_intersection(&ray, rect))
            .map(|hit| distance(&body.pos, &vec2(hit.x, hit.y)))
            .fold(RAY_LENGTH, f32::min);
        inputs[2 * i] = wall / RAY_LENGTH;

        let in_cone = wrap_angle(target_heading - angle).abs() < DETECTION_HALF_ANGLE;
        if in_cone && target_distance < detection_range {
            inputs[2 * i + 1] = 1.0 - target_distance / detection_range;
            player_detected = true;
        }
    }

    let base = 2 * RAY_ANGLES.len();
    inputs[base] = wrap_angle(target_heading - own_heading) / PI;
    inputs[base + 1] = 1.0 - target_distance.clamp(0.0, MAX_TARGET_DISTANCE) / MAX_TARGET_DISTANCE;
    inputs[base + 2] = body.speed() / body.max_speed;

    Observation {
        inputs,
        player_detected,
        target_distance,
    }
}

/// Brain plus the bookkeeping neuroevolution scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralState {
    /// Owned network. Never shared with another predator.
    pub brain: NeuralNetwork,
    /// Accumulated rewards.
    pub score: f32,
    /// Closest distance to the target so far.
    pub closest_dist: f32,
    /// Whether the last observation saw the player.
    pub player_detected: bool,
    /// Training mode: no push-out, so a wall is only ever a crash.
    pub training: bool,
}

impl NeuralState {
    /// Wraps `brain` with fresh bookkeeping.
    pub fn new(brain: NeuralNetwork) -> Self {
        Self {
            brain,
            score: 0.0,
            closest_dist: INITIAL_CLOSEST,
            player_detected: false,
            training: false,
        }
    }

    /// Like [`NeuralState::new`], without the push-out from walls.
    pub fn trainee(brain: NeuralNetwork) -> Self {
        Self {
            training: true,
            ..Self::new(brain)
        }
    }

    /// Observes, runs the network and returns this tick's force.
    pub fn think(&mut self, body: &Body, ctx: &TickContext) -> Result<Array1<f32>, PredictError> {
        let observation = observe(body, ctx);
        let output = self.brain.predict(&observation.inputs)?;

        let mut force = vec2(2.0 * output[0] - 1.0, 2.0 * output[1] - 1.0);
        limit(&mut force, body.max_force);

        if observation.player_detected {
            force += &steering::seek_limited(body, &ctx.target.pos, 2.0 * body.max_force);
        }
        if ctx.boundaries_enabled {
            force += &(steering::boundaries(body, &ctx.bounds, BOUNDARY_MARGIN)
                * BOUNDARY_WEIGHT);
        }

        self.player_detected = observation.player_detected;
        self.reward(observation.target_distance);
        Ok(force)
    }

    fn reward(&mut self, d: f32) {
        self.closest_dist = self.closest_dist.min(d);
        if d < NEAR_DISTANCE {
            self.score += NEAR_REWARD;
        }
        if d < CONTACT_DISTANCE {
            self.score += CONTACT_REWARD;
        }
    }

    /// Penalty for entering a wall or leaving the world.
    pub fn crash(&mut self) {
        self.score *= 0.5;
    }

    /// Unnormalized fitness: `(100 / (closest + 1) + score)^2`.
    pub fn fitness(&self) -> f64 {
        let closest = f64::from(self.closest_dist.max(0.0));
        let value = 100.0 / (closest + 1.0) + f64::from(self.score);
        value * value
    }
}
