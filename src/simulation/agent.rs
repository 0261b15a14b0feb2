//! Agents: kinematic body plus a tagged decision strategy.
//!
//! Every predator, boss, rocket and arrow is an [`Agent`]. They share one
//! physics routine ([`Body::update`]) and differ only in how they compute the
//! force applied each tick, dispatched on [`Decision`].

use geo::Rect;
use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::brain::NeuralNetwork;
use super::context::TickContext;
use super::dna::Dna;
use super::error::{ConfigError, PredictError};
use super::geometric_utils::{
    self, distance, magnitude, normalized, rect_circle_overlap, rect_contains, zero,
};
use super::locatable::Locatable;
use super::neural_predator::{self, NeuralState};
use super::params::SteeringConfig;
use super::predator::{self, PredatorState};
use super::projectile::{self, ArrowState};
use super::rocket::{self, RocketState};
use super::steering;

/// Distance a body is shoved when it overlaps a wall.
const PUSH_OUT_DISTANCE: f32 = 5.0;

/// Position, velocity and acceleration with fixed physical limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Position in world units.
    pub pos: Array1<f32>,
    /// Velocity per tick.
    pub vel: Array1<f32>,
    /// Forces accumulated since the last update.
    pub acc: Array1<f32>,
    /// Speed cap.
    pub max_speed: f32,
    /// Steering force cap.
    pub max_force: f32,
    /// Collision radius.
    pub radius: f32,
}

impl Body {
    /// Creates a body at rest.
    pub fn new(pos: Array1<f32>, max_speed: f32, max_force: f32, radius: f32) -> Self {
        Self {
            pos,
            vel: zero(),
            acc: zero(),
            max_speed,
            max_force,
            radius,
        }
    }

    /// Accumulates a force for this tick.
    #[inline]
    pub fn apply_force(&mut self, force: &Array1<f32>) {
        self.acc += force;
    }

    /// Integrates accumulated forces, caps speed and clears acceleration.
    pub fn update(&mut self) {
        self.vel += &self.acc;
        geometric_utils::limit(&mut self.vel, self.max_speed);
        self.pos += &self.vel;
        self.acc.fill(0.0);
    }

    /// Direction of travel in radians.
    #[inline]
    pub fn heading(&self) -> f32 {
        geometric_utils::heading(&self.vel)
    }

    /// Current speed.
    #[inline]
    pub fn speed(&self) -> f32 {
        magnitude(&self.vel)
    }

    /// Whether a circle of `radius` at `point` overlaps this body.
    pub fn touches(&self, point: &Array1<f32>, radius: f32) -> bool {
        distance(&self.pos, point) < self.radius + radius
    }

    /// Wraps the body to the opposite edge once it fully leaves `bounds`.
    pub fn edges(&mut self, bounds: &Rect<f32>) {
        geometric_utils::wrap_around_mut(&mut self.pos, bounds, self.radius);
    }

    /// Clamps the position into `bounds`.
    pub fn clamp_to(&mut self, bounds: &Rect<f32>) {
        let (min, max) = (bounds.min(), bounds.max());
        self.pos[0] = self.pos[0].clamp(min.x, max.x);
        self.pos[1] = self.pos[1].clamp(min.y, max.y);
    }

    /// Whether the centre lies outside `bounds`.
    pub fn out_of_bounds(&self, bounds: &Rect<f32>) -> bool {
        let (min, max) = (bounds.min(), bounds.max());
        self.pos[0] < min.x || self.pos[0] > max.x || self.pos[1] < min.y || self.pos[1] > max.y
    }

    /// Whether the centre lies strictly inside any wall.
    pub fn inside_obstacle(&self, obstacles: &[Rect<f32>]) -> bool {
        obstacles.iter().any(|wall| rect_contains(wall, &self.pos))
    }

    /// Shoves the body away from the centre of the first wall it overlaps.
    ///
    /// Returns whether a push happened.
    pub fn push_out_of(&mut self, obstacles: &[Rect<f32>]) -> bool {
        let Some(wall) = obstacles
            .iter()
            .find(|wall| rect_circle_overlap(wall, &self.pos, self.radius))
        else {
            return false;
        };
        let center = geometric_utils::from_coord(wall.center());
        let push = normalized(&(&self.pos - &center)) * PUSH_OUT_DISTANCE;
        self.pos += &push;
        true
    }
}

/// Which kind of agent this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    /// Steering-behavior predator (levels 1 to 4).
    Predator,
    /// Network-driven boss.
    NeuralPredator,
    /// Genome-driven GA agent.
    Rocket,
    /// Player projectile.
    Arrow,
}

/// Decision strategy and its per-agent state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Decision {
    /// Weighted steering composition.
    Steering(PredatorState),
    /// Neural network inference.
    Neural(NeuralState),
    /// Replays a force genome.
    Genome(RocketState),
    /// Seeks the nearest live predator.
    Homing(ArrowState),
}

/// Data about other agents an agent may need for its decision.
#[derive(Debug, Clone, Default)]
pub struct Neighbourhood {
    /// Positions of nearby predators, excluding the agent itself.
    pub neighbours: Vec<Array1<f32>>,
    /// Position of the closest live predator, for homing arrows.
    pub quarry: Option<Array1<f32>>,
}

/// A simulated agent: body, health and decision strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier within its population.
    pub id: usize,
    /// Kinematic state.
    pub body: Body,
    /// Remaining health.
    pub health: f32,
    /// Health at spawn.
    pub max_health: f32,
    /// Fitness assigned by the owning trainer.
    pub fitness: f64,
    /// Decision strategy.
    pub decision: Decision,
    alive: bool,
}

impl Agent {
    fn with_decision(id: usize, body: Body, health: f32, decision: Decision) -> Self {
        Self {
            id,
            body,
            health,
            max_health: health,
            fitness: 0.0,
            decision,
            alive: true,
        }
    }

    /// Spawns a steering predator. Health is twice the configured level.
    pub fn predator(id: usize, pos: Array1<f32>, config: SteeringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let body = Body::new(pos, config.max_speed, config.max_force, predator::PREDATOR_RADIUS);
        Ok(Self::with_decision(
            id,
            body,
            predator::predator_health(config.level),
            Decision::Steering(PredatorState::new(config)),
        ))
    }

    /// Spawns a neural boss that owns `brain`. Walls push it out once its
    /// body overlaps them; a centre inside a wall or outside the world
    /// still kills it.
    pub fn neural_predator(id: usize, pos: Array1<f32>, brain: NeuralNetwork) -> Self {
        Self::neural(id, pos, NeuralState::new(brain))
    }

    /// Spawns a neural predator for neuroevolution. Nothing holds it back
    /// from walls: entering one or leaving the world kills it and halves its
    /// score.
    pub fn neural_trainee(id: usize, pos: Array1<f32>, brain: NeuralNetwork) -> Self {
        Self::neural(id, pos, NeuralState::trainee(brain))
    }

    fn neural(id: usize, pos: Array1<f32>, state: NeuralState) -> Self {
        let body = Body::new(
            pos,
            neural_predator::MAX_SPEED,
            neural_predator::MAX_FORCE,
            neural_predator::RADIUS,
        );
        Self::with_decision(id, body, neural_predator::HEALTH, Decision::Neural(state))
    }

    /// Spawns a rocket driven by `dna`.
    pub fn rocket(id: usize, pos: Array1<f32>, dna: Dna) -> Self {
        let body = Body::new(pos, rocket::MAX_SPEED, rocket::MAX_FORCE, rocket::RADIUS);
        Self::with_decision(id, body, rocket::HEALTH, Decision::Genome(RocketState::new(dna)))
    }

    /// Fires an arrow from `pos` along `direction` at full speed.
    pub fn arrow(id: usize, pos: Array1<f32>, direction: &Array1<f32>) -> Self {
        let mut body = Body::new(pos, projectile::MAX_SPEED, projectile::MAX_FORCE, projectile::RADIUS);
        body.vel = normalized(direction) * projectile::MAX_SPEED;
        Self::with_decision(id, body, 1.0, Decision::Homing(ArrowState::new()))
    }

    /// Kind of decision strategy.
    pub fn kind(&self) -> AgentKind {
        match self.decision {
            Decision::Steering(_) => AgentKind::Predator,
            Decision::Neural(_) => AgentKind::NeuralPredator,
            Decision::Genome(_) => AgentKind::Rocket,
            Decision::Homing(_) => AgentKind::Arrow,
        }
    }

    /// Whether the agent is a predator the player can shoot.
    pub fn is_hunter(&self) -> bool {
        matches!(self.kind(), AgentKind::Predator | AgentKind::NeuralPredator)
    }

    /// Checks if the agent is alive.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Kills the agent. Dead agents never come back.
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Subtracts health, killing the agent at zero.
    pub fn take_damage(&mut self, amount: f32) {
        if !self.alive {
            return;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.alive = false;
        }
    }

    /// Brain of a neural predator.
    pub fn brain(&self) -> Option<&NeuralNetwork> {
        match &self.decision {
            Decision::Neural(state) => Some(&state.brain),
            _ => None,
        }
    }

    /// Genome of a rocket.
    pub fn dna(&self) -> Option<&Dna> {
        match &self.decision {
            Decision::Genome(state) => Some(&state.dna),
            _ => None,
        }
    }

    /// Accumulated training score (neural predators only).
    pub fn score(&self) -> f32 {
        match &self.decision {
            Decision::Neural(state) => state.score,
            _ => 0.0,
        }
    }

    /// Unnormalized fitness from the agent's own bookkeeping.
    pub fn raw_fitness(&self) -> f64 {
        match &self.decision {
            Decision::Neural(state) => state.fitness(),
            Decision::Genome(state) => state.fitness(),
            Decision::Steering(_) | Decision::Homing(_) => 0.0,
        }
    }

    /// Whether the predator wants neighbour positions for separation.
    pub fn wants_neighbours(&self) -> bool {
        matches!(&self.decision, Decision::Steering(state) if state.config.separation)
    }

    /// Computes this tick's steering force without applying it.
    pub fn compute_force<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext,
        local: &Neighbourhood,
        rng: &mut R,
    ) -> Result<Array1<f32>, PredictError> {
        match &mut self.decision {
            Decision::Steering(state) => Ok(state.behaviors(&self.body, ctx, &local.neighbours, rng)),
            Decision::Neural(state) => state.think(&self.body, ctx),
            Decision::Genome(state) => Ok(state.next_gene()),
            Decision::Homing(_) => Ok(local
                .quarry
                .as_ref()
                .map(|quarry| steering::seek(&self.body, quarry))
                .unwrap_or_else(zero)),
        }
    }

    /// Advances the agent by one tick: decide, apply, integrate, then run
    /// the per-kind bookkeeping.
    ///
    /// A failed decision kills only this agent.
    pub fn step<R: Rng + ?Sized>(&mut self, ctx: &TickContext, local: &Neighbourhood, rng: &mut R) {
        if !self.alive || !self.before_tick(ctx) {
            return;
        }

        match self.compute_force(ctx, local, rng) {
            Ok(force) => self.body.apply_force(&force),
            Err(err) => {
                log::warn!("agent {} ({:?}) dropped: {err}", self.id, self.kind());
                self.alive = false;
                return;
            }
        }

        if self.is_hunter() && !ctx.boundaries_enabled {
            self.body.edges(&ctx.bounds);
        }
        self.body.update();
        self.after_tick(ctx);
    }

    /// Returns whether the agent still moves this tick.
    fn before_tick(&mut self, ctx: &TickContext) -> bool {
        match &mut self.decision {
            Decision::Neural(state) => {
                let crashed = self.body.inside_obstacle(&ctx.obstacles)
                    || self.body.out_of_bounds(&ctx.bounds);
                if crashed {
                    state.crash();
                    self.alive = false;
                    return false;
                }
                true
            }
            Decision::Genome(state) => {
                state.check_target(&self.body, &ctx.target);
                state.movable()
            }
            Decision::Steering(_) | Decision::Homing(_) => true,
        }
    }

    fn after_tick(&mut self, ctx: &TickContext) {
        match &mut self.decision {
            Decision::Steering(state) => {
                if state.config.level >= predator::SOLID_OBSTACLE_LEVEL {
                    self.body.push_out_of(&ctx.obstacles);
                }
            }
            Decision::Neural(state) => {
                state.score += neural_predator::SURVIVAL_REWARD;
                if !state.training {
                    self.body.push_out_of(&ctx.obstacles);
                }
            }
            Decision::Genome(state) => state.check_obstacles(&mut self.body, ctx),
            Decision::Homing(state) => {
                if state.tick() {
                    self.alive = false;
                }
            }
        }
    }
}

impl Locatable for Agent {
    fn pos(&self) -> &Array1<f32> {
        &self.body.pos
    }

    fn pos_mut(&mut self) -> &mut Array1<f32> {
        &mut self.body.pos
    }

    fn update(&mut self) {
        self.body.update();
    }
}
