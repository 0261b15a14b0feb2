//! Live gameplay loop: predators and arrows around one player.
//!
//! The driver owns the player and the level script. Each frame it builds a
//! [`TickContext`], calls [`Arena::step`] and reacts to the returned
//! [`ArenaReport`].

use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::agent::{Agent, Neighbourhood};
use super::brain::NeuralNetwork;
use super::context::TickContext;
use super::error::ConfigError;
use super::events::{ArenaEvent, EventQueue};
use super::params::SteeringConfig;
use super::projectile::{self, ARROW_DAMAGE};
use super::spatial::SpatialIndex;

/// What happened during one arena tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArenaReport {
    /// Ids of predators touching the player after moving.
    pub player_contacts: Vec<usize>,
    /// Number of arrows that struck a predator.
    pub arrow_hits: usize,
    /// Ids of predators killed this tick.
    pub predators_killed: Vec<usize>,
}

/// Predators and arrows of a running level.
pub struct Arena {
    /// Every predator, dead ones included until [`Arena::cull`].
    pub predators: Vec<Agent>,
    /// Arrows in flight.
    pub arrows: Vec<Agent>,
    /// Ticks simulated so far.
    pub tick: u64,
    next_id: usize,
    rng: StdRng,
}

impl Arena {
    /// Creates an empty arena. `seed` makes wander and spawns reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            predators: Vec::new(),
            arrows: Vec::new(),
            tick: 0,
            next_id: 0,
            rng,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds one steering predator and returns its id.
    pub fn spawn_predator(&mut self, pos: Array1<f32>, config: SteeringConfig) -> Result<usize, ConfigError> {
        let id = self.next_id();
        self.predators.push(Agent::predator(id, pos, config)?);
        Ok(id)
    }

    /// Spawns `count` predators with the preset of `level`, each at least
    /// `clearance` away from the player.
    pub fn spawn_wave(
        &mut self,
        level: u32,
        count: usize,
        ctx: &TickContext,
        clearance: f32,
    ) -> Result<Vec<usize>, ConfigError> {
        let config = SteeringConfig::for_level(level)?;
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let pos = ctx.spawn_position(clearance, &mut self.rng);
            ids.push(self.spawn_predator(pos, config)?);
        }
        log::info!("level {level}: spawned {count} predators");
        Ok(ids)
    }

    /// Adds a neural boss and returns its id.
    pub fn spawn_boss(&mut self, pos: Array1<f32>, brain: NeuralNetwork) -> usize {
        let id = self.next_id();
        self.predators.push(Agent::neural_predator(id, pos, brain));
        id
    }

    /// Fires an arrow from `pos` along `direction` and returns its id.
    pub fn fire_arrow(&mut self, pos: Array1<f32>, direction: &Array1<f32>) -> usize {
        let id = self.next_id();
        self.arrows.push(Agent::arrow(id, pos, direction));
        id
    }

    /// Live predators.
    pub fn live_predators(&self) -> impl Iterator<Item = &Agent> {
        self.predators.iter().filter(|p| p.is_alive())
    }

    /// Drops dead predators and spent arrows.
    pub fn cull(&mut self) {
        self.predators.retain(Agent::is_alive);
        self.arrows.retain(Agent::is_alive);
    }

    /// Simulates one tick.
    ///
    /// Predators decide against the positions at the start of the tick.
    /// Arrows home in on predator positions after they moved. Damage and
    /// contacts are resolved once everything has moved.
    pub fn step(&mut self, ctx: &TickContext) -> ArenaReport {
        let mut queue = EventQueue::new();

        let positions: Vec<Array1<f32>> = self.predators.iter().map(|p| p.body.pos.clone()).collect();
        let index = build_index(&self.predators);
        let rng = &mut self.rng;

        for (i, predator) in self.predators.iter_mut().enumerate() {
            if !predator.is_alive() {
                continue;
            }
            let mut local = Neighbourhood::default();
            if let (true, Some(index)) = (predator.wants_neighbours(), index.as_ref()) {
                local.neighbours = index
                    .within(&positions[i], predator.body.radius * 2.0)
                    .into_iter()
                    .filter(|&(_, j)| j != i)
                    .map(|(_, j)| positions[j].clone())
                    .collect();
            }
            predator.step(ctx, &local, rng);

            if predator.is_alive() && predator.body.touches(&ctx.target.pos, ctx.target.radius) {
                queue.push(ArenaEvent::PlayerContact { predator: i });
            }
        }

        let index = build_index(&self.predators);
        let reach = projectile::RADIUS
            + self
                .predators
                .iter()
                .filter(|p| p.is_alive())
                .map(|p| p.body.radius)
                .fold(0.0, f32::max);

        for (a, arrow) in self.arrows.iter_mut().enumerate() {
            if !arrow.is_alive() {
                continue;
            }
            let quarry = index
                .as_ref()
                .and_then(|index| index.nearest(&arrow.body.pos))
                .map(|j| self.predators[j].body.pos.clone());
            let local = Neighbourhood {
                neighbours: Vec::new(),
                quarry,
            };
            arrow.step(ctx, &local, rng);

            let Some(index) = index.as_ref() else {
                continue;
            };
            let victim = index
                .within(&arrow.body.pos, reach)
                .into_iter()
                .map(|(_, j)| j)
                .find(|&j| {
                    let body = &self.predators[j].body;
                    arrow.body.touches(&body.pos, body.radius)
                });
            if let Some(j) = victim {
                queue.push(ArenaEvent::ArrowHit {
                    arrow: a,
                    predator: j,
                    damage: ARROW_DAMAGE,
                });
            }
        }

        let mut report = ArenaReport::default();
        queue.apply(&mut self.predators, &mut self.arrows, &mut report);
        self.tick += 1;
        report
    }
}

fn build_index(predators: &[Agent]) -> Option<SpatialIndex> {
    match SpatialIndex::build(predators, Agent::is_alive) {
        Ok(index) => Some(index),
        Err(err) => {
            log::warn!("spatial index unavailable this tick: {err:?}");
            None
        }
    }
}
