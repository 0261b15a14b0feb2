//! Genetic algorithm over rocket force genomes.
//!
//! One generation runs for `lifetime` ticks or until every rocket has stopped.
//! Rockets are then scored, copied into a mating pool in proportion to their
//! fitness, and replaced by crossed-over, mutated children.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::simulation::agent::{Agent, Decision, Neighbourhood};
use crate::simulation::context::TickContext;
use crate::simulation::dna::Dna;
use crate::simulation::error::ConfigError;
use crate::simulation::params::TrainingParams;
use crate::simulation::rocket::RocketState;
use crate::simulation::stats::{GenerationStats, TrainingHistory};

/// Rocket population plus the state of the current generation.
pub struct GeneticTrainer {
    population: Vec<Agent>,
    mating_pool: Vec<usize>,
    generation: u32,
    mutation_rate: f32,
    pool_multiplier: usize,
    lifetime: usize,
    life_counter: usize,
    clearance: f32,
    rng: StdRng,
    history: TrainingHistory,
}

fn rocket_state(agent: &Agent) -> Option<&RocketState> {
    match &agent.decision {
        Decision::Genome(state) => Some(state),
        _ => None,
    }
}

impl GeneticTrainer {
    /// Spawns a random population clear of the target.
    pub fn new(params: &TrainingParams, ctx: &TickContext) -> Result<Self, ConfigError> {
        params.validate()?;
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let population = (0..params.population_size)
            .map(|id| {
                let pos = ctx.spawn_position(params.spawn_clearance, &mut rng);
                Agent::rocket(id, pos, Dna::new_random(params.lifetime, &mut rng))
            })
            .collect();

        Ok(Self {
            population,
            mating_pool: Vec::new(),
            generation: 0,
            mutation_rate: params.rocket_mutation_rate,
            pool_multiplier: params.mating_pool_multiplier,
            lifetime: params.lifetime,
            life_counter: 0,
            clearance: params.spawn_clearance,
            rng,
            history: TrainingHistory::default(),
        })
    }

    /// Current rockets.
    pub fn population(&self) -> &[Agent] {
        &self.population
    }

    /// Mutable access for drivers that inject damage or reposition rockets.
    pub fn population_mut(&mut self) -> &mut [Agent] {
        &mut self.population
    }

    /// Population indices, each repeated in proportion to its fitness.
    pub fn mating_pool(&self) -> &[usize] {
        &self.mating_pool
    }

    /// Number of completed generations.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Ticks simulated in the current generation.
    pub fn life_counter(&self) -> usize {
        self.life_counter
    }

    /// Summaries of recent generations.
    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Advances every rocket by one tick.
    pub fn live(&mut self, ctx: &TickContext) {
        let local = Neighbourhood::default();
        self.population
            .par_iter_mut()
            .for_each(|rocket| rocket.step(ctx, &local, &mut rand::rng()));
        self.life_counter += 1;
    }

    /// Whether the tick budget is spent or no rocket can move.
    pub fn epoch_finished(&self) -> bool {
        self.life_counter >= self.lifetime || self.all_stopped()
    }

    /// Whether any rocket touched the target this generation.
    pub fn target_reached(&self) -> bool {
        self.population
            .iter()
            .filter_map(rocket_state)
            .any(|state| state.hit_target)
    }

    /// Whether every rocket is dead or immobile.
    pub fn all_stopped(&self) -> bool {
        self.population.iter().all(|rocket| {
            !rocket.is_alive() || rocket_state(rocket).is_none_or(|state| !state.movable())
        })
    }

    /// Scores every rocket from its own bookkeeping.
    pub fn calc_fitness(&mut self) {
        self.population
            .par_iter_mut()
            .for_each(|rocket| rocket.fitness = rocket.raw_fitness());
    }

    /// Highest fitness in the population, or 0.
    pub fn max_fitness(&self) -> f64 {
        self.population
            .iter()
            .map(|rocket| rocket.fitness)
            .fold(0.0, f64::max)
    }

    /// Rebuilds the mating pool: each rocket appears
    /// `floor(fitness / max_fitness * multiplier)` times.
    ///
    /// The pool stays empty when no rocket has positive fitness.
    pub fn selection(&mut self) {
        self.mating_pool.clear();
        let max = self.max_fitness();
        if !(max > 0.0 && max.is_finite()) {
            return;
        }
        for (i, rocket) in self.population.iter().enumerate() {
            let copies = (rocket.fitness / max * self.pool_multiplier as f64).floor() as usize;
            self.mating_pool.extend(std::iter::repeat_n(i, copies));
        }
    }

    fn pick_parent(&mut self) -> usize {
        if self.mating_pool.is_empty() {
            self.rng.random_range(0..self.population.len())
        } else {
            self.mating_pool[self.rng.random_range(0..self.mating_pool.len())]
        }
    }

    /// Breeds a full replacement population from the mating pool.
    ///
    /// Falls back to uniform parent selection when the pool is empty.
    pub fn reproduction(&mut self, ctx: &TickContext) {
        if self.mating_pool.is_empty() {
            log::warn!(
                "generation {}: empty mating pool, selecting parents uniformly",
                self.generation
            );
        }

        let mut next = Vec::with_capacity(self.population.len());
        for id in 0..self.population.len() {
            let mom = self.pick_parent();
            let dad = self.pick_parent();
            let mut child = match (self.population[mom].dna(), self.population[dad].dna()) {
                (Some(a), Some(b)) => a.crossover(b, &mut self.rng),
                _ => Dna::new_random(self.lifetime, &mut self.rng),
            };
            child.mutate(self.mutation_rate, &mut self.rng);
            let pos = ctx.spawn_position(self.clearance, &mut self.rng);
            next.push(Agent::rocket(id, pos, child));
        }

        self.population = next;
        self.mating_pool.clear();
        self.life_counter = 0;
        self.generation += 1;
    }

    /// Scores, selects and reproduces. Returns the summary of the finished
    /// generation.
    pub fn evolve(&mut self, ctx: &TickContext) -> GenerationStats {
        self.calc_fitness();
        let fitness: Vec<f64> = self.population.iter().map(|r| r.fitness).collect();
        let successes = self
            .population
            .iter()
            .filter_map(rocket_state)
            .filter(|state| state.hit_target)
            .count();
        let stats = GenerationStats::from_fitness(self.generation, &fitness, 0.0, successes);
        log::info!(
            "GA generation {}: best {:.3e}, mean {:.3e}, {} hit the target",
            stats.generation,
            stats.best_fitness,
            stats.mean_fitness,
            stats.successes
        );
        self.history.record(stats.clone());

        self.selection();
        self.reproduction(ctx);
        stats
    }

    /// Runs one tick and evolves once the generation is over.
    pub fn step(&mut self, ctx: &TickContext) -> Option<GenerationStats> {
        self.live(ctx);
        self.epoch_finished().then(|| self.evolve(ctx))
    }

    /// Fittest rocket of the last scoring pass.
    pub fn best(&self) -> Option<&Agent> {
        self.population
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    /// Genomes of the `n` fittest rockets, best first.
    pub fn top_genomes(&self, n: usize) -> Vec<Dna> {
        let mut ranked: Vec<&Agent> = self.population.iter().collect();
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        ranked
            .into_iter()
            .filter_map(Agent::dna)
            .take(n)
            .cloned()
            .collect()
    }
}
