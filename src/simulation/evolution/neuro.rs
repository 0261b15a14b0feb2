//! Neuroevolution over neural predator brains.
//!
//! Children are mutated copies of a single parent picked by roulette wheel;
//! there is no crossover. The best brains by score seed the boss encounter.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::simulation::agent::{Agent, Decision, Neighbourhood};
use crate::simulation::brain::{BrainArchive, NeuralNetwork};
use crate::simulation::context::TickContext;
use crate::simulation::error::ConfigError;
use crate::simulation::neural_predator::CONTACT_DISTANCE;
use crate::simulation::params::TrainingParams;
use crate::simulation::stats::{GenerationStats, TrainingHistory};

/// Roulette-wheel pick over normalized fitness.
///
/// Subtracts successive fitness values from `r` until it drops to zero or
/// below. When the values sum to less than `r` the last individual is
/// returned. `fitness` must not be empty.
pub fn roulette_select(fitness: &[f64], mut r: f64) -> usize {
    let mut index = 0;
    while r > 0.0 && index < fitness.len() {
        r -= fitness[index];
        index += 1;
    }
    index.saturating_sub(1).min(fitness.len().saturating_sub(1))
}

/// Population of training predators and the generation loop around it.
pub struct NeuroTrainer {
    population: Vec<Agent>,
    generation: u32,
    mutation_rate: f32,
    lifetime: usize,
    life_counter: usize,
    clearance: f32,
    top_n: usize,
    rng: StdRng,
    history: TrainingHistory,
}

impl NeuroTrainer {
    /// Spawns a population of random brains clear of the target.
    pub fn new(params: &TrainingParams, ctx: &TickContext) -> Result<Self, ConfigError> {
        Self::with_seed_brains(params, ctx, &[])
    }

    /// Spawns a population seeded from previously trained brains.
    ///
    /// The first individuals get exact copies of `seeds`; the rest get
    /// mutated copies, cycling through the seeds. With no seeds every brain
    /// is random.
    pub fn with_seed_brains(
        params: &TrainingParams,
        ctx: &TickContext,
        seeds: &[NeuralNetwork],
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut trainer = Self {
            population: Vec::with_capacity(params.population_size),
            generation: 0,
            mutation_rate: params.neural_mutation_rate,
            lifetime: params.lifetime,
            life_counter: 0,
            clearance: params.spawn_clearance,
            top_n: params.top_n,
            rng,
            history: TrainingHistory::default(),
        };

        for id in 0..params.population_size {
            let brain = if seeds.is_empty() {
                NeuralNetwork::new()
            } else {
                let mut brain = seeds[id % seeds.len()].copy();
                if id >= seeds.len() {
                    brain.mutate(trainer.mutation_rate);
                }
                brain
            };
            let pos = ctx.spawn_position(trainer.clearance, &mut trainer.rng);
            trainer.population.push(Agent::neural_trainee(id, pos, brain));
        }
        Ok(trainer)
    }

    /// Current predators.
    pub fn population(&self) -> &[Agent] {
        &self.population
    }

    /// Mutable access for drivers that inject damage or reposition agents.
    pub fn population_mut(&mut self) -> &mut [Agent] {
        &mut self.population
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

    /// Lets every live predator think and move once, in parallel.
    pub fn live(&mut self, ctx: &TickContext) {
        let local = Neighbourhood::default();
        self.population
            .par_iter_mut()
            .filter(|agent| agent.is_alive())
            .for_each(|agent| agent.step(ctx, &local, &mut rand::rng()));
        self.life_counter += 1;
    }

    /// Whether every predator has died.
    pub fn all_dead(&self) -> bool {
        self.population.iter().all(|agent| !agent.is_alive())
    }

    /// Whether the generation is over.
    pub fn epoch_finished(&self) -> bool {
        self.all_dead() || self.life_counter >= self.lifetime
    }

    /// Scores every predator, then normalizes so fitness sums to 1.
    ///
    /// Normalization is skipped when the raw sum is 0.
    pub fn calc_fitness(&mut self) {
        self.population
            .par_iter_mut()
            .for_each(|agent| agent.fitness = agent.raw_fitness());
        let sum: f64 = self.population.iter().map(|agent| agent.fitness).sum();
        if sum > 0.0 {
            for agent in &mut self.population {
                agent.fitness /= sum;
            }
        }
    }

    /// Picks a parent index by roulette wheel, or uniformly when every
    /// fitness is 0.
    pub fn pick_one(&mut self) -> usize {
        let fitness: Vec<f64> = self.population.iter().map(|agent| agent.fitness).collect();
        let total: f64 = fitness.iter().sum();
        if !(total > 0.0 && total.is_finite()) {
            return self.rng.random_range(0..fitness.len());
        }
        roulette_select(&fitness, self.rng.random::<f64>())
    }

    /// Replaces the population with mutated copies of roulette-picked parents.
    ///
    /// Call after [`NeuroTrainer::calc_fitness`].
    pub fn next_generation(&mut self, ctx: &TickContext) {
        let mut next = Vec::with_capacity(self.population.len());
        for id in 0..self.population.len() {
            let parent = self.pick_one();
            let mut brain = self.population[parent]
                .brain()
                .map(NeuralNetwork::copy)
                .unwrap_or_default();
            brain.mutate(self.mutation_rate);
            let pos = ctx.spawn_position(self.clearance, &mut self.rng);
            next.push(Agent::neural_trainee(id, pos, brain));
        }
        self.population = next;
        self.life_counter = 0;
        self.generation += 1;
    }

    /// Scores and breeds. Returns the summary of the finished generation.
    pub fn evolve(&mut self, ctx: &TickContext) -> GenerationStats {
        let raw: Vec<f64> = self.population.iter().map(Agent::raw_fitness).collect();
        let best_score = self
            .population
            .iter()
            .map(Agent::score)
            .fold(f32::MIN, f32::max);
        let successes = self
            .population
            .iter()
            .filter(|agent| {
                matches!(&agent.decision, Decision::Neural(state) if state.closest_dist < CONTACT_DISTANCE)
            })
            .count();
        let stats = GenerationStats::from_fitness(self.generation, &raw, best_score, successes);
        log::info!(
            "neuro generation {}: best score {:.1}, best fitness {:.1}, {} reached the target",
            stats.generation,
            stats.best_score,
            stats.best_fitness,
            stats.successes
        );
        self.history.record(stats.clone());

        self.calc_fitness();
        self.next_generation(ctx);
        stats
    }

    /// Runs one tick and evolves once the generation is over.
    pub fn step(&mut self, ctx: &TickContext) -> Option<GenerationStats> {
        self.live(ctx);
        self.epoch_finished().then(|| self.evolve(ctx))
    }

    /// Predator with the highest score.
    pub fn best_by_score(&self) -> Option<&Agent> {
        self.population
            .iter()
            .max_by(|a, b| a.score().total_cmp(&b.score()))
    }

    /// Deep copies of the `n` highest-scoring brains, best first.
    pub fn top_brains(&self, n: usize) -> Vec<NeuralNetwork> {
        let mut ranked: Vec<&Agent> = self.population.iter().collect();
        ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
        ranked
            .into_iter()
            .filter_map(Agent::brain)
            .take(n)
            .map(NeuralNetwork::copy)
            .collect()
    }

    /// Archives the configured number of top brains.
    pub fn export_top(&self) -> BrainArchive {
        BrainArchive::new(self.generation, &self.top_brains(self.top_n))
    }
}
