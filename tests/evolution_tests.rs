#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use globys_escape::simulation::agent::Decision;
use globys_escape::simulation::context::{Target, TickContext};
use globys_escape::simulation::dna::{Dna, MAX_GENE_FORCE};
use globys_escape::simulation::error::ConfigError;
use globys_escape::simulation::evolution::{GeneticTrainer, NeuroTrainer, roulette_select};
use globys_escape::simulation::geometric_utils::{distance, magnitude};
use globys_escape::simulation::params::{SteeringConfig, TrainingParams};
use globys_escape::simulation::rocket::rocket_fitness;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn create_test_params(population_size: usize) -> TrainingParams {
    TrainingParams {
        population_size,
        lifetime: 20,
        seed: Some(42),
        ..TrainingParams::default()
    }
}

fn create_test_context() -> TickContext {
    TickContext::new(Target::at(400.0, 300.0), 800.0, 600.0)
}

fn relative_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= b.abs() * 1e-9
}

#[test]
fn test_rocket_fitness_formula() {
    let expected = (1.0f64 / 5000.0).powi(4);
    assert!(relative_eq(rocket_fitness(100, 50.0, false, false), expected));
    assert!(relative_eq(rocket_fitness(100, 50.0, true, false), expected * 0.1));
    assert!(relative_eq(rocket_fitness(100, 50.0, false, true), expected * 2.0));
    // Record distance below 1 is floored
    assert!(relative_eq(rocket_fitness(1, 0.2, false, false), 1.0));
}

#[test]
fn test_random_dna_gene_magnitudes() {
    let mut rng = StdRng::seed_from_u64(1);
    let dna = Dna::new_random(300, &mut rng);

    assert_eq!(dna.len(), 300);
    assert!((magnitude(&dna.gene(0)) - 1.0).abs() < 1e-5);
    for i in 1..dna.len() {
        assert!(magnitude(&dna.gene(i)) < MAX_GENE_FORCE + 1e-6);
    }
    // Index wraps modulo length
    assert_eq!(dna.gene(300), dna.gene(0));
}

#[test]
fn test_crossover_split_belongs_to_partner() {
    let mom = Dna::from_genes(Array2::from_elem((6, 2), 1.0));
    let dad = Dna::from_genes(Array2::from_elem((6, 2), -1.0));
    let child = mom.crossover_at(&dad, 3);

    assert!(magnitude(&(child.gene(0) - mom.gene(0))) < 1e-6);
    for i in 1..3 {
        assert_eq!(child.gene(i), mom.gene(i));
    }
    for i in 3..6 {
        assert_eq!(child.gene(i), dad.gene(i));
    }
    assert_eq!(mom.gene(5)[0], 1.0);
}

#[test]
fn test_mating_pool_is_proportional_to_fitness() {
    let ctx = create_test_context();
    let mut trainer = GeneticTrainer::new(&create_test_params(3), &ctx).unwrap();
    for (rocket, fitness) in trainer.population_mut().iter_mut().zip([0.0, 0.0, 10.0]) {
        rocket.fitness = fitness;
    }

    trainer.selection();
    assert_eq!(trainer.mating_pool(), vec![2; 120].as_slice());
}

#[test]
fn test_reproduction_preserves_size_and_bumps_generation() {
    let ctx = create_test_context();
    let params = create_test_params(12);
    let mut trainer = GeneticTrainer::new(&params, &ctx).unwrap();
    for _ in 0..5 {
        trainer.live(&ctx);
    }

    trainer.calc_fitness();
    trainer.selection();
    trainer.reproduction(&ctx);

    assert_eq!(trainer.population().len(), 12);
    assert_eq!(trainer.generation(), 1);
    assert_eq!(trainer.life_counter(), 0);
    for rocket in trainer.population() {
        assert_eq!(rocket.dna().map(Dna::len), Some(params.lifetime));
        assert!(distance(&rocket.body.pos, &ctx.target.pos) >= params.spawn_clearance);
    }
}

#[test]
fn test_empty_mating_pool_falls_back_to_uniform() {
    let ctx = create_test_context();
    let mut trainer = GeneticTrainer::new(&create_test_params(5), &ctx).unwrap();

    // Nothing was scored: every fitness is 0 and the pool stays empty
    trainer.selection();
    assert!(trainer.mating_pool().is_empty());

    trainer.reproduction(&ctx);
    assert_eq!(trainer.population().len(), 5);
    assert_eq!(trainer.generation(), 1);
}

#[test]
fn test_generation_ends_after_lifetime() {
    let ctx = create_test_context();
    let params = create_test_params(8);
    let mut trainer = GeneticTrainer::new(&params, &ctx).unwrap();

    let mut finished = None;
    for _ in 0..params.lifetime {
        finished = trainer.step(&ctx);
        if finished.is_some() {
            break;
        }
    }

    let stats = finished.expect("generation should end within its lifetime");
    assert_eq!(stats.generation, 0);
    assert_eq!(trainer.generation(), 1);
    assert!(stats.best_fitness >= stats.mean_fitness);
    assert_eq!(trainer.history().records.len(), 1);
}

#[test]
fn test_top_genomes_are_ranked() {
    let ctx = create_test_context();
    let mut trainer = GeneticTrainer::new(&create_test_params(4), &ctx).unwrap();
    for (rocket, fitness) in trainer.population_mut().iter_mut().zip([1.0, 4.0, 2.0, 3.0]) {
        rocket.fitness = fitness;
    }

    let best = trainer.best().unwrap();
    assert_eq!(best.fitness, 4.0);
    let expected = best.dna().cloned().unwrap();

    let top = trainer.top_genomes(3);
    assert_eq!(top.len(), 3);
    assert_eq!(top[0], expected);
}

#[test]
fn test_roulette_clamps_on_undershoot() {
    assert_eq!(roulette_select(&[0.1, 0.1, 0.1], 0.9), 2);
    assert_eq!(roulette_select(&[0.5, 0.5], 0.3), 0);
    assert_eq!(roulette_select(&[0.5, 0.5], 0.7), 1);
    assert_eq!(roulette_select(&[0.2, 0.8], 0.0), 0);
}

#[test]
fn test_neuro_fitness_is_normalized() {
    let ctx = create_test_context();
    let mut trainer = NeuroTrainer::new(&create_test_params(6), &ctx).unwrap();
    for _ in 0..3 {
        trainer.live(&ctx);
    }

    trainer.calc_fitness();
    let sum: f64 = trainer.population().iter().map(|p| p.fitness).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}

#[test]
fn test_neuro_next_generation() {
    let ctx = create_test_context();
    let mut trainer = NeuroTrainer::new(&create_test_params(6), &ctx).unwrap();
    trainer.live(&ctx);
    trainer.calc_fitness();
    trainer.next_generation(&ctx);

    assert_eq!(trainer.population().len(), 6);
    assert_eq!(trainer.generation(), 1);
    assert!(trainer.population().iter().all(|p| p.is_alive() && p.score() == 0.0));
}

#[test]
fn test_top_brains_rank_by_score() {
    let ctx = create_test_context();
    let mut trainer = NeuroTrainer::new(&create_test_params(5), &ctx).unwrap();
    for (agent, score) in trainer.population_mut().iter_mut().zip([3.0, 9.0, 1.0, 7.0, 5.0]) {
        if let Decision::Neural(state) = &mut agent.decision {
            state.score = score;
        }
    }

    let best = trainer.best_by_score().unwrap();
    assert_eq!(best.score(), 9.0);
    let best_brain = best.brain().unwrap().to_weights();

    let top = trainer.top_brains(3);
    assert_eq!(top.len(), 3);
    assert_eq!(top[0].to_weights(), best_brain);

    let archive = trainer.export_top();
    assert_eq!(archive.brains.len(), 3);
    assert_eq!(archive.brains[0], best_brain);
}

#[test]
fn test_seed_brains_are_copied() {
    let ctx = create_test_context();
    let seed = globys_escape::simulation::brain::NeuralNetwork::new();
    let trainer = NeuroTrainer::with_seed_brains(&create_test_params(4), &ctx, &[seed.copy()]).unwrap();

    let first = trainer.population()[0].brain().unwrap();
    assert_eq!(first.to_weights(), seed.to_weights());
    assert_eq!(trainer.population().len(), 4);
}

#[test]
fn test_neuro_generation_ends_when_all_dead() {
    let ctx = create_test_context();
    let mut trainer = NeuroTrainer::new(&create_test_params(3), &ctx).unwrap();
    assert!(!trainer.epoch_finished());

    for agent in trainer.population_mut() {
        agent.kill();
    }
    assert!(trainer.all_dead());
    assert!(trainer.epoch_finished());

    let stats = trainer.evolve(&ctx);
    assert_eq!(stats.generation, 0);
    assert_eq!(trainer.generation(), 1);
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let ctx = create_test_context();
    let empty = TrainingParams {
        population_size: 0,
        ..TrainingParams::default()
    };
    assert!(matches!(
        GeneticTrainer::new(&empty, &ctx),
        Err(ConfigError::Empty {
            field: "population_size"
        })
    ));

    let bad_rate = TrainingParams {
        neural_mutation_rate: 1.5,
        ..TrainingParams::default()
    };
    assert!(NeuroTrainer::new(&bad_rate, &ctx).is_err());
}

#[test]
fn test_level_presets() {
    assert_eq!(SteeringConfig::for_level(0), Err(ConfigError::ZeroLevel));
    assert_eq!(SteeringConfig::for_level(9), Err(ConfigError::UnknownLevel(9)));

    let zombie = SteeringConfig::for_level(1).unwrap();
    assert!(zombie.seek && !zombie.pursue);
    let pack = SteeringConfig::for_level(4).unwrap();
    assert!(pack.pursue && pack.avoid_obstacles && pack.separation);
    assert!(pack.validate().is_ok());

    let broken = SteeringConfig {
        max_speed: 0.0,
        ..SteeringConfig::default()
    };
    assert!(broken.validate().is_err());
}
