#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use globys_escape::simulation::agent::{Agent, Decision, Neighbourhood};
use globys_escape::simulation::context::{Target, TickContext};
use globys_escape::simulation::dna::Dna;
use globys_escape::simulation::evolution::GeneticTrainer;
use globys_escape::simulation::geometric_utils::{obstacle, vec2};
use globys_escape::simulation::params::TrainingParams;
use globys_escape::simulation::rocket::RocketState;
use ndarray::{Array2, array};

fn create_test_context() -> TickContext {
    TickContext::new(Target::at(700.0, 500.0), 800.0, 600.0)
        .with_obstacles(vec![obstacle(300.0, 300.0, 100.0, 100.0)])
}

/// Launch east, then nudge south and north in turn.
fn three_gene_dna() -> Dna {
    Dna::from_genes(array![[1.0, 0.0], [0.0, 0.1], [0.0, -0.1]])
}

fn state(rocket: &Agent) -> &RocketState {
    match &rocket.decision {
        Decision::Genome(state) => state,
        _ => panic!("not a rocket"),
    }
}

fn tick(rocket: &mut Agent, ctx: &TickContext) {
    rocket.step(ctx, &Neighbourhood::default(), &mut rand::rng());
}

#[test]
fn test_gene_counter_wraps_around_the_genome() {
    let ctx = create_test_context();
    let mut rocket = Agent::rocket(0, vec2(100.0, 100.0), three_gene_dna());

    for expected in [1, 2, 0, 1] {
        tick(&mut rocket, &ctx);
        assert_eq!(state(&rocket).gene_counter, expected);
    }
    // Launch gene applied twice, the two nudges cancel out
    assert!((rocket.body.vel[0] - 2.0).abs() < 1e-5);
    assert!(rocket.body.vel[1].abs() < 1e-5);
}

#[test]
fn test_wall_stops_rocket_without_killing_it() {
    let ctx = create_test_context();
    let mut rocket = Agent::rocket(0, vec2(350.0, 350.0), three_gene_dna());

    tick(&mut rocket, &ctx);
    assert!(state(&rocket).hit_obstacle);
    assert!(!state(&rocket).movable());

    let parked = rocket.body.pos.clone();
    for _ in 0..10 {
        tick(&mut rocket, &ctx);
    }
    assert!(rocket.is_alive());
    assert_eq!(rocket.body.pos, parked);
    assert_eq!(state(&rocket).gene_counter, 1);
}

#[test]
fn test_target_contact_freezes_finish_time() {
    let ctx = create_test_context();
    let mut rocket = Agent::rocket(0, vec2(100.0, 100.0), three_gene_dna());

    tick(&mut rocket, &ctx);
    tick(&mut rocket, &ctx);
    assert_eq!(state(&rocket).finish_time, 2);
    assert!(!state(&rocket).hit_target);

    rocket.body.pos = vec2(690.0, 500.0);
    for _ in 0..5 {
        tick(&mut rocket, &ctx);
    }
    assert!(state(&rocket).hit_target);
    assert_eq!(state(&rocket).finish_time, 2);
    assert_eq!(rocket.body.pos, vec2(690.0, 500.0));
    assert!(state(&rocket).record_dist <= 10.0);
}

#[test]
fn test_rocket_is_clamped_to_the_world() {
    let ctx = create_test_context();
    let mut rocket = Agent::rocket(0, vec2(798.0, 100.0), three_gene_dna());
    rocket.body.vel = vec2(4.0, 0.0);

    tick(&mut rocket, &ctx);
    assert_eq!(rocket.body.pos[0], 800.0);
    assert!(rocket.is_alive());
    assert!(state(&rocket).movable());
}

#[test]
fn test_stopped_population_ends_the_generation_early() {
    let ctx = create_test_context();
    let params = TrainingParams {
        population_size: 4,
        lifetime: 50,
        seed: Some(3),
        ..TrainingParams::default()
    };
    let mut trainer = GeneticTrainer::new(&params, &ctx).unwrap();
    for rocket in trainer.population_mut() {
        rocket.body.pos = vec2(350.0, 350.0);
    }
    assert!(!trainer.epoch_finished());

    let stats = trainer.step(&ctx);
    assert!(stats.is_some());
    assert_eq!(trainer.generation(), 1);
    assert_eq!(trainer.life_counter(), 0);
}

#[test]
fn test_running_population_waits_for_the_lifetime() {
    let ctx = TickContext::new(Target::at(700.0, 500.0), 800.0, 600.0);
    let params = TrainingParams {
        population_size: 4,
        lifetime: 5,
        seed: Some(3),
        ..TrainingParams::default()
    };
    let mut trainer = GeneticTrainer::new(&params, &ctx).unwrap();
    for rocket in trainer.population_mut() {
        rocket.body.pos = vec2(50.0, 50.0);
        if let Decision::Genome(state) = &mut rocket.decision {
            state.dna = Dna::from_genes(Array2::from_elem((5, 2), 0.0));
        }
    }

    for _ in 0..4 {
        assert!(trainer.step(&ctx).is_none());
    }
    assert!(!trainer.all_stopped());
    assert!(trainer.step(&ctx).is_some());
}
