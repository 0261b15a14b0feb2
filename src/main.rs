use std::error::Error;
use std::fs;

use env_logger::{Builder, Env};
use globys_escape::simulation::arena::Arena;
use globys_escape::simulation::brain::BrainArchive;
use globys_escape::simulation::context::{Target, TickContext};
use globys_escape::simulation::evolution::{GeneticTrainer, NeuroTrainer};
use globys_escape::simulation::geometric_utils::{from_angle, obstacle, rotate, vec2};
use globys_escape::simulation::params::TrainingParams;

const WORLD_WIDTH: f32 = 800.0;
const WORLD_HEIGHT: f32 = 600.0;
const ORBIT_RADIUS: f32 = 150.0;
const ORBIT_SPEED: f32 = 0.01;

const GA_GENERATIONS: u32 = 5;
const NEURO_GENERATIONS: u32 = 10;
const BOSS_TICKS: u64 = 1800;
const ARROW_INTERVAL: u64 = 30;

/// Ticks between boss clones (ten seconds at 60 frames per second).
const BOSS_CLONE_INTERVAL: u64 = 600;
/// No clones once this many predators are alive.
const MAX_PREDATORS: usize = 20;

const OUTPUT_FILE: &str = "top_brains.json";

/// Boss duplication policy of the final level.
fn should_duplicate(tick: u64, last_clone: u64, live_predators: usize) -> bool {
    tick >= last_clone + BOSS_CLONE_INTERVAL && live_predators <= MAX_PREDATORS
}

/// Moves the scripted player along a circle around the world centre.
fn move_target(ctx: &mut TickContext, tick: u64) {
    let center = vec2(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
    let angle = tick as f32 * ORBIT_SPEED;
    let offset = from_angle(angle, ORBIT_RADIUS);
    ctx.target.vel = rotate(&offset, std::f32::consts::FRAC_PI_2) * ORBIT_SPEED;
    ctx.target.pos = center + offset;
}

fn world() -> TickContext {
    let walls = vec![
        obstacle(200.0, 150.0, 120.0, 40.0),
        obstacle(480.0, 380.0, 40.0, 140.0),
        obstacle(340.0, 280.0, 100.0, 30.0),
    ];
    TickContext::new(
        Target::at(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
        WORLD_WIDTH,
        WORLD_HEIGHT,
    )
    .with_obstacles(walls)
}

fn run_genetic(params: &TrainingParams) -> Result<(), Box<dyn Error>> {
    let mut ctx = world();
    let mut trainer = GeneticTrainer::new(params, &ctx)?;
    let mut tick = 0;
    while trainer.generation() < GA_GENERATIONS {
        move_target(&mut ctx, tick);
        trainer.step(&ctx);
        tick += 1;
    }
    if let Some(best) = trainer.history().best_ever() {
        log::info!(
            "GA done: best fitness {:.3e} in generation {}",
            best.best_fitness,
            best.generation
        );
    }
    Ok(())
}

fn run_neuroevolution(params: &TrainingParams) -> Result<BrainArchive, Box<dyn Error>> {
    let mut ctx = world();
    let mut trainer = NeuroTrainer::new(params, &ctx)?;
    let mut archive = trainer.export_top();
    let mut tick = 0;
    while trainer.generation() < NEURO_GENERATIONS {
        move_target(&mut ctx, tick);
        trainer.live(&ctx);
        if trainer.epoch_finished() {
            if trainer.generation() + 1 == NEURO_GENERATIONS {
                archive = trainer.export_top();
            }
            trainer.evolve(&ctx);
        }
        tick += 1;
    }
    Ok(archive)
}

fn run_boss_fight(archive: &BrainArchive, seed: Option<u64>) -> Result<(), Box<dyn Error>> {
    let brains = archive.networks()?;
    if brains.is_empty() {
        log::warn!("no brains to fight with");
        return Ok(());
    }

    let mut ctx = world().with_boundaries(true);
    let mut arena = Arena::new(seed);
    let spawn = vec2(60.0, 60.0);
    arena.spawn_boss(spawn.clone(), brains[0].copy());

    let mut last_clone = 0;
    let mut contacts = 0;
    let mut kills = 0;
    for tick in 0..BOSS_TICKS {
        move_target(&mut ctx, tick);

        if tick % ARROW_INTERVAL == 0 {
            let aim = arena
                .live_predators()
                .next()
                .map(|p| &p.body.pos - &ctx.target.pos)
                .unwrap_or_else(|| vec2(1.0, 0.0));
            arena.fire_arrow(ctx.target.pos.clone(), &aim);
        }
        if should_duplicate(tick, last_clone, arena.live_predators().count()) {
            let brain = brains[(tick / BOSS_CLONE_INTERVAL) as usize % brains.len()].copy();
            arena.spawn_boss(spawn.clone(), brain);
            last_clone = tick;
        }

        let report = arena.step(&ctx);
        contacts += report.player_contacts.len();
        kills += report.predators_killed.len();
        arena.cull();
    }

    log::info!(
        "boss fight: {} player contacts, {} bosses killed, {} still alive",
        contacts,
        kills,
        arena.live_predators().count()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let params = TrainingParams {
        population_size: 50,
        seed: Some(7),
        ..TrainingParams::default()
    };

    log::info!("Starting genetic warm-up");
    run_genetic(&params)?;

    log::info!("Starting neuroevolution");
    let archive = run_neuroevolution(&params)?;

    fs::write(OUTPUT_FILE, archive.to_json()?)?;
    log::info!(
        "Saved {} brains from generation {} to {}",
        archive.brains.len(),
        archive.generation,
        OUTPUT_FILE
    );

    let restored = BrainArchive::from_json(&fs::read_to_string(OUTPUT_FILE)?)?;
    run_boss_fight(&restored, params.seed)?;
    Ok(())
}
