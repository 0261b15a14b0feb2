use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Behavior switches and weights attached to a predator when its wave spawns.
///
/// Immutable after spawn. Every field has a default, so partial JSON configs
/// deserialize into a fully specified value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Head straight for the target.
    pub seek: bool,
    /// Seek, slowing down inside the arrival radius.
    pub arrive: bool,
    /// Seek the target's predicted position.
    pub pursue: bool,
    /// Add smooth random drift.
    pub wander: bool,
    /// Ray-cast around walls.
    pub avoid_obstacles: bool,
    /// Keep distance from other predators.
    pub separation: bool,
    /// Weight of the pursue/arrive/seek term.
    pub seek_weight: f32,
    /// Weight of the wander term.
    pub wander_weight: f32,
    /// Difficulty level, starting at 1. Sets health and wall solidity.
    pub level: u32,
    /// Speed cap.
    pub max_speed: f32,
    /// Steering force cap.
    pub max_force: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            seek: false,
            arrive: false,
            pursue: false,
            wander: false,
            avoid_obstacles: false,
            separation: false,
            seek_weight: 1.0,
            wander_weight: 1.0,
            level: 1,
            max_speed: 4.0,
            max_force: 0.1,
        }
    }
}

impl SteeringConfig {
    /// Preset for the steering-driven levels 1 to 4.
    pub fn for_level(level: u32) -> Result<Self, ConfigError> {
        let base = Self {
            level,
            ..Self::default()
        };
        let config = match level {
            0 => return Err(ConfigError::ZeroLevel),
            // The zombie
            1 => Self {
                max_speed: 1.0,
                max_force: 0.05,
                seek: true,
                ..base
            },
            // The stalker
            2 => Self {
                max_speed: 2.0,
                max_force: 0.1,
                arrive: true,
                wander: true,
                wander_weight: 0.5,
                ..base
            },
            // The hunter
            3 => Self {
                max_speed: 3.0,
                max_force: 0.2,
                pursue: true,
                avoid_obstacles: true,
                ..base
            },
            // The pack
            4 => Self {
                max_speed: 4.0,
                max_force: 0.25,
                pursue: true,
                avoid_obstacles: true,
                separation: true,
                ..base
            },
            other => return Err(ConfigError::UnknownLevel(other)),
        };
        Ok(config)
    }

    /// Checks that every scalar is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level == 0 {
            return Err(ConfigError::ZeroLevel);
        }
        positive("max_speed", self.max_speed)?;
        positive("max_force", self.max_force)?;
        non_negative("seek_weight", self.seek_weight)?;
        non_negative("wander_weight", self.wander_weight)?;
        Ok(())
    }
}

/// Parameters shared by the genetic and neuroevolution trainers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    /// Individuals per generation.
    pub population_size: usize,
    /// Ticks per generation; also the rocket genome length.
    pub lifetime: usize,
    /// Per-gene mutation probability for rocket genomes.
    pub rocket_mutation_rate: f32,
    /// Per-weight mutation probability for neural predators.
    pub neural_mutation_rate: f32,
    /// Mating pool copies granted to the fittest rocket.
    pub mating_pool_multiplier: usize,
    /// Minimum spawn distance from the target.
    pub spawn_clearance: f32,
    /// Number of brains kept at the end of a session.
    pub top_n: usize,
    /// Seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            lifetime: 300,
            rocket_mutation_rate: 0.01,
            neural_mutation_rate: 0.1,
            mating_pool_multiplier: 120,
            spawn_clearance: 200.0,
            top_n: 3,
            seed: None,
        }
    }
}

impl TrainingParams {
    /// Checks that the trainer can run with these values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::Empty {
                field: "population_size",
            });
        }
        if self.lifetime == 0 {
            return Err(ConfigError::Empty { field: "lifetime" });
        }
        if self.mating_pool_multiplier == 0 {
            return Err(ConfigError::Empty {
                field: "mating_pool_multiplier",
            });
        }
        unit_range("rocket_mutation_rate", self.rocket_mutation_rate)?;
        unit_range("neural_mutation_rate", self.neural_mutation_rate)?;
        non_negative("spawn_clearance", self.spawn_clearance)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn unit_range(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}
