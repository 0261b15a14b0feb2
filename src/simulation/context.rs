//! Per-tick world snapshot handed to every decision.
//!
//! Replaces ambient flags (boundary mode, wall list) with an explicit value the
//! driver rebuilds or updates once per tick.

use geo::{Coord, Rect};
use ndarray::Array1;
use rand::Rng;

use super::geometric_utils::{distance, vec2, zero};

/// Collision radius of the player avatar.
pub const PLAYER_RADIUS: f32 = 60.0;

/// Attempts made to find a spawn point clear of the target.
const SPAWN_ATTEMPTS: usize = 100;

/// The tracked entity predators chase (the player).
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Current position.
    pub pos: Array1<f32>,
    /// Current velocity.
    pub vel: Array1<f32>,
    /// Collision radius.
    pub radius: f32,
}

impl Target {
    /// Creates a target with explicit kinematics.
    pub fn new(pos: Array1<f32>, vel: Array1<f32>, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    /// A stationary player at `(x, y)`.
    pub fn at(x: f32, y: f32) -> Self {
        Self::new(vec2(x, y), zero(), PLAYER_RADIUS)
    }
}

/// Read-only world state for one tick.
#[derive(Debug, Clone)]
pub struct TickContext {
    /// The entity being hunted.
    pub target: Target,
    /// Axis-aligned walls.
    pub obstacles: Vec<Rect<f32>>,
    /// Playable area.
    pub bounds: Rect<f32>,
    /// Whether agents steer back from the edges instead of wrapping around.
    pub boundaries_enabled: bool,
}

impl TickContext {
    /// Creates a context for a `width` × `height` world with no walls.
    pub fn new(target: Target, width: f32, height: f32) -> Self {
        Self {
            target,
            obstacles: Vec::new(),
            bounds: Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: width, y: height }),
            boundaries_enabled: false,
        }
    }

    /// Replaces the wall list.
    #[must_use]
    pub fn with_obstacles(mut self, obstacles: Vec<Rect<f32>>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Toggles boundary containment.
    #[must_use]
    pub fn with_boundaries(mut self, enabled: bool) -> Self {
        self.boundaries_enabled = enabled;
        self
    }

    /// Random point in the world at least `clearance` away from the target.
    ///
    /// Gives up after a fixed number of attempts and returns the last sample,
    /// so a world smaller than the clearance still yields a position.
    pub fn spawn_position<R: Rng + ?Sized>(&self, clearance: f32, rng: &mut R) -> Array1<f32> {
        let (min, width, height) = (self.bounds.min(), self.bounds.width(), self.bounds.height());
        let mut pos = vec2(min.x, min.y);
        for _ in 0..SPAWN_ATTEMPTS {
            pos = vec2(
                min.x + rng.random::<f32>() * width,
                min.y + rng.random::<f32>() * height,
            );
            if distance(&pos, &self.target.pos) >= clearance {
                break;
            }
        }
        pos
    }
}
