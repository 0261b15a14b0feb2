//! Player arrows.
//!
//! Arrows home in on the nearest live predator and expire after a fixed
//! number of ticks. Damage is resolved by the arena through the event queue.

use serde::{Deserialize, Serialize};

/// Speed cap.
pub const MAX_SPEED: f32 = 12.0;
/// Homing force cap.
pub const MAX_FORCE: f32 = 0.5;
/// Collision radius.
pub const RADIUS: f32 = 10.0;
/// Ticks before an arrow expires.
pub const LIFETIME: u32 = 120;
/// Damage dealt on impact.
pub const ARROW_DAMAGE: f32 = 1.0;

/// Remaining flight time of an arrow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrowState {
    /// Ticks left before the arrow expires.
    pub lifetime: u32,
}

impl Default for ArrowState {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrowState {
    /// A freshly fired arrow.
    pub fn new() -> Self {
        Self { lifetime: LIFETIME }
    }

    /// Counts down one tick. Returns `true` once the arrow has expired.
    pub fn tick(&mut self) -> bool {
        self.lifetime = self.lifetime.saturating_sub(1);
        self.lifetime == 0
    }
}
