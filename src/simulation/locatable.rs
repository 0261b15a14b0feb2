//! Trait for entities that have a position and can be updated.
//!
//! This trait provides a common interface for everything in the arena that
//! has a position and integrates its motion once per tick.

use ndarray::Array1;

/// Trait for entities with a position that advance one tick at a time.
///
/// Any type that implements this trait:
/// - Has a position in 2D space
/// - Can integrate its accumulated forces into motion
pub trait Locatable {
    /// Returns a reference to the entity's position.
    fn pos(&self) -> &Array1<f32>;

    /// Returns a mutable reference to the entity's position.
    fn pos_mut(&mut self) -> &mut Array1<f32>;

    /// Integrates the forces applied this tick.
    ///
    /// Must run exactly once per tick, after every force for that tick has
    /// been applied.
    fn update(&mut self);
}
