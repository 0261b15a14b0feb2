//! Event system for cross-agent state updates.
//!
//! Agents decide against a snapshot of the arena; anything that changes another
//! agent (damage, kills) is queued here and applied serially once every agent
//! has moved.

use super::agent::Agent;
use super::arena::ArenaReport;

/// Events that modify agents other than the one that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum ArenaEvent {
    /// An arrow touched a predator.
    ArrowHit {
        /// Index of the arrow in the arrow vector.
        arrow: usize,
        /// Index of the predator in the predator vector.
        predator: usize,
        /// Amount of damage to deal.
        damage: f32,
    },
    /// A predator touched the player.
    PlayerContact {
        /// Index of the predator in the predator vector.
        predator: usize,
    },
}

/// Queue for collecting arena events during a tick.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<ArenaEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: ArenaEvent) {
        self.events.push(event);
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no event is pending.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Applies every queued event in order and records the outcome.
    ///
    /// An arrow only ever hits once: hits from arrows that already struck
    /// this tick, or on predators that already died, are dropped.
    pub fn apply(self, predators: &mut [Agent], arrows: &mut [Agent], report: &mut ArenaReport) {
        for event in self.events {
            match event {
                ArenaEvent::ArrowHit {
                    arrow,
                    predator,
                    damage,
                } => {
                    let (Some(arrow_agent), Some(victim)) =
                        (arrows.get_mut(arrow), predators.get_mut(predator))
                    else {
                        continue;
                    };
                    if !arrow_agent.is_alive() || !victim.is_alive() {
                        continue;
                    }
                    arrow_agent.kill();
                    victim.take_damage(damage);
                    report.arrow_hits += 1;
                    if !victim.is_alive() {
                        report.predators_killed.push(victim.id);
                        log::debug!("predator {} killed", victim.id);
                    }
                }
                ArenaEvent::PlayerContact { predator } => {
                    if let Some(agent) = predators.get(predator).filter(|a| a.is_alive()) {
                        report.player_contacts.push(agent.id);
                    }
                }
            }
        }
    }
}
