//! Behavior execution systems.
//!
//! Two interchangeable implementations of [`AiSystem`] live here:
//!
//! - [`basic::BasicBehaviorSystem`] — a cheap timer-driven action picker for
//!   crowds of unimportant entities
//! - [`advanced::AdvancedBehaviorSystem`] — a behavior-tree interpreter
//!   driven by personality, motivation and memory, for entities that need to
//!   feel deliberate
//!
//! Both are registered with the [`AiManager`](crate::manager::AiManager) and
//! driven through the same trait.

pub mod advanced;
pub mod basic;
pub mod tree;

use crate::error::Result;
use crate::events::GameEvent;
use crate::store::ComponentStore;

/// Counters reported by a behavior system for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct SystemStats {
    /// Short label for the implementation ("basic", "advanced", ...).
    pub system_type: &'static str,
    /// Entities the system acted on during its last update.
    pub tracked_entities: usize,
    /// Total update ticks processed.
    pub updates: u64,
    /// Total events handled.
    pub events_handled: u64,
    /// Per-entity failures that were isolated and skipped.
    pub entity_failures: u64,
}

/// A pluggable AI behavior system driven by the manager.
///
/// Errors returned from any method are logged by the manager and never abort
/// the tick; a misbehaving system degrades, it does not crash the game.
pub trait AiSystem {
    /// Registered name of the system.
    fn name(&self) -> &str;

    /// Advance the system by `delta` seconds of game time.
    ///
    /// # Errors
    ///
    /// Implementations report unrecoverable update failures; per-entity
    /// problems should be isolated internally instead.
    fn update(&mut self, store: &mut ComponentStore, delta: f64) -> Result<()>;

    /// React to an event drained from the manager's queue.
    ///
    /// # Errors
    ///
    /// Implementations report failures they cannot isolate.
    fn handle_event(&mut self, store: &mut ComponentStore, event: &GameEvent) -> Result<()>;

    /// Current diagnostic counters.
    fn performance_stats(&self) -> SystemStats;

    /// Release any held state before the system is dropped.
    ///
    /// # Errors
    ///
    /// Implementations report cleanup failures; the manager logs and moves on.
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}
