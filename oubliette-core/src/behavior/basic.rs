//! Timer-driven action picker for low-importance entities.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::components::ComponentKind;
use crate::error::Result;
use crate::events::GameEvent;
use crate::store::ComponentStore;
use crate::types::EntityId;

use super::{AiSystem, SystemStats};

/// Seconds between decisions for each entity.
const DECISION_INTERVAL: f64 = 1.0;

const ACTIONS: [&str; 5] = ["wander", "patrol", "rest", "seek_food", "guard"];

/// Cheap behavior system: every entity with a behavior component picks a
/// random action once per second of game time.
///
/// Only the behavior component is required, so this system suits background
/// creatures and ambient life where per-entity reasoning would be wasted.
pub struct BasicBehaviorSystem {
    timers: HashMap<EntityId, f64>,
    rng: StdRng,
    updates: u64,
    events_handled: u64,
}

impl BasicBehaviorSystem {
    /// Create a system with an entropy-seeded RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a system with a fixed RNG seed, for reproducible runs.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            timers: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
            updates: 0,
            events_handled: 0,
        }
    }

    fn choose_action(&mut self) -> &'static str {
        ACTIONS[self.rng.gen_range(0..ACTIONS.len())]
    }
}

impl Default for BasicBehaviorSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AiSystem for BasicBehaviorSystem {
    fn name(&self) -> &str {
        "basic_behavior"
    }

    fn update(&mut self, store: &mut ComponentStore, delta: f64) -> Result<()> {
        self.updates += 1;
        let entities = store.entities_with(ComponentKind::BehaviorTree);
        self.timers.retain(|entity, _| store.is_alive(*entity));

        for entity in entities {
            let timer = self.timers.entry(entity).or_insert(0.0);
            *timer += delta;
            if *timer < DECISION_INTERVAL {
                continue;
            }
            *timer = 0.0;
            let action = self.choose_action();
            if let Some(behavior) = store.behavior_mut(entity) {
                behavior.current_action = Some(action.to_string());
                debug!(%entity, action, "chose action");
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, _store: &mut ComponentStore, event: &GameEvent) -> Result<()> {
        // Nothing to react to; counted for diagnostics only.
        self.events_handled += 1;
        debug!(kind = event.kind.as_str(), "basic system observed event");
        Ok(())
    }

    fn performance_stats(&self) -> SystemStats {
        SystemStats {
            system_type: "basic",
            tracked_entities: self.timers.len(),
            updates: self.updates,
            events_handled: self.events_handled,
            entity_failures: 0,
        }
    }

    fn shutdown(&mut self) -> Result<()> {
        self.timers.clear();
        Ok(())
    }
}
