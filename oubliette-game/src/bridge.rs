//! Event-bus bridge between the engine and the AI manager.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};

use oubliette_core::events::ai;
use oubliette_core::events::{CoreEventKind, EventBus, GameEvent};
use oubliette_core::types::{EntityId, Location};
use oubliette_core::{AiManager, ComponentStore};

/// Map an engine entity type to the AI archetype it should run.
#[must_use]
pub fn archetype_for(entity_type: &str) -> &'static str {
    match entity_type {
        "orc" => "aggressive_monster",
        "troll" => "tough_monster",
        "goblin" => "sneaky_monster",
        _ => "basic_monster",
    }
}

/// Faction every spawned monster joins.
pub const MONSTER_FACTION: &str = "monsters";

/// Subscribes to engine events and drives the AI manager in response.
///
/// Lock order is always manager before store; every handler follows it.
pub struct AiBridge {
    manager: Arc<Mutex<AiManager>>,
    store: Arc<Mutex<ComponentStore>>,
}

impl AiBridge {
    /// Create a bridge over shared manager and store handles.
    #[must_use]
    pub fn new(manager: Arc<Mutex<AiManager>>, store: Arc<Mutex<ComponentStore>>) -> Self {
        Self { manager, store }
    }

    /// Register all engine-event handlers on the bus.
    pub fn install(&self, bus: &mut EventBus) {
        self.install_spawn_handler(bus);
        self.install_death_handler(bus);
        self.install_turn_handlers(bus);
        self.install_observers(bus);
    }

    fn install_spawn_handler(&self, bus: &mut EventBus) {
        let manager = Arc::clone(&self.manager);
        let store = Arc::clone(&self.store);
        bus.subscribe(CoreEventKind::EntitySpawn, move |event| {
            let Some(entity) = event.entity_id() else {
                warn!("entity_spawn event without entity_id");
                return Ok(());
            };
            let entity_type = event
                .get("entity_type")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            let archetype = archetype_for(&entity_type);
            let location = event.location().unwrap_or_default();

            let mut manager = manager.lock();
            let mut store = store.lock();
            // Player control is a store-level fact, not a payload convention.
            if store.is_player(entity) {
                return Ok(());
            }
            manager.register_ai_entity(&mut store, entity, Some(archetype), Some(MONSTER_FACTION))?;
            manager.post_event(ai::entity_spawned(
                entity,
                &entity_type,
                location,
                MONSTER_FACTION,
            ));
            debug!(%entity, entity_type, archetype, "spawned entity registered with ai");
            Ok(())
        });
    }

    fn install_death_handler(&self, bus: &mut EventBus) {
        let manager = Arc::clone(&self.manager);
        bus.subscribe(CoreEventKind::EntityDeath, move |event| {
            if let Some(entity) = event.entity_id() {
                manager.lock().unregister_ai_entity(entity);
                debug!(%entity, "dead entity released from ai");
            }
            Ok(())
        });
    }

    fn install_turn_handlers(&self, bus: &mut EventBus) {
        {
            let manager = Arc::clone(&self.manager);
            bus.subscribe(CoreEventKind::TurnStart, move |event| {
                let turn = event
                    .get("turn_number")
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                let mut manager = manager.lock();
                let active = manager.ai_entities().len();
                manager.post_event(ai::turn_started(turn, active));
                Ok(())
            });
        }
        {
            let manager = Arc::clone(&self.manager);
            let store = Arc::clone(&self.store);
            bus.subscribe(CoreEventKind::TurnEnd, move |_| {
                let mut manager = manager.lock();
                let mut store = store.lock();
                manager.process_events(&mut store);
                Ok(())
            });
        }
    }

    fn install_observers(&self, bus: &mut EventBus) {
        bus.subscribe(CoreEventKind::CombatStart, |event| {
            debug!(entity = ?event.entity_id(), "combat started");
            Ok(())
        });
        // Territory seeding hook: generation payloads are observed here so
        // faction territory can later be derived from carved rooms.
        bus.subscribe(CoreEventKind::LevelGenerate, |event| {
            debug!(depth = ?event.get("depth"), "level generated");
            Ok(())
        });
    }
}

/// Build the engine-side spawn event for an entity.
#[must_use]
pub fn spawn_event(entity: EntityId, entity_type: &str, location: Location) -> GameEvent {
    GameEvent::new(CoreEventKind::EntitySpawn)
        .with("entity_id", Value::from(entity.0))
        .with("entity_type", Value::from(entity_type))
        .with("location", serde_json::json!([location.x, location.y]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oubliette_core::config::ConfigStore;

    fn shared_state() -> (Arc<Mutex<AiManager>>, Arc<Mutex<ComponentStore>>) {
        // Empty config root: archetype/faction lookups warn and no-op, which
        // is enough to test the bridge wiring itself.
        let manager = AiManager::new(ConfigStore::new("/nonexistent"));
        (
            Arc::new(Mutex::new(manager)),
            Arc::new(Mutex::new(ComponentStore::new())),
        )
    }

    #[test]
    fn archetype_mapping() {
        assert_eq!(archetype_for("orc"), "aggressive_monster");
        assert_eq!(archetype_for("troll"), "tough_monster");
        assert_eq!(archetype_for("goblin"), "sneaky_monster");
        assert_eq!(archetype_for("slime"), "basic_monster");
    }

    #[test]
    fn spawn_registers_and_death_unregisters() {
        let (manager, store) = shared_state();
        let mut bus = EventBus::new();
        AiBridge::new(Arc::clone(&manager), Arc::clone(&store)).install(&mut bus);

        let entity = store.lock().create_entity();
        bus.emit(spawn_event(entity, "orc", Location::new(3, 4)));
        assert!(manager.lock().ai_entities().contains(&entity));

        bus.emit(
            GameEvent::new(CoreEventKind::EntityDeath).with("entity_id", Value::from(entity.0)),
        );
        assert!(!manager.lock().ai_entities().contains(&entity));
    }

    #[test]
    fn player_spawn_is_ignored() {
        let (manager, store) = shared_state();
        let mut bus = EventBus::new();
        AiBridge::new(Arc::clone(&manager), Arc::clone(&store)).install(&mut bus);

        let player = store.lock().create_player("player");
        bus.emit(spawn_event(player, "player", Location::new(0, 0)));
        assert!(manager.lock().ai_entities().is_empty());

        // The flag, not the payload string, is what excludes the entity.
        let disguised = store.lock().create_player("player_two");
        bus.emit(spawn_event(disguised, "orc", Location::new(1, 1)));
        assert!(manager.lock().ai_entities().is_empty());
    }

    #[test]
    fn turn_start_queues_ai_turn_event() {
        let (manager, store) = shared_state();
        let mut bus = EventBus::new();
        AiBridge::new(Arc::clone(&manager), Arc::clone(&store)).install(&mut bus);

        bus.emit(GameEvent::new(CoreEventKind::TurnStart).with("turn_number", Value::from(7u64)));
        // The queued turn_started event drains on turn end.
        bus.emit_simple(CoreEventKind::TurnEnd);
        assert_eq!(
            manager.lock().performance_stats().metrics.events_processed,
            1
        );
    }
}
