//! Thin turn driver owning the bus, store and AI manager.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tracing::{info, warn};

use oubliette_core::behavior::advanced::AdvancedBehaviorSystem;
use oubliette_core::behavior::basic::BasicBehaviorSystem;
use oubliette_core::components::{Component, Graphic, Health, Position};
use oubliette_core::events::ai::AiEventKind;
use oubliette_core::events::{CoreEventKind, EventBus, EventKind, GameEvent};
use oubliette_core::types::{EntityId, Location};
use oubliette_core::{AiManager, ComponentStore};

use crate::bridge::{AiBridge, spawn_event};

/// Seconds of game time each turn represents.
const TURN_DELTA: f64 = 1.0;

/// The game loop's view of the world: event bus, component store, AI manager
/// and the bridge wiring them together.
pub struct Engine {
    bus: EventBus,
    store: Arc<Mutex<ComponentStore>>,
    manager: Arc<Mutex<AiManager>>,
    turn: u64,
}

impl Engine {
    /// Build an engine loading AI configs from the given root and wiring the
    /// standard pair of behavior systems (advanced above basic).
    #[must_use]
    pub fn new(config_root: impl AsRef<Path>) -> Self {
        let mut manager = AiManager::from_config_root(config_root.as_ref().to_path_buf());
        manager.register_system(
            "advanced_behavior",
            Box::new(AdvancedBehaviorSystem::new()),
            10,
            vec![
                EventKind::Ai(AiEventKind::ConflictStarted),
                EventKind::Ai(AiEventKind::ReputationChanged),
                EventKind::Ai(AiEventKind::FactionRelationshipChanged),
            ],
        );
        manager.register_system("basic_behavior", Box::new(BasicBehaviorSystem::new()), 0, Vec::new());
        if let Err(err) = manager.config_mut().watch() {
            warn!(error = %err, "config watcher unavailable; hot reload disabled");
        }

        let manager = Arc::new(Mutex::new(manager));
        let store = Arc::new(Mutex::new(ComponentStore::new()));
        let mut bus = EventBus::new();
        AiBridge::new(Arc::clone(&manager), Arc::clone(&store)).install(&mut bus);
        info!("engine initialized");

        Self {
            bus,
            store,
            manager,
            turn: 0,
        }
    }

    /// Create the player entity at a position. The player carries no AI.
    pub fn spawn_player(&mut self, x: i32, y: i32) -> EntityId {
        let mut store = self.store.lock();
        let player = store.create_player("player");
        store
            .attach(player, Component::Position(Position::new(x, y)))
            .expect("player was just created");
        store
            .attach(player, Component::Health(Health::new(30)))
            .expect("player was just created");
        store
            .attach(
                player,
                Component::Graphic(Graphic {
                    glyph: '@',
                    color: (255, 255, 255),
                }),
            )
            .expect("player was just created");
        player
    }

    /// Spawn a monster of the given type and announce it to the world. The
    /// AI bridge picks the spawn event up and registers the entity.
    pub fn spawn_monster(&mut self, entity_type: &str, x: i32, y: i32) -> EntityId {
        let entity = {
            let mut store = self.store.lock();
            let entity = store.create_entity();
            store
                .attach(entity, Component::Position(Position::new(x, y)))
                .expect("entity was just created");
            store
                .attach(entity, Component::Health(Health::new(10)))
                .expect("entity was just created");
            store
                .attach(
                    entity,
                    Component::Graphic(Graphic {
                        glyph: entity_type.chars().next().unwrap_or('m'),
                        color: (63, 127, 63),
                    }),
                )
                .expect("entity was just created");
            entity
        };
        self.bus
            .emit(spawn_event(entity, entity_type, Location::new(x, y)));
        entity
    }

    /// Announce an entity's death and remove it from the world.
    pub fn kill_entity(&mut self, entity: EntityId) {
        self.bus.emit(
            GameEvent::new(CoreEventKind::EntityDeath).with("entity_id", Value::from(entity.0)),
        );
        self.store.lock().destroy_entity(entity);
    }

    /// Announce a freshly generated level so territory hooks can observe it.
    pub fn announce_level(&mut self, depth: u32) {
        self.bus
            .emit(GameEvent::new(CoreEventKind::LevelGenerate).with("depth", json!(depth)));
    }

    /// Run one game turn: turn start event, AI tick, turn end event.
    pub fn run_turn(&mut self) {
        self.turn += 1;
        self.manager.lock().config_mut().poll_reloads();
        self.bus.emit(
            GameEvent::new(CoreEventKind::TurnStart).with("turn_number", json!(self.turn)),
        );
        {
            let mut manager = self.manager.lock();
            let mut store = self.store.lock();
            manager.update(&mut store, TURN_DELTA);
        }
        self.bus.emit_simple(CoreEventKind::TurnEnd);
    }

    /// Everything the renderer needs to draw: position and glyph of every
    /// visible entity, in id order.
    #[must_use]
    pub fn renderables(&self) -> Vec<(EntityId, Position, Graphic)> {
        use oubliette_core::components::ComponentKind;
        let store = self.store.lock();
        store
            .with_all(&[ComponentKind::Position, ComponentKind::Graphic])
            .into_iter()
            .filter_map(|entity| {
                let position = *store.position(entity)?;
                let graphic = *store.graphic(entity)?;
                Some((entity, position, graphic))
            })
            .collect()
    }

    /// Completed turn count.
    #[must_use]
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// The event bus, for external subscribers (UI, mods, sound).
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Shared handle to the component store.
    #[must_use]
    pub fn store(&self) -> Arc<Mutex<ComponentStore>> {
        Arc::clone(&self.store)
    }

    /// Shared handle to the AI manager.
    #[must_use]
    pub fn manager(&self) -> Arc<Mutex<AiManager>> {
        Arc::clone(&self.manager)
    }

    /// Shut the AI layer down cleanly.
    pub fn shutdown(&mut self) {
        self.manager.lock().shutdown();
        info!(turns = self.turn, "engine shut down");
    }
}
