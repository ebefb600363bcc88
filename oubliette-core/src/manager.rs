//! The AI coordination hub.
//!
//! The manager owns the loaded configuration, the registered behavior
//! systems and the pending event queue. It does not own the component store:
//! every operation that touches entities borrows the store from the caller,
//! so the game loop stays in control of world state.
//!
//! Fault policy throughout: a failing system or handler is logged and
//! counted, never propagated. One broken system degrades AI quality; it must
//! not end the game.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::behavior::tree::BehaviorNode;
use crate::behavior::{AiSystem, SystemStats};
use crate::components::{
    BehaviorTreeState, Component, ComponentKind, MemoryBank, Motivation, Personality,
};
use crate::config::ConfigStore;
use crate::error::Result;
use crate::events::{EventKind, GameEvent};
use crate::faction::assign_faction;
use crate::metrics::AiMetrics;
use crate::store::ComponentStore;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// System registry
// ---------------------------------------------------------------------------

struct SystemEntry {
    name: String,
    priority: i32,
    subscriptions: Vec<EventKind>,
    system: Box<dyn AiSystem>,
}

/// Snapshot of manager-level and per-system diagnostics.
#[derive(Debug, Clone)]
pub struct ManagerStats {
    /// Entities currently under AI control.
    pub entities_active: usize,
    /// Coordination-layer counters.
    pub metrics: AiMetrics,
    /// Per-system counters, in registration order.
    pub systems: Vec<(String, SystemStats)>,
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Central coordination hub for all AI systems.
pub struct AiManager {
    config: ConfigStore,
    systems: Vec<SystemEntry>,
    event_queue: VecDeque<GameEvent>,
    ai_entities: HashSet<EntityId>,
    faction_memberships: HashMap<EntityId, String>,
    metrics: AiMetrics,
}

impl AiManager {
    /// Create a manager around an already-prepared config store.
    #[must_use]
    pub fn new(config: ConfigStore) -> Self {
        Self {
            config,
            systems: Vec::new(),
            event_queue: VecDeque::new(),
            ai_entities: HashSet::new(),
            faction_memberships: HashMap::new(),
            metrics: AiMetrics::default(),
        }
    }

    /// Create a manager loading configs from the given root. Missing or
    /// malformed config files are logged and skipped; the manager still
    /// starts with whatever loaded.
    #[must_use]
    pub fn from_config_root(root: impl Into<PathBuf>) -> Self {
        let mut config = ConfigStore::new(root);
        config.load_all_ai_configs();
        info!("ai manager initialized");
        Self::new(config)
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Mutable access to the configuration, e.g. to start the file watcher
    /// or drain pending reloads.
    pub fn config_mut(&mut self) -> &mut ConfigStore {
        &mut self.config
    }

    // -----------------------------------------------------------------------
    // System registration
    // -----------------------------------------------------------------------

    /// Register a behavior system.
    ///
    /// `priority` orders updates (highest first; ties keep registration
    /// order). `subscriptions` lists the event kinds the system wants
    /// delivered through [`AiSystem::handle_event`].
    pub fn register_system(
        &mut self,
        name: impl Into<String>,
        system: Box<dyn AiSystem>,
        priority: i32,
        subscriptions: Vec<EventKind>,
    ) {
        let name = name.into();
        info!(system = %name, priority, "registered ai system");
        self.systems.push(SystemEntry {
            name,
            priority,
            subscriptions,
            system,
        });
        // Highest priority first; stable sort keeps registration order on ties.
        self.systems.sort_by_key(|entry| std::cmp::Reverse(entry.priority));
    }

    /// Remove a system by name. Returns whether it was found.
    pub fn unregister_system(&mut self, name: &str) -> bool {
        let before = self.systems.len();
        self.systems.retain(|entry| entry.name != name);
        let removed = self.systems.len() != before;
        if removed {
            info!(system = name, "unregistered ai system");
        }
        removed
    }

    /// Names of registered systems in update order.
    #[must_use]
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|entry| entry.name.as_str()).collect()
    }

    // -----------------------------------------------------------------------
    // Entity lifecycle
    // -----------------------------------------------------------------------

    /// Place an entity under AI control.
    ///
    /// Guarantees the entity has memory and personality components, then
    /// applies the archetype (personality overrides, behavior tree,
    /// motivations) and faction assignment when given. Unknown archetype or
    /// faction names log a warning and skip that part; the entity is still
    /// registered.
    ///
    /// # Errors
    ///
    /// Fails only if the entity does not exist in the store.
    pub fn register_ai_entity(
        &mut self,
        store: &mut ComponentStore,
        entity: EntityId,
        archetype: Option<&str>,
        faction: Option<&str>,
    ) -> Result<()> {
        self.ensure_ai_components(store, entity)?;
        self.ai_entities.insert(entity);

        if let Some(archetype) = archetype {
            self.apply_archetype(store, entity, archetype)?;
        }
        if let Some(faction) = faction {
            if assign_faction(store, &self.config, entity, faction) {
                self.faction_memberships.insert(entity, faction.to_string());
            }
        }
        self.metrics.entities_registered += 1;
        debug!(%entity, ?archetype, ?faction, "registered ai entity");
        Ok(())
    }

    /// Release an entity from AI control. Its components are left in place;
    /// destroying the entity is the store's business.
    pub fn unregister_ai_entity(&mut self, entity: EntityId) {
        if self.ai_entities.remove(&entity) {
            self.faction_memberships.remove(&entity);
            self.metrics.entities_unregistered += 1;
            debug!(%entity, "unregistered ai entity");
        }
    }

    fn ensure_ai_components(&self, store: &mut ComponentStore, entity: EntityId) -> Result<()> {
        if !store.has(entity, ComponentKind::Memory) {
            store.attach(entity, Component::Memory(MemoryBank::default()))?;
        }
        if !store.has(entity, ComponentKind::Personality) {
            store.attach(entity, Component::Personality(Personality::new()))?;
        }
        Ok(())
    }

    fn apply_archetype(
        &self,
        store: &mut ComponentStore,
        entity: EntityId,
        archetype_name: &str,
    ) -> Result<()> {
        let Some(archetype) = self.config.archetype(archetype_name) else {
            warn!(archetype = archetype_name, "unknown archetype");
            return Ok(());
        };

        if !archetype.personality.is_empty() {
            let personality = Personality::with_overrides(&archetype.personality);
            store.attach(entity, Component::Personality(personality))?;
        }

        if let Some(tree_name) = &archetype.behavior_tree {
            if let Some(def) = self.config.behavior_tree_def(tree_name) {
                let mut state = BehaviorTreeState::from_tree_id(tree_name.clone());
                state.tree = BehaviorNode::from_tree_def(def);
                store.attach(entity, Component::BehaviorTree(state))?;
            } else {
                warn!(tree = %tree_name, "archetype references unknown behavior tree");
            }
        }

        let mut motivation = Motivation::new();
        for (need, value) in &archetype.motivations {
            motivation.set_survival_need(need, *value);
        }
        store.attach(entity, Component::Motivation(motivation))?;

        debug!(%entity, archetype = archetype_name, "applied archetype");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Queue an event for the next [`Self::process_events`] drain.
    pub fn post_event(&mut self, event: GameEvent) {
        debug!(kind = event.kind.as_str(), "posted ai event");
        self.event_queue.push_back(event);
    }

    /// Drain the event queue in FIFO order, delivering each event to every
    /// system subscribed to its kind. Handler failures are logged, counted
    /// and do not stop the drain. Returns the number of events processed.
    pub fn process_events(&mut self, store: &mut ComponentStore) -> usize {
        let mut processed = 0;
        while let Some(event) = self.event_queue.pop_front() {
            processed += 1;
            for entry in &mut self.systems {
                if !entry.subscriptions.contains(&event.kind) {
                    continue;
                }
                if let Err(err) = entry.system.handle_event(store, &event) {
                    error!(
                        system = %entry.name,
                        kind = event.kind.as_str(),
                        error = %err,
                        "event handler failed"
                    );
                    self.metrics.record_handler_error();
                }
            }
        }
        if processed > 0 {
            self.metrics.record_events(processed as u64);
            debug!(processed, "drained ai events");
        }
        processed
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// One AI tick: drain queued events, then update every system in
    /// priority order. System failures are logged and counted.
    pub fn update(&mut self, store: &mut ComponentStore, delta: f64) {
        self.process_events(store);
        for entry in &mut self.systems {
            if let Err(err) = entry.system.update(store, delta) {
                error!(system = %entry.name, error = %err, "ai system update failed");
                self.metrics.record_system_error();
            }
        }
    }

    /// Shut every system down, isolating failures, then clear all state.
    pub fn shutdown(&mut self) {
        info!("shutting down ai manager");
        for entry in &mut self.systems {
            if let Err(err) = entry.system.shutdown() {
                error!(system = %entry.name, error = %err, "ai system shutdown failed");
                self.metrics.record_system_error();
            }
        }
        self.systems.clear();
        self.ai_entities.clear();
        self.faction_memberships.clear();
        self.event_queue.clear();
        info!("ai manager shutdown complete");
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Entities currently under AI control.
    #[must_use]
    pub fn ai_entities(&self) -> &HashSet<EntityId> {
        &self.ai_entities
    }

    /// Members of a faction, in id order.
    #[must_use]
    pub fn faction_members(&self, faction_id: &str) -> Vec<EntityId> {
        let mut members: Vec<EntityId> = self
            .faction_memberships
            .iter()
            .filter(|(_, faction)| faction.as_str() == faction_id)
            .map(|(entity, _)| *entity)
            .collect();
        members.sort_unstable();
        members
    }

    /// The faction an entity was registered into, if any.
    #[must_use]
    pub fn entity_faction(&self, entity: EntityId) -> Option<&str> {
        self.faction_memberships.get(&entity).map(String::as_str)
    }

    /// Diagnostics for the manager and every registered system.
    #[must_use]
    pub fn performance_stats(&self) -> ManagerStats {
        ManagerStats {
            entities_active: self.ai_entities.len(),
            metrics: self.metrics,
            systems: self
                .systems
                .iter()
                .map(|entry| (entry.name.clone(), entry.system.performance_stats()))
                .collect(),
        }
    }
}

impl std::fmt::Debug for AiManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiManager")
            .field("systems", &self.system_names())
            .field("entities", &self.ai_entities.len())
            .field("queued_events", &self.event_queue.len())
            .finish_non_exhaustive()
    }
}
