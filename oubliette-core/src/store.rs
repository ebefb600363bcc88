//! Entity registry with per-kind component storage and indexed queries.
//!
//! Each [`ComponentKind`] gets its own homogeneous storage slot, so callers
//! can borrow several different component kinds of the same entity mutably at
//! once (see [`ComponentStore::behavior_bundle_mut`]). An inverted index from
//! kind to entity set makes capability queries proportional to the smallest
//! participating bucket rather than the whole population.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::components::{
    BehaviorTreeState, Component, ComponentKind, FactionMembership, Graphic, Health, MemoryBank,
    Motivation, Personality, Position, Reputation,
};
use crate::error::{AiError, Result};
use crate::types::EntityId;

macro_rules! slot_accessors {
    ($slot:ident, $kind:ident, $ty:ty, $get:ident, $get_mut:ident) => {
        #[doc = concat!("Borrow the `", stringify!($kind), "` component of an entity.")]
        #[must_use]
        pub fn $get(&self, entity: EntityId) -> Option<&$ty> {
            self.$slot.get(&entity)
        }

        #[doc = concat!("Mutably borrow the `", stringify!($kind), "` component of an entity.")]
        #[must_use]
        pub fn $get_mut(&mut self, entity: EntityId) -> Option<&mut $ty> {
            self.$slot.get_mut(&entity)
        }
    };
}

/// Entity/component registry for the AI layer.
#[derive(Debug, Default)]
pub struct ComponentStore {
    next_id: u64,
    alive: HashSet<EntityId>,
    players: HashSet<EntityId>,
    names: HashMap<String, EntityId>,
    index: HashMap<ComponentKind, HashSet<EntityId>>,

    positions: HashMap<EntityId, Position>,
    healths: HashMap<EntityId, Health>,
    graphics: HashMap<EntityId, Graphic>,
    personalities: HashMap<EntityId, Personality>,
    motivations: HashMap<EntityId, Motivation>,
    memories: HashMap<EntityId, MemoryBank>,
    behaviors: HashMap<EntityId, BehaviorTreeState>,
    factions: HashMap<EntityId, FactionMembership>,
    reputations: HashMap<EntityId, Reputation>,
}

impl ComponentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Entity lifecycle
    // -----------------------------------------------------------------------

    /// Create a new entity with no components. Ids are never reused.
    pub fn create_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.alive.insert(id);
        id
    }

    /// Create a new entity addressable by a unique name. If the name is
    /// already taken the previous mapping is overwritten.
    pub fn create_named_entity(&mut self, name: impl Into<String>) -> EntityId {
        let id = self.create_entity();
        self.names.insert(name.into(), id);
        id
    }

    /// Create a player-controlled entity. Player entities carry a flag the
    /// AI layer consults to keep them out of AI control.
    pub fn create_player(&mut self, name: impl Into<String>) -> EntityId {
        let id = self.create_named_entity(name);
        self.players.insert(id);
        id
    }

    /// Whether the entity is player-controlled.
    #[must_use]
    pub fn is_player(&self, entity: EntityId) -> bool {
        self.players.contains(&entity)
    }

    /// Destroy an entity and all of its components.
    ///
    /// Destroying an unknown or already-destroyed entity logs a warning and
    /// returns `false`.
    pub fn destroy_entity(&mut self, entity: EntityId) -> bool {
        if !self.alive.remove(&entity) {
            warn!(%entity, "destroy requested for unknown entity");
            return false;
        }
        for kind in ComponentKind::ALL {
            self.take_from_slot(entity, kind);
            if let Some(bucket) = self.index.get_mut(&kind) {
                bucket.remove(&entity);
            }
        }
        self.names.retain(|_, id| *id != entity);
        self.players.remove(&entity);
        true
    }

    /// Whether the entity exists.
    #[must_use]
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.alive.contains(&entity)
    }

    /// Look up an entity by the name it was created with.
    #[must_use]
    pub fn entity_by_name(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    /// All live entities, in id order.
    #[must_use]
    pub fn all_entities(&self) -> Vec<EntityId> {
        let mut out: Vec<EntityId> = self.alive.iter().copied().collect();
        out.sort_unstable();
        out
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.alive.len()
    }

    // -----------------------------------------------------------------------
    // Component attachment
    // -----------------------------------------------------------------------

    /// Attach a component to an entity, replacing any existing component of
    /// the same kind.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::EntityNotFound`] if the entity does not exist.
    pub fn attach(&mut self, entity: EntityId, component: Component) -> Result<()> {
        if !self.alive.contains(&entity) {
            return Err(AiError::EntityNotFound(entity));
        }
        let kind = component.kind();
        match component {
            Component::Position(c) => {
                self.positions.insert(entity, c);
            }
            Component::Health(c) => {
                self.healths.insert(entity, c);
            }
            Component::Graphic(c) => {
                self.graphics.insert(entity, c);
            }
            Component::Personality(c) => {
                self.personalities.insert(entity, c);
            }
            Component::Motivation(c) => {
                self.motivations.insert(entity, c);
            }
            Component::Memory(c) => {
                self.memories.insert(entity, c);
            }
            Component::BehaviorTree(c) => {
                self.behaviors.insert(entity, c);
            }
            Component::Faction(c) => {
                self.factions.insert(entity, c);
            }
            Component::Reputation(c) => {
                self.reputations.insert(entity, c);
            }
        }
        self.index.entry(kind).or_default().insert(entity);
        Ok(())
    }

    /// Detach a component from an entity, returning the removed instance.
    pub fn detach(&mut self, entity: EntityId, kind: ComponentKind) -> Option<Component> {
        let removed = self.take_from_slot(entity, kind);
        if removed.is_some() {
            if let Some(bucket) = self.index.get_mut(&kind) {
                bucket.remove(&entity);
            }
        }
        removed
    }

    /// Whether the entity has a component of the given kind.
    #[must_use]
    pub fn has(&self, entity: EntityId, kind: ComponentKind) -> bool {
        self.index
            .get(&kind)
            .is_some_and(|bucket| bucket.contains(&entity))
    }

    /// The component kinds attached to an entity, in stable order.
    #[must_use]
    pub fn kinds_of(&self, entity: EntityId) -> Vec<ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .filter(|kind| self.has(entity, *kind))
            .collect()
    }

    fn take_from_slot(&mut self, entity: EntityId, kind: ComponentKind) -> Option<Component> {
        match kind {
            ComponentKind::Position => self.positions.remove(&entity).map(Component::Position),
            ComponentKind::Health => self.healths.remove(&entity).map(Component::Health),
            ComponentKind::Graphic => self.graphics.remove(&entity).map(Component::Graphic),
            ComponentKind::Personality => {
                self.personalities.remove(&entity).map(Component::Personality)
            }
            ComponentKind::Motivation => {
                self.motivations.remove(&entity).map(Component::Motivation)
            }
            ComponentKind::Memory => self.memories.remove(&entity).map(Component::Memory),
            ComponentKind::BehaviorTree => {
                self.behaviors.remove(&entity).map(Component::BehaviorTree)
            }
            ComponentKind::Faction => self.factions.remove(&entity).map(Component::Faction),
            ComponentKind::Reputation => {
                self.reputations.remove(&entity).map(Component::Reputation)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Entities that have a component of the given kind, in id order.
    #[must_use]
    pub fn entities_with(&self, kind: ComponentKind) -> Vec<EntityId> {
        let mut out: Vec<EntityId> = self
            .index
            .get(&kind)
            .map(|bucket| bucket.iter().copied().collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// Entities that have all of the given component kinds, in id order. An
    /// empty kind list matches every live entity.
    ///
    /// Intersection starts from the smallest bucket, so the cost is
    /// proportional to the rarest capability rather than the population.
    #[must_use]
    pub fn with_all(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        if kinds.is_empty() {
            return self.all_entities();
        }
        let mut buckets: Vec<&HashSet<EntityId>> = Vec::with_capacity(kinds.len());
        for kind in kinds {
            match self.index.get(kind) {
                Some(bucket) if !bucket.is_empty() => buckets.push(bucket),
                _ => return Vec::new(),
            }
        }
        buckets.sort_by_key(|bucket| bucket.len());
        let Some((smallest, rest)) = buckets.split_first() else {
            return Vec::new();
        };
        let mut out: Vec<EntityId> = smallest
            .iter()
            .copied()
            .filter(|entity| rest.iter().all(|bucket| bucket.contains(entity)))
            .collect();
        out.sort_unstable();
        out
    }

    /// Entities that have at least one of the given component kinds, in id
    /// order.
    #[must_use]
    pub fn with_any(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        let mut seen: HashSet<EntityId> = HashSet::new();
        for kind in kinds {
            if let Some(bucket) = self.index.get(kind) {
                seen.extend(bucket.iter().copied());
            }
        }
        let mut out: Vec<EntityId> = seen.into_iter().collect();
        out.sort_unstable();
        out
    }

    /// Number of entities carrying the given component kind.
    #[must_use]
    pub fn component_count(&self, kind: ComponentKind) -> usize {
        self.index.get(&kind).map_or(0, HashSet::len)
    }

    // -----------------------------------------------------------------------
    // Typed accessors
    // -----------------------------------------------------------------------

    slot_accessors!(positions, Position, Position, position, position_mut);
    slot_accessors!(healths, Health, Health, health, health_mut);
    slot_accessors!(graphics, Graphic, Graphic, graphic, graphic_mut);
    slot_accessors!(
        personalities,
        Personality,
        Personality,
        personality,
        personality_mut
    );
    slot_accessors!(motivations, Motivation, Motivation, motivation, motivation_mut);
    slot_accessors!(memories, Memory, MemoryBank, memory, memory_mut);
    slot_accessors!(behaviors, BehaviorTree, BehaviorTreeState, behavior, behavior_mut);
    slot_accessors!(factions, Faction, FactionMembership, faction, faction_mut);
    slot_accessors!(reputations, Reputation, Reputation, reputation, reputation_mut);

    /// Mutably borrow the full decision bundle of an entity at once: behavior
    /// state, personality, motivation and memory.
    ///
    /// Returns `None` if any of the four components is missing.
    pub fn behavior_bundle_mut(
        &mut self,
        entity: EntityId,
    ) -> Option<(
        &mut BehaviorTreeState,
        &mut Personality,
        &mut Motivation,
        &mut MemoryBank,
    )> {
        let behavior = self.behaviors.get_mut(&entity)?;
        let personality = self.personalities.get_mut(&entity)?;
        let motivation = self.motivations.get_mut(&entity)?;
        let memory = self.memories.get_mut(&entity)?;
        Some((behavior, personality, motivation, memory))
    }
}
