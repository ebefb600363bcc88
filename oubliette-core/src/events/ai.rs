//! Typed AI coordination events layered on the event bus.
//!
//! AI events use the same [`GameEvent`] envelope as engine events, with a
//! conventional payload vocabulary (`entity_id`, `faction_id`, `location`)
//! exposed through typed accessors. Constructor helpers below build correctly
//! shaped events with their standard priorities.

use serde_json::{Value, json};

use crate::types::{EntityId, Location};

use super::{CoreEventKind, EventKind, GameEvent};

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// AI-layer event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiEventKind {
    /// An agent changed its coarse behavior mode.
    AiStateChanged,
    /// A behavior tree began executing.
    BehaviorTreeStarted,
    /// A behavior tree finished executing.
    BehaviorTreeCompleted,
    /// A behavior tree node failed.
    BehaviorNodeFailed,

    /// The stance between two factions changed.
    FactionRelationshipChanged,
    /// Two factions formed an alliance.
    FactionAllianceFormed,
    /// A faction declared war.
    FactionWarDeclared,
    /// A faction declared peace.
    FactionPeaceDeclared,
    /// A faction betrayed another.
    FactionBetrayal,
    /// A faction gained territory.
    FactionTerritoryGained,
    /// A faction lost territory.
    FactionTerritoryLost,
    /// A faction's leader changed.
    FactionLeaderChanged,

    /// An entity formed a new memory.
    MemoryCreated,
    /// An entity forgot a memory.
    MemoryForgotten,
    /// A rumor propagated between entities.
    RumorSpread,
    /// An entity learned a fact.
    KnowledgeUpdated,
    /// An entity recognized another from memory.
    EntityRecognized,

    /// A reputation score changed.
    ReputationChanged,
    /// An entity earned a title.
    TitleGained,
    /// An entity lost a title.
    TitleLost,

    /// Control of a zone changed hands.
    ZoneControlChanged,
    /// Corruption spread to new tiles.
    CorruptionSpread,
    /// A ritual was performed.
    RitualPerformed,
    /// A shrine was activated.
    ShrineActivated,
    /// A shrine was corrupted.
    ShrineCorrupted,

    /// Open conflict began between two factions.
    ConflictStarted,
    /// A conflict was resolved.
    ConflictResolved,
    /// A battle concluded with an outcome.
    BattleOutcome,
    /// A siege began.
    SiegeStarted,
    /// A siege ended.
    SiegeEnded,

    /// The quest system generated a quest from world state.
    DynamicQuestGenerated,
    /// A quest objective changed.
    QuestObjectiveUpdated,
    /// A faction offered the player a quest.
    FactionQuestOffered,

    /// The player discovered a faction's existence.
    PlayerFactionDiscovered,
    /// The player's reputation crossed a named threshold.
    PlayerReputationThreshold,
    /// The player was seen committing a crime.
    PlayerWitnessedCrime,
    /// The player helped a faction.
    PlayerHelpedFaction,
    /// The player betrayed a faction.
    PlayerBetrayedFaction,

    /// An AI-managed entity entered the world.
    EntitySpawned,
    /// An AI turn is beginning.
    TurnStarted,
}

impl AiEventKind {
    /// Stable string name used in logs and payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AiStateChanged => "ai_state_changed",
            Self::BehaviorTreeStarted => "behavior_tree_started",
            Self::BehaviorTreeCompleted => "behavior_tree_completed",
            Self::BehaviorNodeFailed => "behavior_node_failed",
            Self::FactionRelationshipChanged => "faction_relationship_changed",
            Self::FactionAllianceFormed => "faction_alliance_formed",
            Self::FactionWarDeclared => "faction_war_declared",
            Self::FactionPeaceDeclared => "faction_peace_declared",
            Self::FactionBetrayal => "faction_betrayal",
            Self::FactionTerritoryGained => "faction_territory_gained",
            Self::FactionTerritoryLost => "faction_territory_lost",
            Self::FactionLeaderChanged => "faction_leader_changed",
            Self::MemoryCreated => "memory_created",
            Self::MemoryForgotten => "memory_forgotten",
            Self::RumorSpread => "rumor_spread",
            Self::KnowledgeUpdated => "knowledge_updated",
            Self::EntityRecognized => "entity_recognized",
            Self::ReputationChanged => "reputation_changed",
            Self::TitleGained => "title_gained",
            Self::TitleLost => "title_lost",
            Self::ZoneControlChanged => "zone_control_changed",
            Self::CorruptionSpread => "corruption_spread",
            Self::RitualPerformed => "ritual_performed",
            Self::ShrineActivated => "shrine_activated",
            Self::ShrineCorrupted => "shrine_corrupted",
            Self::ConflictStarted => "conflict_started",
            Self::ConflictResolved => "conflict_resolved",
            Self::BattleOutcome => "battle_outcome",
            Self::SiegeStarted => "siege_started",
            Self::SiegeEnded => "siege_ended",
            Self::DynamicQuestGenerated => "dynamic_quest_generated",
            Self::QuestObjectiveUpdated => "quest_objective_updated",
            Self::FactionQuestOffered => "faction_quest_offered",
            Self::PlayerFactionDiscovered => "player_faction_discovered",
            Self::PlayerReputationThreshold => "player_reputation_threshold",
            Self::PlayerWitnessedCrime => "player_witnessed_crime",
            Self::PlayerHelpedFaction => "player_helped_faction",
            Self::PlayerBetrayedFaction => "player_betrayed_faction",
            Self::EntitySpawned => "entity_spawned",
            Self::TurnStarted => "turn_started",
        }
    }

    /// The standard drain priority for this kind. Relationship changes
    /// outrank routine events; conflicts and territory changes outrank both.
    #[must_use]
    pub fn default_priority(self) -> i32 {
        match self {
            Self::FactionRelationshipChanged => 1,
            Self::ConflictStarted | Self::ZoneControlChanged => 2,
            _ => 0,
        }
    }

    /// The engine-level event this kind mirrors, if any. Subscribers that
    /// only speak engine events can listen on the alias; kinds without one
    /// travel under their own name.
    #[must_use]
    pub fn core_alias(self) -> Option<CoreEventKind> {
        match self {
            Self::EntitySpawned => Some(CoreEventKind::EntitySpawn),
            Self::TurnStarted => Some(CoreEventKind::TurnStart),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Payload accessors
// ---------------------------------------------------------------------------

impl GameEvent {
    /// Create an AI event with its standard priority and source.
    #[must_use]
    pub fn ai(kind: AiEventKind) -> Self {
        Self::new(EventKind::Ai(kind))
            .with_priority(kind.default_priority())
            .from_source("ai_system")
    }

    /// The `entity_id` payload field, if present.
    #[must_use]
    pub fn entity_id(&self) -> Option<EntityId> {
        self.get("entity_id").and_then(Value::as_u64).map(EntityId)
    }

    /// The `faction_id` payload field, if present.
    #[must_use]
    pub fn faction_id(&self) -> Option<&str> {
        self.get("faction_id").and_then(Value::as_str)
    }

    /// The `location` payload field (`[x, y]`), if present and well formed.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn location(&self) -> Option<Location> {
        let coords = self.get("location")?.as_array()?;
        if coords.len() != 2 {
            return None;
        }
        let x = coords[0].as_i64()? as i32;
        let y = coords[1].as_i64()? as i32;
        Some(Location::new(x, y))
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// An agent changed its coarse behavior mode.
#[must_use]
pub fn ai_state_changed(entity: EntityId, old_state: &str, new_state: &str) -> GameEvent {
    GameEvent::ai(AiEventKind::AiStateChanged)
        .with("entity_id", json!(entity.0))
        .with("old_state", json!(old_state))
        .with("new_state", json!(new_state))
}

/// The stance between two factions changed.
#[must_use]
pub fn faction_relationship_changed(
    faction_a: &str,
    faction_b: &str,
    old_relationship: f32,
    new_relationship: f32,
    reason: &str,
) -> GameEvent {
    GameEvent::ai(AiEventKind::FactionRelationshipChanged)
        .with("faction_a", json!(faction_a))
        .with("faction_b", json!(faction_b))
        .with("old_relationship", json!(old_relationship))
        .with("new_relationship", json!(new_relationship))
        .with("reason", json!(reason))
}

/// An entity formed a new memory.
#[must_use]
pub fn memory_created(
    entity: EntityId,
    content: &str,
    importance: f32,
    location: Option<Location>,
) -> GameEvent {
    let mut event = GameEvent::ai(AiEventKind::MemoryCreated)
        .with("entity_id", json!(entity.0))
        .with("memory_content", json!(content))
        .with("importance", json!(importance));
    if let Some(location) = location {
        event = event.with("location", json!([location.x, location.y]));
    }
    event
}

/// A reputation score changed. `target_type` is `"faction"` or
/// `"individual"`.
#[must_use]
pub fn reputation_changed(
    entity: EntityId,
    target_id: &str,
    target_type: &str,
    old_reputation: f32,
    new_reputation: f32,
) -> GameEvent {
    GameEvent::ai(AiEventKind::ReputationChanged)
        .with("entity_id", json!(entity.0))
        .with("target_id", json!(target_id))
        .with("target_type", json!(target_type))
        .with("old_reputation", json!(old_reputation))
        .with("new_reputation", json!(new_reputation))
}

/// Control of a zone changed hands.
#[must_use]
pub fn zone_control_changed(
    zone_id: &str,
    old_controller: Option<&str>,
    new_controller: Option<&str>,
    method: &str,
) -> GameEvent {
    GameEvent::ai(AiEventKind::ZoneControlChanged)
        .with("zone_id", json!(zone_id))
        .with("old_controller", json!(old_controller))
        .with("new_controller", json!(new_controller))
        .with("method", json!(method))
}

/// Open conflict began between two factions.
#[must_use]
pub fn conflict_started(
    faction_a: &str,
    faction_b: &str,
    conflict_type: &str,
    cause: &str,
    location: Option<Location>,
) -> GameEvent {
    let mut event = GameEvent::ai(AiEventKind::ConflictStarted)
        .with("faction_a", json!(faction_a))
        .with("faction_b", json!(faction_b))
        .with("conflict_type", json!(conflict_type))
        .with("cause", json!(cause));
    if let Some(location) = location {
        event = event.with("location", json!([location.x, location.y]));
    }
    event
}

/// The quest system generated a quest from world state.
#[must_use]
pub fn dynamic_quest_generated(
    quest_id: &str,
    quest_type: &str,
    faction_id: Option<&str>,
    trigger_event: &str,
    requirements: Value,
) -> GameEvent {
    GameEvent::ai(AiEventKind::DynamicQuestGenerated)
        .with("quest_id", json!(quest_id))
        .with("quest_type", json!(quest_type))
        .with("faction_id", json!(faction_id))
        .with("trigger_event", json!(trigger_event))
        .with("requirements", requirements)
}

/// The player's reputation with a faction crossed a named threshold.
#[must_use]
pub fn player_reputation_threshold(
    faction_id: &str,
    old_threshold: &str,
    new_threshold: &str,
    reputation_value: f32,
) -> GameEvent {
    GameEvent::ai(AiEventKind::PlayerReputationThreshold)
        .with("faction_id", json!(faction_id))
        .with("old_threshold", json!(old_threshold))
        .with("new_threshold", json!(new_threshold))
        .with("reputation_value", json!(reputation_value))
}

/// An AI-managed entity entered the world.
#[must_use]
pub fn entity_spawned(
    entity: EntityId,
    entity_type: &str,
    location: Location,
    faction_id: &str,
) -> GameEvent {
    GameEvent::ai(AiEventKind::EntitySpawned)
        .with("entity_id", json!(entity.0))
        .with("entity_type", json!(entity_type))
        .with("location", json!([location.x, location.y]))
        .with("faction_id", json!(faction_id))
}

/// An AI turn is beginning.
#[must_use]
pub fn turn_started(turn_number: u64, active_entities: usize) -> GameEvent {
    GameEvent::ai(AiEventKind::TurnStarted)
        .with("turn_number", json!(turn_number))
        .with("active_entities", json!(active_entities))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_priorities() {
        assert_eq!(
            conflict_started("guards", "monsters", "war", "border dispute", None).priority,
            2
        );
        assert_eq!(
            faction_relationship_changed("guards", "monsters", 0.0, -0.5, "raid").priority,
            1
        );
        assert_eq!(ai_state_changed(EntityId(1), "idle", "patrol").priority, 0);
        assert_eq!(
            zone_control_changed("crypt", Some("guards"), Some("monsters"), "conquest").priority,
            2
        );
    }

    #[test]
    fn payload_accessors() {
        let event = entity_spawned(EntityId(3), "orc", Location::new(5, 7), "monsters");
        assert_eq!(event.entity_id(), Some(EntityId(3)));
        assert_eq!(event.faction_id(), Some("monsters"));
        assert_eq!(event.location(), Some(Location::new(5, 7)));
        assert_eq!(event.source, "ai_system");
    }

    #[test]
    fn accessors_tolerate_missing_or_malformed_fields() {
        let event = turn_started(1, 0);
        assert_eq!(event.entity_id(), None);
        assert_eq!(event.faction_id(), None);
        assert_eq!(event.location(), None);

        let malformed = GameEvent::ai(AiEventKind::MemoryCreated).with("location", json!([1]));
        assert_eq!(malformed.location(), None);
    }

    #[test]
    fn engine_mirrors_have_aliases() {
        assert_eq!(
            AiEventKind::EntitySpawned.core_alias(),
            Some(CoreEventKind::EntitySpawn)
        );
        assert_eq!(
            AiEventKind::TurnStarted.core_alias(),
            Some(CoreEventKind::TurnStart)
        );
        assert_eq!(AiEventKind::ConflictStarted.core_alias(), None);
    }

    #[test]
    fn memory_event_omits_absent_location() {
        let event = memory_created(EntityId(2), "saw the player", 0.8, None);
        assert!(event.get("location").is_none());
        let event = memory_created(EntityId(2), "saw the player", 0.8, Some(Location::new(1, 2)));
        assert_eq!(event.location(), Some(Location::new(1, 2)));
    }
}
