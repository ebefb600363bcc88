//! Faction assignment and faction-level pressure on member entities.
//!
//! These operations mutate components only; they never emit events. Callers
//! that want the world to hear about a change post the matching
//! [`events::ai`](crate::events::ai) event themselves.

use tracing::{debug, warn};

use crate::components::{Component, ComponentKind, FactionMembership, Reputation};
use crate::config::ConfigStore;
use crate::store::ComponentStore;
use crate::types::EntityId;

/// Assign an entity to a faction defined in config.
///
/// Attaches a [`FactionMembership`] populated from the faction definition and
/// a fresh [`Reputation`] seeded from the faction's relations, so a new
/// member starts out regarded the way its faction is. An unknown faction id
/// logs a warning and changes nothing.
///
/// Returns whether the assignment happened.
pub fn assign_faction(
    store: &mut ComponentStore,
    config: &ConfigStore,
    entity: EntityId,
    faction_id: &str,
) -> bool {
    let Some(def) = config.faction(faction_id) else {
        warn!(faction = faction_id, "unknown faction");
        return false;
    };
    let membership = FactionMembership::from_def(faction_id, def);
    let reputation = Reputation::seeded_from(&def.relations);
    if store.attach(entity, Component::Faction(membership)).is_err()
        || store.attach(entity, Component::Reputation(reputation)).is_err()
    {
        warn!(%entity, faction = faction_id, "faction assignment to unknown entity");
        return false;
    }
    debug!(%entity, faction = faction_id, "assigned to faction");
    true
}

/// Reduce the perceived safety of every member of two conflicting factions.
///
/// Members lose 0.2 safety, floored at zero. Entities without a motivation
/// component are tolerated and skipped. Returns the number of entities
/// affected.
pub fn apply_conflict_pressure(
    store: &mut ComponentStore,
    faction_a: &str,
    faction_b: &str,
) -> usize {
    let members: Vec<EntityId> = store
        .entities_with(ComponentKind::Faction)
        .into_iter()
        .filter(|entity| {
            store.faction(*entity).is_some_and(|faction| {
                faction.faction_id == faction_a || faction.faction_id == faction_b
            })
        })
        .collect();

    let mut affected = 0;
    for entity in members {
        let Some(motivation) = store.motivation_mut(entity) else {
            continue;
        };
        let safety = motivation
            .survival_needs
            .get("safety")
            .copied()
            .unwrap_or(1.0);
        motivation.set_survival_need("safety", (safety - 0.2).max(0.0));
        affected += 1;
        debug!(%entity, "conflict reduced perceived safety");
    }
    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Motivation;
    use crate::config::ConfigSection;
    use std::fs;
    use tempfile::TempDir;

    fn config_with_factions() -> (TempDir, ConfigStore) {
        let dir = TempDir::new().expect("tempdir");
        let ai_dir = dir.path().join("ai");
        fs::create_dir_all(&ai_dir).expect("create ai dir");
        fs::write(
            ai_dir.join("factions.json"),
            r#"{
                "monsters": {
                    "name": "Dungeon Monsters",
                    "description": "Hostile dwellers",
                    "relations": {"guards": -0.9, "merchants": -0.4},
                    "territory": ["crypt", "lower_halls"]
                }
            }"#,
        )
        .expect("write factions");
        let mut config = ConfigStore::new(dir.path());
        config.load_section(ConfigSection::Factions).expect("load");
        (dir, config)
    }

    #[test]
    fn assignment_copies_definition_and_seeds_reputation() {
        let (_dir, config) = config_with_factions();
        let mut store = ComponentStore::new();
        let entity = store.create_entity();

        assert!(assign_faction(&mut store, &config, entity, "monsters"));

        let membership = store.faction(entity).expect("membership");
        assert_eq!(membership.name, "Dungeon Monsters");
        assert_eq!(membership.territory, vec!["crypt", "lower_halls"]);
        assert!((membership.relation_to("guards") + 0.9).abs() < f32::EPSILON);

        let reputation = store.reputation(entity).expect("reputation");
        assert!((reputation.faction_score("guards") + 0.9).abs() < f32::EPSILON);
        assert!((reputation.faction_score("merchants") + 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_faction_is_a_no_op() {
        let (_dir, config) = config_with_factions();
        let mut store = ComponentStore::new();
        let entity = store.create_entity();

        assert!(!assign_faction(&mut store, &config, entity, "celestials"));
        assert!(store.faction(entity).is_none());
        assert!(store.reputation(entity).is_none());
    }

    #[test]
    fn conflict_pressure_skips_entities_without_motivation() {
        let mut store = ComponentStore::new();
        let with_motivation = store.create_entity();
        let without = store.create_entity();
        for entity in [with_motivation, without] {
            store
                .attach(entity, Component::Faction(FactionMembership::new("monsters")))
                .expect("attach");
        }
        store
            .attach(with_motivation, Component::Motivation(Motivation::new()))
            .expect("attach");

        let affected = apply_conflict_pressure(&mut store, "monsters", "guards");
        assert_eq!(affected, 1);
        let safety = store
            .motivation(with_motivation)
            .expect("motivation")
            .survival_need("safety");
        assert!((safety - 0.8).abs() < 1e-6);
    }
}
