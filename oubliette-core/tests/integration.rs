//! End-to-end tests driving the manager, systems, config and store together.

use std::fs;

use oubliette_core::behavior::advanced::AdvancedBehaviorSystem;
use oubliette_core::behavior::basic::BasicBehaviorSystem;
use oubliette_core::events::EventKind;
use oubliette_core::events::ai::{self, AiEventKind};
use oubliette_core::{AiManager, ComponentStore};
use tempfile::TempDir;

const BASIC_ACTIONS: [&str; 5] = ["wander", "patrol", "rest", "seek_food", "guard"];

fn write_configs(dir: &TempDir) {
    let ai_dir = dir.path().join("ai");
    fs::create_dir_all(&ai_dir).expect("create ai dir");
    fs::write(
        ai_dir.join("factions.json"),
        r#"{
            "factions": {
                "monsters": {
                    "name": "Dungeon Monsters",
                    "description": "Hostile dungeon dwellers",
                    "relations": {"guards": -0.9, "merchants": -0.4},
                    "territory": ["crypt"]
                },
                "guards": {
                    "name": "City Guards",
                    "relations": {"monsters": -0.9}
                }
            }
        }"#,
    )
    .expect("write factions");
    fs::write(
        ai_dir.join("archetypes.json"),
        r#"{
            "archetypes": {
                "aggressive_monster": {
                    "personality": {"aggression": 0.9, "courage": 0.8, "restlessness": 0.7},
                    "behavior_tree": "aggressive",
                    "motivations": {"territory": 0.8}
                },
                "basic_monster": {
                    "personality": {"aggression": 0.5},
                    "behavior_tree": "aggressive"
                }
            }
        }"#,
    )
    .expect("write archetypes");
    fs::write(
        ai_dir.join("behavior_trees.json"),
        r#"{
            "aggressive": {
                "root": {
                    "type": "selector",
                    "children": [
                        {"type": "sequence", "children": [
                            {"type": "condition", "condition": "is_hungry"},
                            {"type": "action", "action": "seek_food"}
                        ]},
                        {"type": "action", "action": "guard_territory"},
                        {"type": "action", "action": "wander"}
                    ]
                }
            }
        }"#,
    )
    .expect("write trees");
}

fn manager_with_systems() -> (TempDir, AiManager) {
    let dir = TempDir::new().expect("tempdir");
    write_configs(&dir);
    let mut manager = AiManager::from_config_root(dir.path());
    manager.register_system(
        "advanced_behavior",
        Box::new(AdvancedBehaviorSystem::with_seed(11)),
        10,
        vec![
            EventKind::Ai(AiEventKind::ConflictStarted),
            EventKind::Ai(AiEventKind::ReputationChanged),
            EventKind::Ai(AiEventKind::FactionRelationshipChanged),
        ],
    );
    manager.register_system(
        "basic_behavior",
        Box::new(BasicBehaviorSystem::with_seed(11)),
        0,
        Vec::new(),
    );
    (dir, manager)
}

#[test]
fn aggressive_monster_registration_wires_everything() {
    let (_dir, mut manager) = manager_with_systems();
    let mut store = ComponentStore::new();
    let orc = store.create_entity();

    manager
        .register_ai_entity(&mut store, orc, Some("aggressive_monster"), Some("monsters"))
        .expect("register");

    let personality = store.personality(orc).expect("personality");
    assert!((personality.trait_value("courage") - 0.8).abs() < f32::EPSILON);

    let behavior = store.behavior(orc).expect("behavior");
    assert_eq!(behavior.tree_id.as_deref(), Some("aggressive"));
    assert!(behavior.tree.is_some());

    let membership = store.faction(orc).expect("faction");
    assert_eq!(membership.name, "Dungeon Monsters");

    let reputation = store.reputation(orc).expect("reputation");
    assert!((reputation.faction_score("guards") + 0.9).abs() < f32::EPSILON);

    assert_eq!(manager.faction_members("monsters"), vec![orc]);
}

#[test]
fn ticks_drive_both_systems() {
    let (_dir, mut manager) = manager_with_systems();
    let mut store = ComponentStore::new();
    let orc = store.create_entity();
    manager
        .register_ai_entity(&mut store, orc, Some("aggressive_monster"), Some("monsters"))
        .expect("register");

    for _ in 0..3 {
        manager.update(&mut store, 1.0);
    }

    // The basic system picked an action for the same behavior component the
    // advanced system walks.
    let action = store
        .behavior(orc)
        .expect("behavior")
        .current_action
        .clone()
        .expect("basic system chose an action");
    assert!(BASIC_ACTIONS.contains(&action.as_str()));

    let stats = manager.performance_stats();
    assert_eq!(stats.entities_active, 1);
    let advanced = &stats
        .systems
        .iter()
        .find(|(name, _)| name == "advanced_behavior")
        .expect("advanced stats")
        .1;
    assert_eq!(advanced.tracked_entities, 1);
    assert_eq!(advanced.updates, 3);
}

#[test]
fn conflict_event_scatters_both_factions() {
    let (_dir, mut manager) = manager_with_systems();
    let mut store = ComponentStore::new();
    let orc = store.create_entity();
    let guard = store.create_entity();
    manager
        .register_ai_entity(&mut store, orc, Some("aggressive_monster"), Some("monsters"))
        .expect("register");
    manager
        .register_ai_entity(&mut store, guard, Some("aggressive_monster"), Some("guards"))
        .expect("register");

    manager.post_event(ai::conflict_started(
        "monsters", "guards", "war", "territory", None,
    ));
    manager.process_events(&mut store);

    for entity in [orc, guard] {
        let safety = store
            .motivation(entity)
            .expect("motivation")
            .survival_need("safety");
        assert!((safety - 0.8).abs() < 1e-6, "safety was {safety}");
    }
    assert_eq!(manager.performance_stats().metrics.events_processed, 1);
}

#[test]
fn queued_events_survive_until_the_next_update() {
    let (_dir, mut manager) = manager_with_systems();
    let mut store = ComponentStore::new();
    let orc = store.create_entity();
    manager
        .register_ai_entity(&mut store, orc, Some("aggressive_monster"), Some("monsters"))
        .expect("register");

    manager.post_event(ai::conflict_started(
        "monsters", "guards", "war", "ambush", None,
    ));
    // update drains the queue before running systems
    manager.update(&mut store, 1.0);

    let safety = store
        .motivation(orc)
        .expect("motivation")
        .survival_need("safety");
    assert!(safety < 1.0);
}

#[test]
fn hungry_monster_prefers_food_over_guarding() {
    let (_dir, mut manager) = manager_with_systems();
    let mut store = ComponentStore::new();
    let orc = store.create_entity();
    manager
        .register_ai_entity(&mut store, orc, Some("aggressive_monster"), Some("monsters"))
        .expect("register");
    store
        .motivation_mut(orc)
        .expect("motivation")
        .set_survival_need("hunger", 0.95);

    for _ in 0..200 {
        manager.update(&mut store, 1.0);
    }
    let hunger = store
        .motivation(orc)
        .expect("motivation")
        .survival_need("hunger");
    assert!(hunger < 0.95, "seek_food branch never fired: {hunger}");
}
