//! Personality- and memory-driven behavior tree interpreter.
//!
//! Entities need the full decision bundle (behavior, personality, motivation,
//! memory) to be processed here; anything missing a piece is skipped with no
//! side effects, which lets cheap entities coexist in the same store.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::components::{ComponentKind, MemoryBank, Motivation, Personality};
use crate::error::Result;
use crate::events::ai::AiEventKind;
use crate::events::{EventKind, GameEvent};
use crate::store::ComponentStore;
use crate::types::EntityId;

use super::tree::{ActionKind, BehaviorNode, ConditionKind};
use super::{AiSystem, SystemStats};

const HUNGER_THRESHOLD: f32 = 0.7;
const SAFETY_THRESHOLD: f32 = 0.3;
const COMPANIONSHIP_THRESHOLD: f32 = 0.6;
const CONFIDENCE_THRESHOLD: f32 = 0.6;
const ENEMY_DETECTION_PROBABILITY: f64 = 0.1;
const FOOD_FIND_PROBABILITY: f64 = 0.2;
const ANTISOCIAL_THRESHOLD: f32 = 0.3;
const TERRITORIAL_THRESHOLD: f32 = 0.5;

/// Everything a tree evaluation may read or mutate for one entity.
struct DecisionCtx<'a> {
    entity: EntityId,
    personality: &'a mut Personality,
    motivation: &'a mut Motivation,
    memory: &'a mut MemoryBank,
    now: f64,
}

/// Behavior-tree interpreter for entities that need deliberate-feeling AI.
pub struct AdvancedBehaviorSystem {
    rng: StdRng,
    elapsed: f64,
    tracked: usize,
    updates: u64,
    events_handled: u64,
    entity_failures: u64,
}

impl AdvancedBehaviorSystem {
    /// Create a system with an entropy-seeded RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a system with a fixed RNG seed, for reproducible runs.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            elapsed: 0.0,
            tracked: 0,
            updates: 0,
            events_handled: 0,
            entity_failures: 0,
        }
    }

    fn execute(&mut self, node: &BehaviorNode, ctx: &mut DecisionCtx<'_>) -> bool {
        match node {
            BehaviorNode::Selector(children) => {
                children.iter().any(|child| self.execute(child, ctx))
            }
            BehaviorNode::Sequence(children) => {
                children.iter().all(|child| self.execute(child, ctx))
            }
            BehaviorNode::Action(action) => self.perform(action, ctx),
            BehaviorNode::Condition(condition) => self.check(condition, ctx),
            BehaviorNode::Unknown(_) => false,
        }
    }

    fn check(&mut self, condition: &ConditionKind, ctx: &mut DecisionCtx<'_>) -> bool {
        match condition {
            ConditionKind::IsHungry => ctx.motivation.survival_need("hunger") > HUNGER_THRESHOLD,
            ConditionKind::IsThreatened => {
                let safety = ctx
                    .motivation
                    .survival_needs
                    .get("safety")
                    .copied()
                    .unwrap_or(1.0);
                safety < SAFETY_THRESHOLD
            }
            ConditionKind::IsLonely => {
                ctx.motivation.social_need("companionship") > COMPANIONSHIP_THRESHOLD
            }
            ConditionKind::IsConfident => {
                ctx.personality.trait_or("courage", 0.5) > CONFIDENCE_THRESHOLD
            }
            // Stand-in for a spatial query against nearby hostiles.
            ConditionKind::HasEnemyNearby => self.rng.gen_bool(ENEMY_DETECTION_PROBABILITY),
            ConditionKind::Unknown(name) => {
                warn!(condition = %name, "unknown condition type");
                false
            }
        }
    }

    fn perform(&mut self, action: &ActionKind, ctx: &mut DecisionCtx<'_>) -> bool {
        match action {
            ActionKind::Wander => {
                let chance = 0.3 + ctx.personality.trait_value("restlessness") * 0.4;
                if self.rng.gen_bool(f64::from(chance)) {
                    debug!(entity = %ctx.entity, "wandering");
                    true
                } else {
                    false
                }
            }
            ActionKind::SeekFood => {
                debug!(entity = %ctx.entity, "seeking food");
                if self.rng.gen_bool(FOOD_FIND_PROBABILITY) {
                    let hunger = ctx.motivation.survival_need("hunger");
                    ctx.motivation
                        .set_survival_need("hunger", (hunger - 0.3).max(0.0));
                    true
                } else {
                    false
                }
            }
            ActionKind::Socialize => {
                if ctx.personality.trait_or("sociability", 0.5) < ANTISOCIAL_THRESHOLD {
                    return false;
                }
                debug!(entity = %ctx.entity, "attempting to socialize");
                let success = self
                    .rng
                    .gen_bool(f64::from(ctx.personality.trait_value("charisma")));
                let entry = json!({
                    "type": "attempted_socialization",
                    "timestamp": ctx.now,
                    "success": success,
                });
                match ctx
                    .memory
                    .knowledge
                    .entry("social_interactions".to_string())
                    .or_insert_with(|| Value::Array(Vec::new()))
                {
                    Value::Array(interactions) => interactions.push(entry),
                    other => *other = Value::Array(vec![entry]),
                }
                true
            }
            ActionKind::GuardTerritory => {
                let territorial = ctx.motivation.survival_need("territory");
                if territorial > TERRITORIAL_THRESHOLD {
                    debug!(entity = %ctx.entity, "guarding territory");
                    true
                } else {
                    false
                }
            }
            ActionKind::Flee => {
                let flee_chance = 1.0 - ctx.personality.trait_or("courage", 0.5);
                if self.rng.gen_bool(f64::from(flee_chance)) {
                    debug!(entity = %ctx.entity, "fleeing");
                    true
                } else {
                    false
                }
            }
            ActionKind::Unknown(name) => {
                warn!(action = %name, "unknown action type");
                false
            }
        }
    }

    /// Entities in either conflicting faction feel less safe.
    fn scatter_on_conflict(&mut self, store: &mut ComponentStore, event: &GameEvent) {
        let faction_a = event.get("faction_a").and_then(Value::as_str).unwrap_or("");
        let faction_b = event.get("faction_b").and_then(Value::as_str).unwrap_or("");
        let affected = crate::faction::apply_conflict_pressure(store, faction_a, faction_b);
        debug!(faction_a, faction_b, affected, "conflict scatter applied");
    }
}

impl Default for AdvancedBehaviorSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AiSystem for AdvancedBehaviorSystem {
    fn name(&self) -> &str {
        "advanced_behavior"
    }

    fn update(&mut self, store: &mut ComponentStore, delta: f64) -> Result<()> {
        self.updates += 1;
        self.elapsed += delta;
        self.tracked = 0;

        for entity in store.entities_with(ComponentKind::BehaviorTree) {
            let Some((behavior, personality, motivation, memory)) =
                store.behavior_bundle_mut(entity)
            else {
                continue;
            };
            let Some(tree) = behavior.tree.clone() else {
                continue;
            };
            self.tracked += 1;
            let mut ctx = DecisionCtx {
                entity,
                personality,
                motivation,
                memory,
                now: self.elapsed,
            };
            self.execute(&tree, &mut ctx);
        }
        Ok(())
    }

    fn handle_event(&mut self, store: &mut ComponentStore, event: &GameEvent) -> Result<()> {
        self.events_handled += 1;
        match event.kind {
            EventKind::Ai(AiEventKind::ConflictStarted) => {
                self.scatter_on_conflict(store, event);
            }
            EventKind::Ai(AiEventKind::ReputationChanged) => {
                debug!(entity = ?event.entity_id(), "reputation change observed");
            }
            EventKind::Ai(AiEventKind::FactionRelationshipChanged) => {
                debug!("faction relations changed");
            }
            _ => {}
        }
        Ok(())
    }

    fn performance_stats(&self) -> SystemStats {
        SystemStats {
            system_type: "advanced",
            tracked_entities: self.tracked,
            updates: self.updates,
            events_handled: self.events_handled,
            entity_failures: self.entity_failures,
        }
    }
}
