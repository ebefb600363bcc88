//! Needs, drives and goals driving entity decisions.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

/// A discrete objective an entity is pursuing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// What kind of goal this is (e.g. `"find_food"`, `"defend_territory"`).
    pub kind: String,
    /// Optional target payload (entity id, location, item name, ...).
    pub target: Option<Value>,
    /// Higher priority goals are pursued first.
    pub priority: f32,
    /// Game time the goal was adopted.
    pub created: f64,
}

impl Goal {
    /// Create a goal with no target.
    #[must_use]
    pub fn new(kind: impl Into<String>, priority: f32, created: f64) -> Self {
        Self {
            kind: kind.into(),
            target: None,
            priority,
            created,
        }
    }

    /// Attach a target payload.
    #[must_use]
    pub fn with_target(mut self, target: Value) -> Self {
        self.target = Some(target);
        self
    }
}

// ---------------------------------------------------------------------------
// Motivation component
// ---------------------------------------------------------------------------

/// The full motivational state of an entity.
///
/// All need and drive values live in `[0, 1]`. `survival_needs.safety` and
/// `survival_needs.health` start full (1.0) and degrade; everything else
/// starts at zero and accumulates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Motivation {
    /// High-level abstract needs (survival, social, achievement, curiosity,
    /// comfort).
    pub needs: HashMap<String, f32>,
    /// Concrete survival pressures (hunger, safety, health, territory).
    pub survival_needs: HashMap<String, f32>,
    /// Social pressures (companionship, approval, status).
    pub social_needs: HashMap<String, f32>,
    /// Short-term urges (hunger, fear, anger, fatigue).
    pub drives: HashMap<String, f32>,
    /// Active goals, kept sorted by descending priority.
    pub goals: Vec<Goal>,
}

impl Motivation {
    /// Create a motivation component with standard baseline values.
    #[must_use]
    pub fn new() -> Self {
        let zeroes = |names: &[&str]| -> HashMap<String, f32> {
            names.iter().map(|n| ((*n).to_string(), 0.0)).collect()
        };
        let mut survival_needs = zeroes(&["hunger", "territory"]);
        survival_needs.insert("safety".to_string(), 1.0);
        survival_needs.insert("health".to_string(), 1.0);
        Self {
            needs: zeroes(&["survival", "social", "achievement", "curiosity", "comfort"]),
            survival_needs,
            social_needs: zeroes(&["companionship", "approval", "status"]),
            drives: zeroes(&["hunger", "fear", "anger", "fatigue"]),
            goals: Vec::new(),
        }
    }

    /// Read a high-level need, defaulting to zero for unknown names.
    #[must_use]
    pub fn need(&self, name: &str) -> f32 {
        self.needs.get(name).copied().unwrap_or(0.0)
    }

    /// Set a high-level need, clamped to `[0, 1]`.
    pub fn set_need(&mut self, name: &str, value: f32) {
        self.needs.insert(name.to_string(), value.clamp(0.0, 1.0));
    }

    /// Read a survival need, defaulting to zero for unknown names.
    #[must_use]
    pub fn survival_need(&self, name: &str) -> f32 {
        self.survival_needs.get(name).copied().unwrap_or(0.0)
    }

    /// Set a survival need, clamped to `[0, 1]`.
    pub fn set_survival_need(&mut self, name: &str, value: f32) {
        self.survival_needs
            .insert(name.to_string(), value.clamp(0.0, 1.0));
    }

    /// Read a social need, defaulting to zero for unknown names.
    #[must_use]
    pub fn social_need(&self, name: &str) -> f32 {
        self.social_needs.get(name).copied().unwrap_or(0.0)
    }

    /// Set a social need, clamped to `[0, 1]`.
    pub fn set_social_need(&mut self, name: &str, value: f32) {
        self.social_needs
            .insert(name.to_string(), value.clamp(0.0, 1.0));
    }

    /// Adopt a goal, keeping the goal list sorted by descending priority.
    pub fn add_goal(&mut self, goal: Goal) {
        self.goals.push(goal);
        self.goals.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Drop all goals of the given kind (and target, when one is supplied).
    pub fn remove_goals(&mut self, kind: &str, target: Option<&Value>) {
        self.goals.retain(|goal| {
            goal.kind != kind || (target.is_some() && goal.target.as_ref() != target)
        });
    }

    /// The highest-priority active goal, if any.
    #[must_use]
    pub fn top_goal(&self) -> Option<&Goal> {
        self.goals.first()
    }
}

impl Default for Motivation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn baseline_values() {
        let motivation = Motivation::new();
        assert!(motivation.survival_need("hunger").abs() < f32::EPSILON);
        assert!((motivation.survival_need("safety") - 1.0).abs() < f32::EPSILON);
        assert!((motivation.survival_need("health") - 1.0).abs() < f32::EPSILON);
        assert!(motivation.need("curiosity").abs() < f32::EPSILON);
        assert!(motivation.social_need("companionship").abs() < f32::EPSILON);
    }

    #[test]
    fn needs_clamp() {
        let mut motivation = Motivation::new();
        motivation.set_survival_need("hunger", 1.7);
        assert!((motivation.survival_need("hunger") - 1.0).abs() < f32::EPSILON);
        motivation.set_need("social", -0.5);
        assert!(motivation.need("social").abs() < f32::EPSILON);
    }

    #[test]
    fn goals_sorted_by_descending_priority() {
        let mut motivation = Motivation::new();
        motivation.add_goal(Goal::new("wander", 0.2, 0.0));
        motivation.add_goal(Goal::new("find_food", 0.9, 1.0));
        motivation.add_goal(Goal::new("socialize", 0.5, 2.0));

        let top = motivation.top_goal().expect("has goals");
        assert_eq!(top.kind, "find_food");
        let priorities: Vec<f32> = motivation.goals.iter().map(|g| g.priority).collect();
        assert_eq!(priorities, vec![0.9, 0.5, 0.2]);
    }

    #[test]
    fn remove_goals_respects_target() {
        let mut motivation = Motivation::new();
        motivation.add_goal(Goal::new("hunt", 0.5, 0.0).with_target(json!("entity_3")));
        motivation.add_goal(Goal::new("hunt", 0.4, 1.0).with_target(json!("entity_4")));

        motivation.remove_goals("hunt", Some(&json!("entity_3")));
        assert_eq!(motivation.goals.len(), 1);
        assert_eq!(motivation.goals[0].target, Some(json!("entity_4")));

        motivation.remove_goals("hunt", None);
        assert!(motivation.goals.is_empty());
    }
}
