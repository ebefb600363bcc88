//! Behavior tree structure and JSON decoding.
//!
//! Trees are authored in `behavior_trees.json` as nested objects:
//!
//! ```json
//! {
//!   "root": {
//!     "type": "selector",
//!     "children": [
//!       {"type": "sequence", "children": [
//!         {"type": "condition", "condition": "is_hungry"},
//!         {"type": "action", "action": "seek_food"}
//!       ]},
//!       {"type": "action", "action": "wander"}
//!     ]
//!   }
//! }
//! ```
//!
//! Decoding never fails: unrecognized node, action or condition names become
//! `Unknown` variants that evaluate to failure at runtime, so a typo in a
//! modded tree degrades that branch instead of rejecting the file.

use serde_json::Value;
use tracing::warn;

// ---------------------------------------------------------------------------
// Actions and conditions
// ---------------------------------------------------------------------------

/// A leaf action a behavior tree can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Move around aimlessly; likelihood scales with restlessness.
    Wander,
    /// Look for food; success reduces hunger.
    SeekFood,
    /// Attempt a social interaction, recorded in memory.
    Socialize,
    /// Hold claimed territory.
    GuardTerritory,
    /// Run from danger; likelihood scales inversely with courage.
    Flee,
    /// An action name this build does not recognize. Always fails.
    Unknown(String),
}

impl ActionKind {
    /// Decode an action name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "wander" => Self::Wander,
            "seek_food" => Self::SeekFood,
            "socialize" => Self::Socialize,
            "guard_territory" => Self::GuardTerritory,
            "flee" => Self::Flee,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// A predicate a behavior tree can test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionKind {
    /// Hunger above its threshold.
    IsHungry,
    /// Safety below its threshold.
    IsThreatened,
    /// Companionship need above its threshold.
    IsLonely,
    /// Courage above its threshold.
    IsConfident,
    /// An enemy is in perception range.
    HasEnemyNearby,
    /// A condition name this build does not recognize. Always false.
    Unknown(String),
}

impl ConditionKind {
    /// Decode a condition name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "is_hungry" => Self::IsHungry,
            "is_threatened" => Self::IsThreatened,
            "is_lonely" => Self::IsLonely,
            "is_confident" => Self::IsConfident,
            "has_enemy_nearby" => Self::HasEnemyNearby,
            other => Self::Unknown(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// A node in a behavior tree.
#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorNode {
    /// Try children in order until one succeeds.
    Selector(Vec<BehaviorNode>),
    /// Run children in order; all must succeed.
    Sequence(Vec<BehaviorNode>),
    /// Perform a leaf action.
    Action(ActionKind),
    /// Test a predicate.
    Condition(ConditionKind),
    /// A node type this build does not recognize. Always fails.
    Unknown(String),
}

impl BehaviorNode {
    /// Decode a node from its JSON form.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let node_type = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        match node_type {
            "selector" => Self::Selector(Self::children_of(value)),
            "sequence" => Self::Sequence(Self::children_of(value)),
            "action" => {
                let name = value.get("action").and_then(Value::as_str).unwrap_or("unknown");
                Self::Action(ActionKind::from_name(name))
            }
            "condition" => {
                let name = value
                    .get("condition")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                Self::Condition(ConditionKind::from_name(name))
            }
            other => {
                warn!(node_type = other, "unknown behavior node type");
                Self::Unknown(other.to_string())
            }
        }
    }

    /// Decode a whole tree definition: the node under `"root"`.
    #[must_use]
    pub fn from_tree_def(def: &Value) -> Option<Self> {
        def.get("root").map(Self::from_value)
    }

    fn children_of(value: &Value) -> Vec<Self> {
        value
            .get("children")
            .and_then(Value::as_array)
            .map(|children| children.iter().map(Self::from_value).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_nested_tree() {
        let def = json!({
            "root": {
                "type": "selector",
                "children": [
                    {"type": "sequence", "children": [
                        {"type": "condition", "condition": "is_hungry"},
                        {"type": "action", "action": "seek_food"}
                    ]},
                    {"type": "action", "action": "wander"}
                ]
            }
        });
        let tree = BehaviorNode::from_tree_def(&def).expect("has root");
        let BehaviorNode::Selector(children) = tree else {
            panic!("expected selector root");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(
            children[0],
            BehaviorNode::Sequence(vec![
                BehaviorNode::Condition(ConditionKind::IsHungry),
                BehaviorNode::Action(ActionKind::SeekFood),
            ])
        );
        assert_eq!(children[1], BehaviorNode::Action(ActionKind::Wander));
    }

    #[test]
    fn unknown_names_degrade_instead_of_failing() {
        let node = BehaviorNode::from_value(&json!({"type": "parallel", "children": []}));
        assert_eq!(node, BehaviorNode::Unknown("parallel".to_string()));

        let node = BehaviorNode::from_value(&json!({"type": "action", "action": "moonwalk"}));
        assert_eq!(
            node,
            BehaviorNode::Action(ActionKind::Unknown("moonwalk".to_string()))
        );

        let node = BehaviorNode::from_value(&json!({"type": "condition"}));
        assert_eq!(
            node,
            BehaviorNode::Condition(ConditionKind::Unknown("unknown".to_string()))
        );
    }

    #[test]
    fn missing_root_yields_none() {
        assert!(BehaviorNode::from_tree_def(&json!({"comment": "empty"})).is_none());
    }

    #[test]
    fn missing_children_decode_as_empty() {
        let node = BehaviorNode::from_value(&json!({"type": "sequence"}));
        assert_eq!(node, BehaviorNode::Sequence(Vec::new()));
    }
}
