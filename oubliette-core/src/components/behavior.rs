//! Behavior-tree execution state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::behavior::tree::BehaviorNode;
use crate::types::AiState;

/// Per-entity behavior execution state.
///
/// Holds the resolved behavior tree (if one was loaded from config), a
/// scratch blackboard for actions to pass values between ticks, and the
/// current coarse [`AiState`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehaviorTreeState {
    /// Name of the tree definition in config, if assigned from one.
    pub tree_id: Option<String>,
    /// The resolved tree. `None` means the entity runs without a tree (the
    /// basic behavior system only needs the timer and current action). Not
    /// serialized; rebuilt from `tree_id` on load.
    #[serde(skip)]
    pub tree: Option<BehaviorNode>,
    /// Coarse behavior mode.
    pub state: AiState,
    /// Scratch storage for actions; cleared only on request.
    pub blackboard: Map<String, Value>,
    /// Name of the most recently chosen action.
    pub current_action: Option<String>,
    /// Seconds accumulated since the last decision.
    pub decision_timer: f64,
}

impl BehaviorTreeState {
    /// Create an empty state with no tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state referencing a named tree definition. The tree itself is
    /// resolved later, when the entity is registered with the manager.
    #[must_use]
    pub fn from_tree_id(tree_id: impl Into<String>) -> Self {
        Self {
            tree_id: Some(tree_id.into()),
            ..Self::default()
        }
    }

    /// Create a state with an already-built tree.
    #[must_use]
    pub fn with_tree(tree: BehaviorNode) -> Self {
        Self {
            tree: Some(tree),
            ..Self::default()
        }
    }

    /// Store a value on the blackboard.
    pub fn set_blackboard(&mut self, key: impl Into<String>, value: Value) {
        self.blackboard.insert(key.into(), value);
    }

    /// Read a value from the blackboard.
    #[must_use]
    pub fn blackboard_value(&self, key: &str) -> Option<&Value> {
        self.blackboard.get(key)
    }

    /// Drop all blackboard entries.
    pub fn clear_blackboard(&mut self) {
        self.blackboard.clear();
    }
}
