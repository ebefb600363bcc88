//! Core type definitions shared across the AI layer.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Unique identifier for an entity.
///
/// Assigned by the [`ComponentStore`](crate::store::ComponentStore) from a
/// monotonic counter; ids are never reused within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity_{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Spatial
// ---------------------------------------------------------------------------

/// A tile coordinate on the dungeon grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Location {
    /// Create a location from grid coordinates.
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Coarse AI mode
// ---------------------------------------------------------------------------

/// Coarse behavior mode of an AI agent.
///
/// This is a label on the behavior-tree component, set ad hoc by individual
/// actions when they change intent. Any transition is legal; there is no
/// enforced transition table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiState {
    /// Doing nothing in particular.
    #[default]
    Idle,
    /// Walking a route through claimed territory.
    Patrol,
    /// Actively chasing a target.
    Pursue,
    /// Running from a threat.
    Flee,
    /// Checking out a disturbance.
    Investigate,
    /// Engaged in a fight.
    Combat,
    /// Performing a ritual at a shrine.
    Ritual,
    /// Interacting with other entities.
    Social,
}

impl AiState {
    /// Stable string name used in config files and event payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Patrol => "patrol",
            Self::Pursue => "pursue",
            Self::Flee => "flee",
            Self::Investigate => "investigate",
            Self::Combat => "combat",
            Self::Ritual => "ritual",
            Self::Social => "social",
        }
    }
}

impl fmt::Display for AiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
