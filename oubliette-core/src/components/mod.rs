//! Typed component data attached to entities.
//!
//! Components are pure data records; behavior lives in the systems that query
//! them. Each entity holds at most one component of a given
//! [`ComponentKind`], and the [`ComponentStore`](crate::store::ComponentStore)
//! keeps one homogeneous storage slot per kind so systems can borrow several
//! kinds from the same entity at once.

pub mod behavior;
pub mod faction;
pub mod memory;
pub mod motivation;
pub mod personality;

use serde::{Deserialize, Serialize};

use crate::types::Location;

pub use behavior::BehaviorTreeState;
pub use faction::{FactionMembership, Reputation};
pub use memory::{MemoryBank, MemoryRecord};
pub use motivation::{Goal, Motivation};
pub use personality::Personality;

// ---------------------------------------------------------------------------
// Capability tags
// ---------------------------------------------------------------------------

/// Tag identifying a component capability, used as the index key for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Grid position.
    Position,
    /// Hit points.
    Health,
    /// Renderable glyph (consumed by the external renderer).
    Graphic,
    /// Personality trait map.
    Personality,
    /// Needs, drives and goals.
    Motivation,
    /// Bounded memory records and relationships.
    Memory,
    /// Behavior-tree execution state.
    BehaviorTree,
    /// Faction membership.
    Faction,
    /// Faction and individual reputation scores.
    Reputation,
}

impl ComponentKind {
    /// All component kinds, in a stable order.
    pub const ALL: [Self; 9] = [
        Self::Position,
        Self::Health,
        Self::Graphic,
        Self::Personality,
        Self::Motivation,
        Self::Memory,
        Self::BehaviorTree,
        Self::Faction,
        Self::Reputation,
    ];
}

// ---------------------------------------------------------------------------
// Component envelope
// ---------------------------------------------------------------------------

/// A component instance being attached to or detached from an entity.
#[derive(Debug, Clone)]
pub enum Component {
    /// Grid position.
    Position(Position),
    /// Hit points.
    Health(Health),
    /// Renderable glyph.
    Graphic(Graphic),
    /// Personality trait map.
    Personality(Personality),
    /// Needs, drives and goals.
    Motivation(Motivation),
    /// Bounded memory records and relationships.
    Memory(MemoryBank),
    /// Behavior-tree execution state.
    BehaviorTree(BehaviorTreeState),
    /// Faction membership.
    Faction(FactionMembership),
    /// Reputation scores.
    Reputation(Reputation),
}

impl Component {
    /// The capability tag for this instance.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Position(_) => ComponentKind::Position,
            Self::Health(_) => ComponentKind::Health,
            Self::Graphic(_) => ComponentKind::Graphic,
            Self::Personality(_) => ComponentKind::Personality,
            Self::Motivation(_) => ComponentKind::Motivation,
            Self::Memory(_) => ComponentKind::Memory,
            Self::BehaviorTree(_) => ComponentKind::BehaviorTree,
            Self::Faction(_) => ComponentKind::Faction,
            Self::Reputation(_) => ComponentKind::Reputation,
        }
    }
}

// ---------------------------------------------------------------------------
// Simple gameplay components
// ---------------------------------------------------------------------------

/// Grid position of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a position at the given coordinates.
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position as a [`Location`].
    #[must_use]
    pub fn location(&self) -> Location {
        Location::new(self.x, self.y)
    }
}

/// Hit points of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Current hit points.
    pub current: i32,
    /// Maximum hit points.
    pub max: i32,
}

impl Health {
    /// Create a health component at full hit points.
    #[must_use]
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Apply damage, saturating at zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.current = (self.current - amount).max(0);
    }

    /// Restore hit points, capped at the maximum.
    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Whether the entity is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0
    }
}

/// Renderable glyph for an entity. The AI core never reads this; it exists so
/// the external renderer can query entities with `Position + Graphic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graphic {
    /// Display character.
    pub glyph: char,
    /// RGB color.
    pub color: (u8, u8, u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_kind_matches_variant() {
        assert_eq!(
            Component::Position(Position::new(1, 2)).kind(),
            ComponentKind::Position
        );
        assert_eq!(
            Component::Memory(MemoryBank::default()).kind(),
            ComponentKind::Memory
        );
    }

    #[test]
    fn health_saturates_at_zero() {
        let mut health = Health::new(10);
        health.take_damage(25);
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
        health.heal(100);
        assert_eq!(health.current, 10);
    }
}
