//! Bounded episodic memory with importance-based eviction.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{EntityId, Location};

/// Memories whose faded relevance drops to this value or below are purged.
pub const RELEVANCE_THRESHOLD: f32 = 0.1;

/// Default capacity of a memory bank.
pub const DEFAULT_CAPACITY: usize = 100;

const DEFAULT_FADE_RATE: f32 = 0.01;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A single remembered event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Free-form description of what happened.
    pub content: String,
    /// Game time the memory was formed.
    pub timestamp: f64,
    /// How much the memory matters, in `[0, 1]`.
    pub importance: f32,
    /// How trustworthy the memory is, in `[0, 1]`.
    pub reliability: f32,
    /// Entity the memory is about, if any.
    pub associated_entity: Option<EntityId>,
    /// Where the event happened, if known.
    pub location: Option<Location>,
    /// Per-tick importance decay applied when computing relevance.
    pub fade_rate: f32,
}

impl MemoryRecord {
    /// Create a memory record, clamping importance and reliability to `[0, 1]`.
    #[must_use]
    pub fn new(content: impl Into<String>, timestamp: f64, importance: f32, reliability: f32) -> Self {
        Self {
            content: content.into(),
            timestamp,
            importance: importance.clamp(0.0, 1.0),
            reliability: reliability.clamp(0.0, 1.0),
            associated_entity: None,
            location: None,
            fade_rate: DEFAULT_FADE_RATE,
        }
    }

    /// Attach the entity this memory is about.
    #[must_use]
    pub fn about(mut self, entity: EntityId) -> Self {
        self.associated_entity = Some(entity);
        self
    }

    /// Attach the location the event happened at.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Importance after fading, given the current game time.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn relevance(&self, now: f64) -> f32 {
        let age = (now - self.timestamp).max(0.0) as f32;
        self.importance - self.fade_rate * age
    }
}

// ---------------------------------------------------------------------------
// Bank
// ---------------------------------------------------------------------------

/// Bounded memory storage plus relationships and arbitrary learned facts.
///
/// When the bank exceeds its capacity the least valuable memories are
/// evicted: lowest importance first, with newer memories evicted before
/// older ones of equal importance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryBank {
    /// Remembered events, oldest first.
    pub records: Vec<MemoryRecord>,
    /// Maximum number of records kept.
    pub max_memories: usize,
    /// Arbitrary learned facts keyed by name.
    pub knowledge: Map<String, Value>,
    /// Sentiment toward other entities, each in `[-1, 1]`.
    pub relationships: HashMap<EntityId, f32>,
}

impl MemoryBank {
    /// Create an empty bank with the given capacity.
    #[must_use]
    pub fn with_capacity(max_memories: usize) -> Self {
        Self {
            records: Vec::new(),
            max_memories,
            knowledge: Map::new(),
            relationships: HashMap::new(),
        }
    }

    /// Add a memory, evicting the least valuable records if over capacity.
    pub fn add(&mut self, record: MemoryRecord) {
        self.records.push(record);
        if self.records.len() > self.max_memories {
            self.records.sort_by(|a, b| {
                a.importance
                    .partial_cmp(&b.importance)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| {
                        b.timestamp
                            .partial_cmp(&a.timestamp)
                            .unwrap_or(Ordering::Equal)
                    })
            });
            let excess = self.records.len() - self.max_memories;
            self.records.drain(..excess);
        }
    }

    /// Memories concerning a specific entity.
    #[must_use]
    pub fn memories_about(&self, entity: EntityId) -> Vec<&MemoryRecord> {
        self.records
            .iter()
            .filter(|record| record.associated_entity == Some(entity))
            .collect()
    }

    /// Memories formed at a specific location.
    #[must_use]
    pub fn memories_at(&self, location: Location) -> Vec<&MemoryRecord> {
        self.records
            .iter()
            .filter(|record| record.location == Some(location))
            .collect()
    }

    /// Drop memories whose faded relevance has fallen to the threshold.
    pub fn forget_faded(&mut self, now: f64) {
        self.records
            .retain(|record| record.relevance(now) > RELEVANCE_THRESHOLD);
    }

    /// Sentiment toward an entity, defaulting to neutral.
    #[must_use]
    pub fn relationship(&self, entity: EntityId) -> f32 {
        self.relationships.get(&entity).copied().unwrap_or(0.0)
    }

    /// Set sentiment toward an entity, clamped to `[-1, 1]`.
    pub fn set_relationship(&mut self, entity: EntityId, value: f32) {
        self.relationships.insert(entity, value.clamp(-1.0, 1.0));
    }

    /// Adjust sentiment toward an entity by a delta, clamping the result.
    pub fn modify_relationship(&mut self, entity: EntityId, delta: f32) {
        let current = self.relationship(entity);
        self.set_relationship(entity, current + delta);
    }
}

impl Default for MemoryBank {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(importance: f32, timestamp: f64) -> MemoryRecord {
        MemoryRecord::new(format!("event at {timestamp}"), timestamp, importance, 1.0)
    }

    #[test]
    fn eviction_drops_lowest_importance_first() {
        let mut bank = MemoryBank::with_capacity(3);
        bank.add(record(0.9, 0.0));
        bank.add(record(0.1, 1.0));
        bank.add(record(0.5, 2.0));
        bank.add(record(0.7, 3.0));

        assert_eq!(bank.records.len(), 3);
        let kept: Vec<f32> = bank.records.iter().map(|r| r.importance).collect();
        assert!(!kept.contains(&0.1));
        assert!(kept.contains(&0.9));
        assert!(kept.contains(&0.5));
        assert!(kept.contains(&0.7));
    }

    #[test]
    fn eviction_prefers_newer_on_importance_tie() {
        let mut bank = MemoryBank::with_capacity(2);
        bank.add(record(0.5, 0.0));
        bank.add(record(0.5, 1.0));
        bank.add(record(0.5, 2.0));

        assert_eq!(bank.records.len(), 2);
        let timestamps: Vec<f64> = bank.records.iter().map(|r| r.timestamp).collect();
        assert!(timestamps.contains(&0.0));
        assert!(!timestamps.contains(&2.0));
    }

    #[test]
    fn faded_memories_are_purged() {
        let mut bank = MemoryBank::default();
        let mut fast_fading = record(0.3, 0.0);
        fast_fading.fade_rate = 0.1;
        bank.add(fast_fading);
        bank.add(record(0.9, 0.0));

        bank.forget_faded(10.0);
        assert_eq!(bank.records.len(), 1);
        assert!((bank.records[0].importance - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn relationships_clamp_to_signed_unit_interval() {
        let mut bank = MemoryBank::default();
        let other = EntityId(4);
        bank.set_relationship(other, 2.0);
        assert!((bank.relationship(other) - 1.0).abs() < f32::EPSILON);
        bank.modify_relationship(other, -5.0);
        assert!((bank.relationship(other) + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn lookup_by_entity_and_location() {
        let mut bank = MemoryBank::default();
        let other = EntityId(9);
        let here = Location::new(3, 4);
        bank.add(record(0.5, 0.0).about(other).at(here));
        bank.add(record(0.5, 1.0));

        assert_eq!(bank.memories_about(other).len(), 1);
        assert_eq!(bank.memories_at(here).len(), 1);
        assert!(bank.memories_about(EntityId(42)).is_empty());
    }
}
