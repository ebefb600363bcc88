//! Faction membership and reputation components.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::FactionDef;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// An entity's membership in a faction, with a copy of the faction's
/// definition data at the time of assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionMembership {
    /// Identifier of the faction.
    pub faction_id: String,
    /// Rank within the faction.
    pub rank: String,
    /// Loyalty to the faction, in `[0, 1]`.
    pub loyalty: f32,
    /// Display name of the faction.
    pub name: String,
    /// Flavor description.
    pub description: String,
    /// Stance toward other factions, each in `[-1, 1]`.
    pub relations: HashMap<String, f32>,
    /// Named zones the faction claims.
    pub territory: Vec<String>,
}

impl FactionMembership {
    /// Create a bare membership with default rank and full loyalty.
    #[must_use]
    pub fn new(faction_id: impl Into<String>) -> Self {
        Self {
            faction_id: faction_id.into(),
            rank: "member".to_string(),
            loyalty: 1.0,
            name: String::new(),
            description: String::new(),
            relations: HashMap::new(),
            territory: Vec::new(),
        }
    }

    /// Create a membership populated from a faction definition.
    #[must_use]
    pub fn from_def(faction_id: impl Into<String>, def: &FactionDef) -> Self {
        Self {
            faction_id: faction_id.into(),
            rank: "member".to_string(),
            loyalty: 1.0,
            name: def.name.clone(),
            description: def.description.clone(),
            relations: def.relations.clone(),
            territory: def.territory.clone(),
        }
    }

    /// Set loyalty, clamped to `[0, 1]`.
    pub fn set_loyalty(&mut self, value: f32) {
        self.loyalty = value.clamp(0.0, 1.0);
    }

    /// Stance toward another faction, defaulting to neutral.
    #[must_use]
    pub fn relation_to(&self, other: &str) -> f32 {
        self.relations.get(other).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Reputation
// ---------------------------------------------------------------------------

/// How an entity is regarded by factions and individuals.
///
/// All scores live in `[-1, 1]`; writes clamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reputation {
    /// Score with each faction.
    pub faction_scores: HashMap<String, f32>,
    /// Score with specific individuals.
    pub individual_scores: HashMap<EntityId, f32>,
    /// Earned titles, in acquisition order, no duplicates.
    pub titles: Vec<String>,
    /// Named situational modifiers applied by game rules.
    pub standing_modifiers: HashMap<String, f32>,
}

impl Reputation {
    /// Create an empty reputation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reputation seeded from a faction's relations map, so a fresh
    /// member starts out regarded the way its faction is.
    #[must_use]
    pub fn seeded_from(relations: &HashMap<String, f32>) -> Self {
        let faction_scores = relations
            .iter()
            .map(|(faction, score)| (faction.clone(), score.clamp(-1.0, 1.0)))
            .collect();
        Self {
            faction_scores,
            ..Self::default()
        }
    }

    /// Score with a faction, defaulting to neutral.
    #[must_use]
    pub fn faction_score(&self, faction: &str) -> f32 {
        self.faction_scores.get(faction).copied().unwrap_or(0.0)
    }

    /// Set the score with a faction, clamped to `[-1, 1]`.
    pub fn set_faction_score(&mut self, faction: &str, value: f32) {
        self.faction_scores
            .insert(faction.to_string(), value.clamp(-1.0, 1.0));
    }

    /// Adjust the score with a faction by a delta, clamping the result.
    pub fn modify_faction_score(&mut self, faction: &str, delta: f32) {
        let current = self.faction_score(faction);
        self.set_faction_score(faction, current + delta);
    }

    /// Score with an individual, defaulting to neutral.
    #[must_use]
    pub fn individual_score(&self, entity: EntityId) -> f32 {
        self.individual_scores.get(&entity).copied().unwrap_or(0.0)
    }

    /// Set the score with an individual, clamped to `[-1, 1]`.
    pub fn set_individual_score(&mut self, entity: EntityId, value: f32) {
        self.individual_scores
            .insert(entity, value.clamp(-1.0, 1.0));
    }

    /// Grant a title if not already held.
    pub fn add_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if !self.titles.contains(&title) {
            self.titles.push(title);
        }
    }

    /// Revoke a title.
    pub fn remove_title(&mut self, title: &str) {
        self.titles.retain(|t| t != title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faction_scores_clamp() {
        let mut reputation = Reputation::new();
        reputation.set_faction_score("guards", 5.0);
        assert!((reputation.faction_score("guards") - 1.0).abs() < f32::EPSILON);
        reputation.modify_faction_score("guards", -10.0);
        assert!((reputation.faction_score("guards") + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_faction_reads_neutral() {
        let reputation = Reputation::new();
        assert!(reputation.faction_score("nobody").abs() < f32::EPSILON);
        assert!(reputation.individual_score(EntityId(1)).abs() < f32::EPSILON);
    }

    #[test]
    fn titles_deduplicate() {
        let mut reputation = Reputation::new();
        reputation.add_title("Ratcatcher");
        reputation.add_title("Ratcatcher");
        assert_eq!(reputation.titles.len(), 1);
        reputation.remove_title("Ratcatcher");
        assert!(reputation.titles.is_empty());
    }

    #[test]
    fn seeded_reputation_copies_relations() {
        let mut relations = HashMap::new();
        relations.insert("guards".to_string(), -0.8);
        relations.insert("merchants".to_string(), 0.3);
        let reputation = Reputation::seeded_from(&relations);
        assert!((reputation.faction_score("guards") + 0.8).abs() < f32::EPSILON);
        assert!((reputation.faction_score("merchants") - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn membership_loyalty_clamps() {
        let mut membership = FactionMembership::new("monsters");
        membership.set_loyalty(7.0);
        assert!((membership.loyalty - 1.0).abs() < f32::EPSILON);
        assert!(membership.relation_to("guards").abs() < f32::EPSILON);
    }
}
