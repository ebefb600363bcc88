//! Personality traits influencing AI decision-making.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Trait value assumed when an entity has no explicit value for a trait.
pub const DEFAULT_TRAIT: f32 = 0.5;

const DEFAULT_TRAITS: [&str; 10] = [
    "aggression",
    "caution",
    "curiosity",
    "loyalty",
    "intelligence",
    "greed",
    "empathy",
    "ambition",
    "restlessness",
    "charisma",
];

/// Personality trait map for an AI entity.
///
/// Traits are named scalars in `[0, 1]` that bias probabilities inside
/// behavior-tree actions (e.g. wander likelihood scales with `restlessness`).
/// Unknown trait names read as [`DEFAULT_TRAIT`], so behavior trees can probe
/// traits an archetype never set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personality {
    /// Named trait values, each clamped to `[0, 1]`.
    pub traits: HashMap<String, f32>,
}

impl Personality {
    /// Create a personality with the standard trait set, all at 0.5.
    #[must_use]
    pub fn new() -> Self {
        let traits = DEFAULT_TRAITS
            .iter()
            .map(|name| ((*name).to_string(), DEFAULT_TRAIT))
            .collect();
        Self { traits }
    }

    /// Create a personality with the standard set plus the given overrides.
    #[must_use]
    pub fn with_overrides(overrides: &HashMap<String, f32>) -> Self {
        let mut personality = Self::new();
        for (name, value) in overrides {
            personality.set_trait(name, *value);
        }
        personality
    }

    /// Get a trait value, or `default` if the trait is unset.
    #[must_use]
    pub fn trait_or(&self, name: &str, default: f32) -> f32 {
        self.traits.get(name).copied().unwrap_or(default)
    }

    /// Get a trait value, defaulting to [`DEFAULT_TRAIT`].
    #[must_use]
    pub fn trait_value(&self, name: &str) -> f32 {
        self.trait_or(name, DEFAULT_TRAIT)
    }

    /// Set a trait value, clamped to `[0, 1]`.
    pub fn set_trait(&mut self, name: &str, value: f32) {
        self.traits.insert(name.to_string(), value.clamp(0.0, 1.0));
    }

    /// Adjust a trait by a delta, clamping the result.
    pub fn modify_trait(&mut self, name: &str, delta: f32) {
        let current = self.trait_value(name);
        self.set_trait(name, current + delta);
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_neutral() {
        let personality = Personality::new();
        assert!((personality.trait_value("aggression") - 0.5).abs() < f32::EPSILON);
        assert!((personality.trait_value("never_set") - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn set_clamps_to_unit_interval() {
        let mut personality = Personality::new();
        personality.set_trait("greed", 3.0);
        assert!((personality.trait_value("greed") - 1.0).abs() < f32::EPSILON);
        personality.set_trait("greed", -3.0);
        assert!(personality.trait_value("greed").abs() < f32::EPSILON);
    }

    #[test]
    fn modify_applies_delta_with_clamp() {
        let mut personality = Personality::new();
        personality.modify_trait("caution", 0.2);
        assert!((personality.trait_value("caution") - 0.7).abs() < 1e-6);
        personality.modify_trait("caution", 5.0);
        assert!((personality.trait_value("caution") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn overrides_round_trip_in_range() {
        let mut overrides = HashMap::new();
        overrides.insert("aggression".to_string(), 0.9);
        overrides.insert("courage".to_string(), 0.25);
        let personality = Personality::with_overrides(&overrides);
        assert!((personality.trait_value("aggression") - 0.9).abs() < f32::EPSILON);
        assert!((personality.trait_value("courage") - 0.25).abs() < f32::EPSILON);
    }
}
