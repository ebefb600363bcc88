//! Property tests for store queries and value clamping.

use oubliette_core::ComponentStore;
use oubliette_core::components::{
    Component, ComponentKind, MemoryBank, Motivation, Personality, Position, Reputation,
};
use oubliette_core::types::EntityId;
use proptest::prelude::*;

fn component_for(kind: ComponentKind) -> Component {
    match kind {
        ComponentKind::Position => Component::Position(Position::new(0, 0)),
        ComponentKind::Personality => Component::Personality(Personality::new()),
        ComponentKind::Motivation => Component::Motivation(Motivation::new()),
        ComponentKind::Memory => Component::Memory(MemoryBank::default()),
        ComponentKind::Reputation => Component::Reputation(Reputation::new()),
        // Kinds the generator below never produces.
        _ => unreachable!("not generated"),
    }
}

fn arb_kind() -> impl Strategy<Value = ComponentKind> {
    prop_oneof![
        Just(ComponentKind::Position),
        Just(ComponentKind::Personality),
        Just(ComponentKind::Motivation),
        Just(ComponentKind::Memory),
        Just(ComponentKind::Reputation),
    ]
}

proptest! {
    /// After any sequence of attaches and detaches, `with_all` returns
    /// exactly the entities that hold every queried kind, in id order.
    #[test]
    fn query_matches_ground_truth(
        ops in prop::collection::vec((0usize..8, arb_kind(), prop::bool::ANY), 1..60),
        query in prop::collection::vec(arb_kind(), 1..4),
    ) {
        let mut store = ComponentStore::new();
        let entities: Vec<EntityId> = (0..8).map(|_| store.create_entity()).collect();

        for (slot, kind, attach) in ops {
            let entity = entities[slot];
            if attach {
                store.attach(entity, component_for(kind)).expect("attach");
            } else {
                store.detach(entity, kind);
            }
        }

        let expected: Vec<EntityId> = entities
            .iter()
            .copied()
            .filter(|entity| query.iter().all(|kind| store.has(*entity, *kind)))
            .collect();
        prop_assert_eq!(store.with_all(&query), expected);
    }

    /// Personality traits stay inside [0, 1] no matter what is written.
    #[test]
    fn traits_always_clamped(values in prop::collection::vec(-10.0f32..10.0, 1..20)) {
        let mut personality = Personality::new();
        for (i, value) in values.iter().enumerate() {
            personality.set_trait(&format!("trait_{i}"), *value);
        }
        for value in personality.traits.values() {
            prop_assert!((0.0..=1.0).contains(value));
        }
    }

    /// Reputation scores stay inside [-1, 1] under arbitrary modification
    /// sequences.
    #[test]
    fn reputation_always_clamped(deltas in prop::collection::vec(-3.0f32..3.0, 1..30)) {
        let mut reputation = Reputation::new();
        for delta in deltas {
            reputation.modify_faction_score("guards", delta);
            prop_assert!((-1.0..=1.0).contains(&reputation.faction_score("guards")));
        }
    }

    /// A memory bank never exceeds its capacity, and eviction keeps the most
    /// important records.
    #[test]
    fn memory_bank_respects_capacity(
        importances in prop::collection::vec(0.0f32..1.0, 1..40),
        cap in 1usize..10,
    ) {
        use oubliette_core::components::MemoryRecord;
        let mut bank = MemoryBank::with_capacity(cap);
        for (i, importance) in importances.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            bank.add(MemoryRecord::new("event", i as f64, *importance, 1.0));
        }
        prop_assert!(bank.records.len() <= cap);

        let kept_min = bank
            .records
            .iter()
            .map(|r| r.importance)
            .fold(f32::INFINITY, f32::min);
        let mut sorted = importances.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).expect("finite"));
        // Every importance strictly above the kept minimum that appears more
        // often than capacity allows would contradict eviction order; check
        // the simple bound instead: no evicted record outranks a kept one.
        let threshold = sorted.get(bank.records.len().saturating_sub(1)).copied();
        if let Some(threshold) = threshold {
            prop_assert!(kept_min >= threshold - f32::EPSILON);
        }
    }
}
