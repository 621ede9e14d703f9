//! Event eligibility and the uniform draw.
//!
//! An event is eligible for a character when all of these hold:
//! - the character is alive
//! - the event is not trigger-only
//! - the event's phases contain the character's phase
//! - the relationship filter, if any, contains the character's status
//! - the event is not cooling down for the character this year
//! - the condition, if any, evaluates true (rolling its random leaves)

use lineage_family::random::pick;
use lineage_types::{Catalog, Character, GameEvent, GameState};
use rand::RngCore;
use tracing::debug;

use crate::condition::evaluate_condition;

/// Whether `event` could be drawn for `character` right now, ignoring the
/// trigger-only flag. Used for draws and for events a caller offers
/// directly; triggered follow-ups skip it.
pub fn passes_filters(
    event: &GameEvent,
    state: &GameState,
    character: &Character,
    rng: &mut dyn RngCore,
) -> bool {
    if !character.is_alive || !event.phases.contains(&character.phase) {
        return false;
    }
    if let Some(filter) = &event.relationship_filter {
        if !filter.contains(&character.relationship_status) {
            return false;
        }
    }
    if character.status.on_cooldown(&event.id, state.date.year) {
        return false;
    }
    event
        .condition
        .as_ref()
        .is_none_or(|condition| evaluate_condition(condition, state, character, rng))
}

/// Every event `character` may be offered now, in catalog order.
pub fn evaluate_eligible_events<'c>(
    catalog: &'c Catalog,
    state: &GameState,
    character: &Character,
    rng: &mut dyn RngCore,
) -> Vec<&'c GameEvent> {
    let eligible: Vec<&GameEvent> = catalog
        .events
        .iter()
        .filter(|event| !event.is_trigger_only)
        .filter(|event| passes_filters(event, state, character, rng))
        .collect();
    debug!(
        character_id = %character.id,
        phase = ?character.phase,
        eligible = eligible.len(),
        "evaluated eligible events"
    );
    eligible
}

/// One event drawn uniformly from `eligible`.
pub fn draw_event<'c>(eligible: &[&'c GameEvent], rng: &mut dyn RngCore) -> Option<&'c GameEvent> {
    pick(rng, eligible).copied()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use lineage_types::{EventCondition, EventId, LifePhase, RelationshipStatus};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::testing::{simple_event, state_with_character_aged, test_catalog};

    #[test]
    fn trigger_only_events_are_never_eligible() {
        let mut rng = SmallRng::seed_from_u64(71);
        let mut catalog = test_catalog();
        for event in &mut catalog.events {
            event.phases = LifePhase::ALL.to_vec();
            event.condition = None;
            event.relationship_filter = None;
        }
        for age in [0, 5, 10, 17, 20, 40, 70] {
            let (state, id) = state_with_character_aged(age, 0);
            let c = state.character(id).unwrap();
            for _ in 0..20 {
                let eligible = evaluate_eligible_events(&catalog, &state, c, &mut rng);
                assert!(!eligible.is_empty());
                assert!(eligible.iter().all(|e| !e.is_trigger_only));
            }
        }
    }

    #[test]
    fn phase_and_relationship_filters_apply() {
        let mut rng = SmallRng::seed_from_u64(72);
        let mut teen_party = simple_event("teen_party", LifePhase::HighSchool, "log.party");
        teen_party.relationship_filter = Some(vec![RelationshipStatus::Single]);
        let mut catalog = test_catalog();
        catalog.events = vec![teen_party];

        let (mut state, id) = state_with_character_aged(17, 0);
        let c = state.character(id).unwrap().clone();
        assert_eq!(evaluate_eligible_events(&catalog, &state, &c, &mut rng).len(), 1);

        state.characters.get_mut(&id).unwrap().relationship_status = RelationshipStatus::Dating;
        let c = state.character(id).unwrap();
        assert!(evaluate_eligible_events(&catalog, &state, c, &mut rng).is_empty());

        let (state, id) = state_with_character_aged(30, 0);
        let c = state.character(id).unwrap();
        assert!(evaluate_eligible_events(&catalog, &state, c, &mut rng).is_empty());
    }

    #[test]
    fn conditions_and_cooldowns_exclude() {
        let mut rng = SmallRng::seed_from_u64(73);
        let mut rich = simple_event("windfall", LifePhase::Working, "log.windfall");
        rich.condition = Some(EventCondition::FundAtLeast { amount: 5_000 });
        let plain = simple_event("commute", LifePhase::Working, "log.commute");
        let mut catalog = test_catalog();
        catalog.events = vec![rich, plain];

        let (mut state, id) = state_with_character_aged(30, 1_000);
        let ids = |state: &GameState, rng: &mut SmallRng| -> Vec<String> {
            evaluate_eligible_events(&catalog, state, state.character(id).unwrap(), rng)
                .iter()
                .map(|e| e.id.to_string())
                .collect()
        };
        assert_eq!(ids(&state, &mut rng), vec!["commute"]);

        state.family_fund = 5_000;
        assert_eq!(ids(&state, &mut rng), vec!["windfall", "commute"]);

        let year = state.date.year;
        state.characters.get_mut(&id).unwrap().status.cooldowns =
            BTreeMap::from([(EventId::new("commute"), year + 1)]);
        assert_eq!(ids(&state, &mut rng), vec!["windfall"]);
    }

    #[test]
    fn dead_characters_get_nothing() {
        let mut rng = SmallRng::seed_from_u64(74);
        let (mut state, id) = state_with_character_aged(30, 0);
        state.characters.get_mut(&id).unwrap().is_alive = false;
        let c = state.character(id).unwrap();
        assert!(evaluate_eligible_events(&test_catalog(), &state, c, &mut rng).is_empty());
    }

    #[test]
    fn draw_is_roughly_uniform() {
        let mut rng = SmallRng::seed_from_u64(75);
        let catalog = test_catalog();
        let (state, id) = state_with_character_aged(17, 1_000);
        let c = state.character(id).unwrap();
        let eligible = evaluate_eligible_events(&catalog, &state, c, &mut rng);
        assert!(eligible.len() >= 2);

        let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
        let draws = 4_000_u32;
        for _ in 0..draws {
            let event = draw_event(&eligible, &mut rng).unwrap();
            *counts.entry(event.id.as_str()).or_default() += 1;
        }
        let expected = draws / u32::try_from(eligible.len()).unwrap();
        for count in counts.values() {
            assert!(count.abs_diff(expected) < expected / 5, "{counts:?}");
        }
        assert!(draw_event(&[], &mut rng).is_none());
    }
}
