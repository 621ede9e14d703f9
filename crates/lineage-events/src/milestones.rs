//! Milestone actions: marriage, childbirth, and death.
//!
//! The catalog's milestone events gate these behind deterministic checks
//! plus a roll; the handlers re-check the deterministic part so a stale or
//! hand-built effect can never break a family invariant.

use std::collections::{BTreeMap, BTreeSet};

use lineage_family::family::{self, apply_mourning, register_child, widow};
use lineage_family::lifecycle::{handle_birth, mark_dead, synthesize_partner};
use lineage_family::LifecycleConfig;
use lineage_types::{
    Business, Character, CharacterId, DeathCause, EffectAction, GameState, LogEntry,
    SlotWorker,
};
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::patch::StatePatch;
use crate::registry::ActionContext;

fn living(state: &GameState, id: CharacterId) -> Option<&Character> {
    state.character(id).filter(|c| c.is_alive)
}

// ---------------------------------------------------------------------------
// Marriage
// ---------------------------------------------------------------------------

/// Synthesize a partner for the acting character and marry them.
///
/// Empty patch unless the character is an unpartnered adult whose status
/// allows marriage.
pub fn marry(_: &EffectAction, ctx: &ActionContext<'_>, rng: &mut dyn RngCore) -> StatePatch {
    let state = ctx.state;
    let Some(proposer) = living(state, ctx.character_id) else {
        return StatePatch::empty();
    };
    if proposer.partner_id.is_some()
        || proposer.age < ctx.config.adult_age
        || !proposer.relationship_status.can_marry()
    {
        debug!(character_id = %proposer.id, "not eligible to marry");
        return StatePatch::empty();
    }

    let partner = synthesize_partner(
        proposer,
        state.date,
        state.language,
        ctx.catalog,
        ctx.config,
        rng,
    );
    let partner_id = partner.id;
    let partner_name = partner.full_name();
    let mut couple: BTreeMap<CharacterId, Character> = BTreeMap::new();
    couple.insert(proposer.id, proposer.clone());
    couple.insert(partner_id, partner);
    if let Err(error) = family::marry(&mut couple, proposer.id, partner_id) {
        warn!(%error, "marriage rejected");
        return StatePatch::empty();
    }

    info!(character_id = %proposer.id, %partner_id, "marriage");
    StatePatch {
        characters: couple.into_values().collect(),
        ..StatePatch::default()
    }
    .with_log(
        LogEntry::new(state.date, Some(proposer.id), "log.milestone.married")
            .with_param("partner", partner_name),
    )
}

// ---------------------------------------------------------------------------
// Childbirth
// ---------------------------------------------------------------------------

/// Birth a child to the acting character and their living partner.
///
/// The player-steered parent passes on the surname. Empty patch when there
/// is no living partner or either parent has reached the children ceiling.
pub fn have_child(_: &EffectAction, ctx: &ActionContext<'_>, rng: &mut dyn RngCore) -> StatePatch {
    let state = ctx.state;
    let Some(actor) = living(state, ctx.character_id) else {
        return StatePatch::empty();
    };
    let Some(partner) = actor.partner_id.and_then(|id| living(state, id)) else {
        debug!(character_id = %actor.id, "no living partner for childbirth");
        return StatePatch::empty();
    };
    let (first, second) = if actor.is_player_character || !partner.is_player_character {
        (actor, partner)
    } else {
        (partner, actor)
    };

    let child = handle_birth(
        first,
        second,
        state.date,
        state.language,
        &ctx.catalog.avatar,
        ctx.config,
        rng,
    );
    let child_id = child.id;
    let child_name = child.first_name.clone();

    let mut family: BTreeMap<CharacterId, Character> = BTreeMap::new();
    family.insert(first.id, first.clone());
    family.insert(second.id, second.clone());
    if let Err(error) = register_child(&mut family, child, ctx.config) {
        debug!(%error, "childbirth rejected");
        return StatePatch::empty();
    }

    info!(%child_id, parent = %first.id, "child born");
    StatePatch {
        characters: family.into_values().collect(),
        ..StatePatch::default()
    }
    .with_log(
        LogEntry::new(state.date, Some(first.id), "log.milestone.child_born")
            .with_param("child", child_name),
    )
}

// ---------------------------------------------------------------------------
// Death
// ---------------------------------------------------------------------------

/// The acting character dies of old age.
pub fn die_of_old_age(
    _: &EffectAction,
    ctx: &ActionContext<'_>,
    _: &mut dyn RngCore,
) -> StatePatch {
    kill_character(ctx.state, ctx.config, ctx.character_id, DeathCause::OldAge)
}

/// Businesses with `id` removed from every slot it fills.
pub fn release_business_slots(state: &GameState, id: CharacterId) -> Vec<Business> {
    state
        .businesses
        .values()
        .filter(|b| b.slot_of(id).is_some())
        .map(|b| {
            let mut business = b.clone();
            for slot in &mut business.slots {
                if slot.worker.character() == Some(id) {
                    slot.worker = SlotWorker::Empty;
                }
            }
            business
        })
        .collect()
}

/// Everything that follows a death.
///
/// The character is marked dead with today's date, leaves any business
/// slot, and their partner is widowed with both links cleared. Every other
/// living character loses happiness and starts mourning.
pub fn kill_character(
    state: &GameState,
    config: &LifecycleConfig,
    id: CharacterId,
    cause: DeathCause,
) -> StatePatch {
    let mut characters = state.characters.clone();
    let Some(deceased) = characters.get_mut(&id) else {
        return StatePatch::empty();
    };
    if mark_dead(deceased, state.date, cause).is_err() {
        return StatePatch::empty();
    }
    let name = deceased.full_name();
    let age = deceased.age;

    let mut touched = BTreeSet::from([id]);
    if let Some(survivor) = widow(&mut characters, id) {
        touched.insert(survivor);
    }
    touched.extend(apply_mourning(&mut characters, id, state.date.year, config));

    info!(character_id = %id, age, ?cause, "death");
    StatePatch {
        characters: touched
            .iter()
            .filter_map(|member| characters.remove(member))
            .collect(),
        businesses: release_business_slots(state, id),
        ..StatePatch::default()
    }
    .with_log(
        LogEntry::new(state.date, Some(id), "log.milestone.died")
            .with_param("name", name)
            .with_param("age", age),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lineage_types::{BusinessId, BusinessKindId, BusinessSlot, RelationshipStatus, SimDate};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::testing::{adult_couple_state, state_with_character_aged, test_catalog};

    fn run(
        handler: fn(&EffectAction, &ActionContext<'_>, &mut dyn RngCore) -> StatePatch,
        action: &EffectAction,
        state: &GameState,
        id: CharacterId,
        seed: u64,
    ) -> StatePatch {
        let catalog = test_catalog();
        let config = LifecycleConfig::default();
        let ctx = ActionContext {
            state,
            catalog: &catalog,
            config: &config,
            character_id: id,
        };
        handler(action, &ctx, &mut SmallRng::seed_from_u64(seed))
    }

    #[test]
    fn marriage_is_symmetric_for_many_seeds() {
        for seed in 0..100 {
            let (state, id) = state_with_character_aged(25, 0);
            let patch = run(marry, &EffectAction::Marry, &state, id, seed);
            let next = patch.merge_into(&state).unwrap();
            let me = &next.characters[&id];
            let partner_id = me.partner_id.unwrap();
            let partner = &next.characters[&partner_id];
            assert_eq!(partner.partner_id, Some(id));
            assert_eq!(me.relationship_status, RelationshipStatus::Married);
            assert_eq!(partner.relationship_status, RelationshipStatus::Married);
            assert!(partner.age >= 18);
            assert!(!partner.is_player_character);
            assert_eq!(next.characters.len(), 2);
        }
    }

    #[test]
    fn minors_and_married_do_not_marry() {
        let (state, id) = state_with_character_aged(16, 0);
        assert!(run(marry, &EffectAction::Marry, &state, id, 1).is_empty());
        let (state, a, _) = adult_couple_state();
        assert!(run(marry, &EffectAction::Marry, &state, a, 2).is_empty());
    }

    #[test]
    fn childbirth_links_both_parents() {
        let (state, a, b) = adult_couple_state();
        let next = run(have_child, &EffectAction::HaveChild, &state, b, 3)
            .merge_into(&state)
            .unwrap();
        assert_eq!(next.characters.len(), 3);
        let child_id = next.characters[&a].children_ids[0];
        assert_eq!(next.characters[&b].children_ids, vec![child_id]);
        let child = &next.characters[&child_id];
        assert_eq!(child.age, 0);
        assert_eq!(child.last_name, next.characters[&a].last_name);
        assert!(child.is_player_character);
    }

    #[test]
    fn sixth_child_is_the_last() {
        let (mut state, a, b) = adult_couple_state();
        for seed in 0..8 {
            state = run(have_child, &EffectAction::HaveChild, &state, a, seed)
                .merge_into(&state)
                .unwrap();
        }
        assert_eq!(state.characters[&a].children_ids.len(), 6);
        assert_eq!(state.characters[&b].children_ids.len(), 6);
        assert_eq!(state.characters.len(), 8);
    }

    #[test]
    fn single_character_cannot_have_child() {
        let (state, id) = state_with_character_aged(30, 0);
        assert!(run(have_child, &EffectAction::HaveChild, &state, id, 4).is_empty());
    }

    #[test]
    fn death_widows_releases_and_mourns() {
        let (mut state, a, b) = adult_couple_state();
        let business_id = BusinessId::generate(&mut SmallRng::seed_from_u64(5));
        state.businesses.insert(
            business_id,
            Business {
                id: business_id,
                kind: BusinessKindId::new("cafe"),
                level: 1,
                slots: vec![BusinessSlot {
                    role: "barista".to_owned(),
                    required_major: None,
                    worker: SlotWorker::Character { id: a },
                }],
                acquired: SimDate::start_of_year(1990),
            },
        );
        let happiness_before = state.characters[&b].stats.happiness;

        let next = run(die_of_old_age, &EffectAction::DieOfOldAge, &state, a, 6)
            .merge_into(&state)
            .unwrap();
        let dead = &next.characters[&a];
        assert!(!dead.is_alive);
        assert_eq!(dead.death_date, Some(state.date));
        assert_eq!(dead.death_cause, Some(DeathCause::OldAge));
        assert_eq!(dead.partner_id, None);

        let survivor = &next.characters[&b];
        assert_eq!(survivor.partner_id, None);
        assert_eq!(survivor.relationship_status, RelationshipStatus::Widowed);
        assert_eq!(survivor.stats.happiness, happiness_before - 20);
        assert!(survivor.status.is_mourning(state.date.year + 1));

        assert_eq!(next.businesses[&business_id].slots[0].worker, SlotWorker::Empty);
        assert_eq!(next.log.last().unwrap().key, "log.milestone.died");
    }

    #[test]
    fn dying_twice_changes_nothing() {
        let (state, id) = state_with_character_aged(90, 0);
        let config = LifecycleConfig::default();
        let once = kill_character(&state, &config, id, DeathCause::OldAge)
            .merge_into(&state)
            .unwrap();
        assert!(kill_character(&once, &config, id, DeathCause::Illness).is_empty());
    }
}
