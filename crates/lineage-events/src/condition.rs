//! Evaluation of [`EventCondition`] trees.
//!
//! Conditions are pure over the state and character except for the two
//! random leaves, [`EventCondition::Chance`] and
//! [`EventCondition::OldAgeHazard`], which draw from the injected RNG every
//! time they are evaluated. `All` and `Any` short-circuit, so a roll nested
//! behind a failed deterministic check is never drawn.

use lineage_family::random::roll;
use lineage_types::{Character, EventCondition, GameState};
use rand::RngCore;

/// Probability of dying of old age at `age`: `(age - start_age) * rate`,
/// zero before `start_age`.
pub fn old_age_hazard(age: u32, start_age: u32, rate_per_year: f64) -> f64 {
    f64::from(age.saturating_sub(start_age)) * rate_per_year
}

/// Evaluate `condition` for `character` in `state`.
pub fn evaluate_condition(
    condition: &EventCondition,
    state: &GameState,
    character: &Character,
    rng: &mut dyn RngCore,
) -> bool {
    match condition {
        EventCondition::AgeBetween { min, max } => (*min..=*max).contains(&character.age),
        EventCondition::FundAtLeast { amount } => state.family_fund >= *amount,
        EventCondition::FundBelow { amount } => state.family_fund < *amount,
        EventCondition::StatAtLeast { stat, value } => character.stats.get(*stat) >= *value,
        EventCondition::StatBelow { stat, value } => character.stats.get(*stat) < *value,
        EventCondition::HasLivingPartner => character
            .partner_id
            .and_then(|id| state.character(id))
            .is_some_and(|p| p.is_alive),
        EventCondition::ChildrenBelow { count } => character.child_count() < *count,
        EventCondition::Employment { status } => character.employment == *status,
        EventCondition::HasCareer => character.career.is_some(),
        EventCondition::OwnsPet => state
            .pets
            .values()
            .any(|p| p.is_alive && p.owner_id == character.id),
        EventCondition::FamilyOwnsBusiness => !state.businesses.is_empty(),
        EventCondition::Mourning => character.status.is_mourning(state.date.year),
        EventCondition::Gender { gender } => character.gender == *gender,
        EventCondition::PlayerCharacter => character.is_player_character,
        EventCondition::Chance { probability } => roll(rng, *probability),
        EventCondition::OldAgeHazard {
            start_age,
            rate_per_year,
        } => roll(rng, old_age_hazard(character.age, *start_age, *rate_per_year)),
        EventCondition::All { conditions } => conditions
            .iter()
            .all(|c| evaluate_condition(c, state, character, rng)),
        EventCondition::Any { conditions } => conditions
            .iter()
            .any(|c| evaluate_condition(c, state, character, rng)),
        EventCondition::Not { condition } => !evaluate_condition(condition, state, character, rng),
    }
}
