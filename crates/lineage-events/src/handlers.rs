//! Handlers for the everyday effect actions: relationships, jobs, pets,
//! loans, and clubs.
//!
//! Each handler re-checks its own preconditions against the state and
//! returns an empty patch when they do not hold.

use std::collections::BTreeMap;

use lineage_family::family;
use lineage_family::names::pet_name;
use lineage_family::random::pick;
use lineage_types::{
    Character, CharacterId, EffectAction, EmploymentStatus, LogEntry, PendingChoice,
    PendingRequest, Pet, PetId, RelationshipStatus,
};
use rand::RngCore;
use tracing::{debug, warn};

use crate::milestones::release_business_slots;
use crate::patch::StatePatch;
use crate::registry::ActionContext;

fn actor<'a>(ctx: &ActionContext<'a>) -> Option<&'a Character> {
    ctx.state.character(ctx.character_id).filter(|c| c.is_alive)
}

fn single_update(ctx: &ActionContext<'_>, character: Character, key: &str) -> StatePatch {
    let entry = LogEntry::new(ctx.state.date, Some(character.id), key);
    StatePatch {
        characters: vec![character],
        ..StatePatch::default()
    }
    .with_log(entry)
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// Single, divorced, or widowed characters start dating.
pub fn start_dating(_: &EffectAction, ctx: &ActionContext<'_>, _: &mut dyn RngCore) -> StatePatch {
    let Some(character) = actor(ctx) else {
        return StatePatch::empty();
    };
    if character.partner_id.is_some() || !character.relationship_status.can_marry() {
        return StatePatch::empty();
    }
    let mut updated = character.clone();
    updated.relationship_status = RelationshipStatus::Dating;
    single_update(ctx, updated, "log.relationship.dating")
}

/// Dating characters go back to single.
pub fn break_up(_: &EffectAction, ctx: &ActionContext<'_>, _: &mut dyn RngCore) -> StatePatch {
    let Some(character) = actor(ctx) else {
        return StatePatch::empty();
    };
    if character.relationship_status != RelationshipStatus::Dating {
        return StatePatch::empty();
    }
    let mut updated = character.clone();
    updated.relationship_status = RelationshipStatus::Single;
    single_update(ctx, updated, "log.relationship.break_up")
}

/// Married characters divorce; both sides are rewritten together.
pub fn divorce(_: &EffectAction, ctx: &ActionContext<'_>, _: &mut dyn RngCore) -> StatePatch {
    let Some(character) = actor(ctx) else {
        return StatePatch::empty();
    };
    let Some(partner) = character.partner_id.and_then(|id| ctx.state.character(id)) else {
        return StatePatch::empty();
    };
    let mut couple: BTreeMap<CharacterId, Character> = BTreeMap::new();
    couple.insert(character.id, character.clone());
    couple.insert(partner.id, partner.clone());
    if let Err(error) = family::divorce(&mut couple, character.id) {
        warn!(%error, "divorce rejected");
        return StatePatch::empty();
    }
    StatePatch {
        characters: couple.into_values().collect(),
        ..StatePatch::default()
    }
    .with_log(LogEntry::new(
        ctx.state.date,
        Some(character.id),
        "log.relationship.divorced",
    ))
}

// ---------------------------------------------------------------------------
// Work
// ---------------------------------------------------------------------------

/// An employed character loses their job and career position.
pub fn lose_job(_: &EffectAction, ctx: &ActionContext<'_>, _: &mut dyn RngCore) -> StatePatch {
    let Some(character) = actor(ctx) else {
        return StatePatch::empty();
    };
    if character.employment != EmploymentStatus::Employed {
        return StatePatch::empty();
    }
    let mut updated = character.clone();
    updated.employment = EmploymentStatus::Unemployed;
    updated.career = None;
    single_update(ctx, updated, "log.career.lost_job")
}

/// A working-age character retires and leaves any business slot.
pub fn retire(_: &EffectAction, ctx: &ActionContext<'_>, _: &mut dyn RngCore) -> StatePatch {
    let Some(character) = actor(ctx) else {
        return StatePatch::empty();
    };
    if !matches!(
        character.employment,
        EmploymentStatus::Employed | EmploymentStatus::Unemployed
    ) {
        return StatePatch::empty();
    }
    let mut updated = character.clone();
    updated.employment = EmploymentStatus::Retired;
    updated.career = None;
    let mut patch = single_update(ctx, updated, "log.career.retired");
    patch.businesses = release_business_slots(ctx.state, character.id);
    patch
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

/// The character adopts a pet of the given species.
pub fn adopt_pet(action: &EffectAction, ctx: &ActionContext<'_>, rng: &mut dyn RngCore) -> StatePatch {
    let EffectAction::AdoptPet { species } = action else {
        return StatePatch::empty();
    };
    let Some(character) = actor(ctx) else {
        return StatePatch::empty();
    };
    let pet = Pet {
        id: PetId::generate(rng),
        species: *species,
        name: pet_name(rng),
        owner_id: character.id,
        adopted: ctx.state.date,
        is_alive: true,
    };
    debug!(pet_id = %pet.id, owner = %character.id, ?species, "pet adopted");
    let entry = LogEntry::new(ctx.state.date, Some(character.id), "log.pet.adopted")
        .with_param("pet", &pet.name);
    StatePatch {
        pets: vec![pet],
        ..StatePatch::default()
    }
    .with_log(entry)
}

/// The character's longest-held living pet dies.
pub fn pet_passes_away(_: &EffectAction, ctx: &ActionContext<'_>, _: &mut dyn RngCore) -> StatePatch {
    let Some(character) = actor(ctx) else {
        return StatePatch::empty();
    };
    let Some(pet) = ctx
        .state
        .pets
        .values()
        .filter(|p| p.is_alive && p.owner_id == character.id)
        .min_by_key(|p| (p.adopted, p.id))
    else {
        return StatePatch::empty();
    };
    let mut departed = pet.clone();
    departed.is_alive = false;
    let entry = LogEntry::new(ctx.state.date, Some(character.id), "log.pet.passed_away")
        .with_param("pet", &departed.name);
    StatePatch {
        pets: vec![departed],
        ..StatePatch::default()
    }
    .with_log(entry)
}

// ---------------------------------------------------------------------------
// Money and school
// ---------------------------------------------------------------------------

/// Open a loan offer for a player character.
pub fn request_loan(action: &EffectAction, ctx: &ActionContext<'_>, _: &mut dyn RngCore) -> StatePatch {
    let EffectAction::RequestLoan { amount } = action else {
        return StatePatch::empty();
    };
    let Some(character) = actor(ctx) else {
        return StatePatch::empty();
    };
    if *amount <= 0 || !character.is_player_character {
        return StatePatch::empty();
    }
    let request = PendingRequest::Loan { amount: *amount };
    if ctx.state.pending_for(character.id, request.kind()).is_some() {
        return StatePatch::empty();
    }
    StatePatch {
        pending: vec![PendingChoice {
            character_id: character.id,
            request,
            opened: ctx.state.date,
        }],
        ..StatePatch::default()
    }
}

/// Join a random club open in the character's phase and not yet joined.
pub fn join_club(_: &EffectAction, ctx: &ActionContext<'_>, rng: &mut dyn RngCore) -> StatePatch {
    let Some(character) = actor(ctx) else {
        return StatePatch::empty();
    };
    let open: Vec<_> = ctx
        .catalog
        .clubs
        .iter()
        .filter(|club| club.phases.contains(&character.phase))
        .filter(|club| !character.education.clubs.contains(&club.id))
        .collect();
    let Some(club) = pick(rng, &open) else {
        return StatePatch::empty();
    };
    let mut updated = character.clone();
    updated.education.clubs.push(club.id.clone());
    let entry = LogEntry::new(ctx.state.date, Some(character.id), "log.school.joined_club")
        .with_param("club", &club.name_key);
    StatePatch {
        characters: vec![updated],
        ..StatePatch::default()
    }
    .with_log(entry)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lineage_types::{CareerPosition, CareerTrackId, GameState, PetSpecies};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::registry::ActionRegistry;
    use crate::testing::{adult_couple_state, state_with_character_aged, test_catalog};

    fn apply(state: &GameState, id: CharacterId, action: &EffectAction) -> GameState {
        let catalog = test_catalog();
        let config = lineage_family::LifecycleConfig::default();
        let ctx = ActionContext {
            state,
            catalog: &catalog,
            config: &config,
            character_id: id,
        };
        ActionRegistry::standard()
            .apply(action, &ctx, &mut SmallRng::seed_from_u64(91))
            .merge_into(state)
            .unwrap()
    }

    #[test]
    fn dating_and_breaking_up() {
        let (state, id) = state_with_character_aged(20, 0);
        let dating = apply(&state, id, &EffectAction::StartDating);
        assert_eq!(
            dating.characters[&id].relationship_status,
            RelationshipStatus::Dating
        );
        let again = apply(&dating, id, &EffectAction::StartDating);
        assert_eq!(again.log.len(), dating.log.len());
        let single = apply(&dating, id, &EffectAction::BreakUp);
        assert_eq!(
            single.characters[&id].relationship_status,
            RelationshipStatus::Single
        );
    }

    #[test]
    fn divorce_keeps_symmetry() {
        let (state, a, b) = adult_couple_state();
        let next = apply(&state, b, &EffectAction::Divorce);
        assert_eq!(next.characters[&a].partner_id, None);
        assert_eq!(next.characters[&b].partner_id, None);
        assert_eq!(
            next.characters[&a].relationship_status,
            RelationshipStatus::Divorced
        );
        let (single, id) = state_with_character_aged(30, 0);
        assert_eq!(apply(&single, id, &EffectAction::Divorce), single);
    }

    #[test]
    fn losing_a_job_and_retiring() {
        let (mut state, id) = state_with_character_aged(45, 0);
        {
            let c = state.characters.get_mut(&id).unwrap();
            c.employment = EmploymentStatus::Employed;
            c.career = Some(CareerPosition {
                track_id: CareerTrackId::new("office"),
                level: 1,
                years_in_role: 4,
            });
        }
        let fired = apply(&state, id, &EffectAction::LoseJob);
        assert_eq!(fired.characters[&id].employment, EmploymentStatus::Unemployed);
        assert!(fired.characters[&id].career.is_none());

        let retired = apply(&fired, id, &EffectAction::Retire);
        assert_eq!(retired.characters[&id].employment, EmploymentStatus::Retired);
        assert_eq!(apply(&retired, id, &EffectAction::LoseJob), retired);
    }

    #[test]
    fn pets_come_and_go() {
        let (state, id) = state_with_character_aged(10, 0);
        let with_pet = apply(
            &state,
            id,
            &EffectAction::AdoptPet {
                species: PetSpecies::Dog,
            },
        );
        assert_eq!(with_pet.pets.len(), 1);
        let pet = with_pet.pets.values().next().unwrap();
        assert!(pet.is_alive);
        assert_eq!(pet.owner_id, id);
        assert!(!pet.name.is_empty());

        let without = apply(&with_pet, id, &EffectAction::PetPassesAway);
        assert!(without.pets.values().all(|p| !p.is_alive));
        assert_eq!(apply(&without, id, &EffectAction::PetPassesAway), without);
    }

    #[test]
    fn loan_offer_opens_one_pending_choice() {
        let (state, id) = state_with_character_aged(30, 0);
        let action = EffectAction::RequestLoan { amount: 10_000 };
        let offered = apply(&state, id, &action);
        assert_eq!(offered.pending.len(), 1);
        assert_eq!(
            offered.pending[0].request,
            PendingRequest::Loan { amount: 10_000 }
        );
        assert_eq!(apply(&offered, id, &action).pending.len(), 1);
    }

    #[test]
    fn npcs_get_no_loan_offers() {
        let (state, _, npc) = adult_couple_state();
        let offered = apply(&state, npc, &EffectAction::RequestLoan { amount: 500 });
        assert!(offered.pending.is_empty());
    }

    #[test]
    fn clubs_are_joined_once() {
        let (mut state, id) = state_with_character_aged(16, 0);
        for _ in 0..5 {
            state = apply(&state, id, &EffectAction::JoinClub);
        }
        let clubs = &state.characters[&id].education.clubs;
        let open = test_catalog()
            .clubs
            .iter()
            .filter(|c| c.phases.contains(&state.characters[&id].phase))
            .count();
        assert_eq!(clubs.len(), open);
        assert!(!clubs.is_empty());
    }
}
