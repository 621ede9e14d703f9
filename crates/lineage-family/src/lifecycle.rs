//! Character creation, birth, partner synthesis, ageing, and death.
//!
//! Creation paths:
//! - [`create_initial_character`]: the founding newborn of a new game
//! - [`handle_birth`]: a child of two characters, stats inherited
//! - [`synthesize_partner`]: a spouse generated around the proposer
//!
//! Every path is total: bad inputs clamp rather than fail.

use lineage_types::{
    AvatarManifest, AvatarState, Catalog, Character, CharacterId, CharacterStatus,
    DAYS_PER_YEAR, DeathCause, Education, EmploymentStatus, Gender, Language, LifePhase,
    ParentPair, RelationshipStatus, SimDate, StatKind, Stats,
};
use rand::Rng;
use tracing::debug;

use crate::avatar::randomize_avatar;
use crate::career::assign_npc_career;
use crate::config::LifecycleConfig;
use crate::error::FamilyError;
use crate::names;
use crate::phase::life_phase_for_age;
use crate::random::{between, between_f64, noise, roll};

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

fn random_gender(rng: &mut (impl Rng + ?Sized)) -> Gender {
    if roll(rng, 0.5) {
        Gender::Male
    } else {
        Gender::Female
    }
}

#[allow(clippy::too_many_arguments)]
fn blank_character(
    id: CharacterId,
    first_name: String,
    last_name: String,
    gender: Gender,
    generation: u32,
    birth_date: SimDate,
    age: u32,
    stats: Stats,
) -> Character {
    Character {
        id,
        first_name,
        last_name,
        gender,
        generation,
        birth_date,
        age,
        is_alive: true,
        death_date: None,
        death_cause: None,
        stats,
        phase: life_phase_for_age(age),
        employment: EmploymentStatus::Dependent,
        education: Education::default(),
        career: None,
        business_id: None,
        relationship_status: RelationshipStatus::Single,
        partner_id: None,
        children_ids: Vec::new(),
        parents: None,
        is_player_character: false,
        status: CharacterStatus::default(),
        avatar: AvatarState::default(),
    }
}

/// The founding newborn of a new game, born on `date`.
///
/// Gender is a coin flip; iq, happiness, and eq are uniform in
/// `[0, initial_stat_max]`; health is uniform in the configured range;
/// skill starts at zero.
pub fn create_initial_character(
    date: SimDate,
    language: Language,
    manifest: &AvatarManifest,
    config: &LifecycleConfig,
    rng: &mut (impl Rng + ?Sized),
) -> Character {
    let id = CharacterId::generate(rng);
    let gender = random_gender(rng);
    let stats = Stats {
        iq: between(rng, 0, config.initial_stat_max),
        happiness: between(rng, 0, config.initial_stat_max),
        eq: between(rng, 0, config.initial_stat_max),
        health: between(rng, config.initial_health_min, config.initial_health_max),
        skill: 0,
    };
    let first = names::first_name(rng, language, gender);
    let last = names::surname(rng, language);
    let mut character = blank_character(id, first, last, gender, 1, date, 0, stats);
    character.is_player_character = true;
    character.avatar = randomize_avatar(manifest, gender, 0, LifePhase::Newborn, config, rng);
    character
}

#[allow(clippy::cast_possible_truncation)]
fn to_stat(value: f64) -> i32 {
    // Clamped into i32 range first, so the cast cannot truncate.
    value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// A child of `first` and `second`, born on `date`.
///
/// Each stat except skill is the parents' average times a multiplier drawn
/// from `[birth_multiplier_min, birth_multiplier_max)`. Health gets the
/// newborn bonus before clamping. Everything is clamped to `[0, ceiling]`.
///
/// The child inherits `first`'s surname, is one generation below `first`,
/// and is a player character if either parent is.
pub fn handle_birth(
    first: &Character,
    second: &Character,
    date: SimDate,
    language: Language,
    manifest: &AvatarManifest,
    config: &LifecycleConfig,
    rng: &mut (impl Rng + ?Sized),
) -> Character {
    let id = CharacterId::generate(rng);
    let gender = random_gender(rng);

    let mut inherit = |kind: StatKind| -> i32 {
        let average = (f64::from(first.stats.get(kind)) + f64::from(second.stats.get(kind))) / 2.0;
        let multiplier = between_f64(rng, config.birth_multiplier_min, config.birth_multiplier_max);
        to_stat(average * multiplier)
    };
    let iq = inherit(StatKind::Iq);
    let happiness = inherit(StatKind::Happiness);
    let eq = inherit(StatKind::Eq);
    let health = inherit(StatKind::Health).saturating_add(config.newborn_health_bonus);
    let stats = Stats {
        iq,
        happiness,
        eq,
        health,
        skill: 0,
    }
    .clamped();

    let first_name = names::first_name(rng, language, gender);
    let mut child = blank_character(
        id,
        first_name,
        first.last_name.clone(),
        gender,
        first.generation.saturating_add(1),
        date,
        0,
        stats,
    );
    child.parents = Some(ParentPair {
        first: first.id,
        second: second.id,
    });
    child.is_player_character = first.is_player_character || second.is_player_character;
    child.avatar = randomize_avatar(manifest, gender, 0, LifePhase::Newborn, config, rng);

    debug!(
        child_id = %child.id,
        parent = %first.id,
        generation = child.generation,
        "child born"
    );
    child
}

/// A spouse generated around `proposer`.
///
/// Opposite gender, age within `partner_age_spread` years (never under
/// `adult_age`), stats at the proposer's plus bounded noise, clamped. The
/// partner's occupation comes from [`assign_npc_career`].
pub fn synthesize_partner(
    proposer: &Character,
    date: SimDate,
    language: Language,
    catalog: &Catalog,
    config: &LifecycleConfig,
    rng: &mut (impl Rng + ?Sized),
) -> Character {
    let id = CharacterId::generate(rng);
    let gender = proposer.gender.opposite();

    let spread = i64::from(config.partner_age_spread);
    let offset = if spread > 0 {
        rng.random_range(spread.saturating_neg()..=spread)
    } else {
        0
    };
    let age = u32::try_from(i64::from(proposer.age).saturating_add(offset).max(0))
        .unwrap_or(proposer.age)
        .max(config.adult_age);

    // Born `age` years and a random part of a year before `date`.
    let days_into_year = rng.random_range(0..i64::from(DAYS_PER_YEAR));
    let birth_ordinal = date
        .ordinal()
        .saturating_sub(i64::from(age).saturating_mul(i64::from(DAYS_PER_YEAR)))
        .saturating_sub(days_into_year);
    let birth_date = SimDate::from_ordinal(birth_ordinal);

    let base = proposer.stats;
    let stats = Stats {
        iq: base.iq.saturating_add(noise(rng, config.partner_iq_noise)),
        happiness: base
            .happiness
            .saturating_add(noise(rng, config.partner_mood_noise)),
        eq: base.eq.saturating_add(noise(rng, config.partner_mood_noise)),
        health: base
            .health
            .saturating_add(noise(rng, config.partner_health_noise)),
        skill: 0,
    }
    .clamped();

    let first_name = names::first_name(rng, language, gender);
    let last_name = names::surname(rng, language);
    let mut partner = blank_character(
        id,
        first_name,
        last_name,
        gender,
        proposer.generation,
        birth_date,
        age,
        stats,
    );
    assign_npc_career(&partner, catalog, config, rng).apply(&mut partner);
    partner.stats = partner.stats.clamped();
    partner.avatar = randomize_avatar(&catalog.avatar, gender, age, partner.phase, config, rng);
    partner
}

// ---------------------------------------------------------------------------
// Ageing and death
// ---------------------------------------------------------------------------

/// Result of recomputing a character's age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeChange {
    /// Age before.
    pub previous_age: u32,
    /// Age after.
    pub new_age: u32,
    /// Phase before.
    pub previous_phase: LifePhase,
    /// Phase after.
    pub new_phase: LifePhase,
}

impl AgeChange {
    /// Ages reached since the last recompute, in order.
    pub fn birthdays(&self) -> impl Iterator<Item = u32> {
        self.previous_age.saturating_add(1)..=self.new_age
    }

    /// The new phase, if it changed.
    pub fn phase_transition(&self) -> Option<LifePhase> {
        (self.previous_phase != self.new_phase).then_some(self.new_phase)
    }
}

/// Recompute age from the birth date and recompute phase from age.
///
/// Age never decreases.
pub fn age_character(character: &mut Character, date: SimDate) -> Result<AgeChange, FamilyError> {
    if !character.is_alive {
        return Err(FamilyError::CharacterDeceased(character.id));
    }
    let previous_age = character.age;
    let previous_phase = character.phase;
    let new_age = date.years_since(character.birth_date).max(previous_age);
    character.age = new_age;
    character.phase = life_phase_for_age(new_age);
    Ok(AgeChange {
        previous_age,
        new_age,
        previous_phase,
        new_phase: character.phase,
    })
}

/// Mark `character` dead on `date`.
pub fn mark_dead(
    character: &mut Character,
    date: SimDate,
    cause: DeathCause,
) -> Result<(), FamilyError> {
    if !character.is_alive {
        return Err(FamilyError::CharacterDeceased(character.id));
    }
    character.is_alive = false;
    character.death_date = Some(date);
    character.death_cause = Some(cause);
    debug!(character_id = %character.id, age = character.age, ?cause, "character died");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lineage_types::{IQ_CEILING, STAT_CEILING};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::testing::{character_aged, test_catalog};

    #[test]
    fn initial_character_is_a_newborn_player() {
        let mut rng = SmallRng::seed_from_u64(51);
        let config = LifecycleConfig::default();
        let date = SimDate::start_of_year(1990);
        for _ in 0..200 {
            let c = create_initial_character(
                date,
                Language::En,
                &test_catalog().avatar,
                &config,
                &mut rng,
            );
            assert_eq!(c.phase, LifePhase::Newborn);
            assert_eq!(c.age, 0);
            assert_eq!(c.stats.skill, 0);
            assert!((30..=100).contains(&c.stats.health));
            assert!((0..=100).contains(&c.stats.iq));
            assert!(c.is_player_character);
            assert_eq!(c.generation, 1);
        }
    }

    #[test]
    fn birth_stats_never_exceed_ceilings() {
        let mut rng = SmallRng::seed_from_u64(52);
        let config = LifecycleConfig::default();
        let manifest = test_catalog().avatar;
        for _ in 0..1000 {
            let mut a = character_aged(30);
            let mut b = character_aged(30);
            a.stats = Stats {
                iq: rng.random_range(-20..=260),
                happiness: rng.random_range(-20..=130),
                eq: rng.random_range(-20..=130),
                health: rng.random_range(-20..=130),
                skill: rng.random_range(0..=100),
            };
            b.stats = Stats {
                iq: rng.random_range(-20..=260),
                happiness: rng.random_range(-20..=130),
                eq: rng.random_range(-20..=130),
                health: rng.random_range(-20..=130),
                skill: rng.random_range(0..=100),
            };
            let child = handle_birth(
                &a,
                &b,
                SimDate::start_of_year(2020),
                Language::Vi,
                &manifest,
                &config,
                &mut rng,
            );
            assert!(child.stats.iq <= IQ_CEILING);
            assert!(child.stats.happiness <= STAT_CEILING);
            assert!(child.stats.eq <= STAT_CEILING);
            assert!(child.stats.health <= STAT_CEILING);
            assert!(child.stats.within_bounds());
        }
    }

    #[test]
    fn child_inherits_surname_generation_and_parents() {
        let mut rng = SmallRng::seed_from_u64(53);
        let config = LifecycleConfig::default();
        let mut a = character_aged(28);
        a.last_name = "Nguyễn".to_owned();
        a.generation = 2;
        a.is_player_character = true;
        let b = character_aged(27);
        let child = handle_birth(
            &a,
            &b,
            SimDate::start_of_year(2030),
            Language::Vi,
            &test_catalog().avatar,
            &config,
            &mut rng,
        );
        assert_eq!(child.last_name, "Nguyễn");
        assert_eq!(child.generation, 3);
        assert!(child.is_player_character);
        let parents = child.parents.unwrap();
        assert_eq!(parents.first, a.id);
        assert_eq!(parents.second, b.id);
    }

    #[test]
    fn max_health_parents_still_clamp_newborn_health() {
        let mut rng = SmallRng::seed_from_u64(54);
        let config = LifecycleConfig {
            birth_multiplier_min: 1.39,
            ..LifecycleConfig::default()
        };
        let mut a = character_aged(30);
        let mut b = character_aged(30);
        a.stats.health = 100;
        b.stats.health = 100;
        let child = handle_birth(
            &a,
            &b,
            SimDate::start_of_year(2000),
            Language::En,
            &test_catalog().avatar,
            &config,
            &mut rng,
        );
        assert_eq!(child.stats.health, STAT_CEILING);
    }

    #[test]
    fn partner_is_adult_opposite_gender_and_near_proposer() {
        let config = LifecycleConfig::default();
        let catalog = test_catalog();
        for seed in 0..100 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut proposer = character_aged(25);
            proposer.stats = Stats {
                iq: 190,
                happiness: 95,
                eq: 5,
                health: 60,
                skill: 30,
            };
            let date = SimDate::new(2025, 200);
            let partner =
                synthesize_partner(&proposer, date, Language::En, &catalog, &config, &mut rng);
            assert_eq!(partner.gender, proposer.gender.opposite());
            assert!((22..=28).contains(&partner.age));
            assert_eq!(date.years_since(partner.birth_date), partner.age);
            assert!((170..=IQ_CEILING).contains(&partner.stats.iq));
            assert!((80..=STAT_CEILING).contains(&partner.stats.happiness));
            assert!((0..=20).contains(&partner.stats.eq));
            assert!((50..=70).contains(&partner.stats.health));
            assert!(!partner.is_player_character);
            assert!(partner.stats.within_bounds());
        }
    }

    #[test]
    fn young_proposer_gets_adult_partner() {
        let mut rng = SmallRng::seed_from_u64(55);
        let config = LifecycleConfig::default();
        let proposer = character_aged(18);
        for _ in 0..50 {
            let partner = synthesize_partner(
                &proposer,
                SimDate::new(2025, 1),
                Language::En,
                &test_catalog(),
                &config,
                &mut rng,
            );
            assert!(partner.age >= 18);
        }
    }

    #[test]
    fn ageing_recomputes_phase_and_reports_birthdays() {
        let mut c = character_aged(0);
        c.birth_date = SimDate::new(2000, 10);
        let change = age_character(&mut c, SimDate::new(2006, 10)).unwrap();
        assert_eq!(change.new_age, 6);
        assert_eq!(change.birthdays().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(change.phase_transition(), Some(LifePhase::PrimarySchool));
        assert_eq!(c.phase, LifePhase::PrimarySchool);
    }

    #[test]
    fn dead_characters_are_frozen() {
        let mut c = character_aged(90);
        mark_dead(&mut c, SimDate::new(2090, 5), DeathCause::OldAge).unwrap();
        assert!(!c.is_alive);
        assert_eq!(c.death_cause, Some(DeathCause::OldAge));
        assert!(matches!(
            age_character(&mut c, SimDate::new(2100, 1)),
            Err(FamilyError::CharacterDeceased(_))
        ));
        assert!(mark_dead(&mut c, SimDate::new(2100, 1), DeathCause::Illness).is_err());
        assert_eq!(c.age, 90);
    }
}
