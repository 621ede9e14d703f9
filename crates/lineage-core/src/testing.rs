//! Fixtures shared by this crate's unit tests.

use std::cell::RefCell;

use lineage_family::LifecycleConfig;
use lineage_family::lifecycle::{age_character, create_initial_character};
use lineage_types::{
    Catalog, Character, CharacterId, EmploymentStatus, GameState, Language, SimDate, Stats,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::content::default_catalog;

thread_local! {
    /// Seeded per test thread so fixture ids replay across runs.
    static FIXTURE_RNG: RefCell<SmallRng> = RefCell::new(SmallRng::seed_from_u64(2000));
}

fn with_fixture_rng<T>(f: impl FnOnce(&mut SmallRng) -> T) -> T {
    FIXTURE_RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// Today in every fixture state.
pub const TODAY: SimDate = SimDate::start_of_year(2000);

/// The shipped catalog.
pub fn catalog() -> Catalog {
    default_catalog()
}

fn person(age: u32, player: bool) -> Character {
    let birth = SimDate::start_of_year(TODAY.year.saturating_sub(i32::try_from(age).unwrap_or(0)));
    let mut character = with_fixture_rng(|rng| {
        create_initial_character(
            birth,
            Language::En,
            &catalog().avatar,
            &LifecycleConfig::default(),
            rng,
        )
    });
    character.stats = Stats {
        iq: 100,
        happiness: 60,
        eq: 50,
        health: 80,
        skill: 10,
    };
    character.is_player_character = player;
    let _ = age_character(&mut character, TODAY);
    character.employment = match age {
        0..=5 => EmploymentStatus::Dependent,
        6..=22 => EmploymentStatus::Student,
        23..=59 => EmploymentStatus::Unemployed,
        _ => EmploymentStatus::Retired,
    };
    character
}

/// A state on [`TODAY`] holding one player character of `age`, with no
/// school, major, or career.
pub fn state_with_player_aged(age: u32, fund: i64) -> (GameState, CharacterId) {
    let character = person(age, true);
    let id = character.id;
    let mut state = GameState::new(TODAY, fund, Language::En);
    state.characters.insert(id, character);
    (state, id)
}

/// Add an unpartnered non-player of `age`, of the opposite gender to the
/// first player character.
pub fn add_adult(state: &GameState, age: u32) -> (GameState, CharacterId) {
    let mut adult = person(age, false);
    if let Some(player) = state.characters.values().find(|c| c.is_player_character) {
        adult.gender = player.gender.opposite();
    }
    let id = adult.id;
    let mut next = state.clone();
    next.characters.insert(id, adult);
    (next, id)
}
