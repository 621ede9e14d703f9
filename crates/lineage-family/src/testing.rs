//! Fixtures shared by this crate's unit tests.

use std::cell::RefCell;

use lineage_types::{
    AvatarManifest, AvatarState, CareerTrack, CareerTrackId, Catalog, Character, CharacterId,
    CharacterStatus, Education, EmploymentStatus, Gender, LifePhase, PhaseOutfits,
    RelationshipStatus, SimDate, Stats,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::lifecycle::age_character;
use crate::phase::life_phase_for_age;

thread_local! {
    /// Seeded per test thread so fixture ids replay across runs.
    static FIXTURE_RNG: RefCell<SmallRng> = RefCell::new(SmallRng::seed_from_u64(2000));
}

fn with_fixture_rng<T>(f: impl FnOnce(&mut SmallRng) -> T) -> T {
    FIXTURE_RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// A living, unpartnered generation-1 character of `age` on 1 January 2000.
pub fn character_aged(age: u32) -> Character {
    let birth_year = 2000_i32.saturating_sub(i32::try_from(age).unwrap_or(0));
    let mut character = Character {
        id: with_fixture_rng(CharacterId::generate),
        first_name: "Test".to_owned(),
        last_name: "Person".to_owned(),
        gender: Gender::Female,
        generation: 1,
        birth_date: SimDate::start_of_year(birth_year),
        age: 0,
        is_alive: true,
        death_date: None,
        death_cause: None,
        stats: Stats {
            iq: 100,
            happiness: 50,
            eq: 50,
            health: 80,
            skill: 0,
        },
        phase: life_phase_for_age(0),
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
    };
    let _ = age_character(&mut character, SimDate::start_of_year(2000));
    character
}

/// A small catalog with one open career track and a full avatar manifest.
pub fn test_catalog() -> Catalog {
    Catalog {
        career_tracks: vec![CareerTrack {
            id: CareerTrackId::new("office"),
            name_key: "career.office".to_owned(),
            required_major: None,
            levels: vec!["assistant".to_owned(), "officer".to_owned(), "head".to_owned()],
        }],
        avatar: AvatarManifest {
            skin_tones: vec!["light".to_owned(), "tan".to_owned()],
            hair_colors: vec!["black".to_owned(), "brown".to_owned()],
            grey_hair_color: "grey".to_owned(),
            eye_colors: vec!["brown".to_owned()],
            male_hair_styles: vec!["short".to_owned()],
            female_hair_styles: vec!["long".to_owned()],
            bald_style: "bald".to_owned(),
            outfits: vec![PhaseOutfits {
                phase: LifePhase::Newborn,
                outfits: vec!["onesie".to_owned()],
            }],
        },
        ..Catalog::default()
    }
}
