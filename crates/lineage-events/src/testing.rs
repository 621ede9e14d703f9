//! Fixtures shared by this crate's unit tests.

use std::cell::RefCell;

use lineage_family::LifecycleConfig;
use lineage_family::family::marry;
use lineage_family::lifecycle::{age_character, create_initial_character};
use lineage_types::{
    AvatarManifest, CareerTrack, CareerTrackId, Catalog, Character, CharacterId, ChoiceId, Club,
    ClubId, EffectAction, EventChoice, EventEffect, EventId, GameEvent, GameState, Language,
    LifePhase, MajorId, PhaseOutfits, SimDate, StatChanges, StatKind, Stats, UniversityMajor,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

thread_local! {
    /// Seeded per test thread so fixture ids replay across runs.
    static FIXTURE_RNG: RefCell<SmallRng> = RefCell::new(SmallRng::seed_from_u64(2000));
}

fn with_fixture_rng<T>(f: impl FnOnce(&mut SmallRng) -> T) -> T {
    FIXTURE_RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// Today in every fixture state.
pub const TODAY: SimDate = SimDate::start_of_year(2000);

/// An event with one choice, `ok`, that only writes `log_key`.
pub fn simple_event(id: &str, phase: LifePhase, log_key: &str) -> GameEvent {
    GameEvent {
        id: EventId::new(id),
        title_key: format!("event.{id}"),
        phases: vec![phase],
        relationship_filter: None,
        condition: None,
        choices: vec![EventChoice {
            id: ChoiceId::new("ok"),
            label_key: format!("choice.{id}.ok"),
            effect: EventEffect {
                log_key: log_key.to_owned(),
                ..EventEffect::default()
            },
        }],
        is_trigger_only: false,
        is_milestone: false,
        cooldown_years: None,
    }
}

fn choice(id: &str, effect: EventEffect) -> EventChoice {
    EventChoice {
        id: ChoiceId::new(id),
        label_key: format!("choice.{id}"),
        effect,
    }
}

fn club(id: &str, phases: &[LifePhase]) -> Club {
    Club {
        id: ClubId::new(id),
        name_key: format!("club.{id}"),
        phases: phases.to_vec(),
        stat: StatKind::Eq,
        yearly_bonus: 2,
    }
}

/// A small catalog: three ordinary high-school events, one trigger-only
/// follow-up, a working-age event, clubs, one open career, and avatars.
pub fn test_catalog() -> Catalog {
    let mut school_trip = simple_event("school_trip", LifePhase::HighSchool, "");
    school_trip.choices = vec![
        choice(
            "go",
            EventEffect {
                fund_change: -150,
                log_key: "log.school_trip.go".to_owned(),
                ..EventEffect::default()
            },
        ),
        choice(
            "stay",
            EventEffect {
                stats: StatChanges::one(StatKind::Happiness, -2),
                log_key: "log.school_trip.stay".to_owned(),
                ..EventEffect::default()
            },
        ),
    ];
    let mut study_night = simple_event("study_night", LifePhase::HighSchool, "log.study_night");
    study_night.choices[0].effect.stats = StatChanges::one(StatKind::Iq, 3);
    let mut club_fair = simple_event("club_fair", LifePhase::HighSchool, "log.club_fair");
    club_fair.choices[0].effect.action = Some(EffectAction::JoinClub);
    let mut gossip = simple_event("gossip", LifePhase::HighSchool, "log.gossip");
    gossip.is_trigger_only = true;
    let mut bonus = simple_event("bonus", LifePhase::Working, "log.bonus");
    bonus.choices[0].effect.fund_change = 300;

    Catalog {
        events: vec![school_trip, study_night, club_fair, gossip, bonus],
        career_tracks: vec![CareerTrack {
            id: CareerTrackId::new("office"),
            name_key: "career.office".to_owned(),
            required_major: None,
            levels: vec!["clerk".to_owned(), "manager".to_owned(), "director".to_owned()],
        }],
        majors: vec![UniversityMajor {
            id: MajorId::new("economics"),
            name_key: "major.economics".to_owned(),
            min_iq: 90,
            yearly_tuition: 4_000,
        }],
        clubs: vec![
            club("chess", &[LifePhase::MiddleSchool, LifePhase::HighSchool]),
            club("football", &[LifePhase::HighSchool]),
            club("choir", &[LifePhase::PrimarySchool]),
        ],
        avatar: AvatarManifest {
            skin_tones: vec!["light".to_owned()],
            hair_colors: vec!["black".to_owned()],
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

fn person(age: u32, player: bool) -> Character {
    let birth = SimDate::start_of_year(TODAY.year.saturating_sub(i32::try_from(age).unwrap_or(0)));
    let mut character = with_fixture_rng(|rng| {
        create_initial_character(
            birth,
            Language::En,
            &test_catalog().avatar,
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
    character
}

/// A state on [`TODAY`] holding one player character of `age`.
pub fn state_with_character_aged(age: u32, fund: i64) -> (GameState, CharacterId) {
    let character = person(age, true);
    let id = character.id;
    let mut state = GameState::new(TODAY, fund, Language::En);
    state.characters.insert(id, character);
    (state, id)
}

/// A married couple: a player character of 30 and a non-player partner of 29.
pub fn adult_couple_state() -> (GameState, CharacterId, CharacterId) {
    let (mut state, a) = state_with_character_aged(30, 0);
    let mut partner = person(29, false);
    if let Some(player) = state.characters.get(&a) {
        partner.gender = player.gender.opposite();
    }
    let b = partner.id;
    state.characters.insert(b, partner);
    let _ = marry(&mut state.characters, a, b);
    (state, a, b)
}
