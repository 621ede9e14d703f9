//! Career assignment, yearly progression, and promotion offers.
//!
//! Non-player characters (partners, in-laws) get their careers assigned
//! automatically. Player characters choose tracks through pending choices
//! and climb by accepting promotion offers.

use lineage_types::{CareerPosition, Catalog, Character, EmploymentStatus, MajorId};
use rand::Rng;
use tracing::{debug, warn};

use crate::config::LifecycleConfig;
use crate::random::{between, pick, roll};

/// Career fields to overwrite on a non-player character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcCareerUpdate {
    /// New employment status.
    pub employment: EmploymentStatus,
    /// Major held.
    pub major: Option<MajorId>,
    /// Career position.
    pub career: Option<CareerPosition>,
    /// Starting skill, when a career was assigned.
    pub skill: Option<i32>,
}

impl NpcCareerUpdate {
    /// Write the update into `character`.
    pub fn apply(self, character: &mut Character) {
        character.employment = self.employment;
        character.education.major = self.major;
        character.career = self.career;
        if let Some(skill) = self.skill {
            character.stats.skill = skill;
        }
    }
}

/// Career level reached after `years` in the workforce: one level per
/// threshold passed, capped at the top level of a track `depth` deep.
pub fn career_level_for_years(years: u32, thresholds: &[u32], depth: u32) -> u32 {
    let passed = thresholds.iter().filter(|&&t| years >= t).count();
    let passed = u32::try_from(passed).unwrap_or(u32::MAX);
    passed.min(depth.saturating_sub(1))
}

/// Decide a non-player character's occupation from their age.
///
/// Under the workforce entry age the character is a dependent or student
/// (18 to 22 may also be unemployed); at retirement age they are retired.
/// Otherwise they may hold a random major, take a random track open to that
/// major, and sit at the level their years in the workforce earn.
///
/// If the catalog offers no matching track, a warning is logged and the
/// character is unemployed.
pub fn assign_npc_career(
    character: &Character,
    catalog: &Catalog,
    config: &LifecycleConfig,
    rng: &mut (impl Rng + ?Sized),
) -> NpcCareerUpdate {
    let age = character.age;
    let keep_major = character.education.major.clone();

    if age < config.workforce_entry_age {
        let employment = if age < 6 {
            EmploymentStatus::Dependent
        } else if age < config.adult_age || roll(rng, config.npc_major_chance) {
            EmploymentStatus::Student
        } else {
            EmploymentStatus::Unemployed
        };
        return NpcCareerUpdate {
            employment,
            major: keep_major,
            career: None,
            skill: None,
        };
    }

    if age >= config.retirement_age {
        return NpcCareerUpdate {
            employment: EmploymentStatus::Retired,
            major: keep_major,
            career: None,
            skill: None,
        };
    }

    let major = if roll(rng, config.npc_major_chance) {
        pick(rng, &catalog.majors).map(|m| m.id.clone())
    } else {
        None
    };

    let tracks = catalog.tracks_for_major(major.as_ref());
    let Some(track) = pick(rng, &tracks) else {
        warn!(
            character_id = %character.id,
            major = ?major,
            "no career track open to character; leaving unemployed"
        );
        return NpcCareerUpdate {
            employment: EmploymentStatus::Unemployed,
            major,
            career: None,
            skill: None,
        };
    };

    let years = age.saturating_sub(config.workforce_entry_age);
    let level = career_level_for_years(years, &config.career_level_thresholds, track.depth());
    let skill = between(rng, 0, config.npc_max_starting_skill.saturating_sub(1));

    debug!(
        character_id = %character.id,
        track = %track.id,
        level,
        skill,
        "assigned npc career"
    );

    NpcCareerUpdate {
        employment: EmploymentStatus::Employed,
        major,
        career: Some(CareerPosition {
            track_id: track.id.clone(),
            level,
            years_in_role: years,
        }),
        skill: Some(skill),
    }
}

/// Yearly career bookkeeping on a birthday.
///
/// Employed characters gain skill and a year in role. Non-player
/// characters also climb levels from years in the workforce.
pub fn tick_career_year(character: &mut Character, catalog: &Catalog, config: &LifecycleConfig) {
    if character.employment != EmploymentStatus::Employed {
        return;
    }
    character.stats.skill = character
        .stats
        .skill
        .saturating_add(config.yearly_work_skill_gain);

    let is_player = character.is_player_character;
    let years_working = character.age.saturating_sub(config.workforce_entry_age);
    let Some(position) = character.career.as_mut() else {
        return;
    };
    position.years_in_role = position.years_in_role.saturating_add(1);

    if !is_player {
        let Some(track) = catalog.career_track(&position.track_id) else {
            warn!(track = %position.track_id, "unknown career track on character");
            return;
        };
        let earned =
            career_level_for_years(years_working, &config.career_level_thresholds, track.depth());
        position.level = position.level.max(earned);
    }
}

/// The level a player character may be promoted to, if they qualify.
pub fn promotion_offer(
    character: &Character,
    catalog: &Catalog,
    config: &LifecycleConfig,
) -> Option<u32> {
    let position = character.career.as_ref()?;
    if !character.is_alive
        || character.employment != EmploymentStatus::Employed
        || position.years_in_role < config.promotion_min_years
        || character.stats.skill < config.promotion_min_skill
    {
        return None;
    }
    let track = catalog.career_track(&position.track_id)?;
    let next = position.level.checked_add(1)?;
    (next < track.depth()).then_some(next)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lineage_types::{CareerTrack, CareerTrackId, UniversityMajor};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::testing::character_aged;

    fn catalog() -> Catalog {
        Catalog {
            career_tracks: vec![
                CareerTrack {
                    id: CareerTrackId::new("retail"),
                    name_key: "career.retail".to_owned(),
                    required_major: None,
                    levels: vec!["clerk".to_owned(), "lead".to_owned(), "manager".to_owned()],
                },
                CareerTrack {
                    id: CareerTrackId::new("medicine"),
                    name_key: "career.medicine".to_owned(),
                    required_major: Some(MajorId::new("med")),
                    levels: vec![
                        "intern".to_owned(),
                        "resident".to_owned(),
                        "doctor".to_owned(),
                        "surgeon".to_owned(),
                        "chief".to_owned(),
                    ],
                },
            ],
            majors: vec![UniversityMajor {
                id: MajorId::new("med"),
                name_key: "major.med".to_owned(),
                min_iq: 120,
                yearly_tuition: 10_000,
            }],
            ..Catalog::default()
        }
    }

    #[test]
    fn levels_follow_thresholds_and_cap_at_depth() {
        let thresholds = [5, 12, 20];
        assert_eq!(career_level_for_years(0, &thresholds, 5), 0);
        assert_eq!(career_level_for_years(4, &thresholds, 5), 0);
        assert_eq!(career_level_for_years(5, &thresholds, 5), 1);
        assert_eq!(career_level_for_years(12, &thresholds, 5), 2);
        assert_eq!(career_level_for_years(20, &thresholds, 5), 3);
        assert_eq!(career_level_for_years(30, &thresholds, 3), 2);
        assert_eq!(career_level_for_years(30, &thresholds, 1), 0);
    }

    #[test]
    fn young_and_old_npcs_get_no_career() {
        let mut rng = SmallRng::seed_from_u64(41);
        let config = LifecycleConfig::default();
        let child = character_aged(4);
        let update = assign_npc_career(&child, &catalog(), &config, &mut rng);
        assert_eq!(update.employment, EmploymentStatus::Dependent);
        assert!(update.career.is_none());

        let teen = character_aged(16);
        let update = assign_npc_career(&teen, &catalog(), &config, &mut rng);
        assert_eq!(update.employment, EmploymentStatus::Student);

        let elder = character_aged(64);
        let update = assign_npc_career(&elder, &catalog(), &config, &mut rng);
        assert_eq!(update.employment, EmploymentStatus::Retired);
        assert!(update.career.is_none());
    }

    #[test]
    fn working_npcs_get_consistent_track_and_skill() {
        let config = LifecycleConfig::default();
        let catalog = catalog();
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let adult = character_aged(40);
            let update = assign_npc_career(&adult, &catalog, &config, &mut rng);
            let position = update.career.clone().unwrap();
            let track = catalog.career_track(&position.track_id).unwrap();
            assert!(track.accepts(update.major.as_ref()));
            assert_eq!(position.level, 2.min(track.depth() - 1));
            let skill = update.skill.unwrap();
            assert!((0..50).contains(&skill));
        }
    }

    #[test]
    fn missing_tracks_fall_back_to_unemployed() {
        let mut rng = SmallRng::seed_from_u64(42);
        let config = LifecycleConfig::default();
        let empty = Catalog::default();
        let update = assign_npc_career(&character_aged(30), &empty, &config, &mut rng);
        assert_eq!(update.employment, EmploymentStatus::Unemployed);
        assert!(update.career.is_none());
    }

    #[test]
    fn promotion_requires_tenure_skill_and_headroom() {
        let config = LifecycleConfig::default();
        let catalog = catalog();
        let mut worker = character_aged(30);
        worker.is_player_character = true;
        worker.employment = EmploymentStatus::Employed;
        worker.stats.skill = 45;
        worker.career = Some(CareerPosition {
            track_id: CareerTrackId::new("retail"),
            level: 0,
            years_in_role: 3,
        });
        assert_eq!(promotion_offer(&worker, &catalog, &config), Some(1));

        worker.stats.skill = 10;
        assert_eq!(promotion_offer(&worker, &catalog, &config), None);

        worker.stats.skill = 45;
        if let Some(position) = worker.career.as_mut() {
            position.level = 2;
        }
        assert_eq!(promotion_offer(&worker, &catalog, &config), None);
    }

    #[test]
    fn npc_climbs_levels_on_birthdays() {
        let config = LifecycleConfig::default();
        let catalog = catalog();
        let mut npc = character_aged(30);
        npc.employment = EmploymentStatus::Employed;
        npc.career = Some(CareerPosition {
            track_id: CareerTrackId::new("retail"),
            level: 0,
            years_in_role: 0,
        });
        tick_career_year(&mut npc, &catalog, &config);
        let position = npc.career.unwrap();
        assert_eq!(position.level, 1);
        assert_eq!(position.years_in_role, 1);
        assert_eq!(npc.stats.skill, config.yearly_work_skill_gain);
    }
}
