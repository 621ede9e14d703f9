//! Ageing one character forward in time.
//!
//! [`advance_character`] recomputes age from the birth date, runs the
//! yearly bookkeeping for every birthday crossed, reacts to a phase
//! transition, opens the pending choices the new situation calls for, and
//! finally rolls the frailty hazard over the elapsed days.
//!
//! Per birthday:
//!
//! - career tenure and skill (and NPC level) advance
//! - clubs grant their stat bonus while the age is a school age
//! - elders lose health
//! - tuition for the school or major is charged to the family fund
//! - the avatar ages
//!
//! On entering a phase:
//!
//! | Phase | Player | Non-player |
//! |-------|--------|------------|
//! | Primary school | school choice | public school |
//! | University | university choice | nothing |
//! | Working | graduation, career choice | graduation, automatic career |
//! | Retired | leaves job and business slot | same |

use lineage_events::milestones::release_business_slots;
use lineage_events::kill_character;
use lineage_family::avatar::age_avatar;
use lineage_family::career::tick_career_year;
use lineage_family::random::roll;
use lineage_family::{age_character, assign_npc_career, life_phase_for_age, promotion_offer};
use lineage_types::{
    Character, CharacterId, DeathCause, EmploymentStatus, GameState, LifePhase, LogEntry,
    PendingRequest, SchoolKind, StatKind,
};
use rand::RngCore;
use tracing::{debug, info};

use crate::context::CoreContext;
use crate::error::CoreError;
use crate::pending::open_pending;

/// Probability that a daily hazard `p` strikes at least once in `days`.
pub fn hazard_over_days(daily: f64, days: u32) -> f64 {
    if daily <= 0.0 || days == 0 {
        return 0.0;
    }
    let exponent = i32::try_from(days).unwrap_or(i32::MAX);
    1.0 - (1.0 - daily.min(1.0)).powi(exponent)
}

/// Tuition owed for the year `character` turns `age`.
fn yearly_tuition(character: &Character, age: u32, ctx: &CoreContext<'_>) -> i64 {
    let phase = life_phase_for_age(age);
    let education = &character.education;
    if phase.is_school() {
        return match education.school {
            Some(SchoolKind::Private) => ctx.economy.private_school_tuition,
            Some(SchoolKind::International) => ctx.economy.international_school_tuition,
            Some(SchoolKind::Public) | None => 0,
        };
    }
    if phase == LifePhase::University && education.attends_university {
        return education
            .major
            .as_ref()
            .and_then(|m| ctx.catalog.major(m))
            .map_or(0, |m| m.yearly_tuition);
    }
    0
}

fn apply_club_bonuses(character: &mut Character, age: u32, ctx: &CoreContext<'_>) {
    if !life_phase_for_age(age).is_school() {
        return;
    }
    let bonuses: Vec<(StatKind, i32)> = character
        .education
        .clubs
        .iter()
        .filter_map(|id| ctx.catalog.club(id))
        .map(|club| (club.stat, club.yearly_bonus))
        .collect();
    for (stat, bonus) in bonuses {
        character.stats.adjust(stat, bonus);
    }
}

/// Bring `id` up to the state's current date.
///
/// `elapsed_days` is the span the frailty hazard covers. A dead character
/// is returned unchanged.
pub fn advance_character(
    state: &GameState,
    ctx: &CoreContext<'_>,
    id: CharacterId,
    elapsed_days: u32,
    rng: &mut dyn RngCore,
) -> Result<GameState, CoreError> {
    let original = state.character(id).ok_or(CoreError::CharacterNotFound(id))?;
    if !original.is_alive {
        return Ok(state.clone());
    }
    let config = ctx.lifecycle;
    let date = state.date;
    let mut character = original.clone();
    let change = age_character(&mut character, date)?;
    let transition = change.phase_transition();
    let had_birthday = change.new_age > change.previous_age;

    let mut next = state.clone();
    let mut tuition: i64 = 0;
    let mut log = Vec::new();
    let mut requests = Vec::new();
    let mut leaves_business = false;

    // ---- Birthdays -------------------------------------------------------
    for age in change.birthdays() {
        tick_career_year(&mut character, ctx.catalog, config);
        apply_club_bonuses(&mut character, age, ctx);
        if age >= config.elder_decline_age {
            character
                .stats
                .adjust(StatKind::Health, config.elder_health_decline.saturating_neg());
        }
        tuition = tuition.saturating_add(yearly_tuition(&character, age, ctx));
        let reached = transition.filter(|_| age == change.new_age);
        age_avatar(
            &mut character.avatar,
            &ctx.catalog.avatar,
            character.gender,
            age,
            reached,
            config,
            rng,
        );
    }

    // ---- Phase transition ------------------------------------------------
    if let Some(phase) = transition {
        log.push(
            LogEntry::new(date, Some(id), "log.life.phase").with_param("phase", format!("{phase:?}")),
        );
        match phase {
            LifePhase::PrimarySchool => {
                character.employment = EmploymentStatus::Student;
                if character.is_player_character {
                    requests.push(PendingRequest::School);
                } else {
                    character.education.school = Some(SchoolKind::Public);
                }
            }
            LifePhase::University if character.is_player_character => {
                requests.push(PendingRequest::University);
            }
            LifePhase::Working => {
                if character.education.attends_university {
                    character.education.graduated = true;
                    log.push(LogEntry::new(date, Some(id), "log.school.graduated"));
                }
                if character.is_player_character {
                    if character.career.is_none() {
                        character.employment = EmploymentStatus::Unemployed;
                    }
                } else {
                    assign_npc_career(&character, ctx.catalog, config, rng).apply(&mut character);
                }
            }
            LifePhase::Retired => {
                if matches!(
                    character.employment,
                    EmploymentStatus::Employed | EmploymentStatus::Unemployed
                ) {
                    character.employment = EmploymentStatus::Retired;
                    character.career = None;
                    leaves_business = character.business_id.take().is_some();
                    log.push(LogEntry::new(date, Some(id), "log.career.retired"));
                }
            }
            LifePhase::Newborn
            | LifePhase::Childhood
            | LifePhase::MiddleSchool
            | LifePhase::HighSchool
            | LifePhase::University => {}
        }
    }

    // ---- Work choices ----------------------------------------------------
    if character.is_player_character && (had_birthday || transition.is_some()) {
        if character.phase == LifePhase::Working
            && character.employment == EmploymentStatus::Unemployed
            && character.career.is_none()
        {
            requests.push(PendingRequest::Career);
        }
        if let Some(next_level) = promotion_offer(&character, ctx.catalog, config) {
            requests.push(PendingRequest::Promotion { next_level });
        }
    }

    if had_birthday {
        debug!(
            character_id = %id,
            age = character.age,
            phase = ?character.phase,
            tuition,
            "birthday"
        );
    }
    next.characters.insert(id, character);
    if leaves_business {
        for business in release_business_slots(&next, id) {
            next.businesses.insert(business.id, business);
        }
    }
    if tuition > 0 {
        next.family_fund = next.family_fund.saturating_sub(tuition);
        log.push(LogEntry::new(date, Some(id), "log.school.tuition").with_param("amount", tuition));
    }
    for entry in log {
        next.record(entry);
    }
    for request in requests {
        if next.pending_for(id, request.kind()).is_none() {
            next = open_pending(&next, id, request)?;
        }
    }

    // ---- Frailty ---------------------------------------------------------
    let health = next.character(id).map_or(0, |c| c.stats.health);
    let dies = if health <= 0 {
        true
    } else if health < config.frailty_health_threshold {
        roll(rng, hazard_over_days(config.frailty_daily_hazard, elapsed_days))
    } else {
        false
    };
    if dies {
        info!(character_id = %id, health, "died of illness");
        next = kill_character(&next, config, id, DeathCause::Illness).merge_into(&next)?;
    }
    Ok(next)
}
