//! Pending choices: decisions that block one character until answered.
//!
//! Choices are keyed by character and kind; at most one of each kind is
//! open per character. Only player characters are asked. The reducer
//! answers a choice with a [`PendingResolution`], which must be one of the
//! options [`options_for`] lists.
//!
//! | Kind | Opened when | Options |
//! |------|-------------|---------|
//! | School | entering primary school | public, private, international |
//! | University | entering the university phase | attend, skip |
//! | Major | choosing to attend | majors whose minimum iq is met |
//! | Career | entering the workforce, or skipping university | tracks open to the major held |
//! | Loan | the loan-request action | accept, decline |
//! | Promotion | a birthday with enough tenure and skill | accept, decline |

use lineage_family::EconomyConfig;
use lineage_types::{
    CareerPosition, CareerTrackId, Catalog, Character, CharacterId, EmploymentStatus, GameState,
    Loan, LogEntry, MajorId, PendingChoice, PendingChoiceKind, PendingRequest, SchoolKind,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CoreError;

/// An answer to a pending choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingResolution {
    /// Enrol in a school.
    School {
        /// The school.
        school: SchoolKind,
    },
    /// Attend university or go straight to work.
    University {
        /// Whether to attend.
        attend: bool,
    },
    /// Study a major.
    Major {
        /// The major.
        major: MajorId,
    },
    /// Start a career.
    Career {
        /// The track.
        track: CareerTrackId,
    },
    /// Take the offered loan or not.
    Loan {
        /// Whether to accept.
        accept: bool,
    },
    /// Take the offered promotion or not.
    Promotion {
        /// Whether to accept.
        accept: bool,
    },
}

impl PendingResolution {
    /// The pending kind this answers.
    pub const fn kind(&self) -> PendingChoiceKind {
        match self {
            Self::School { .. } => PendingChoiceKind::School,
            Self::University { .. } => PendingChoiceKind::University,
            Self::Major { .. } => PendingChoiceKind::Major,
            Self::Career { .. } => PendingChoiceKind::Career,
            Self::Loan { .. } => PendingChoiceKind::Loan,
            Self::Promotion { .. } => PendingChoiceKind::Promotion,
        }
    }
}

fn living(state: &GameState, id: CharacterId) -> Result<&Character, CoreError> {
    let character = state.character(id).ok_or(CoreError::CharacterNotFound(id))?;
    if !character.is_alive {
        return Err(CoreError::CharacterDeceased(id));
    }
    Ok(character)
}

/// Majors `character` qualifies for.
pub fn eligible_majors<'c>(catalog: &'c Catalog, character: &Character) -> Vec<&'c MajorId> {
    catalog
        .majors
        .iter()
        .filter(|m| character.stats.iq >= m.min_iq)
        .map(|m| &m.id)
        .collect()
}

/// Open a pending choice for `id`.
///
/// # Errors
///
/// Rejected for dead or missing characters and when a choice of the same
/// kind is already open.
pub fn open_pending(
    state: &GameState,
    id: CharacterId,
    request: PendingRequest,
) -> Result<GameState, CoreError> {
    living(state, id)?;
    let kind = request.kind();
    if state.pending_for(id, kind).is_some() {
        return Err(CoreError::PendingSlotOccupied {
            character_id: id,
            kind,
        });
    }
    let mut next = state.clone();
    next.pending.push(PendingChoice {
        character_id: id,
        request,
        opened: state.date,
    });
    debug!(character_id = %id, ?kind, "pending choice opened");
    Ok(next)
}

/// Every valid answer to `pending`.
pub fn options_for(
    state: &GameState,
    catalog: &Catalog,
    pending: &PendingChoice,
) -> Vec<PendingResolution> {
    let Some(character) = state.character(pending.character_id) else {
        return Vec::new();
    };
    match pending.request {
        PendingRequest::School => [SchoolKind::Public, SchoolKind::Private, SchoolKind::International]
            .into_iter()
            .map(|school| PendingResolution::School { school })
            .collect(),
        PendingRequest::University => [true, false]
            .into_iter()
            .map(|attend| PendingResolution::University { attend })
            .collect(),
        PendingRequest::Major => eligible_majors(catalog, character)
            .into_iter()
            .map(|major| PendingResolution::Major {
                major: major.clone(),
            })
            .collect(),
        PendingRequest::Career => catalog
            .tracks_for_major(character.education.major.as_ref())
            .into_iter()
            .map(|t| PendingResolution::Career {
                track: t.id.clone(),
            })
            .collect(),
        PendingRequest::Loan { .. } => [true, false]
            .into_iter()
            .map(|accept| PendingResolution::Loan { accept })
            .collect(),
        PendingRequest::Promotion { .. } => [true, false]
            .into_iter()
            .map(|accept| PendingResolution::Promotion { accept })
            .collect(),
    }
}

/// Repayment terms of a loan of `amount`: interest is charged once on the
/// principal and the total is split evenly over the term, rounded up.
pub fn loan_terms(amount: i64, config: &EconomyConfig) -> Option<(i64, i64)> {
    let interest = amount
        .checked_mul(config.loan_interest_pct)?
        .checked_div(100)?;
    let remaining = amount.checked_add(interest)?;
    let term = config.loan_term_months.max(1);
    let monthly = remaining
        .checked_add(term.checked_sub(1)?)?
        .checked_div(term)?;
    Some((remaining, monthly))
}

/// Answer the pending choice of `resolution`'s kind for `id`.
///
/// The choice is closed and its consequence applied in one step. Choosing
/// to attend university opens a major choice when some major is within
/// reach; skipping university, or qualifying for no major, opens a career
/// choice instead.
///
/// # Errors
///
/// Rejected when no such choice is open, the character is dead, or the
/// answer is not among the choice's options.
pub fn resolve_pending(
    state: &GameState,
    catalog: &Catalog,
    economy: &EconomyConfig,
    id: CharacterId,
    resolution: &PendingResolution,
) -> Result<GameState, CoreError> {
    let character = living(state, id)?;
    let kind = resolution.kind();
    let pending = state
        .pending_for(id, kind)
        .ok_or(CoreError::NoPendingChoice {
            character_id: id,
            kind,
        })?;
    let invalid = |reason: String| CoreError::InvalidResolution {
        character_id: id,
        reason,
    };

    let mut next = state.clone();
    next.pending
        .retain(|p| !(p.character_id == id && p.request.kind() == kind));
    let mut actor = character.clone();
    let mut follow_up: Option<PendingRequest> = None;
    let date = state.date;

    let entry = match (resolution, &pending.request) {
        (PendingResolution::School { school }, PendingRequest::School) => {
            actor.education.school = Some(*school);
            actor.employment = EmploymentStatus::Student;
            Some(
                LogEntry::new(date, Some(id), "log.school.enrolled")
                    .with_param("school", format!("{school:?}")),
            )
        }
        (PendingResolution::University { attend }, PendingRequest::University) => {
            let reachable = !eligible_majors(catalog, &actor).is_empty();
            actor.education.attends_university = *attend && reachable;
            if actor.education.attends_university {
                actor.employment = EmploymentStatus::Student;
                follow_up = Some(PendingRequest::Major);
                Some(LogEntry::new(date, Some(id), "log.school.university_enrolled"))
            } else {
                actor.employment = EmploymentStatus::Unemployed;
                follow_up = Some(PendingRequest::Career);
                Some(LogEntry::new(date, Some(id), "log.school.university_skipped"))
            }
        }
        (PendingResolution::Major { major }, PendingRequest::Major) => {
            let definition = catalog
                .major(major)
                .ok_or_else(|| invalid(format!("unknown major {major}")))?;
            if actor.stats.iq < definition.min_iq {
                return Err(invalid(format!(
                    "iq {} below {} required by {major}",
                    actor.stats.iq, definition.min_iq
                )));
            }
            actor.education.major = Some(major.clone());
            Some(
                LogEntry::new(date, Some(id), "log.school.major_chosen").with_param("major", major),
            )
        }
        (PendingResolution::Career { track }, PendingRequest::Career) => {
            let definition = catalog
                .career_track(track)
                .ok_or_else(|| invalid(format!("unknown career track {track}")))?;
            if !definition.accepts(actor.education.major.as_ref()) {
                return Err(invalid(format!("track {track} requires another major")));
            }
            actor.employment = EmploymentStatus::Employed;
            actor.career = Some(CareerPosition {
                track_id: track.clone(),
                level: 0,
                years_in_role: 0,
            });
            Some(LogEntry::new(date, Some(id), "log.career.hired").with_param("track", track))
        }
        (PendingResolution::Loan { accept }, PendingRequest::Loan { amount }) => {
            if *accept {
                let (remaining, monthly_payment) = loan_terms(*amount, economy)
                    .ok_or_else(|| invalid(format!("loan of {amount} overflows")))?;
                next.family_fund = next.family_fund.saturating_add(*amount);
                next.loans.push(Loan {
                    character_id: id,
                    principal: *amount,
                    remaining,
                    monthly_payment,
                    taken: date,
                });
                Some(LogEntry::new(date, Some(id), "log.loan.taken").with_param("amount", amount))
            } else {
                Some(LogEntry::new(date, Some(id), "log.loan.declined"))
            }
        }
        (PendingResolution::Promotion { accept }, PendingRequest::Promotion { next_level }) => {
            match actor.career.as_mut() {
                Some(position) if *accept => {
                    position.level = *next_level;
                    position.years_in_role = 0;
                    Some(
                        LogEntry::new(date, Some(id), "log.career.promoted")
                            .with_param("level", next_level),
                    )
                }
                Some(_) => None,
                None => return Err(invalid("promotion without a career".to_owned())),
            }
        }
        _ => {
            return Err(invalid(format!(
                "{resolution:?} does not answer {:?}",
                pending.request
            )));
        }
    };

    next.characters.insert(id, actor);
    if let Some(entry) = entry {
        next.record(entry);
    }
    info!(character_id = %id, ?kind, "pending choice resolved");

    match follow_up {
        Some(request) => open_pending(&next, id, request),
        None => Ok(next),
    }
}
