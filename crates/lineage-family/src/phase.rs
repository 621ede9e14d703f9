//! Age to life-phase mapping.

use lineage_types::LifePhase;

/// First age of each phase, youngest first.
pub const PHASE_THRESHOLDS: [(u32, LifePhase); 8] = [
    (0, LifePhase::Newborn),
    (3, LifePhase::Childhood),
    (6, LifePhase::PrimarySchool),
    (11, LifePhase::MiddleSchool),
    (15, LifePhase::HighSchool),
    (18, LifePhase::University),
    (23, LifePhase::Working),
    (60, LifePhase::Retired),
];

/// The phase for `age`.
pub fn life_phase_for_age(age: u32) -> LifePhase {
    PHASE_THRESHOLDS
        .iter()
        .rev()
        .find(|(start, _)| age >= *start)
        .map_or(LifePhase::Newborn, |&(_, phase)| phase)
}
