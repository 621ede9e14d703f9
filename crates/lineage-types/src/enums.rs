//! Enumeration types for the Lineage simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Biological sex of a character, used for names, avatars, and pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// The other gender (partners are synthesized with the opposite one).
    pub const fn opposite(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }
}

/// Language used for generated names.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Language {
    /// English names.
    #[default]
    En,
    /// Vietnamese names.
    Vi,
}

// ---------------------------------------------------------------------------
// Life course
// ---------------------------------------------------------------------------

/// Stage of life, a pure function of age.
///
/// Ordered chronologically so `phase >= LifePhase::Working` reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LifePhase {
    /// Ages 0 to 2.
    Newborn,
    /// Ages 3 to 5.
    Childhood,
    /// Ages 6 to 10.
    PrimarySchool,
    /// Ages 11 to 14.
    MiddleSchool,
    /// Ages 15 to 17.
    HighSchool,
    /// Ages 18 to 22.
    University,
    /// Ages 23 to 59.
    Working,
    /// Age 60 and above.
    Retired,
}

impl LifePhase {
    /// Every phase, youngest first.
    pub const ALL: [Self; 8] = [
        Self::Newborn,
        Self::Childhood,
        Self::PrimarySchool,
        Self::MiddleSchool,
        Self::HighSchool,
        Self::University,
        Self::Working,
        Self::Retired,
    ];

    /// Whether the character attends school (primary through high school).
    pub const fn is_school(self) -> bool {
        matches!(
            self,
            Self::PrimarySchool | Self::MiddleSchool | Self::HighSchool
        )
    }
}

/// Romantic status of a character.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RelationshipStatus {
    /// Not in a relationship.
    #[default]
    Single,
    /// Seeing someone; no partner record is kept.
    Dating,
    /// Married; `partner_id` points at the spouse and vice versa.
    Married,
    /// Divorced and not remarried.
    Divorced,
    /// Spouse has died.
    Widowed,
}

impl RelationshipStatus {
    /// Whether a marriage milestone may fire for this status.
    pub const fn can_marry(self) -> bool {
        !matches!(self, Self::Married)
    }
}

/// Kind of school a child attends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SchoolKind {
    /// Free public school.
    Public,
    /// Fee-paying private school.
    Private,
    /// Expensive international school.
    International,
}

/// Occupation status.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EmploymentStatus {
    /// Too young for school or work.
    #[default]
    Dependent,
    /// Enrolled in school or university.
    Student,
    /// Holds a career position or a family business slot.
    Employed,
    /// Working age without a job.
    Unemployed,
    /// Left the workforce.
    Retired,
}

/// How a character died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DeathCause {
    /// Old-age milestone hazard.
    OldAge,
    /// Health depleted or frailty roll.
    Illness,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// One component of a character's [`Stats`](crate::structs::Stats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum StatKind {
    /// Intelligence, 0 to 200.
    Iq,
    /// Happiness, 0 to 100.
    Happiness,
    /// Emotional intelligence, 0 to 100.
    Eq,
    /// Health, 0 to 100.
    Health,
    /// Work skill, 0 to 100.
    Skill,
}

// ---------------------------------------------------------------------------
// Choices and outcomes
// ---------------------------------------------------------------------------

/// Kind of decision that blocks a character until the player answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PendingChoiceKind {
    /// Pick a school on entering primary school.
    School,
    /// Attend university or start working at 18.
    University,
    /// Pick a university major.
    Major,
    /// Pick a career track.
    Career,
    /// Accept or refuse a loan offer.
    Loan,
    /// Accept or refuse a promotion.
    Promotion,
}

/// Pet species available for adoption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PetSpecies {
    /// Dog.
    Dog,
    /// Cat.
    Cat,
    /// Bird.
    Bird,
    /// Fish.
    Fish,
}

/// Why a game ended. Advisory: the runner decides to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GameOverReason {
    /// Family fund fell below the bankruptcy threshold.
    Bankruptcy,
    /// No living family member remains.
    FamilyExtinct,
}
