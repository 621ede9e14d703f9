//! Content catalog types: events, careers, assets, businesses, majors, clubs,
//! and the avatar manifest.
//!
//! The catalog is static data. Behaviour that older designs stored as
//! closures (event conditions, effect actions, dynamic outcomes) is expressed
//! as tagged enums here and interpreted by the `lineage-events` crate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EmploymentStatus, Gender, LifePhase, PetSpecies, RelationshipStatus, StatKind};
use crate::error::CatalogError;
use crate::ids::{AssetId, BusinessKindId, CareerTrackId, ChoiceId, ClubId, EventId, MajorId};
use crate::structs::StatChanges;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A predicate over the acting character and the game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventCondition {
    /// Age in `[min, max]`.
    AgeBetween {
        /// Inclusive lower bound.
        min: u32,
        /// Inclusive upper bound.
        max: u32,
    },
    /// Family fund at least `amount`.
    FundAtLeast {
        /// Threshold.
        amount: i64,
    },
    /// Family fund strictly below `amount`.
    FundBelow {
        /// Threshold.
        amount: i64,
    },
    /// Stat at least `value`.
    StatAtLeast {
        /// Stat to test.
        stat: StatKind,
        /// Threshold.
        value: i32,
    },
    /// Stat strictly below `value`.
    StatBelow {
        /// Stat to test.
        stat: StatKind,
        /// Threshold.
        value: i32,
    },
    /// Has a spouse who is alive.
    HasLivingPartner,
    /// Fewer than `count` children.
    ChildrenBelow {
        /// Ceiling.
        count: u32,
    },
    /// Employment status equals `status`.
    Employment {
        /// Required status.
        status: EmploymentStatus,
    },
    /// Holds a career position.
    HasCareer,
    /// Owns a living pet.
    OwnsPet,
    /// The family owns at least one business.
    FamilyOwnsBusiness,
    /// Currently mourning.
    Mourning,
    /// Gender equals `gender`.
    Gender {
        /// Required gender.
        gender: Gender,
    },
    /// A player-steered character.
    PlayerCharacter,
    /// Random roll: true with `probability`.
    Chance {
        /// Probability in `[0, 1]`.
        probability: f64,
    },
    /// Old-age hazard: true with probability `(age - start_age) * rate_per_year`.
    OldAgeHazard {
        /// Age at which the hazard starts.
        start_age: u32,
        /// Hazard growth per year past `start_age`.
        rate_per_year: f64,
    },
    /// All sub-conditions hold.
    All {
        /// Sub-conditions.
        conditions: Vec<EventCondition>,
    },
    /// Any sub-condition holds.
    Any {
        /// Sub-conditions.
        conditions: Vec<EventCondition>,
    },
    /// The sub-condition does not hold.
    Not {
        /// Negated condition.
        condition: Box<EventCondition>,
    },
}

/// A structural change an effect requests. Interpreted by the action
/// registry, which turns it into a state patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EffectAction {
    /// Synthesize a partner and marry.
    Marry,
    /// Birth a child with the living partner.
    HaveChild,
    /// Die of old age.
    DieOfOldAge,
    /// Start dating (status only).
    StartDating,
    /// Stop dating.
    BreakUp,
    /// Divorce the partner.
    Divorce,
    /// Lose the current job.
    LoseJob,
    /// Retire early.
    Retire,
    /// Adopt a pet.
    AdoptPet {
        /// Species adopted.
        species: PetSpecies,
    },
    /// The character's oldest living pet dies.
    PetPassesAway,
    /// Open a loan offer.
    RequestLoan {
        /// Offered principal.
        amount: i64,
    },
    /// Join a random club for the current phase.
    JoinClub,
}

/// Discriminant of [`EffectAction`], used as the action registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ActionKind {
    /// [`EffectAction::Marry`].
    Marry,
    /// [`EffectAction::HaveChild`].
    HaveChild,
    /// [`EffectAction::DieOfOldAge`].
    DieOfOldAge,
    /// [`EffectAction::StartDating`].
    StartDating,
    /// [`EffectAction::BreakUp`].
    BreakUp,
    /// [`EffectAction::Divorce`].
    Divorce,
    /// [`EffectAction::LoseJob`].
    LoseJob,
    /// [`EffectAction::Retire`].
    Retire,
    /// [`EffectAction::AdoptPet`].
    AdoptPet,
    /// [`EffectAction::PetPassesAway`].
    PetPassesAway,
    /// [`EffectAction::RequestLoan`].
    RequestLoan,
    /// [`EffectAction::JoinClub`].
    JoinClub,
}

impl EffectAction {
    /// The registry key.
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Marry => ActionKind::Marry,
            Self::HaveChild => ActionKind::HaveChild,
            Self::DieOfOldAge => ActionKind::DieOfOldAge,
            Self::StartDating => ActionKind::StartDating,
            Self::BreakUp => ActionKind::BreakUp,
            Self::Divorce => ActionKind::Divorce,
            Self::LoseJob => ActionKind::LoseJob,
            Self::Retire => ActionKind::Retire,
            Self::AdoptPet { .. } => ActionKind::AdoptPet,
            Self::PetPassesAway => ActionKind::PetPassesAway,
            Self::RequestLoan { .. } => ActionKind::RequestLoan,
            Self::JoinClub => ActionKind::JoinClub,
        }
    }
}

/// An outcome decided at resolution time. Replaces the static effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DynamicEffect {
    /// Succeed with a fixed probability.
    Gamble {
        /// Probability of `success`.
        success_chance: f64,
        /// Effect on success.
        success: Box<EventEffect>,
        /// Effect on failure.
        failure: Box<EventEffect>,
    },
    /// Succeed with probability `stat / (stat + difficulty)`.
    StatCheck {
        /// Stat tested.
        stat: StatKind,
        /// Difficulty; higher is harder.
        difficulty: i32,
        /// Effect on success.
        success: Box<EventEffect>,
        /// Effect on failure.
        failure: Box<EventEffect>,
    },
}

/// A follow-up event rolled after a choice resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TriggeredEvent {
    /// The follow-up event.
    pub event_id: EventId,
    /// Probability in `[0, 1]` that it is queued.
    pub chance: f64,
}

/// What choosing an option does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct EventEffect {
    /// Stat deltas, applied without clamping.
    pub stats: StatChanges,
    /// Fund delta.
    pub fund_change: i64,
    /// Localization key for the log entry. Must not be empty.
    pub log_key: String,
    /// Follow-up events.
    pub triggers: Vec<TriggeredEvent>,
    /// Structural change.
    pub action: Option<EffectAction>,
    /// Outcome decided at resolution time.
    pub dynamic: Option<DynamicEffect>,
}

/// One option of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventChoice {
    /// Key, unique within the event.
    pub id: ChoiceId,
    /// Localization key for the button label.
    pub label_key: String,
    /// Consequence.
    pub effect: EventEffect,
}

/// A life event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameEvent {
    /// Catalog key.
    pub id: EventId,
    /// Localization key for the title.
    pub title_key: String,
    /// Phases in which the event can be drawn.
    pub phases: Vec<LifePhase>,
    /// Allowed relationship statuses; `None` allows all.
    #[serde(default)]
    pub relationship_filter: Option<Vec<RelationshipStatus>>,
    /// Extra eligibility predicate.
    #[serde(default)]
    pub condition: Option<EventCondition>,
    /// Options presented to the player.
    pub choices: Vec<EventChoice>,
    /// Reachable only through triggers.
    #[serde(default)]
    pub is_trigger_only: bool,
    /// Structural milestone (marriage, birth, death).
    #[serde(default)]
    pub is_milestone: bool,
    /// Years before the event can recur for the same character.
    #[serde(default)]
    pub cooldown_years: Option<u32>,
}

impl GameEvent {
    /// Look up a choice.
    pub fn choice(&self, id: &ChoiceId) -> Option<&EventChoice> {
        self.choices.iter().find(|c| &c.id == id)
    }
}

// ---------------------------------------------------------------------------
// Careers, education, assets, businesses
// ---------------------------------------------------------------------------

/// A career ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CareerTrack {
    /// Catalog key.
    pub id: CareerTrackId,
    /// Localization key.
    pub name_key: String,
    /// Major required to enter; `None` means open to all.
    #[serde(default)]
    pub required_major: Option<MajorId>,
    /// Title keys, lowest level first.
    pub levels: Vec<String>,
}

impl CareerTrack {
    /// Number of levels.
    pub fn depth(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }

    /// Whether a holder of `major` may enter.
    pub fn accepts(&self, major: Option<&MajorId>) -> bool {
        self.required_major
            .as_ref()
            .is_none_or(|required| Some(required) == major)
    }
}

/// A university major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UniversityMajor {
    /// Catalog key.
    pub id: MajorId,
    /// Localization key.
    pub name_key: String,
    /// Minimum iq to enrol.
    pub min_iq: i32,
    /// Tuition charged on each birthday while enrolled.
    pub yearly_tuition: i64,
}

/// A school club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Club {
    /// Catalog key.
    pub id: ClubId,
    /// Localization key.
    pub name_key: String,
    /// Phases in which the club can be joined.
    pub phases: Vec<LifePhase>,
    /// Stat trained.
    pub stat: StatKind,
    /// Bonus granted on each birthday while in school.
    pub yearly_bonus: i32,
}

/// A purchasable asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AssetDefinition {
    /// Catalog key.
    pub id: AssetId,
    /// Localization key.
    pub name_key: String,
    /// Price.
    pub price: i64,
    /// One-off happiness bonus for every living family member.
    #[serde(default)]
    pub happiness_bonus: i32,
    /// Monthly income (rent, dividends).
    #[serde(default)]
    pub monthly_income: i64,
}

/// A slot in a business definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SlotTemplate {
    /// Role token.
    pub role: String,
    /// Major a human worker must hold.
    #[serde(default)]
    pub required_major: Option<MajorId>,
}

/// A kind of business the family can buy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BusinessDefinition {
    /// Catalog key.
    pub id: BusinessKindId,
    /// Localization key.
    pub name_key: String,
    /// Purchase price.
    pub purchase_cost: i64,
    /// Monthly revenue at full staffing, level 1, zero skill.
    #[ts(as = "String")]
    pub base_monthly_revenue: Decimal,
    /// Fraction of gross spent on goods sold.
    #[ts(as = "String")]
    pub cogs_rate: Decimal,
    /// Rent and utilities, paid even when idle.
    pub fixed_monthly_cost: i64,
    /// Positions.
    pub slots: Vec<SlotTemplate>,
    /// Upgrade cost per current level.
    pub upgrade_cost: i64,
    /// Highest level.
    pub max_level: u32,
    /// Revenue growth per level above 1, as a fraction of base.
    #[ts(as = "String")]
    pub revenue_step_per_level: Decimal,
}

// ---------------------------------------------------------------------------
// Avatar manifest
// ---------------------------------------------------------------------------

/// Outfit tokens for one life phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PhaseOutfits {
    /// The phase.
    pub phase: LifePhase,
    /// Candidate outfits.
    pub outfits: Vec<String>,
}

/// Cosmetic token pools for avatar generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AvatarManifest {
    /// Skin tones.
    pub skin_tones: Vec<String>,
    /// Natural hair colors.
    pub hair_colors: Vec<String>,
    /// Hair color once grey.
    pub grey_hair_color: String,
    /// Eye colors.
    pub eye_colors: Vec<String>,
    /// Male hair styles.
    pub male_hair_styles: Vec<String>,
    /// Female hair styles.
    pub female_hair_styles: Vec<String>,
    /// Style token for a bald head.
    pub bald_style: String,
    /// Outfits per phase.
    pub outfits: Vec<PhaseOutfits>,
}

impl AvatarManifest {
    /// Outfit pool for `phase` (empty if none configured).
    pub fn outfits_for(&self, phase: LifePhase) -> &[String] {
        self.outfits
            .iter()
            .find(|o| o.phase == phase)
            .map_or(&[], |o| o.outfits.as_slice())
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// All static content, loaded once at start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Catalog {
    /// Life events.
    pub events: Vec<GameEvent>,
    /// Career tracks.
    pub career_tracks: Vec<CareerTrack>,
    /// University majors.
    pub majors: Vec<UniversityMajor>,
    /// School clubs.
    pub clubs: Vec<Club>,
    /// Purchasable assets.
    pub assets: Vec<AssetDefinition>,
    /// Purchasable businesses.
    pub businesses: Vec<BusinessDefinition>,
    /// Avatar token pools.
    pub avatar: AvatarManifest,
}

impl Catalog {
    /// Look up an event.
    pub fn event(&self, id: &EventId) -> Option<&GameEvent> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// Look up a career track.
    pub fn career_track(&self, id: &CareerTrackId) -> Option<&CareerTrack> {
        self.career_tracks.iter().find(|t| &t.id == id)
    }

    /// Look up a major.
    pub fn major(&self, id: &MajorId) -> Option<&UniversityMajor> {
        self.majors.iter().find(|m| &m.id == id)
    }

    /// Look up a club.
    pub fn club(&self, id: &ClubId) -> Option<&Club> {
        self.clubs.iter().find(|c| &c.id == id)
    }

    /// Look up an asset.
    pub fn asset(&self, id: &AssetId) -> Option<&AssetDefinition> {
        self.assets.iter().find(|a| &a.id == id)
    }

    /// Look up a business definition.
    pub fn business(&self, id: &BusinessKindId) -> Option<&BusinessDefinition> {
        self.businesses.iter().find(|b| &b.id == id)
    }

    /// Tracks a holder of `major` may enter.
    pub fn tracks_for_major(&self, major: Option<&MajorId>) -> Vec<&CareerTrack> {
        self.career_tracks
            .iter()
            .filter(|t| t.accepts(major))
            .collect()
    }

    /// Check structural integrity.
    ///
    /// Runtime lookups tolerate a broken catalog (unknown ids are logged and
    /// skipped); this check lets loaders refuse one up front.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_unique("event", self.events.iter().map(|e| e.id.as_str()))?;
        check_unique("career track", self.career_tracks.iter().map(|t| t.id.as_str()))?;
        check_unique("major", self.majors.iter().map(|m| m.id.as_str()))?;
        check_unique("club", self.clubs.iter().map(|c| c.id.as_str()))?;
        check_unique("asset", self.assets.iter().map(|a| a.id.as_str()))?;
        check_unique("business", self.businesses.iter().map(|b| b.id.as_str()))?;

        for event in &self.events {
            self.validate_event(event)?;
        }

        if !self.career_tracks.iter().any(|t| t.required_major.is_none()) {
            return Err(CatalogError::NoOpenCareerTrack);
        }
        for track in &self.career_tracks {
            if track.levels.is_empty() {
                return Err(CatalogError::EmptyCareerTrack {
                    track_id: track.id.clone(),
                });
            }
            if let Some(major) = &track.required_major {
                if self.major(major).is_none() {
                    return Err(CatalogError::UnknownMajor {
                        major_id: major.clone(),
                    });
                }
            }
        }
        for business in &self.businesses {
            if business.slots.is_empty() {
                return Err(CatalogError::BusinessWithoutSlots {
                    business_id: business.id.clone(),
                });
            }
        }

        let manifest = &self.avatar;
        for (pool, values) in [
            ("skin_tones", &manifest.skin_tones),
            ("hair_colors", &manifest.hair_colors),
            ("eye_colors", &manifest.eye_colors),
            ("male_hair_styles", &manifest.male_hair_styles),
            ("female_hair_styles", &manifest.female_hair_styles),
        ] {
            if values.is_empty() {
                return Err(CatalogError::EmptyAvatarPool { pool });
            }
        }
        Ok(())
    }

    fn validate_event(&self, event: &GameEvent) -> Result<(), CatalogError> {
        if event.choices.is_empty() {
            return Err(CatalogError::EventWithoutChoices {
                event_id: event.id.clone(),
            });
        }
        check_unique(
            "choice",
            event.choices.iter().map(|c| c.id.as_str()),
        )?;
        for choice in &event.choices {
            self.validate_effect(event, &choice.id, &choice.effect)?;
        }
        Ok(())
    }

    fn validate_effect(
        &self,
        event: &GameEvent,
        choice_id: &ChoiceId,
        effect: &EventEffect,
    ) -> Result<(), CatalogError> {
        if let Some(dynamic) = &effect.dynamic {
            let (success, failure) = match dynamic {
                DynamicEffect::Gamble {
                    success_chance,
                    success,
                    failure,
                } => {
                    check_chance(&event.id, *success_chance)?;
                    (success, failure)
                }
                DynamicEffect::StatCheck {
                    success, failure, ..
                } => (success, failure),
            };
            self.validate_effect(event, choice_id, success)?;
            return self.validate_effect(event, choice_id, failure);
        }

        if effect.log_key.is_empty() {
            return Err(CatalogError::MissingLogKey {
                event_id: event.id.clone(),
                choice_id: choice_id.clone(),
            });
        }
        for trigger in &effect.triggers {
            check_chance(&event.id, trigger.chance)?;
            if self.event(&trigger.event_id).is_none() {
                return Err(CatalogError::UnknownTriggerTarget {
                    event_id: event.id.clone(),
                    target: trigger.event_id.clone(),
                });
            }
        }
        Ok(())
    }
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}

fn check_chance(event_id: &EventId, chance: f64) -> Result<(), CatalogError> {
    if (0.0..=1.0).contains(&chance) {
        Ok(())
    } else {
        Err(CatalogError::InvalidChance {
            event_id: event_id.clone(),
            chance,
        })
    }
}
