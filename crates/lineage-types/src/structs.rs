//! Core entity structs for the Lineage simulation.
//!
//! [`GameState`] is the aggregate root. Everything the presentation layer
//! renders is reachable from it, and every reference between entities is an
//! id, so a snapshot serializes as plain data.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    DeathCause, EmploymentStatus, GameOverReason, Gender, Language, LifePhase, PendingChoiceKind,
    PetSpecies, RelationshipStatus, SchoolKind, StatKind,
};
use crate::ids::{
    AssetId, BusinessId, BusinessKindId, CareerTrackId, CharacterId, ClubId, EventId, MajorId,
    PetId,
};

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Days in a simulated year.
pub const DAYS_PER_YEAR: u16 = 360;

/// Days in a simulated month (twelve months per year).
pub const DAYS_PER_MONTH: u16 = 30;

/// A date on the simulation calendar: day 1 to 360 of a year.
///
/// Field order matters: the derived [`Ord`] compares year first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SimDate {
    /// Calendar year.
    pub year: i32,
    /// Day within the year, 1-based.
    pub day: u16,
}

impl SimDate {
    /// Construct a date.
    pub const fn new(year: i32, day: u16) -> Self {
        Self { year, day }
    }

    /// Day 1 of `year`.
    pub const fn start_of_year(year: i32) -> Self {
        Self { year, day: 1 }
    }

    /// Days since the calendar epoch (year 0, day 1).
    pub fn ordinal(self) -> i64 {
        i64::from(self.year)
            .saturating_mul(i64::from(DAYS_PER_YEAR))
            .saturating_add(i64::from(self.day.saturating_sub(1)))
    }

    /// Inverse of [`ordinal`](Self::ordinal).
    pub fn from_ordinal(ordinal: i64) -> Self {
        let per_year = i64::from(DAYS_PER_YEAR);
        let year = ordinal.div_euclid(per_year);
        let day = ordinal.rem_euclid(per_year).saturating_add(1);
        Self {
            year: i32::try_from(year).unwrap_or(if year < 0 { i32::MIN } else { i32::MAX }),
            day: u16::try_from(day).unwrap_or(1),
        }
    }

    /// The date `days` later.
    pub fn add_days(self, days: u32) -> Self {
        Self::from_ordinal(self.ordinal().saturating_add(i64::from(days)))
    }

    /// Month of the year, 1 to 12.
    pub fn month(self) -> u16 {
        (self.day.saturating_sub(1) / DAYS_PER_MONTH).saturating_add(1)
    }

    /// Months since the calendar epoch. Used to detect month boundaries.
    pub fn month_ordinal(self) -> i64 {
        self.ordinal().div_euclid(i64::from(DAYS_PER_MONTH))
    }

    /// Whole years elapsed from `earlier` to `self` (0 if `earlier` is later).
    pub fn years_since(self, earlier: Self) -> u32 {
        let days = self.ordinal().saturating_sub(earlier.ordinal());
        if days <= 0 {
            return 0;
        }
        u32::try_from(days.div_euclid(i64::from(DAYS_PER_YEAR))).unwrap_or(u32::MAX)
    }
}

impl core::fmt::Display for SimDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "year {} day {}", self.year, self.day)
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Upper bound for iq.
pub const IQ_CEILING: i32 = 200;

/// Upper bound for every stat other than iq.
pub const STAT_CEILING: i32 = 100;

/// A character's stat vector.
///
/// Stats are signed: plain event effects add deltas without clamping, so a
/// long run of bad luck can drive a stat below zero or above its ceiling.
/// Births and partner synthesis always clamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Stats {
    /// Intelligence.
    pub iq: i32,
    /// Happiness.
    pub happiness: i32,
    /// Emotional intelligence.
    pub eq: i32,
    /// Health. At or below zero the character dies on the next advance.
    pub health: i32,
    /// Work skill, drives salary and business output.
    pub skill: i32,
}

impl Stats {
    /// Ceiling for one stat.
    pub const fn ceiling(kind: StatKind) -> i32 {
        match kind {
            StatKind::Iq => IQ_CEILING,
            StatKind::Happiness | StatKind::Eq | StatKind::Health | StatKind::Skill => {
                STAT_CEILING
            }
        }
    }

    /// Read one stat.
    pub const fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Iq => self.iq,
            StatKind::Happiness => self.happiness,
            StatKind::Eq => self.eq,
            StatKind::Health => self.health,
            StatKind::Skill => self.skill,
        }
    }

    const fn slot_mut(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Iq => &mut self.iq,
            StatKind::Happiness => &mut self.happiness,
            StatKind::Eq => &mut self.eq,
            StatKind::Health => &mut self.health,
            StatKind::Skill => &mut self.skill,
        }
    }

    /// Overwrite one stat.
    pub const fn set(&mut self, kind: StatKind, value: i32) {
        *self.slot_mut(kind) = value;
    }

    /// Add `delta` to one stat without clamping.
    pub fn adjust(&mut self, kind: StatKind, delta: i32) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(delta);
    }

    /// Add every delta in `changes` without clamping.
    pub fn apply(&mut self, changes: &StatChanges) {
        for (kind, delta) in changes.entries() {
            self.adjust(kind, delta);
        }
    }

    /// Copy with every stat clamped into `[0, ceiling]`.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        for kind in StatChanges::KINDS {
            let value = self.get(kind).clamp(0, Self::ceiling(kind));
            self.set(kind, value);
        }
        self
    }

    /// Whether every stat lies inside `[0, ceiling]`.
    pub fn within_bounds(&self) -> bool {
        StatChanges::KINDS
            .iter()
            .all(|&kind| (0..=Self::ceiling(kind)).contains(&self.get(kind)))
    }
}

/// Stat deltas carried by an event effect. Absent fields mean zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct StatChanges {
    /// Iq delta.
    pub iq: i32,
    /// Happiness delta.
    pub happiness: i32,
    /// Eq delta.
    pub eq: i32,
    /// Health delta.
    pub health: i32,
    /// Skill delta.
    pub skill: i32,
}

impl StatChanges {
    /// Stat kinds in storage order.
    pub const KINDS: [StatKind; 5] = [
        StatKind::Iq,
        StatKind::Happiness,
        StatKind::Eq,
        StatKind::Health,
        StatKind::Skill,
    ];

    /// A single-stat delta.
    pub fn one(kind: StatKind, delta: i32) -> Self {
        let mut changes = Self::default();
        match kind {
            StatKind::Iq => changes.iq = delta,
            StatKind::Happiness => changes.happiness = delta,
            StatKind::Eq => changes.eq = delta,
            StatKind::Health => changes.health = delta,
            StatKind::Skill => changes.skill = delta,
        }
        changes
    }

    /// `(kind, delta)` pairs in storage order.
    pub const fn entries(&self) -> [(StatKind, i32); 5] {
        [
            (StatKind::Iq, self.iq),
            (StatKind::Happiness, self.happiness),
            (StatKind::Eq, self.eq),
            (StatKind::Health, self.health),
            (StatKind::Skill, self.skill),
        ]
    }

    /// Whether every delta is zero.
    pub const fn is_empty(&self) -> bool {
        self.iq == 0 && self.happiness == 0 && self.eq == 0 && self.health == 0 && self.skill == 0
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// Cosmetic appearance. Never read by simulation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AvatarState {
    /// Skin tone token from the avatar manifest.
    pub skin_tone: String,
    /// Hair style token.
    pub hair_style: String,
    /// Hair color token.
    pub hair_color: String,
    /// Eye color token.
    pub eye_color: String,
    /// Outfit token for the current life phase.
    pub outfit: String,
    /// Whether the character wears glasses.
    pub glasses: bool,
}

/// Schooling record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Education {
    /// School chosen at six, if any.
    pub school: Option<SchoolKind>,
    /// Whether the character enrolled at university.
    pub attends_university: bool,
    /// University major.
    pub major: Option<MajorId>,
    /// Set when leaving the University phase while enrolled.
    pub graduated: bool,
    /// Clubs joined during school.
    pub clubs: Vec<ClubId>,
}

/// A position on a career track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CareerPosition {
    /// The track.
    pub track_id: CareerTrackId,
    /// Zero-based level on the track.
    pub level: u32,
    /// Whole years at the current level.
    pub years_in_role: u32,
}

/// A child's two parents. Set once at birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ParentPair {
    /// The parent whose surname the child inherits.
    pub first: CharacterId,
    /// The other parent.
    pub second: CharacterId,
}

impl ParentPair {
    /// Whether `id` is one of the parents.
    pub fn contains(&self, id: CharacterId) -> bool {
        self.first == id || self.second == id
    }
}

/// Transient flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CharacterStatus {
    /// Mourning lasts until the start of this year.
    pub mourning_until_year: Option<i32>,
    /// Per-event cooldowns: the event is not eligible before this year.
    pub cooldowns: BTreeMap<EventId, i32>,
}

impl CharacterStatus {
    /// Whether the character is mourning in `year`.
    pub fn is_mourning(&self, year: i32) -> bool {
        self.mourning_until_year.is_some_and(|until| year < until)
    }

    /// Whether `event_id` is cooling down in `year`.
    pub fn on_cooldown(&self, event_id: &EventId, year: i32) -> bool {
        self.cooldowns.get(event_id).is_some_and(|&until| year < until)
    }
}

/// A family member, partner, or descendant.
///
/// Characters are never removed from [`GameState::characters`]; death sets
/// `is_alive = false` and freezes stats and phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Character {
    /// Unique id.
    pub id: CharacterId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Gender.
    pub gender: Gender,
    /// Generation number; founders are generation 1.
    pub generation: u32,
    /// Date of birth.
    pub birth_date: SimDate,
    /// Age in whole years.
    pub age: u32,
    /// Whether the character is alive.
    pub is_alive: bool,
    /// Date of death.
    pub death_date: Option<SimDate>,
    /// Cause of death.
    pub death_cause: Option<DeathCause>,
    /// Stat vector.
    pub stats: Stats,
    /// Life phase, recomputed whenever age changes.
    pub phase: LifePhase,
    /// Occupation.
    pub employment: EmploymentStatus,
    /// Schooling.
    pub education: Education,
    /// Career position, if employed on a track.
    pub career: Option<CareerPosition>,
    /// Family business the character works at.
    pub business_id: Option<BusinessId>,
    /// Romantic status.
    pub relationship_status: RelationshipStatus,
    /// Spouse. Symmetric: the spouse points back.
    pub partner_id: Option<CharacterId>,
    /// Children in birth order. Append-only.
    pub children_ids: Vec<CharacterId>,
    /// Parents, if born in the simulation.
    pub parents: Option<ParentPair>,
    /// Whether the player steers this character's pending choices.
    pub is_player_character: bool,
    /// Transient flags.
    pub status: CharacterStatus,
    /// Appearance.
    pub avatar: AvatarState,
}

impl Character {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Number of children (saturating at `u32::MAX`).
    pub fn child_count(&self) -> u32 {
        u32::try_from(self.children_ids.len()).unwrap_or(u32::MAX)
    }
}

// ---------------------------------------------------------------------------
// Businesses
// ---------------------------------------------------------------------------

/// Who fills a business slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SlotWorker {
    /// Nobody.
    #[default]
    Empty,
    /// A robot with fixed skill and a flat monthly cost.
    Robot,
    /// A family member.
    Character {
        /// The worker.
        id: CharacterId,
    },
}

impl SlotWorker {
    /// Whether the slot is filled.
    pub const fn is_filled(self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// The character id, if a person fills the slot.
    pub const fn character(self) -> Option<CharacterId> {
        match self {
            Self::Character { id } => Some(id),
            Self::Empty | Self::Robot => None,
        }
    }
}

/// One position in a business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BusinessSlot {
    /// Role name token.
    pub role: String,
    /// Major a human worker must hold, if any.
    pub required_major: Option<MajorId>,
    /// Current occupant.
    pub worker: SlotWorker,
}

/// A business owned by the family. Slot count is fixed by its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Business {
    /// Unique id.
    pub id: BusinessId,
    /// Catalog definition.
    pub kind: BusinessKindId,
    /// Level, starting at 1.
    pub level: u32,
    /// Positions.
    pub slots: Vec<BusinessSlot>,
    /// Purchase date.
    pub acquired: SimDate,
}

impl Business {
    /// Number of filled slots.
    pub fn filled_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.worker.is_filled()).count()
    }

    /// Number of robot workers.
    pub fn robot_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.worker == SlotWorker::Robot)
            .count()
    }

    /// Ids of human workers in slot order.
    pub fn character_workers(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.slots.iter().filter_map(|s| s.worker.character())
    }

    /// Index of the slot `id` occupies.
    pub fn slot_of(&self, id: CharacterId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.worker.character() == Some(id))
    }
}

// ---------------------------------------------------------------------------
// Household
// ---------------------------------------------------------------------------

/// An entry in the append-only asset ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PurchasedAsset {
    /// Catalog asset.
    pub asset_id: AssetId,
    /// Year of purchase.
    pub year: i32,
}

/// A family pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Pet {
    /// Unique id.
    pub id: PetId,
    /// Species.
    pub species: PetSpecies,
    /// Name.
    pub name: String,
    /// Family member who adopted it.
    pub owner_id: CharacterId,
    /// Adoption date.
    pub adopted: SimDate,
    /// Whether the pet is alive.
    pub is_alive: bool,
}

/// An outstanding family loan, repaid monthly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Loan {
    /// Borrower.
    pub character_id: CharacterId,
    /// Amount borrowed.
    pub principal: i64,
    /// Amount still owed, interest included.
    pub remaining: i64,
    /// Monthly repayment.
    pub monthly_payment: i64,
    /// Date taken.
    pub taken: SimDate,
}

/// A line in the game log. `key` is a localization key; text resolution is
/// the presentation layer's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LogEntry {
    /// When it happened.
    pub date: SimDate,
    /// Who it concerns, if anyone.
    pub character_id: Option<CharacterId>,
    /// Localization key.
    pub key: String,
    /// Interpolation parameters.
    pub params: BTreeMap<String, String>,
}

impl LogEntry {
    /// Entry with no parameters.
    pub fn new(date: SimDate, character_id: Option<CharacterId>, key: impl Into<String>) -> Self {
        Self {
            date,
            character_id,
            key: key.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add an interpolation parameter.
    #[must_use]
    pub fn with_param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.insert(name.to_owned(), value.to_string());
        self
    }
}

// ---------------------------------------------------------------------------
// Pending choices and event flow
// ---------------------------------------------------------------------------

/// What a pending choice asks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PendingRequest {
    /// Pick a school.
    School,
    /// Attend university or not.
    University,
    /// Pick a major.
    Major,
    /// Pick a career track.
    Career,
    /// Accept a loan of `amount`.
    Loan {
        /// Offered principal.
        amount: i64,
    },
    /// Accept promotion to `next_level`.
    Promotion {
        /// Level after promotion.
        next_level: u32,
    },
}

impl PendingRequest {
    /// The slot kind this request occupies.
    pub const fn kind(&self) -> PendingChoiceKind {
        match self {
            Self::School => PendingChoiceKind::School,
            Self::University => PendingChoiceKind::University,
            Self::Major => PendingChoiceKind::Major,
            Self::Career => PendingChoiceKind::Career,
            Self::Loan { .. } => PendingChoiceKind::Loan,
            Self::Promotion { .. } => PendingChoiceKind::Promotion,
        }
    }
}

/// A decision blocking one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PendingChoice {
    /// Blocked character.
    pub character_id: CharacterId,
    /// The question.
    pub request: PendingRequest,
    /// When it was opened.
    pub opened: SimDate,
}

/// The event currently shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OfferedEvent {
    /// Who the event is about.
    pub character_id: CharacterId,
    /// Which event.
    pub event_id: EventId,
}

/// A follow-up event waiting in the trigger queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QueuedTrigger {
    /// Who the follow-up is about.
    pub character_id: CharacterId,
    /// The follow-up event.
    pub event_id: EventId,
    /// The event whose choice queued it.
    pub source_event: EventId,
}

// ---------------------------------------------------------------------------
// Aggregate root
// ---------------------------------------------------------------------------

/// The whole simulation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// Every character ever created, alive or dead.
    pub characters: BTreeMap<CharacterId, Character>,
    /// Shared family money. May go negative.
    pub family_fund: i64,
    /// Append-only asset ledger.
    pub assets: Vec<PurchasedAsset>,
    /// Owned businesses.
    pub businesses: BTreeMap<BusinessId, Business>,
    /// Pet registry.
    pub pets: BTreeMap<PetId, Pet>,
    /// Outstanding loans.
    pub loans: Vec<Loan>,
    /// Current date.
    pub date: SimDate,
    /// Name language.
    pub language: Language,
    /// Append-only game log.
    pub log: Vec<LogEntry>,
    /// Decisions awaiting the player.
    pub pending: Vec<PendingChoice>,
    /// Event awaiting the player's choice.
    pub offered_event: Option<OfferedEvent>,
    /// FIFO queue of follow-up events.
    #[ts(as = "Vec<QueuedTrigger>")]
    pub trigger_queue: VecDeque<QueuedTrigger>,
    /// Set once the game is over.
    pub game_over_reason: Option<GameOverReason>,
}

impl GameState {
    /// An empty state starting on `date`.
    pub const fn new(date: SimDate, family_fund: i64, language: Language) -> Self {
        Self {
            characters: BTreeMap::new(),
            family_fund,
            assets: Vec::new(),
            businesses: BTreeMap::new(),
            pets: BTreeMap::new(),
            loans: Vec::new(),
            date,
            language,
            log: Vec::new(),
            pending: Vec::new(),
            offered_event: None,
            trigger_queue: VecDeque::new(),
            game_over_reason: None,
        }
    }

    /// Look up a character.
    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// Living characters in id order.
    pub fn living(&self) -> impl Iterator<Item = &Character> + '_ {
        self.characters.values().filter(|c| c.is_alive)
    }

    /// Ids of living characters in id order.
    pub fn living_ids(&self) -> Vec<CharacterId> {
        self.living().map(|c| c.id).collect()
    }

    /// The pending choice of `kind` for `id`, if open.
    pub fn pending_for(&self, id: CharacterId, kind: PendingChoiceKind) -> Option<&PendingChoice> {
        self.pending
            .iter()
            .find(|p| p.character_id == id && p.request.kind() == kind)
    }

    /// Whether `id` waits on a pending choice or an offered event.
    pub fn is_blocked(&self, id: CharacterId) -> bool {
        self.pending.iter().any(|p| p.character_id == id)
            || self
                .offered_event
                .as_ref()
                .is_some_and(|o| o.character_id == id)
    }

    /// Append a log entry.
    pub fn record(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }
}
