//! The built-in content catalog and catalog loading.
//!
//! [`default_catalog`] is the content a new game ships with: everyday
//! events for every life phase, the three milestones, careers, majors,
//! clubs, assets, businesses, and avatar tokens. [`load_catalog`] reads a
//! replacement from YAML. Both are validated before use.

use std::path::Path;

use lineage_types::{
    AssetDefinition, AssetId, AvatarManifest, BusinessDefinition, BusinessKindId, CareerTrack,
    CareerTrackId, Catalog, ChoiceId, Club, ClubId, DynamicEffect, EffectAction, EmploymentStatus,
    EventChoice, EventCondition, EventEffect, EventId, GameEvent, LifePhase, MajorId, PetSpecies,
    PhaseOutfits, RelationshipStatus, SlotTemplate, StatKind, TriggeredEvent, UniversityMajor,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::config::ConfigError;

/// Load a catalog from a YAML file and validate it.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let catalog: Catalog = serde_yml::from_str(&contents)?;
    catalog.validate()?;
    info!(
        path = %path.display(),
        events = catalog.events.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// The built-in catalog.
pub fn default_catalog() -> Catalog {
    Catalog {
        events: events(),
        career_tracks: career_tracks(),
        majors: majors(),
        clubs: clubs(),
        assets: assets(),
        businesses: businesses(),
        avatar: avatar_manifest(),
    }
}

// ---------------------------------------------------------------------------
// Event builders
// ---------------------------------------------------------------------------

/// Chained construction of an [`EventEffect`].
struct Effect(EventEffect);

impl Effect {
    fn logged(key: &str) -> Self {
        Self(EventEffect {
            log_key: key.to_owned(),
            ..EventEffect::default()
        })
    }

    fn dynamic(dynamic: DynamicEffect) -> Self {
        Self(EventEffect {
            dynamic: Some(dynamic),
            ..EventEffect::default()
        })
    }

    const fn fund(mut self, amount: i64) -> Self {
        self.0.fund_change = amount;
        self
    }

    fn stat(mut self, kind: StatKind, delta: i32) -> Self {
        let changes = &mut self.0.stats;
        let slot = match kind {
            StatKind::Iq => &mut changes.iq,
            StatKind::Happiness => &mut changes.happiness,
            StatKind::Eq => &mut changes.eq,
            StatKind::Health => &mut changes.health,
            StatKind::Skill => &mut changes.skill,
        };
        *slot = slot.saturating_add(delta);
        self
    }

    fn action(mut self, action: EffectAction) -> Self {
        self.0.action = Some(action);
        self
    }

    fn trigger(mut self, event_id: &str, chance: f64) -> Self {
        self.0.triggers.push(TriggeredEvent {
            event_id: EventId::new(event_id),
            chance,
        });
        self
    }

    fn done(self) -> EventEffect {
        self.0
    }
}

fn gamble(success_chance: f64, success: Effect, failure: Effect) -> Effect {
    Effect::dynamic(DynamicEffect::Gamble {
        success_chance,
        success: Box::new(success.done()),
        failure: Box::new(failure.done()),
    })
}

fn stat_check(stat: StatKind, difficulty: i32, success: Effect, failure: Effect) -> Effect {
    Effect::dynamic(DynamicEffect::StatCheck {
        stat,
        difficulty,
        success: Box::new(success.done()),
        failure: Box::new(failure.done()),
    })
}

/// Chained construction of a [`GameEvent`].
struct Event(GameEvent);

impl Event {
    fn new(id: &str, phases: &[LifePhase]) -> Self {
        Self(GameEvent {
            id: EventId::new(id),
            title_key: format!("event.{id}.title"),
            phases: phases.to_vec(),
            relationship_filter: None,
            condition: None,
            choices: Vec::new(),
            is_trigger_only: false,
            is_milestone: false,
            cooldown_years: None,
        })
    }

    fn choice(mut self, id: &str, effect: Effect) -> Self {
        self.0.choices.push(EventChoice {
            id: ChoiceId::new(id),
            label_key: format!("event.{}.choice.{id}", self.0.id),
            effect: effect.done(),
        });
        self
    }

    fn when(mut self, condition: EventCondition) -> Self {
        self.0.condition = Some(condition);
        self
    }

    fn relationships(mut self, statuses: &[RelationshipStatus]) -> Self {
        self.0.relationship_filter = Some(statuses.to_vec());
        self
    }

    const fn cooldown(mut self, years: u32) -> Self {
        self.0.cooldown_years = Some(years);
        self
    }

    const fn trigger_only(mut self) -> Self {
        self.0.is_trigger_only = true;
        self
    }

    const fn milestone(mut self) -> Self {
        self.0.is_milestone = true;
        self
    }

    fn done(self) -> GameEvent {
        self.0
    }
}

fn all(conditions: Vec<EventCondition>) -> EventCondition {
    EventCondition::All { conditions }
}

fn not(condition: EventCondition) -> EventCondition {
    EventCondition::Not {
        condition: Box::new(condition),
    }
}

const fn chance(probability: f64) -> EventCondition {
    EventCondition::Chance { probability }
}

const fn employed() -> EventCondition {
    EventCondition::Employment {
        status: EmploymentStatus::Employed,
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_lines)]
fn events() -> Vec<GameEvent> {
    use LifePhase::{
        Childhood, HighSchool, MiddleSchool, PrimarySchool, Retired, University, Working,
    };
    use StatKind::{Eq, Happiness, Health, Iq, Skill};

    let school = [PrimarySchool, MiddleSchool, HighSchool];
    let grown = [HighSchool, University, Working, Retired];
    let unattached = [
        RelationshipStatus::Single,
        RelationshipStatus::Dating,
        RelationshipStatus::Divorced,
        RelationshipStatus::Widowed,
    ];

    vec![
        // Early years
        Event::new("first_words", &[Childhood])
            .choice("cheer", Effect::logged("log.first_words.cheer").stat(Happiness, 5).stat(Eq, 2))
            .choice(
                "record",
                Effect::logged("log.first_words.record").fund(-50).stat(Happiness, 8),
            )
            .cooldown(100)
            .done(),
        Event::new("playground", &[Childhood, PrimarySchool])
            .choice("play", Effect::logged("log.playground.play").stat(Health, 3).stat(Happiness, 3))
            .choice("read", Effect::logged("log.playground.read").stat(Iq, 3))
            .cooldown(2)
            .done(),
        Event::new("pet_request", &[Childhood, PrimarySchool, MiddleSchool])
            .when(not(EventCondition::OwnsPet))
            .choice(
                "dog",
                Effect::logged("log.pet_request.dog")
                    .fund(-500)
                    .action(EffectAction::AdoptPet {
                        species: PetSpecies::Dog,
                    }),
            )
            .choice(
                "cat",
                Effect::logged("log.pet_request.cat")
                    .fund(-300)
                    .action(EffectAction::AdoptPet {
                        species: PetSpecies::Cat,
                    }),
            )
            .choice("refuse", Effect::logged("log.pet_request.refuse").stat(Happiness, -5))
            .cooldown(5)
            .done(),
        // School
        Event::new("spelling_bee", &[PrimarySchool])
            .choice(
                "compete",
                stat_check(
                    Iq,
                    100,
                    Effect::logged("log.spelling_bee.won").stat(Happiness, 5).stat(Iq, 2),
                    Effect::logged("log.spelling_bee.lost").stat(Happiness, -3),
                ),
            )
            .choice("skip", Effect::logged("log.spelling_bee.skip"))
            .cooldown(2)
            .done(),
        Event::new("club_fair", &school)
            .choice("join", Effect::logged("log.club_fair.join").action(EffectAction::JoinClub))
            .choice("pass", Effect::logged("log.club_fair.pass"))
            .cooldown(1)
            .done(),
        Event::new("bully", &[MiddleSchool])
            .choice(
                "stand_up",
                Effect::logged("log.bully.stand_up")
                    .stat(Eq, 4)
                    .stat(Health, -5)
                    .trigger("bully_revenge", 0.3),
            )
            .choice(
                "tell_teacher",
                Effect::logged("log.bully.tell_teacher").stat(Eq, 2).stat(Happiness, -2),
            )
            .cooldown(2)
            .done(),
        Event::new("bully_revenge", &[MiddleSchool, HighSchool])
            .choice("fight", Effect::logged("log.bully_revenge.fight").stat(Health, -10).stat(Happiness, 2))
            .choice("walk_away", Effect::logged("log.bully_revenge.walk_away").stat(Eq, 3))
            .trigger_only()
            .done(),
        Event::new("school_trip", &[HighSchool])
            .choice(
                "go",
                Effect::logged("log.school_trip.go").fund(-150).stat(Happiness, 6),
            )
            .choice("stay", Effect::logged("log.school_trip.stay").stat(Iq, 1))
            .cooldown(1)
            .done(),
        Event::new("exam_cram", &[HighSchool, University])
            .choice(
                "cram",
                Effect::logged("log.exam_cram.cram")
                    .stat(Iq, 4)
                    .stat(Health, -3)
                    .stat(Happiness, -2),
            )
            .choice("relax", Effect::logged("log.exam_cram.relax").stat(Happiness, 3))
            .cooldown(1)
            .done(),
        // Romance
        Event::new("first_crush", &[HighSchool, University])
            .relationships(&[RelationshipStatus::Single])
            .when(not(EventCondition::Mourning))
            .choice(
                "confess",
                gamble(
                    0.5,
                    Effect::logged("log.first_crush.dating")
                        .stat(Happiness, 8)
                        .action(EffectAction::StartDating),
                    Effect::logged("log.first_crush.rejected").stat(Happiness, -6),
                ),
            )
            .choice("keep_quiet", Effect::logged("log.first_crush.keep_quiet").stat(Happiness, -1))
            .cooldown(1)
            .done(),
        Event::new("breakup_drama", &grown)
            .relationships(&[RelationshipStatus::Dating])
            .choice(
                "break_up",
                Effect::logged("log.breakup_drama.break_up")
                    .stat(Happiness, -5)
                    .action(EffectAction::BreakUp),
            )
            .choice(
                "work_it_out",
                Effect::logged("log.breakup_drama.work_it_out").stat(Eq, 3).stat(Happiness, 2),
            )
            .cooldown(2)
            .done(),
        // University
        Event::new("party", &[University])
            .choice(
                "go",
                Effect::logged("log.party.go")
                    .stat(Happiness, 5)
                    .stat(Health, -2)
                    .trigger("hangover", 0.4),
            )
            .choice("study", Effect::logged("log.party.study").stat(Iq, 3))
            .cooldown(1)
            .done(),
        Event::new("hangover", &[University, Working])
            .choice("rest", Effect::logged("log.hangover.rest").stat(Health, 1))
            .choice(
                "push_through",
                Effect::logged("log.hangover.push_through").stat(Health, -3).stat(Skill, 1),
            )
            .trigger_only()
            .done(),
        Event::new("internship", &[University])
            .choice("take", Effect::logged("log.internship.take").stat(Skill, 5).stat(Happiness, -2))
            .choice("decline", Effect::logged("log.internship.decline").stat(Happiness, 2))
            .cooldown(2)
            .done(),
        Event::new("student_loan_offer", &[University])
            .when(EventCondition::FundBelow { amount: 5_000 })
            .choice(
                "apply",
                Effect::logged("log.student_loan.apply")
                    .action(EffectAction::RequestLoan { amount: 10_000 }),
            )
            .choice("decline", Effect::logged("log.student_loan.decline"))
            .cooldown(3)
            .done(),
        // Work
        Event::new("office_bonus", &[Working])
            .when(employed())
            .choice("save", Effect::logged("log.office_bonus.save").fund(1_500))
            .choice(
                "splurge",
                Effect::logged("log.office_bonus.splurge").fund(500).stat(Happiness, 6),
            )
            .cooldown(1)
            .done(),
        Event::new("layoff", &[Working])
            .when(all(vec![employed(), chance(0.1)]))
            .choice(
                "accept",
                Effect::logged("log.layoff.accept")
                    .stat(Happiness, -10)
                    .action(EffectAction::LoseJob),
            )
            .choice(
                "negotiate",
                stat_check(
                    Eq,
                    60,
                    Effect::logged("log.layoff.kept").stat(Happiness, -2),
                    Effect::logged("log.layoff.lost")
                        .stat(Happiness, -12)
                        .action(EffectAction::LoseJob),
                ),
            )
            .cooldown(3)
            .done(),
        Event::new("side_business_loan", &[Working])
            .when(all(vec![
                EventCondition::PlayerCharacter,
                EventCondition::AgeBetween { min: 25, max: 55 },
            ]))
            .choice(
                "borrow",
                Effect::logged("log.side_business_loan.borrow")
                    .action(EffectAction::RequestLoan { amount: 30_000 }),
            )
            .choice("pass", Effect::logged("log.side_business_loan.pass"))
            .cooldown(10)
            .done(),
        Event::new("family_business_meeting", &[Working])
            .when(EventCondition::FamilyOwnsBusiness)
            .choice(
                "invest",
                Effect::logged("log.family_business.invest").fund(-2_000).stat(Skill, 3),
            )
            .choice("hold", Effect::logged("log.family_business.hold").stat(Happiness, 1))
            .cooldown(1)
            .done(),
        Event::new("early_retirement", &[Working])
            .when(all(vec![
                EventCondition::AgeBetween { min: 50, max: 59 },
                EventCondition::FundAtLeast { amount: 100_000 },
                employed(),
            ]))
            .choice(
                "retire",
                Effect::logged("log.early_retirement.retire")
                    .stat(Happiness, 10)
                    .action(EffectAction::Retire),
            )
            .choice("keep_working", Effect::logged("log.early_retirement.keep_working").stat(Skill, 2))
            .cooldown(5)
            .done(),
        // Family
        Event::new("marriage_strain", &[Working, Retired])
            .relationships(&[RelationshipStatus::Married])
            .choice(
                "counseling",
                Effect::logged("log.marriage_strain.counseling")
                    .fund(-800)
                    .stat(Happiness, 4)
                    .stat(Eq, 2),
            )
            .choice(
                "divorce",
                Effect::logged("log.marriage_strain.divorce")
                    .stat(Happiness, -8)
                    .action(EffectAction::Divorce),
            )
            .cooldown(3)
            .done(),
        Event::new("mourning_support", &grown)
            .when(EventCondition::Mourning)
            .choice("talk", Effect::logged("log.mourning_support.talk").stat(Eq, 3).stat(Happiness, 4))
            .choice("withdraw", Effect::logged("log.mourning_support.withdraw").stat(Happiness, -3))
            .cooldown(1)
            .done(),
        Event::new(
            "pet_passing",
            &[Childhood, PrimarySchool, MiddleSchool, HighSchool, University, Working, Retired],
        )
        .when(all(vec![EventCondition::OwnsPet, chance(0.05)]))
        .choice(
            "mourn",
            Effect::logged("log.pet_passing.mourn")
                .stat(Happiness, -8)
                .action(EffectAction::PetPassesAway),
        )
        .done(),
        Event::new("grandkids_visit", &[Retired])
            .choice("host", Effect::logged("log.grandkids_visit.host").fund(-300).stat(Happiness, 8))
            .choice("rest", Effect::logged("log.grandkids_visit.rest").stat(Health, 2))
            .cooldown(1)
            .done(),
        // Luck and health
        Event::new("lottery", &[Working, Retired])
            .choice(
                "buy_ticket",
                gamble(
                    0.02,
                    Effect::logged("log.lottery.won").fund(50_000).stat(Happiness, 20),
                    Effect::logged("log.lottery.lost").fund(-20),
                ),
            )
            .choice("ignore", Effect::logged("log.lottery.ignore"))
            .cooldown(5)
            .done(),
        Event::new("health_scare", &[Working, Retired])
            .when(EventCondition::StatBelow {
                stat: Health,
                value: 50,
            })
            .choice(
                "see_doctor",
                Effect::logged("log.health_scare.see_doctor").fund(-2_000).stat(Health, 10),
            )
            .choice("ignore_it", Effect::logged("log.health_scare.ignore_it").stat(Health, -8))
            .cooldown(2)
            .done(),
        // Milestones
        Event::new("proposal", &[University, Working])
            .relationships(&unattached)
            .when(all(vec![
                EventCondition::AgeBetween { min: 18, max: 50 },
                not(EventCondition::Mourning),
                chance(0.15),
            ]))
            .choice(
                "accept",
                Effect::logged("log.proposal.accept")
                    .stat(Happiness, 15)
                    .action(EffectAction::Marry),
            )
            .choice("decline", Effect::logged("log.proposal.decline").stat(Happiness, -2))
            .milestone()
            .done(),
        Event::new("baby", &[Working])
            .relationships(&[RelationshipStatus::Married])
            .when(all(vec![
                EventCondition::HasLivingPartner,
                EventCondition::ChildrenBelow { count: 6 },
                EventCondition::AgeBetween { min: 20, max: 45 },
                chance(0.2),
            ]))
            .choice(
                "welcome",
                Effect::logged("log.baby.welcome")
                    .fund(-1_000)
                    .stat(Happiness, 10)
                    .action(EffectAction::HaveChild),
            )
            .choice("wait", Effect::logged("log.baby.wait"))
            .milestone()
            .done(),
        Event::new("old_age", &[Retired])
            .when(EventCondition::OldAgeHazard {
                start_age: 85,
                rate_per_year: 0.02,
            })
            .choice(
                "farewell",
                Effect::logged("log.old_age.farewell").action(EffectAction::DieOfOldAge),
            )
            .milestone()
            .done(),
    ]
}

// ---------------------------------------------------------------------------
// Careers, education, assets, businesses
// ---------------------------------------------------------------------------

fn track(id: &str, required_major: Option<&str>, levels: &[&str]) -> CareerTrack {
    CareerTrack {
        id: CareerTrackId::new(id),
        name_key: format!("career.{id}"),
        required_major: required_major.map(MajorId::new),
        levels: levels.iter().map(|l| format!("career.{id}.{l}")).collect(),
    }
}

fn career_tracks() -> Vec<CareerTrack> {
    vec![
        track("office", None, &["clerk", "analyst", "manager", "director"]),
        track("retail", None, &["cashier", "supervisor", "store_manager"]),
        track(
            "medicine",
            Some("medicine"),
            &["intern", "resident", "doctor", "consultant", "chief"],
        ),
        track(
            "engineering",
            Some("engineering"),
            &["junior", "engineer", "senior", "principal"],
        ),
        track("teaching", Some("education"), &["assistant", "teacher", "head_teacher"]),
    ]
}

fn major(id: &str, min_iq: i32, yearly_tuition: i64) -> UniversityMajor {
    UniversityMajor {
        id: MajorId::new(id),
        name_key: format!("major.{id}"),
        min_iq,
        yearly_tuition,
    }
}

fn majors() -> Vec<UniversityMajor> {
    vec![
        major("economics", 90, 4_000),
        major("medicine", 120, 9_000),
        major("engineering", 110, 6_000),
        major("education", 80, 3_000),
        major("arts", 60, 3_500),
    ]
}

fn club(id: &str, phases: &[LifePhase], stat: StatKind, yearly_bonus: i32) -> Club {
    Club {
        id: ClubId::new(id),
        name_key: format!("club.{id}"),
        phases: phases.to_vec(),
        stat,
        yearly_bonus,
    }
}

fn clubs() -> Vec<Club> {
    use LifePhase::{HighSchool, MiddleSchool, PrimarySchool};
    vec![
        club("choir", &[PrimarySchool], StatKind::Happiness, 2),
        club("chess", &[PrimarySchool, MiddleSchool, HighSchool], StatKind::Iq, 2),
        club("football", &[MiddleSchool, HighSchool], StatKind::Health, 3),
        club("debate", &[HighSchool], StatKind::Eq, 2),
        club("robotics", &[MiddleSchool, HighSchool], StatKind::Skill, 2),
    ]
}

fn asset(id: &str, price: i64, happiness_bonus: i32, monthly_income: i64) -> AssetDefinition {
    AssetDefinition {
        id: AssetId::new(id),
        name_key: format!("asset.{id}"),
        price,
        happiness_bonus,
        monthly_income,
    }
}

fn assets() -> Vec<AssetDefinition> {
    vec![
        asset("bicycle", 300, 2, 0),
        asset("car", 15_000, 5, 0),
        asset("apartment", 120_000, 10, 600),
        asset("beach_house", 300_000, 15, 1_500),
    ]
}

fn slot(role: &str, required_major: Option<&str>) -> SlotTemplate {
    SlotTemplate {
        role: role.to_owned(),
        required_major: required_major.map(MajorId::new),
    }
}

fn businesses() -> Vec<BusinessDefinition> {
    vec![
        BusinessDefinition {
            id: BusinessKindId::new("cafe"),
            name_key: "business.cafe".to_owned(),
            purchase_cost: 50_000,
            base_monthly_revenue: Decimal::from(10_000),
            cogs_rate: Decimal::new(4, 1),
            fixed_monthly_cost: 500,
            slots: vec![
                slot("barista", None),
                slot("barista", None),
                slot("cashier", None),
                slot("manager", None),
            ],
            upgrade_cost: 20_000,
            max_level: 5,
            revenue_step_per_level: Decimal::new(25, 2),
        },
        BusinessDefinition {
            id: BusinessKindId::new("workshop"),
            name_key: "business.workshop".to_owned(),
            purchase_cost: 90_000,
            base_monthly_revenue: Decimal::from(18_000),
            cogs_rate: Decimal::new(35, 2),
            fixed_monthly_cost: 1_200,
            slots: vec![
                slot("engineer", Some("engineering")),
                slot("technician", None),
                slot("technician", None),
            ],
            upgrade_cost: 30_000,
            max_level: 4,
            revenue_step_per_level: Decimal::new(2, 1),
        },
        BusinessDefinition {
            id: BusinessKindId::new("clinic"),
            name_key: "business.clinic".to_owned(),
            purchase_cost: 200_000,
            base_monthly_revenue: Decimal::from(40_000),
            cogs_rate: Decimal::new(2, 1),
            fixed_monthly_cost: 3_000,
            slots: vec![
                slot("doctor", Some("medicine")),
                slot("doctor", Some("medicine")),
                slot("nurse", None),
                slot("receptionist", None),
            ],
            upgrade_cost: 80_000,
            max_level: 3,
            revenue_step_per_level: Decimal::new(3, 1),
        },
    ]
}

// ---------------------------------------------------------------------------
// Avatar tokens
// ---------------------------------------------------------------------------

fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|&v| v.to_owned()).collect()
}

fn avatar_manifest() -> AvatarManifest {
    let outfits = [
        (LifePhase::Newborn, &["onesie", "swaddle"][..]),
        (LifePhase::Childhood, &["overalls", "tshirt_shorts"][..]),
        (LifePhase::PrimarySchool, &["uniform_primary", "hoodie"][..]),
        (LifePhase::MiddleSchool, &["uniform_middle", "hoodie"][..]),
        (LifePhase::HighSchool, &["uniform_high", "denim_jacket"][..]),
        (LifePhase::University, &["hoodie", "flannel", "sweater"][..]),
        (LifePhase::Working, &["suit", "blouse_slacks", "work_casual"][..]),
        (LifePhase::Retired, &["cardigan", "polo", "sun_hat"][..]),
    ];
    AvatarManifest {
        skin_tones: tokens(&["porcelain", "fair", "tan", "olive", "brown", "deep"]),
        hair_colors: tokens(&["black", "dark_brown", "brown", "auburn", "blonde", "red"]),
        grey_hair_color: "grey".to_owned(),
        eye_colors: tokens(&["brown", "hazel", "green", "blue", "grey"]),
        male_hair_styles: tokens(&["crew_cut", "side_part", "buzz", "curly_short", "undercut"]),
        female_hair_styles: tokens(&["bob", "long_straight", "ponytail", "bun", "curly_long"]),
        bald_style: "bald".to_owned(),
        outfits: outfits
            .iter()
            .map(|(phase, values)| PhaseOutfits {
                phase: *phase,
                outfits: tokens(values),
            })
            .collect(),
    }
}
