//! Tunable parameters for the lifecycle and economic models.
//!
//! Both structs deserialize with per-field defaults so they can be embedded
//! directly in `lineage-config.yaml` under the `lifecycle` and `economy`
//! keys. Tests build them with [`Default`] and override single fields.

use serde::Deserialize;

/// Skill a robot worker contributes to a business's average.
pub const ROBOT_SKILL: i32 = 70;

/// Flat monthly cost of one robot worker.
pub const ROBOT_HIRE_COST: i64 = 1_500;

/// Fixed part of an employee's monthly salary.
pub const SALARY_BASE: i64 = 2_000;

/// Salary added per point of skill.
pub const SALARY_PER_SKILL: i64 = 30;

/// Lifecycle parameters: creation, birth, partners, ageing, death.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Upper bound (inclusive) for initial iq, happiness, and eq rolls.
    pub initial_stat_max: i32,
    /// Lower bound (inclusive) for initial health.
    pub initial_health_min: i32,
    /// Upper bound (inclusive) for initial health.
    pub initial_health_max: i32,

    /// Lower bound of the birth stat multiplier.
    pub birth_multiplier_min: f64,
    /// Upper bound (exclusive) of the birth stat multiplier.
    pub birth_multiplier_max: f64,
    /// Health added to a newborn before clamping.
    pub newborn_health_bonus: i32,
    /// Most children a couple can have.
    pub max_children: u32,

    /// Partner iq spread around the proposer's.
    pub partner_iq_noise: i32,
    /// Partner happiness and eq spread.
    pub partner_mood_noise: i32,
    /// Partner health spread.
    pub partner_health_noise: i32,
    /// Partner age spread in years.
    pub partner_age_spread: u32,
    /// Youngest age for marriage and partners.
    pub adult_age: u32,

    /// Happiness lost by every survivor when a family member dies.
    pub mourning_penalty: i32,
    /// Years a survivor mourns.
    pub mourning_years: i32,

    /// Age at which the old-age hazard starts.
    pub old_age_start: u32,
    /// Old-age hazard growth per year past the start.
    pub old_age_rate: f64,
    /// Health below which the frailty hazard applies.
    pub frailty_health_threshold: i32,
    /// Daily death probability while frail.
    pub frailty_daily_hazard: f64,
    /// Health lost on each birthday from this age on.
    pub elder_decline_age: u32,
    /// Health lost per birthday past `elder_decline_age`.
    pub elder_health_decline: i32,

    /// Age the workforce is entered.
    pub workforce_entry_age: u32,
    /// Retirement age.
    pub retirement_age: u32,
    /// Years in workforce at which an NPC's career level goes up.
    pub career_level_thresholds: Vec<u32>,
    /// Chance an NPC holds a university major.
    pub npc_major_chance: f64,
    /// Exclusive upper bound of an NPC's starting skill.
    pub npc_max_starting_skill: i32,
    /// Years at a level before a player character is offered promotion.
    pub promotion_min_years: u32,
    /// Skill required for a promotion offer.
    pub promotion_min_skill: i32,
    /// Skill gained on each birthday while employed.
    pub yearly_work_skill_gain: i32,

    /// Age at which hair turns grey.
    pub grey_hair_age: u32,
    /// Age from which men may go bald.
    pub balding_age: u32,
    /// Chance per birthday of going bald past `balding_age`.
    pub balding_chance: f64,
    /// Chance a new character wears glasses.
    pub glasses_chance: f64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            initial_stat_max: 100,
            initial_health_min: 30,
            initial_health_max: 100,
            birth_multiplier_min: 0.8,
            birth_multiplier_max: 1.4,
            newborn_health_bonus: 10,
            max_children: 6,
            partner_iq_noise: 20,
            partner_mood_noise: 15,
            partner_health_noise: 10,
            partner_age_spread: 3,
            adult_age: 18,
            mourning_penalty: 20,
            mourning_years: 2,
            old_age_start: 85,
            old_age_rate: 0.02,
            frailty_health_threshold: 10,
            frailty_daily_hazard: 0.002,
            elder_decline_age: 70,
            elder_health_decline: 2,
            workforce_entry_age: 23,
            retirement_age: 60,
            career_level_thresholds: vec![5, 12, 20],
            npc_major_chance: 0.5,
            npc_max_starting_skill: 50,
            promotion_min_years: 3,
            promotion_min_skill: 40,
            yearly_work_skill_gain: 2,
            grey_hair_age: 60,
            balding_age: 50,
            balding_chance: 0.1,
            glasses_chance: 0.15,
        }
    }
}

/// Economic parameters: wages, robots, tuition, loans, bankruptcy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Fixed part of a monthly salary.
    pub salary_base: i64,
    /// Salary per skill point.
    pub salary_per_skill: i64,
    /// Skill a robot contributes.
    pub robot_skill: i32,
    /// Monthly cost of one robot.
    pub robot_monthly_cost: i64,
    /// Yearly private school tuition.
    pub private_school_tuition: i64,
    /// Yearly international school tuition.
    pub international_school_tuition: i64,
    /// Loan interest, percent of principal, charged once.
    pub loan_interest_pct: i64,
    /// Loan repayment term in months.
    pub loan_term_months: i64,
    /// Fund below which the game is over.
    pub bankruptcy_threshold: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            salary_base: SALARY_BASE,
            salary_per_skill: SALARY_PER_SKILL,
            robot_skill: ROBOT_SKILL,
            robot_monthly_cost: ROBOT_HIRE_COST,
            private_school_tuition: 3_000,
            international_school_tuition: 8_000,
            loan_interest_pct: 10,
            loan_term_months: 24,
            bankruptcy_threshold: -50_000,
        }
    }
}
