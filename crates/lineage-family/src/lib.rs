//! Character lifecycle, family links, careers, and economy for the Lineage
//! simulation.
//!
//! This crate is the logic layer for characters: everything that operates
//! on a character or the family without knowing about events or the tick
//! loop. It sits between `lineage-types` (the data model) and
//! `lineage-events` / `lineage-core` (event resolution and orchestration).
//!
//! # Modules
//!
//! - [`avatar`] -- Cosmetic avatar generation and ageing
//! - [`career`] -- NPC career assignment, yearly progression, promotion offers
//! - [`config`] -- Tunables ([`LifecycleConfig`], [`EconomyConfig`])
//! - [`economy`] -- Salaries and business net income
//! - [`error`] -- Error types ([`FamilyError`])
//! - [`family`] -- Marriage, divorce, children, mourning, lineage queries
//! - [`lifecycle`] -- Creation, birth, partner synthesis, ageing, death
//! - [`names`] -- Name pools per language
//! - [`phase`] -- Age to life-phase table
//! - [`random`] -- Seeded random helpers

pub mod avatar;
pub mod career;
pub mod config;
pub mod economy;
pub mod error;
pub mod family;
pub mod lifecycle;
pub mod names;
pub mod phase;
pub mod random;

#[cfg(test)]
pub(crate) mod testing;

pub use career::{NpcCareerUpdate, assign_npc_career, career_level_for_years, promotion_offer};
pub use config::{
    EconomyConfig, LifecycleConfig, ROBOT_HIRE_COST, ROBOT_SKILL, SALARY_BASE, SALARY_PER_SKILL,
};
pub use economy::{
    IncomeBreakdown, calculate_business_monthly_net_income, calculate_employee_salary,
    income_breakdown,
};
pub use error::FamilyError;
pub use lifecycle::{
    AgeChange, age_character, create_initial_character, handle_birth, mark_dead,
    synthesize_partner,
};
pub use phase::life_phase_for_age;
