//! Salaries and business income.
//!
//! Business income is computed on demand from the business, its catalog
//! definition, and the current family members. Nothing is cached. All money
//! arithmetic uses [`Decimal`] with checked operations.
//!
//! ```text
//! filled     = robots + living human workers
//! avg_skill  = (sum(human skill) + robots * robot_skill) / filled
//! multiplier = 1 + avg_skill / 200
//! capacity   = filled / total_slots
//! gross      = base_revenue(level) * capacity * multiplier
//! net        = gross - gross * cogs_rate - robots * robot_cost - fixed - sum(salaries)
//! ```
//!
//! With no filled slot, `net = -fixed`.

use std::collections::BTreeMap;

use lineage_types::{Business, BusinessDefinition, Character, CharacterId, SlotWorker};
use rust_decimal::Decimal;
use tracing::warn;

use crate::config::EconomyConfig;
use crate::error::FamilyError;

/// Divisor turning average skill into a revenue bonus.
const SKILL_BONUS_DIVISOR: i64 = 200;

/// Monthly salary of an employee: `salary_base + skill * salary_per_skill`.
pub fn calculate_employee_salary(character: &Character, config: &EconomyConfig) -> i64 {
    i64::from(character.stats.skill)
        .saturating_mul(config.salary_per_skill)
        .saturating_add(config.salary_base)
}

/// Line items of one month of business income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeBreakdown {
    /// Revenue after staffing and skill adjustments.
    pub gross: Decimal,
    /// Cost of goods sold.
    pub cost_of_goods: Decimal,
    /// Robot upkeep.
    pub robot_cost: Decimal,
    /// Human salaries.
    pub salaries: Decimal,
    /// Fixed monthly cost.
    pub fixed_cost: Decimal,
    /// Net income.
    pub net: Decimal,
    /// Filled slots counted.
    pub filled_slots: u32,
    /// Robots among them.
    pub robots: u32,
}

fn overflow(context: &str) -> FamilyError {
    FamilyError::ArithmeticOverflow {
        context: context.to_owned(),
    }
}

/// Base monthly revenue at `level`: `base * (1 + step * (level - 1))`.
pub fn revenue_at_level(definition: &BusinessDefinition, level: u32) -> Result<Decimal, FamilyError> {
    let steps = Decimal::from(level.saturating_sub(1));
    let bonus = definition
        .revenue_step_per_level
        .checked_mul(steps)
        .ok_or_else(|| overflow("level revenue bonus"))?;
    let factor = Decimal::ONE
        .checked_add(bonus)
        .ok_or_else(|| overflow("level revenue factor"))?;
    definition
        .base_monthly_revenue
        .checked_mul(factor)
        .ok_or_else(|| overflow("level revenue"))
}

/// Itemized monthly income of `business`.
///
/// Workers that are missing from `members` or dead are logged and counted
/// as empty slots.
pub fn income_breakdown(
    business: &Business,
    definition: &BusinessDefinition,
    members: &BTreeMap<CharacterId, Character>,
    config: &EconomyConfig,
) -> Result<IncomeBreakdown, FamilyError> {
    let fixed_cost = Decimal::from(definition.fixed_monthly_cost);

    let mut robots: u32 = 0;
    let mut humans: Vec<&Character> = Vec::new();
    for slot in &business.slots {
        match slot.worker {
            SlotWorker::Empty => {}
            SlotWorker::Robot => robots = robots.saturating_add(1),
            SlotWorker::Character { id } => match members.get(&id).filter(|c| c.is_alive) {
                Some(worker) => humans.push(worker),
                None => warn!(
                    business_id = %business.id,
                    character_id = %id,
                    "slot worker missing or deceased, counted as empty"
                ),
            },
        }
    }

    let human_count = u32::try_from(humans.len()).unwrap_or(u32::MAX);
    let filled = robots.saturating_add(human_count);
    let total = u32::try_from(business.slots.len()).unwrap_or(u32::MAX);

    if filled == 0 || total == 0 {
        return Ok(IncomeBreakdown {
            gross: Decimal::ZERO,
            cost_of_goods: Decimal::ZERO,
            robot_cost: Decimal::ZERO,
            salaries: Decimal::ZERO,
            fixed_cost,
            net: Decimal::from(definition.fixed_monthly_cost.saturating_neg()),
            filled_slots: 0,
            robots: 0,
        });
    }

    let human_skill = humans
        .iter()
        .fold(0_i64, |acc, c| acc.saturating_add(i64::from(c.stats.skill)));
    let robot_skill = i64::from(robots).saturating_mul(i64::from(config.robot_skill));
    let skill_sum = Decimal::from(human_skill.saturating_add(robot_skill));

    let avg_skill = skill_sum
        .checked_div(Decimal::from(filled))
        .ok_or_else(|| overflow("average skill"))?;
    let multiplier = avg_skill
        .checked_div(Decimal::from(SKILL_BONUS_DIVISOR))
        .and_then(|bonus| Decimal::ONE.checked_add(bonus))
        .ok_or_else(|| overflow("skill multiplier"))?;
    let capacity = Decimal::from(filled)
        .checked_div(Decimal::from(total))
        .ok_or_else(|| overflow("capacity"))?;

    let gross = revenue_at_level(definition, business.level)?
        .checked_mul(capacity)
        .and_then(|scaled| scaled.checked_mul(multiplier))
        .ok_or_else(|| overflow("gross revenue"))?;
    let cost_of_goods = gross
        .checked_mul(definition.cogs_rate)
        .ok_or_else(|| overflow("cost of goods"))?;
    let robot_cost = Decimal::from(robots)
        .checked_mul(Decimal::from(config.robot_monthly_cost))
        .ok_or_else(|| overflow("robot cost"))?;
    let salaries = humans.iter().try_fold(Decimal::ZERO, |acc, c| {
        acc.checked_add(Decimal::from(calculate_employee_salary(c, config)))
            .ok_or_else(|| overflow("salaries"))
    })?;

    let net = gross
        .checked_sub(cost_of_goods)
        .and_then(|v| v.checked_sub(robot_cost))
        .and_then(|v| v.checked_sub(fixed_cost))
        .and_then(|v| v.checked_sub(salaries))
        .ok_or_else(|| overflow("net income"))?;

    Ok(IncomeBreakdown {
        gross,
        cost_of_goods,
        robot_cost,
        salaries,
        fixed_cost,
        net,
        filled_slots: filled,
        robots,
    })
}

/// Net monthly income of `business`. See the module docs for the formula.
pub fn calculate_business_monthly_net_income(
    business: &Business,
    definition: &BusinessDefinition,
    members: &BTreeMap<CharacterId, Character>,
    config: &EconomyConfig,
) -> Result<Decimal, FamilyError> {
    income_breakdown(business, definition, members, config).map(|b| b.net)
}

/// Round a decimal amount to whole fund units, halves away from zero.
pub fn to_fund_units(amount: Decimal) -> i64 {
    use rust_decimal::RoundingStrategy;
    use rust_decimal::prelude::ToPrimitive;
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
