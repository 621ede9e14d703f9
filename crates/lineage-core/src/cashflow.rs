//! Monthly family cashflow.
//!
//! Each month the fund receives every earner's salary once, the net income
//! of every family business (rounded to whole units), and asset income,
//! and pays the instalment of every outstanding loan. Business income is
//! recomputed from the current members every month.

use lineage_family::economy::{calculate_business_monthly_net_income, to_fund_units};
use lineage_family::{EconomyConfig, calculate_employee_salary};
use lineage_types::{Catalog, EmploymentStatus, GameState, LogEntry};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::CoreError;

/// One month of money movements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyCashflow {
    /// Salaries of employed members and business workers.
    pub salaries: i64,
    /// Sum of business net incomes, exact.
    pub business_net: Decimal,
    /// Income from owned assets.
    pub asset_income: i64,
    /// Loan instalments paid.
    pub loan_repayments: i64,
}

impl MonthlyCashflow {
    /// Fund change of the month.
    pub fn net(&self) -> i64 {
        self.salaries
            .saturating_add(to_fund_units(self.business_net))
            .saturating_add(self.asset_income)
            .saturating_sub(self.loan_repayments)
    }

    fn accumulate(&mut self, other: &Self) {
        self.salaries = self.salaries.saturating_add(other.salaries);
        self.business_net = self
            .business_net
            .checked_add(other.business_net)
            .unwrap_or(self.business_net);
        self.asset_income = self.asset_income.saturating_add(other.asset_income);
        self.loan_repayments = self.loan_repayments.saturating_add(other.loan_repayments);
    }
}

/// Income of one month, before loan repayments.
pub fn monthly_income(
    state: &GameState,
    catalog: &Catalog,
    economy: &EconomyConfig,
) -> Result<MonthlyCashflow, CoreError> {
    let salaries = state
        .living()
        .filter(|c| c.employment == EmploymentStatus::Employed || c.business_id.is_some())
        .fold(0_i64, |acc, c| {
            acc.saturating_add(calculate_employee_salary(c, economy))
        });

    let mut business_net = Decimal::ZERO;
    for business in state.businesses.values() {
        let Some(definition) = catalog.business(&business.kind) else {
            warn!(business_id = %business.id, kind = %business.kind, "unknown business kind; no income");
            continue;
        };
        let net =
            calculate_business_monthly_net_income(business, definition, &state.characters, economy)?;
        business_net = business_net.checked_add(net).unwrap_or(business_net);
    }

    let asset_income = state
        .assets
        .iter()
        .filter_map(|owned| catalog.asset(&owned.asset_id))
        .fold(0_i64, |acc, a| acc.saturating_add(a.monthly_income));

    Ok(MonthlyCashflow {
        salaries,
        business_net,
        asset_income,
        loan_repayments: 0,
    })
}

/// Settle `months` months of income and loan instalments.
///
/// Paid-off loans are removed and logged.
pub fn apply_monthly_cashflow(
    state: &GameState,
    catalog: &Catalog,
    economy: &EconomyConfig,
    months: u32,
) -> Result<(GameState, MonthlyCashflow), CoreError> {
    let mut next = state.clone();
    let mut total = MonthlyCashflow::default();
    for _ in 0..months {
        let mut month = monthly_income(&next, catalog, economy)?;
        let mut repaid = Vec::new();
        for loan in &mut next.loans {
            let instalment = loan.monthly_payment.min(loan.remaining).max(0);
            loan.remaining = loan.remaining.saturating_sub(instalment);
            month.loan_repayments = month.loan_repayments.saturating_add(instalment);
            if loan.remaining <= 0 {
                repaid.push((loan.character_id, loan.principal));
            }
        }
        next.loans.retain(|l| l.remaining > 0);
        for (character_id, principal) in repaid {
            next.record(
                LogEntry::new(next.date, Some(character_id), "log.loan.repaid")
                    .with_param("principal", principal),
            );
        }
        next.family_fund = next.family_fund.saturating_add(month.net());
        total.accumulate(&month);
    }
    debug!(
        months,
        salaries = total.salaries,
        business_net = %total.business_net,
        asset_income = total.asset_income,
        loan_repayments = total.loan_repayments,
        fund = next.family_fund,
        "cashflow settled"
    );
    Ok((next, total))
}
