use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{percent_of, round_half_up};

/// Breakdown produced by one net-salary calculation.
///
/// Monetary fields are in euro, rounded to cents as each line is computed;
/// `contribution_rate` is the unrounded fraction that was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Gross annual salary the result was computed for.
    pub gross_salary: Decimal,

    /// Net annual salary: gross − withholdings + fiscal-wedge bonus.
    pub net_annual: Decimal,

    /// Employee social-security contributions.
    pub contributions: Decimal,

    /// Contribution rate applied to the gross salary.
    pub contribution_rate: Decimal,

    /// Income subject to IRPEF (imponibile).
    pub taxable_income: Decimal,

    /// IRPEF from the progressive schedule, before deductions.
    pub gross_irpef: Decimal,

    /// Employment-income deduction.
    pub base_deduction: Decimal,

    /// Additional deduction.
    pub additional_deduction: Decimal,

    /// Base plus additional deduction.
    pub total_deduction: Decimal,

    /// Fiscal-wedge bonus added to net pay.
    pub fiscal_wedge_bonus: Decimal,

    /// Gross IRPEF minus deductions, never below zero.
    pub net_irpef: Decimal,

    pub regional_surcharge: Decimal,
    pub municipal_surcharge: Decimal,

    /// Net IRPEF plus both surcharges.
    pub total_irpef: Decimal,

    /// Contributions plus total IRPEF.
    pub total_withholdings: Decimal,
}

impl CalculationResult {
    /// Net pay per monthly installment, rounded to cents.
    ///
    /// Italian contracts pay 12, 13 or 14 installments a year; zero
    /// installments yields zero.
    pub fn monthly_net(
        &self,
        payments: u32,
    ) -> Decimal {
        self.net_annual
            .checked_div(Decimal::from(payments))
            .map(round_half_up)
            .unwrap_or(Decimal::ZERO)
    }

    /// Total withholdings as a percentage of gross salary.
    pub fn withholding_share(&self) -> Decimal {
        percent_of(self.total_withholdings, self.gross_salary)
    }
}
