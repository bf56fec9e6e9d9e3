//! Net salary calculation from gross annual salary (RAL).
//!
//! The calculation is a fixed sequence of lines, each feeding the next:
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Contributions: gross × contribution rate (by employer size) |
//! | 2    | Taxable base: (1 − exempt fraction) × (gross − Line 1) |
//! | 3    | Gross IRPEF: progressive brackets applied to Line 2 |
//! | 4    | Base deduction: ladder keyed on Line 2 |
//! | 5    | Additional deduction: ladder keyed on gross |
//! | 6    | Total deduction: Line 4 + Line 5 |
//! | 7    | Net IRPEF: Line 3 − Line 6, minimum 0 |
//! | 8    | Fiscal-wedge bonus: ladder keyed on gross |
//! | 9    | Regional surcharge: Line 2 × regional rate |
//! | 10   | Municipal surcharge: Line 2 × municipal rate |
//! | 11   | Total IRPEF: Line 7 + Line 9 + Line 10 |
//! | 12   | Total withholdings: Line 1 + Line 11 |
//! | 13   | Net annual salary: gross − Line 12 + Line 8 |
//!
//! Cents are the unit of record: every monetary line, the taxable base
//! included, is rounded to cents as it is produced and later lines read
//! the rounded value. `net + contributions + total IRPEF − bonus` equals
//! the gross salary exactly.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use irpef_core::{CalculationInput, EmployerSize, IrpefConfig, NetSalaryCalculator};
//!
//! let config = IrpefConfig::default();
//! let input = CalculationInput::new(dec!(30000), EmployerSize::Small, &config);
//!
//! let result = NetSalaryCalculator::new(&config).calculate(&input);
//!
//! assert_eq!(result.contributions, dec!(2757.00));
//! assert_eq!(result.taxable_income, dec!(27243.00));
//! assert_eq!(result.net_irpef, dec!(3286.60));
//! assert_eq!(result.net_annual, dec!(23193.60));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::calculations::common::{max, round_half_up};
use crate::models::{CalculationInput, CalculationResult, EmployerSize, IrpefConfig};

/// Calculator for the net salary breakdown.
///
/// Borrows an immutable [`IrpefConfig`]; it holds no other state, so one
/// calculator can serve any number of calls, from any thread.
#[derive(Debug, Clone, Copy)]
pub struct NetSalaryCalculator<'a> {
    config: &'a IrpefConfig,
}

impl<'a> NetSalaryCalculator<'a> {
    pub fn new(config: &'a IrpefConfig) -> Self {
        Self { config }
    }

    /// Calculates the full breakdown for one input.
    ///
    /// Never fails for a positive gross salary. Callers are expected to
    /// bound the salary with [`IrpefConfig::check_salary`]; results for a
    /// non-positive salary are not meaningful.
    pub fn calculate(
        &self,
        input: &CalculationInput,
    ) -> CalculationResult {
        let gross = input.gross_salary;

        let contribution_rate = self.config.contribution_rate(input.employer_size);
        let contributions = self.contributions(gross, contribution_rate);
        let taxable_income = self.taxable_income(gross, contributions, input.exempt_fraction);

        let gross_irpef = self.gross_irpef(taxable_income);
        let base_deduction = self.base_deduction(taxable_income);
        let additional_deduction = self.additional_deduction(gross);
        let total_deduction = base_deduction + additional_deduction;
        let net_irpef = self.net_irpef(gross_irpef, total_deduction);

        let fiscal_wedge_bonus = self.fiscal_wedge_bonus(gross);

        let regional_surcharge = self.surcharge(taxable_income, input.regional_rate);
        let municipal_surcharge = self.surcharge(taxable_income, input.municipal_rate);

        let total_irpef = net_irpef + regional_surcharge + municipal_surcharge;
        let total_withholdings = contributions + total_irpef;
        let net_annual = gross - total_withholdings + fiscal_wedge_bonus;

        debug!(
            %gross,
            employer = input.employer_size.as_str(),
            %taxable_income,
            %net_irpef,
            %net_annual,
            "calculated net salary"
        );

        CalculationResult {
            gross_salary: gross,
            net_annual,
            contributions,
            contribution_rate,
            taxable_income,
            gross_irpef,
            base_deduction,
            additional_deduction,
            total_deduction,
            fiscal_wedge_bonus,
            net_irpef,
            regional_surcharge,
            municipal_surcharge,
            total_irpef,
            total_withholdings,
        }
    }

    /// Line 1: employee contributions.
    fn contributions(
        &self,
        gross: Decimal,
        rate: Decimal,
    ) -> Decimal {
        round_half_up(gross * rate)
    }

    /// Line 2: IRPEF taxable base after contributions and exempt income.
    fn taxable_income(
        &self,
        gross: Decimal,
        contributions: Decimal,
        exempt_fraction: Decimal,
    ) -> Decimal {
        round_half_up((Decimal::ONE - exempt_fraction) * (gross - contributions))
    }

    /// Line 3: progressive bracket accumulation.
    ///
    /// Each bracket taxes only the slice of income between the previous
    /// bound and its own.
    fn gross_irpef(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let mut tax = Decimal::ZERO;
        let mut previous = Decimal::ZERO;

        for bracket in &self.config.brackets {
            match bracket.upper_bound {
                Some(upper) if taxable_income > upper => {
                    tax += (upper - previous) * bracket.rate;
                    previous = upper;
                }
                _ => {
                    tax += (taxable_income - previous) * bracket.rate;
                    trace!(rate = %bracket.rate, %previous, "top bracket reached");
                    break;
                }
            }
        }

        round_half_up(tax)
    }

    /// Line 4: employment-income deduction.
    fn base_deduction(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        round_half_up(self.config.base_deduction.evaluate(taxable_income))
    }

    /// Line 5: additional deduction, keyed on gross salary.
    fn additional_deduction(
        &self,
        gross: Decimal,
    ) -> Decimal {
        round_half_up(self.config.additional_deduction.evaluate(gross))
    }

    /// Line 7: deductions never turn into a refund.
    fn net_irpef(
        &self,
        gross_irpef: Decimal,
        total_deduction: Decimal,
    ) -> Decimal {
        max(gross_irpef - total_deduction, Decimal::ZERO)
    }

    /// Line 8: fiscal-wedge bonus.
    fn fiscal_wedge_bonus(
        &self,
        gross: Decimal,
    ) -> Decimal {
        round_half_up(self.config.fiscal_wedge_bonus.evaluate(gross))
    }

    /// Lines 9 and 10: flat surcharge on the taxable base.
    fn surcharge(
        &self,
        taxable_income: Decimal,
        rate: Decimal,
    ) -> Decimal {
        round_half_up(taxable_income * rate)
    }
}

/// Convenience wrapper over [`NetSalaryCalculator`] taking the inputs as
/// scalars.
///
/// Rates go through [`CalculationInput::resolve`]: a surcharge outside
/// `[0, 1]` is replaced by the configured default and the exempt fraction
/// is clamped.
pub fn compute(
    config: &IrpefConfig,
    gross_salary: Decimal,
    is_large_employer: bool,
    regional_rate: Decimal,
    municipal_rate: Decimal,
    exempt_fraction: Decimal,
) -> CalculationResult {
    let input = CalculationInput::resolve(
        gross_salary,
        EmployerSize::from_is_large(is_large_employer),
        Some(regional_rate),
        Some(municipal_rate),
        Some(exempt_fraction),
        config,
    );
    NetSalaryCalculator::new(config).calculate(&input)
}
