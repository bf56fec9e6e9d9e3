use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{EmployerSize, IrpefBracket, Ladder, LadderStep, StepAmount};

/// Errors raised while validating an [`IrpefConfig`] or checking a salary
/// against its bounds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The bracket table is empty.
    #[error("no IRPEF brackets configured")]
    NoBrackets,

    /// Bracket upper bounds must be strictly ascending.
    #[error("bracket upper bound {0} is not above the previous bound")]
    UnsortedBrackets(Decimal),

    /// Only the last bracket may be open-ended.
    #[error("bracket {0} is open-ended but is not the last bracket")]
    UnboundedBracketNotLast(usize),

    /// The last bracket must be open-ended so every income is covered.
    #[error("last bracket is capped at {0}; it must be open-ended")]
    LastBracketBounded(Decimal),

    /// A tax, contribution or surcharge rate outside `[0, 1]`.
    #[error("{field} must be between 0 and 1, got {value}")]
    InvalidRate { field: &'static str, value: Decimal },

    /// A phase-out step with a non-positive width.
    #[error("{ladder} phase-out width must be positive, got {width}")]
    InvalidPhaseOutWidth { ladder: &'static str, width: Decimal },

    /// Salary bounds that are non-positive or inverted.
    #[error("salary bounds must satisfy 0 < min < max, got [{min}, {max}]")]
    InvalidSalaryBounds { min: Decimal, max: Decimal },

    /// A non-positive salary or sweep step.
    #[error("{field} must be positive, got {value}")]
    InvalidStep { field: &'static str, value: Decimal },

    /// A gross salary outside the configured bounds.
    #[error("gross salary {salary} is outside the supported range [{min}, {max}]")]
    SalaryOutOfRange {
        salary: Decimal,
        min: Decimal,
        max: Decimal,
    },
}

/// Employee social-security contribution rates by employer size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRates {
    /// Rate for employers with fewer than 15 employees.
    pub small_employer: Decimal,
    /// Rate for employers with 15 employees or more.
    pub large_employer: Decimal,
}

impl Default for ContributionRates {
    fn default() -> Self {
        Self {
            small_employer: dec!(0.0919),
            large_employer: dec!(0.0949),
        }
    }
}

/// Range of gross salaries the front end accepts, and its input step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBounds {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

impl Default for SalaryBounds {
    fn default() -> Self {
        Self {
            min: dec!(5000),
            max: dec!(100000),
            step: dec!(1000),
        }
    }
}

/// Every policy parameter the calculator reads.
///
/// The value is immutable once built and is passed into the calculator
/// explicitly. [`IrpefConfig::default`] is the reference configuration;
/// deserializing a partial document fills the missing keys from it.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpef_core::IrpefConfig;
///
/// let config = IrpefConfig::default();
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.brackets.len(), 3);
/// assert_eq!(config.default_regional_rate, dec!(0.02));
/// assert!(config.check_salary(dec!(4999)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrpefConfig {
    pub default_regional_rate: Decimal,
    pub default_municipal_rate: Decimal,

    /// Step between points of a salary sweep.
    pub sweep_step: Decimal,

    pub contribution_rates: ContributionRates,
    pub salary_bounds: SalaryBounds,

    /// Progressive schedule, ascending by upper bound.
    pub brackets: Vec<IrpefBracket>,

    /// Employment-income deduction, keyed on the IRPEF taxable base.
    pub base_deduction: Ladder,

    /// Additional deduction, keyed on gross salary.
    pub additional_deduction: Ladder,

    /// Fiscal-wedge bonus, keyed on gross salary.
    pub fiscal_wedge_bonus: Ladder,
}

impl Default for IrpefConfig {
    fn default() -> Self {
        Self {
            default_regional_rate: dec!(0.02),
            default_municipal_rate: dec!(0.008),
            sweep_step: dec!(2500),
            contribution_rates: ContributionRates::default(),
            salary_bounds: SalaryBounds::default(),
            brackets: default_brackets(),
            base_deduction: default_base_deduction(),
            additional_deduction: default_additional_deduction(),
            fiscal_wedge_bonus: default_fiscal_wedge_bonus(),
        }
    }
}

fn default_brackets() -> Vec<IrpefBracket> {
    vec![
        IrpefBracket::bounded(dec!(28000), dec!(0.23)),
        IrpefBracket::bounded(dec!(50000), dec!(0.33)),
        IrpefBracket::unbounded(dec!(0.43)),
    ]
}

fn default_base_deduction() -> Ladder {
    Ladder::new(vec![
        LadderStep::up_to(dec!(15000), StepAmount::Flat { value: dec!(1955) }),
        LadderStep::up_to(
            dec!(28000),
            StepAmount::PhaseOut {
                base: dec!(1910),
                amount: dec!(1190),
                ceiling: dec!(28000),
                width: dec!(13000),
            },
        ),
        LadderStep::up_to(
            dec!(50000),
            StepAmount::PhaseOut {
                base: dec!(0),
                amount: dec!(1910),
                ceiling: dec!(50000),
                width: dec!(22000),
            },
        ),
        LadderStep::otherwise(StepAmount::Flat { value: dec!(0) }),
    ])
}

fn default_additional_deduction() -> Ladder {
    Ladder::new(vec![
        LadderStep::up_to(dec!(20000), StepAmount::Flat { value: dec!(0) }),
        LadderStep::up_to(dec!(32000), StepAmount::Flat { value: dec!(1000) }),
        LadderStep::below(
            dec!(40000),
            StepAmount::PhaseOut {
                base: dec!(0),
                amount: dec!(1000),
                ceiling: dec!(40000),
                width: dec!(8000),
            },
        ),
        LadderStep::otherwise(StepAmount::Flat { value: dec!(0) }),
    ])
}

fn default_fiscal_wedge_bonus() -> Ladder {
    Ladder::new(vec![
        LadderStep::up_to(dec!(8500), StepAmount::Rate { rate: dec!(0.071) }),
        LadderStep::up_to(dec!(15000), StepAmount::Rate { rate: dec!(0.053) }),
        LadderStep::below(dec!(20000), StepAmount::Rate { rate: dec!(0.048) }),
        LadderStep::otherwise(StepAmount::Flat { value: dec!(0) }),
    ])
}

impl IrpefConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - the bracket table is empty, unsorted, or not open-ended at the top
    /// - any bracket, contribution, default surcharge or ladder rate is
    ///   outside `[0, 1]`
    /// - a phase-out step has a non-positive width
    /// - the salary bounds are not `0 < min < max`
    /// - the salary step or sweep step is not positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_brackets(&self.brackets)?;

        check_rate("contribution_rates.small_employer", self.contribution_rates.small_employer)?;
        check_rate("contribution_rates.large_employer", self.contribution_rates.large_employer)?;
        check_rate("default_regional_rate", self.default_regional_rate)?;
        check_rate("default_municipal_rate", self.default_municipal_rate)?;

        validate_ladder("base_deduction", &self.base_deduction)?;
        validate_ladder("additional_deduction", &self.additional_deduction)?;
        validate_ladder("fiscal_wedge_bonus", &self.fiscal_wedge_bonus)?;

        let bounds = &self.salary_bounds;
        if bounds.min <= Decimal::ZERO || bounds.min >= bounds.max {
            return Err(ConfigError::InvalidSalaryBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }
        if bounds.step <= Decimal::ZERO {
            return Err(ConfigError::InvalidStep {
                field: "salary_bounds.step",
                value: bounds.step,
            });
        }
        if self.sweep_step <= Decimal::ZERO {
            return Err(ConfigError::InvalidStep {
                field: "sweep_step",
                value: self.sweep_step,
            });
        }
        Ok(())
    }

    /// Returns `salary` unchanged if it lies within the configured bounds.
    ///
    /// Salaries off the input step are accepted; the step only drives
    /// interactive stepping in a front end.
    pub fn check_salary(
        &self,
        salary: Decimal,
    ) -> Result<Decimal, ConfigError> {
        let bounds = &self.salary_bounds;
        if salary < bounds.min || salary > bounds.max {
            return Err(ConfigError::SalaryOutOfRange {
                salary,
                min: bounds.min,
                max: bounds.max,
            });
        }
        if salary
            .checked_rem(bounds.step)
            .is_some_and(|rem| !rem.is_zero())
        {
            tracing::debug!(%salary, step = %bounds.step, "salary is not on the input step");
        }
        Ok(salary)
    }

    /// Contribution rate for the given employer size.
    pub fn contribution_rate(
        &self,
        employer: EmployerSize,
    ) -> Decimal {
        if employer.is_large() {
            self.contribution_rates.large_employer
        } else {
            self.contribution_rates.small_employer
        }
    }
}

/// Checks the shape of a progressive bracket table on its own, so loaders
/// can reject a replacement table before it is merged into a config.
pub fn validate_brackets(brackets: &[IrpefBracket]) -> Result<(), ConfigError> {
    let Some(last) = brackets.last() else {
        return Err(ConfigError::NoBrackets);
    };
    if let Some(bound) = last.upper_bound {
        return Err(ConfigError::LastBracketBounded(bound));
    }

    let mut previous = Decimal::ZERO;
    for (index, bracket) in brackets.iter().enumerate() {
        check_rate("bracket rate", bracket.rate)?;
        match bracket.upper_bound {
            Some(bound) if bound <= previous => {
                return Err(ConfigError::UnsortedBrackets(bound));
            }
            Some(bound) => previous = bound,
            None if index + 1 != brackets.len() => {
                return Err(ConfigError::UnboundedBracketNotLast(index));
            }
            None => {}
        }
    }
    Ok(())
}

fn validate_ladder(
    name: &'static str,
    ladder: &Ladder,
) -> Result<(), ConfigError> {
    for step in &ladder.steps {
        match step.amount {
            StepAmount::Rate { rate } => check_rate(name, rate)?,
            StepAmount::PhaseOut { width, .. } if width <= Decimal::ZERO => {
                return Err(ConfigError::InvalidPhaseOutWidth {
                    ladder: name,
                    width,
                });
            }
            _ => {}
        }
    }
    Ok(())
}

pub(crate) fn check_rate(
    field: &'static str,
    value: Decimal,
) -> Result<(), ConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::InvalidRate { field, value });
    }
    Ok(())
}
