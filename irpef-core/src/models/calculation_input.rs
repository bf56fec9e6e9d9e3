use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::irpef_config::check_rate;
use crate::models::{EmployerSize, IrpefConfig};

/// Scalar inputs of one net-salary calculation.
///
/// All rates are fractions (`0.02` for 2%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Gross annual salary (RAL).
    pub gross_salary: Decimal,

    pub employer_size: EmployerSize,

    /// Regional IRPEF surcharge rate applied to the taxable base.
    pub regional_rate: Decimal,

    /// Municipal IRPEF surcharge rate applied to the taxable base.
    pub municipal_rate: Decimal,

    /// Share of income exempt from IRPEF, in `[0, 1]`.
    pub exempt_fraction: Decimal,
}

impl CalculationInput {
    /// Builds an input with the configured default surcharges and no exempt
    /// income.
    pub fn new(
        gross_salary: Decimal,
        employer_size: EmployerSize,
        config: &IrpefConfig,
    ) -> Self {
        Self {
            gross_salary,
            employer_size,
            regional_rate: config.default_regional_rate,
            municipal_rate: config.default_municipal_rate,
            exempt_fraction: Decimal::ZERO,
        }
    }

    /// Builds an input from optionally supplied rates.
    ///
    /// Missing surcharge rates, and rates outside `[0, 1]`, fall back to the
    /// configured defaults. The exempt fraction goes through
    /// [`clamp_exempt_fraction`].
    pub fn resolve(
        gross_salary: Decimal,
        employer_size: EmployerSize,
        regional_rate: Option<Decimal>,
        municipal_rate: Option<Decimal>,
        exempt_fraction: Option<Decimal>,
        config: &IrpefConfig,
    ) -> Self {
        Self {
            gross_salary,
            employer_size,
            regional_rate: surcharge_rate("regional_rate", regional_rate, config.default_regional_rate),
            municipal_rate: surcharge_rate(
                "municipal_rate",
                municipal_rate,
                config.default_municipal_rate,
            ),
            exempt_fraction: clamp_exempt_fraction(exempt_fraction),
        }
    }

    /// Same input at a different gross salary; used when sweeping.
    pub fn with_gross_salary(
        &self,
        gross_salary: Decimal,
    ) -> Self {
        Self {
            gross_salary,
            ..self.clone()
        }
    }
}

fn surcharge_rate(
    field: &'static str,
    rate: Option<Decimal>,
    default: Decimal,
) -> Decimal {
    match rate.map(|value| check_rate(field, value).map(|()| value)) {
        None => default,
        Some(Ok(value)) => value,
        Some(Err(err)) => {
            tracing::warn!(%err, %default, "surcharge rate out of range, using default");
            default
        }
    }
}

/// Normalizes the exempt-income fraction.
///
/// Missing → 0, negative → 0, above one → 0.5. The 0.5 cap is a fallback
/// value for nonsensical input, not a saturation at 1.
pub fn clamp_exempt_fraction(fraction: Option<Decimal>) -> Decimal {
    match fraction {
        None => Decimal::ZERO,
        Some(f) if f < Decimal::ZERO => Decimal::ZERO,
        Some(f) if f > Decimal::ONE => dec!(0.5),
        Some(f) => f,
    }
}
