//! Evaluates the calculator across the configured salary range.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::net_salary::NetSalaryCalculator;
use crate::models::{CalculationInput, CalculationResult, IrpefConfig};

/// One salary level of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub gross_salary: Decimal,
    pub result: CalculationResult,
}

/// Sweeps `[min, max]` of the salary bounds at the configured sweep step.
///
/// Everything but the gross salary is taken from `template`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpef_core::{CalculationInput, EmployerSize, IrpefConfig, salary_sweep};
///
/// let config = IrpefConfig::default();
/// let template = CalculationInput::new(dec!(30000), EmployerSize::Small, &config);
///
/// let points = salary_sweep(&config, &template);
///
/// assert_eq!(points.len(), 39);
/// assert_eq!(points[0].gross_salary, dec!(5000));
/// assert_eq!(points[38].gross_salary, dec!(100000));
/// ```
pub fn salary_sweep(
    config: &IrpefConfig,
    template: &CalculationInput,
) -> Vec<SweepPoint> {
    salary_sweep_by(config, template, config.sweep_step)
}

/// Like [`salary_sweep`] with an explicit step.
///
/// The last point is the last grid value not above `max`. A non-positive
/// step yields no points.
pub fn salary_sweep_by(
    config: &IrpefConfig,
    template: &CalculationInput,
    step: Decimal,
) -> Vec<SweepPoint> {
    if step <= Decimal::ZERO {
        warn!(%step, "sweep step must be positive");
        return Vec::new();
    }

    let calculator = NetSalaryCalculator::new(config);
    let bounds = &config.salary_bounds;

    let mut points = Vec::new();
    let mut gross = bounds.min;
    while gross <= bounds.max {
        let result = calculator.calculate(&template.with_gross_salary(gross));
        points.push(SweepPoint {
            gross_salary: gross,
            result,
        });
        gross += step;
    }

    debug!(points = points.len(), min = %bounds.min, max = %bounds.max, %step, "salary sweep");
    points
}
