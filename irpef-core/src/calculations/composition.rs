use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{percent_of, round_half_up};
use crate::models::CalculationResult;

/// Which slice of the gross salary a component represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionKind {
    Net,
    Contributions,
    Irpef,
}

impl CompositionKind {
    pub fn label(&self) -> &'static str {
        match self {
            CompositionKind::Net => "Netto",
            CompositionKind::Contributions => "Contributi",
            CompositionKind::Irpef => "IRPEF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionComponent {
    pub kind: CompositionKind,

    /// Amount in euro, divided by the composition divisor.
    pub amount: Decimal,

    /// Share of the gross salary, in percent. Not affected by the divisor.
    pub share: Decimal,
}

impl CompositionComponent {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// How the gross salary splits into net pay, contributions and IRPEF.
///
/// The three shares need not add to exactly 100: the fiscal-wedge bonus is
/// part of net pay but not of the gross salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub components: [CompositionComponent; 3],
}

impl Composition {
    /// Builds the breakdown; pass `divisor = 1` for annual amounts or the
    /// number of monthly payments for per-installment amounts.
    ///
    /// A zero divisor is treated as one.
    pub fn from_result(
        result: &CalculationResult,
        divisor: u32,
    ) -> Self {
        let divisor = Decimal::from(divisor.max(1));
        let gross = result.gross_salary;

        let component = |kind, amount: Decimal| CompositionComponent {
            kind,
            amount: round_half_up(amount / divisor),
            share: percent_of(amount, gross),
        };

        Self {
            components: [
                component(CompositionKind::Net, result.net_annual),
                component(CompositionKind::Contributions, result.contributions),
                component(CompositionKind::Irpef, result.total_irpef),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompositionComponent> {
        self.components.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::net_salary::NetSalaryCalculator;
    use crate::models::{CalculationInput, EmployerSize, IrpefConfig};

    fn reference_result() -> CalculationResult {
        let config = IrpefConfig::default();
        let input = CalculationInput::new(dec!(30000), EmployerSize::Small, &config);
        NetSalaryCalculator::new(&config).calculate(&input)
    }

    #[test]
    fn components_are_in_fixed_order() {
        let composition = Composition::from_result(&reference_result(), 1);

        let kinds: Vec<_> = composition.iter().map(|c| c.kind).collect();

        assert_eq!(
            kinds,
            vec![
                CompositionKind::Net,
                CompositionKind::Contributions,
                CompositionKind::Irpef
            ]
        );
        assert_eq!(composition.components[2].label(), "IRPEF");
    }

    #[test]
    fn annual_amounts_and_shares() {
        let composition = Composition::from_result(&reference_result(), 1);
        let [net, contributions, irpef] = &composition.components;

        assert_eq!(net.amount, dec!(23193.60));
        assert_eq!(net.share, dec!(77.312));
        assert_eq!(contributions.amount, dec!(2757.00));
        assert_eq!(contributions.share, dec!(9.19));
        assert_eq!(irpef.amount, dec!(4049.40));
        assert_eq!(irpef.share, dec!(13.498));
    }

    #[test]
    fn divisor_scales_amounts_but_not_shares() {
        let annual = Composition::from_result(&reference_result(), 1);
        let monthly = Composition::from_result(&reference_result(), 13);

        assert_eq!(monthly.components[0].amount, dec!(1784.12));
        assert_eq!(monthly.components[1].amount, dec!(212.08));
        assert_eq!(monthly.components[2].amount, dec!(311.49));
        for (a, m) in annual.iter().zip(monthly.iter()) {
            assert_eq!(a.share, m.share);
        }
    }

    #[test]
    fn zero_divisor_is_annual() {
        assert_eq!(
            Composition::from_result(&reference_result(), 0),
            Composition::from_result(&reference_result(), 1)
        );
    }
}
