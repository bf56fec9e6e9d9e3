//! Ordered threshold tables for the piecewise policy rules.
//!
//! Deductions and the fiscal-wedge bonus are all "ladders": a list of steps
//! checked in order, where the first step whose bound admits the value
//! decides the formula. Keeping them as data makes every boundary visible
//! in one place and lets each segment be tested on its own.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Formula applied by a ladder step to the value being looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepAmount {
    /// A fixed amount regardless of the value.
    Flat { value: Decimal },

    /// `value × rate`.
    Rate { rate: Decimal },

    /// Linear phase-out: `base + amount × (ceiling − value) / width`.
    ///
    /// At `value = ceiling` the result is `base`; at `value = ceiling − width`
    /// it is `base + amount`.
    PhaseOut {
        base: Decimal,
        amount: Decimal,
        ceiling: Decimal,
        width: Decimal,
    },
}

impl StepAmount {
    pub fn evaluate(
        &self,
        value: Decimal,
    ) -> Decimal {
        match self {
            StepAmount::Flat { value: flat } => *flat,
            StepAmount::Rate { rate } => value * rate,
            StepAmount::PhaseOut {
                base,
                amount,
                ceiling,
                width,
            } => {
                // Zero width is rejected by config validation.
                let fraction = (*ceiling - value)
                    .checked_div(*width)
                    .unwrap_or(Decimal::ZERO);
                *base + *amount * fraction
            }
        }
    }
}

/// A single rung: applies `amount` when the value is below `up_to`
/// (or equal to it when `inclusive`). `up_to = None` admits everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to: Option<Decimal>,

    #[serde(default = "default_inclusive")]
    pub inclusive: bool,

    pub amount: StepAmount,
}

fn default_inclusive() -> bool {
    true
}

impl LadderStep {
    /// Step covering values `≤ up_to`.
    pub fn up_to(
        up_to: Decimal,
        amount: StepAmount,
    ) -> Self {
        Self {
            up_to: Some(up_to),
            inclusive: true,
            amount,
        }
    }

    /// Step covering values `< below`.
    pub fn below(
        below: Decimal,
        amount: StepAmount,
    ) -> Self {
        Self {
            up_to: Some(below),
            inclusive: false,
            amount,
        }
    }

    /// Catch-all step.
    pub fn otherwise(amount: StepAmount) -> Self {
        Self {
            up_to: None,
            inclusive: true,
            amount,
        }
    }

    pub fn admits(
        &self,
        value: Decimal,
    ) -> bool {
        match self.up_to {
            None => true,
            Some(limit) if self.inclusive => value <= limit,
            Some(limit) => value < limit,
        }
    }
}

/// Ordered list of [`LadderStep`]s; the first admitting step wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ladder {
    pub steps: Vec<LadderStep>,
}

impl Ladder {
    pub fn new(steps: Vec<LadderStep>) -> Self {
        Self { steps }
    }

    /// Returns the amount of the first step admitting `value`, or zero when
    /// no step does.
    pub fn evaluate(
        &self,
        value: Decimal,
    ) -> Decimal {
        self.step_for(value)
            .map(|step| step.amount.evaluate(value))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn step_for(
        &self,
        value: Decimal,
    ) -> Option<&LadderStep> {
        self.steps.iter().find(|step| step.admits(value))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample_ladder() -> Ladder {
        Ladder::new(vec![
            LadderStep::up_to(dec!(100), StepAmount::Flat { value: dec!(10) }),
            LadderStep::below(dec!(200), StepAmount::Rate { rate: dec!(0.5) }),
            LadderStep::up_to(
                dec!(300),
                StepAmount::PhaseOut {
                    base: dec!(0),
                    amount: dec!(50),
                    ceiling: dec!(300),
                    width: dec!(100),
                },
            ),
        ])
    }

    // =========================================================================
    // StepAmount tests
    // =========================================================================

    #[test]
    fn flat_ignores_value() {
        let amount = StepAmount::Flat { value: dec!(1955) };

        assert_eq!(amount.evaluate(dec!(0)), dec!(1955));
        assert_eq!(amount.evaluate(dec!(14999.99)), dec!(1955));
    }

    #[test]
    fn rate_scales_value() {
        let amount = StepAmount::Rate { rate: dec!(0.071) };

        assert_eq!(amount.evaluate(dec!(8000)), dec!(568.000));
    }

    #[test]
    fn phase_out_hits_base_at_ceiling_and_full_amount_at_floor() {
        let amount = StepAmount::PhaseOut {
            base: dec!(1910),
            amount: dec!(1190),
            ceiling: dec!(28000),
            width: dec!(13000),
        };

        assert_eq!(amount.evaluate(dec!(28000)), dec!(1910));
        assert_eq!(amount.evaluate(dec!(15000)), dec!(3100));
        assert_eq!(amount.evaluate(dec!(21500)), dec!(2505));
    }

    #[test]
    fn phase_out_with_zero_width_yields_base() {
        let amount = StepAmount::PhaseOut {
            base: dec!(7),
            amount: dec!(100),
            ceiling: dec!(10),
            width: dec!(0),
        };

        assert_eq!(amount.evaluate(dec!(5)), dec!(7));
    }

    // =========================================================================
    // Ladder tests
    // =========================================================================

    #[test]
    fn inclusive_bound_admits_equal_value() {
        let ladder = sample_ladder();

        assert_eq!(ladder.evaluate(dec!(100)), dec!(10));
    }

    #[test]
    fn exclusive_bound_rejects_equal_value() {
        let ladder = sample_ladder();

        // 200 is not < 200, so the phase-out step applies: 50 * 100 / 100
        assert_eq!(ladder.evaluate(dec!(200)), dec!(50));
        assert_eq!(ladder.evaluate(dec!(199)), dec!(99.5));
    }

    #[test]
    fn value_past_last_step_yields_zero() {
        let ladder = sample_ladder();

        assert_eq!(ladder.evaluate(dec!(300.01)), Decimal::ZERO);
        assert!(ladder.step_for(dec!(300.01)).is_none());
    }

    #[test]
    fn otherwise_step_catches_everything() {
        let ladder = Ladder::new(vec![LadderStep::otherwise(StepAmount::Flat {
            value: dec!(1),
        })]);

        assert_eq!(ladder.evaluate(dec!(1000000)), dec!(1));
    }

    #[test]
    fn empty_ladder_yields_zero() {
        assert_eq!(Ladder::default().evaluate(dec!(42)), Decimal::ZERO);
    }
}
