//! Net-salary calculations over an [`IrpefConfig`](crate::models::IrpefConfig).
//!
//! [`NetSalaryCalculator`] produces the line-by-line breakdown for one
//! input; [`salary_sweep`] and [`Composition`] are views built on top of it.

pub mod common;
mod composition;
mod net_salary;
mod sweep;

pub use composition::{Composition, CompositionComponent, CompositionKind};
pub use net_salary::{NetSalaryCalculator, compute};
pub use sweep::{SweepPoint, salary_sweep, salary_sweep_by};
