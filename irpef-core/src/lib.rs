pub mod calculations;
pub mod models;

pub use calculations::{
    Composition, CompositionComponent, CompositionKind, NetSalaryCalculator, SweepPoint, compute,
    salary_sweep, salary_sweep_by,
};
pub use models::*;
