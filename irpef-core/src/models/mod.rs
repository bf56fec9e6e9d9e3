mod calculation_input;
mod calculation_result;
mod employer_size;
mod irpef_bracket;
mod irpef_config;
mod ladder;
mod region;

pub use calculation_input::{CalculationInput, clamp_exempt_fraction};
pub use calculation_result::CalculationResult;
pub use employer_size::EmployerSize;
pub use irpef_bracket::IrpefBracket;
pub use irpef_config::{ConfigError, ContributionRates, IrpefConfig, SalaryBounds, validate_brackets};
pub use ladder::{Ladder, LadderStep, StepAmount};
pub use region::{Region, UnknownRegion};
