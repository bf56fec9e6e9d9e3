//! Loading of IRPEF configuration files: TOML documents for the full
//! configuration and CSV files for replacement bracket tables.

mod loader;

pub use loader::{BracketLoader, BracketRecord, ConfigLoader, ConfigLoaderError};
