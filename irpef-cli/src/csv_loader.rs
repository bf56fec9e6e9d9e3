//! CSV loader for batch calculation inputs.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive and must match exactly.
//!
//! | Column         | Required | Type       | Notes                                           |
//! |----------------|----------|------------|-------------------------------------------------|
//! | `gross_salary` | yes      | decimal    | Gross annual salary (RAL), e.g. `30000`         |
//! | `employer`     | no       | string     | `small` / `large` (also `<15`, `>=15`); empty = small |
//! | `regional`     | no       | percentage | e.g. `1,73%`; empty or invalid = configured default |
//! | `municipal`    | no       | percentage | e.g. `0.8`; empty or invalid = configured default   |
//! | `exempt`       | no       | percentage | Share of exempt income, e.g. `50%`; clamped     |
//!
//! Percentage cells are parsed exactly like the command-line flags.
//!
//! ### Example
//!
//! ```csv
//! gross_salary,employer,regional,municipal,exempt
//! 30000,small,,,
//! 60000,large,"1,73%",0.8,
//! 45000,small,,,50
//! ```
use std::path::Path;

use irpef_core::{CalculationInput, ConfigError, EmployerSize, IrpefConfig};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::parse_percentage;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    gross_salary: Decimal,
    employer: Option<String>,
    regional: Option<String>,
    municipal: Option<String>,
    exempt: Option<String>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read batch file: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// An `employer` cell that is neither small nor large. `row` is 1-based
    /// (header = row 0).
    #[error("unrecognised employer size '{value}' on row {row}")]
    InvalidEmployer { value: String, row: usize },

    /// A gross salary outside the configured bounds.
    #[error("row {row}: {source}")]
    OutOfRange {
        row: usize,
        #[source]
        source: ConfigError,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Convert a single CSV row into a CalculationInput.
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
    config: &IrpefConfig,
) -> Result<CalculationInput, CsvLoadError> {
    let gross_salary = config
        .check_salary(row.gross_salary)
        .map_err(|source| CsvLoadError::OutOfRange {
            row: row_number,
            source,
        })?;

    let employer_size = match row.employer.as_deref().map(str::trim) {
        None | Some("") => EmployerSize::default(),
        Some(value) => EmployerSize::parse(value).ok_or_else(|| CsvLoadError::InvalidEmployer {
            value: value.to_string(),
            row: row_number,
        })?,
    };

    Ok(CalculationInput::resolve(
        gross_salary,
        employer_size,
        row.regional.as_deref().and_then(parse_percentage),
        row.municipal.as_deref().and_then(parse_percentage),
        row.exempt.as_deref().and_then(parse_percentage),
        config,
    ))
}

/// Parse CSV text (the full file contents as a &str) into calculation
/// inputs, in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid or
///   `gross_salary` is missing or not a number.
/// * [CsvLoadError::InvalidEmployer] – if an employer cell is not recognised.
/// * [CsvLoadError::OutOfRange] – if a salary is outside the configured bounds.
pub fn load_from_str(
    input: &str,
    config: &IrpefConfig,
) -> Result<Vec<CalculationInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1, config)
        })
        .collect()
}

/// Read a file from disk and delegate to [load_from_str].
pub fn load_from_file(
    path: &Path,
    config: &IrpefConfig,
) -> Result<Vec<CalculationInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path)?;
    let inputs = load_from_str(&contents, config)?;
    tracing::info!(path = %path.display(), rows = inputs.len(), "loaded batch inputs");
    Ok(inputs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
