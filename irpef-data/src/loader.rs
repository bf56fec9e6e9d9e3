use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use irpef_core::{ConfigError, IrpefBracket, IrpefConfig, validate_brackets};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigLoaderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(String),

    #[error("CSV parse error: {0}")]
    Csv(String),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

impl From<csv::Error> for ConfigLoaderError {
    fn from(err: csv::Error) -> Self {
        ConfigLoaderError::Csv(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigLoaderError {
    fn from(err: toml::de::Error) -> Self {
        ConfigLoaderError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigLoaderError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigLoaderError::Toml(err.to_string())
    }
}

fn read_file(path: &Path) -> Result<String, ConfigLoaderError> {
    fs::read_to_string(path).map_err(|source| ConfigLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loader for [`IrpefConfig`] documents in TOML.
///
/// Every key is optional; anything left out keeps its value from the
/// reference configuration. The merged result is validated before it is
/// returned.
///
/// ```toml
/// default_regional_rate = "0.0173"
/// sweep_step = "5000"
///
/// [salary_bounds]
/// min = "10000"
/// max = "150000"
/// step = "500"
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn from_toml_str(contents: &str) -> Result<IrpefConfig, ConfigLoaderError> {
        let config: IrpefConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<IrpefConfig, ConfigLoaderError> {
        let contents = read_file(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), "loaded IRPEF configuration");
        Ok(config)
    }

    /// Builds the effective configuration from optional files.
    ///
    /// Starts from the TOML document when given (the reference
    /// configuration otherwise), then swaps in the bracket table from the
    /// CSV file when given.
    pub fn resolve(
        config_path: Option<&Path>,
        brackets_path: Option<&Path>,
    ) -> Result<IrpefConfig, ConfigLoaderError> {
        let mut config = match config_path {
            Some(path) => Self::from_path(path)?,
            None => IrpefConfig::default(),
        };

        if let Some(path) = brackets_path {
            config.brackets = BracketLoader::from_path(path)?;
            config.validate()?;
        }

        Ok(config)
    }

    /// Renders a configuration as a TOML document that
    /// [`ConfigLoader::from_toml_str`] reads back unchanged.
    pub fn to_toml_string(config: &IrpefConfig) -> Result<String, ConfigLoaderError> {
        Ok(toml::to_string_pretty(config)?)
    }
}

/// A single row of a bracket CSV file.
///
/// - `upper_bound`: upper limit of the bracket (empty for the open-ended
///   last bracket)
/// - `rate`: marginal rate as a fraction (e.g. 0.23 for 23%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl From<BracketRecord> for IrpefBracket {
    fn from(record: BracketRecord) -> Self {
        IrpefBracket {
            upper_bound: record.upper_bound,
            rate: record.rate,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for progressive bracket tables from CSV files.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader without validating them.
    pub fn parse_records<R: Read>(reader: R) -> Result<Vec<BracketRecord>, ConfigLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse a bracket table and check that it is ascending with a single
    /// open-ended last bracket.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<IrpefBracket>, ConfigLoaderError> {
        let brackets: Vec<IrpefBracket> = Self::parse_records(reader)?
            .into_iter()
            .map(IrpefBracket::from)
            .collect();

        validate_brackets(&brackets)?;
        debug!(count = brackets.len(), "parsed bracket table");
        Ok(brackets)
    }

    pub fn from_path(path: &Path) -> Result<Vec<IrpefBracket>, ConfigLoaderError> {
        let contents = read_file(path)?;
        let brackets = Self::parse(contents.as_bytes())?;
        info!(path = %path.display(), count = brackets.len(), "loaded bracket table");
        Ok(brackets)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const BRACKETS_CSV: &str = "upper_bound,rate\n28000,0.23\n50000,0.33\n,0.43\n";

    // =========================================================================
    // BracketLoader tests
    // =========================================================================

    #[test]
    fn test_parse_records_single_row() {
        let csv = "upper_bound,rate\n28000,0.23";

        let records = BracketLoader::parse_records(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![BracketRecord {
                upper_bound: Some(dec!(28000)),
                rate: dec!(0.23),
            }]
        );
    }

    #[test]
    fn test_parse_empty_upper_bound_is_open_ended() {
        let csv = "upper_bound,rate\n  ,0.43";

        let records = BracketLoader::parse_records(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].upper_bound, None);
        assert_eq!(records[0].rate, dec!(0.43));
    }

    #[test]
    fn test_parse_reference_table() {
        let brackets = BracketLoader::parse(BRACKETS_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(brackets, IrpefConfig::default().brackets);
    }

    #[test]
    fn test_parse_rejects_bounded_last_bracket() {
        let csv = "upper_bound,rate\n28000,0.23\n50000,0.33";

        let err = BracketLoader::parse(csv.as_bytes()).expect_err("Should reject capped table");

        let ConfigLoaderError::Invalid(inner) = err else {
            panic!("Expected Invalid error, got: {:?}", err);
        };
        assert_eq!(inner, ConfigError::LastBracketBounded(dec!(50000)));
    }

    #[test]
    fn test_parse_rejects_empty_table() {
        let csv = "upper_bound,rate\n";

        let err = BracketLoader::parse(csv.as_bytes()).expect_err("Should reject empty table");

        assert!(matches!(err, ConfigLoaderError::Invalid(ConfigError::NoBrackets)));
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = "upper_bound,rate\nabc,0.23\n,0.43";

        let err = BracketLoader::parse(csv.as_bytes()).expect_err("Should fail for bad decimal");

        let ConfigLoaderError::Csv(msg) = err else {
            panic!("Expected Csv error, got: {:?}", err);
        };
        assert!(!msg.is_empty());
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "upper_bound\n28000";

        let err = BracketLoader::parse(csv.as_bytes()).expect_err("Should fail for missing column");

        let ConfigLoaderError::Csv(msg) = err else {
            panic!("Expected Csv error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    // =========================================================================
    // ConfigLoader tests
    // =========================================================================

    #[test]
    fn test_empty_document_is_reference_config() {
        let config = ConfigLoader::from_toml_str("").expect("Failed to parse TOML");

        assert_eq!(config, IrpefConfig::default());
    }

    #[test]
    fn test_partial_document_overrides_only_given_keys() {
        let toml = r#"
default_regional_rate = "0.0173"

[contribution_rates]
small_employer = "0.1"
large_employer = "0.11"
"#;

        let config = ConfigLoader::from_toml_str(toml).expect("Failed to parse TOML");

        assert_eq!(config.default_regional_rate, dec!(0.0173));
        assert_eq!(config.contribution_rates.small_employer, dec!(0.1));
        assert_eq!(config.default_municipal_rate, dec!(0.008));
        assert_eq!(config.brackets, IrpefConfig::default().brackets);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let toml = "sweep_step = \"0\"";

        let err = ConfigLoader::from_toml_str(toml).expect_err("Should reject zero sweep step");

        assert!(matches!(
            err,
            ConfigLoaderError::Invalid(ConfigError::InvalidStep { field: "sweep_step", .. })
        ));
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        let err = ConfigLoader::from_toml_str("sweep_step = [").expect_err("Should fail");

        assert!(matches!(err, ConfigLoaderError::Toml(_)));
    }

    #[test]
    fn test_default_config_round_trips() {
        let config = IrpefConfig::default();

        let rendered = ConfigLoader::to_toml_string(&config).expect("Failed to render TOML");
        let parsed = ConfigLoader::from_toml_str(&rendered).expect("Failed to parse TOML");

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_resolve_without_files_is_reference_config() {
        let config = ConfigLoader::resolve(None, None).expect("Failed to resolve config");

        assert_eq!(config, IrpefConfig::default());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = Path::new("does/not/exist.toml");

        let err = ConfigLoader::from_path(path).expect_err("Should fail for missing file");

        let ConfigLoaderError::Io { path: reported, .. } = err else {
            panic!("Expected Io error, got: {:?}", err);
        };
        assert_eq!(reported, PathBuf::from("does/not/exist.toml"));
    }
}
