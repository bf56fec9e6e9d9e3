use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{debug, info};

use irpef_cli::{csv_loader, logging, report, utils::parse_percentage};
use irpef_core::{
    CalculationInput, Composition, EmployerSize, IrpefConfig, NetSalaryCalculator, Region,
    salary_sweep_by,
};
use irpef_data::ConfigLoader;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Italian net salary calculator.
///
/// Turns a gross annual salary (RAL) into net pay after social-security
/// contributions, IRPEF with its deductions, the fiscal-wedge bonus and
/// the regional and municipal surcharges.
#[derive(Debug, Parser)]
#[command(name = "irpef", version, about)]
struct Cli {
    /// TOML file overriding the reference policy parameters.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter: a bare level (e.g. `debug`) or any EnvFilter directive.
    /// Defaults to `RUST_LOG`, then `info`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute net pay for one gross salary.
    Compute(ComputeArgs),

    /// Tabulate net pay, contributions and IRPEF across the salary range.
    Sweep(SweepArgs),

    /// Compute every row of a CSV file and print the results as CSV.
    Batch {
        /// Input CSV (`gross_salary,employer,regional,municipal,exempt`).
        #[arg(long)]
        file: PathBuf,
    },

    /// List the accepted region names.
    Regions,
}

/// Options shared by `compute` and `sweep`.
///
/// Percentages are free text (`1,73%`, `0.8`); a value that does not parse
/// falls back to the configured default.
#[derive(Debug, Args)]
struct RateArgs {
    /// Employer size: `small` (< 15 employees) or `large` (≥ 15).
    #[arg(long, default_value = "small", value_parser = parse_employer)]
    employer: EmployerSize,

    /// Region of residence. Shown in the output only.
    #[arg(long)]
    region: Option<Region>,

    /// Regional surcharge, in percent.
    #[arg(long, allow_hyphen_values = true)]
    regional: Option<String>,

    /// Municipal surcharge, in percent.
    #[arg(long, allow_hyphen_values = true)]
    municipal: Option<String>,

    /// Share of income exempt from IRPEF, in percent.
    #[arg(long, allow_hyphen_values = true)]
    exempt: Option<String>,
}

impl RateArgs {
    fn to_input(
        &self,
        gross_salary: Decimal,
        config: &IrpefConfig,
    ) -> CalculationInput {
        CalculationInput::resolve(
            gross_salary,
            self.employer,
            self.regional.as_deref().and_then(parse_percentage),
            self.municipal.as_deref().and_then(parse_percentage),
            self.exempt.as_deref().and_then(parse_percentage),
            config,
        )
    }
}

#[derive(Debug, Args)]
struct ComputeArgs {
    /// Gross annual salary in euro.
    #[arg(long)]
    salary: Decimal,

    #[command(flatten)]
    rates: RateArgs,

    /// Monthly installments per year.
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u32).range(12..=14))]
    payments: u32,

    /// Show the composition per installment instead of per year.
    #[arg(long)]
    monthly: bool,
}

#[derive(Debug, Args)]
struct SweepArgs {
    #[command(flatten)]
    rates: RateArgs,

    /// Salary step between rows; defaults to the configured sweep step.
    #[arg(long)]
    step: Option<Decimal>,

    /// Print CSV instead of a table.
    #[arg(long)]
    csv: bool,
}

fn parse_employer(s: &str) -> Result<EmployerSize, String> {
    EmployerSize::parse(s).ok_or_else(|| {
        let accepted: Vec<_> = EmployerSize::all().iter().map(EmployerSize::as_str).collect();
        format!("expected one of {}, got '{s}'", accepted.join(", "))
    })
}

// ─── commands ────────────────────────────────────────────────────────────────

fn run_compute(
    config: &IrpefConfig,
    args: &ComputeArgs,
) -> Result<()> {
    let gross = config.check_salary(args.salary).context("Invalid gross salary")?;
    let input = args.rates.to_input(gross, config);
    debug!(?input, "compute");

    let result = NetSalaryCalculator::new(config).calculate(&input);

    print!("{}", report::render_summary(&result, args.payments));
    println!();
    print!("{}", report::render_detail(&result, args.rates.region));
    println!();

    let divisor = if args.monthly { args.payments } else { 1 };
    let composition = Composition::from_result(&result, divisor);
    print!(
        "{}",
        report::render_composition(&composition, args.monthly.then_some(args.payments))
    );

    Ok(())
}

fn run_sweep(
    config: &IrpefConfig,
    args: &SweepArgs,
) -> Result<()> {
    let step = args.step.unwrap_or(config.sweep_step);
    if step <= Decimal::ZERO {
        anyhow::bail!("sweep step must be positive, got {step}");
    }

    let template = args.rates.to_input(config.salary_bounds.min, config);
    let points = salary_sweep_by(config, &template, step);

    if args.csv {
        report::write_sweep_csv(io::stdout().lock(), &points).context("Failed to write CSV")?;
    } else {
        print!("{}", report::render_sweep_table(&points));
    }
    Ok(())
}

fn run_batch(
    config: &IrpefConfig,
    file: &Path,
) -> Result<()> {
    let inputs = csv_loader::load_from_file(file, config)
        .with_context(|| format!("Failed to load batch file: {}", file.display()))?;

    let calculator = NetSalaryCalculator::new(config);
    let results: Vec<_> = inputs.iter().map(|input| calculator.calculate(input)).collect();
    info!(rows = results.len(), "batch computed");

    report::write_results_csv(io::stdout().lock(), &results).context("Failed to write CSV")?;
    Ok(())
}

fn run_regions() {
    for region in Region::all() {
        println!("{region}");
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref())?;
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let config =
        ConfigLoader::resolve(cli.config.as_deref(), None).context("Failed to load configuration")?;
    debug!(
        min = %config.salary_bounds.min,
        max = %config.salary_bounds.max,
        brackets = config.brackets.len(),
        "configuration ready"
    );

    match &cli.command {
        Command::Compute(args) => run_compute(&config, args),
        Command::Sweep(args) => run_sweep(&config, args),
        Command::Batch { file } => run_batch(&config, file),
        Command::Regions => {
            run_regions();
            Ok(())
        }
    }
}
