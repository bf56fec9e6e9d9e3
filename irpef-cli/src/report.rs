//! Plain-text and CSV renderings of calculation results.
//!
//! Text output follows the Italian conventions of the pay slip: amounts as
//! `1.234,56 €`, whole-euro amounts in the detail list, shares as `22.7%`.

use std::fmt::Write as _;
use std::io;

use irpef_core::{CalculationResult, Composition, Region, SweepPoint};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::utils::{format_euro, format_euro_int, format_percent};

/// Contribution rate as a percentage with two decimals: `9.19%`.
fn format_rate(rate: Decimal) -> String {
    let mut percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    percent.rescale(2);
    format!("{percent}%")
}

/// Monthly and annual net pay headline.
pub fn render_summary(
    result: &CalculationResult,
    payments: u32,
) -> String {
    format!(
        "Reddito netto per mensilità ({payments}): {}\nReddito netto annuale: {}\n",
        format_euro(result.monthly_net(payments)),
        format_euro(result.net_annual),
    )
}

/// Line-by-line breakdown of the calculation.
pub fn render_detail(
    result: &CalculationResult,
    region: Option<Region>,
) -> String {
    let mut out = String::from("Dettaglio calcolo\n");
    let mut line = |label: &str, value: String| {
        let _ = writeln!(out, "  {label}: {value}");
    };

    if let Some(region) = region {
        line("Regione", region.name().to_string());
    }
    line("RAL", format_euro_int(result.gross_salary));
    line(
        &format!("Contributi ({})", format_rate(result.contribution_rate)),
        format_euro_int(result.contributions),
    );
    line("Imponibile IRPEF", format_euro_int(result.taxable_income));
    line("IRPEF lorda", format_euro_int(result.gross_irpef));
    line(
        "Detrazione totale",
        format!(
            "{} ({} detrazione base + {} ulteriore detrazione)",
            format_euro_int(result.total_deduction),
            format_euro_int(result.base_deduction),
            format_euro_int(result.additional_deduction),
        ),
    );
    line("Bonus cuneo fiscale", format_euro_int(result.fiscal_wedge_bonus));
    line("IRPEF netta", format_euro_int(result.net_irpef));
    line("Addizionale regionale", format_euro_int(result.regional_surcharge));
    line("Addizionale comunale", format_euro_int(result.municipal_surcharge));
    line("IRPEF totale", format_euro_int(result.total_irpef));
    line(
        "Trattenute totali",
        format!(
            "{} ({} sulla RAL)",
            format_euro_int(result.total_withholdings),
            format_percent(result.withholding_share()),
        ),
    );
    line("Stipendio annuale netto", format_euro_int(result.net_annual));

    out
}

/// Composition of the gross salary. `payments` is set when the amounts
/// were divided per installment.
pub fn render_composition(
    composition: &Composition,
    payments: Option<u32>,
) -> String {
    let mut out = match payments {
        Some(n) => format!("Composizione della RAL (valori mensili, {n} mensilità)\n"),
        None => String::from("Composizione della RAL (valori annuali)\n"),
    };
    for component in composition.iter() {
        let _ = writeln!(
            out,
            "  {}: {} ({})",
            component.label(),
            format_euro_int(component.amount),
            format_percent(component.share),
        );
    }
    out
}

/// Fixed-width table of net pay, contributions and IRPEF per salary level.
pub fn render_sweep_table(points: &[SweepPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>10}  {:>10} {:>6}  {:>10} {:>6}  {:>10} {:>6}",
        "RAL", "Netto", "%", "Contributi", "%", "IRPEF", "%"
    );

    for point in points {
        let composition = Composition::from_result(&point.result, 1);
        let _ = write!(out, "{:>10}", format_euro_int(point.gross_salary));
        for component in composition.iter() {
            let _ = write!(
                out,
                "  {:>10} {:>6}",
                format_euro_int(component.amount),
                format_percent(component.share)
            );
        }
        out.push('\n');
    }
    out
}

/// One CSV row of a salary sweep.
#[derive(Debug, Serialize)]
struct SweepRecord {
    gross_salary: Decimal,
    net_annual: Decimal,
    net_share: Decimal,
    contributions: Decimal,
    contributions_share: Decimal,
    total_irpef: Decimal,
    irpef_share: Decimal,
}

impl From<&SweepPoint> for SweepRecord {
    fn from(point: &SweepPoint) -> Self {
        let [net, contributions, irpef] = Composition::from_result(&point.result, 1).components;
        let share = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        SweepRecord {
            gross_salary: point.gross_salary,
            net_annual: net.amount,
            net_share: share(net.share),
            contributions: contributions.amount,
            contributions_share: share(contributions.share),
            total_irpef: irpef.amount,
            irpef_share: share(irpef.share),
        }
    }
}

pub fn write_sweep_csv<W: io::Write>(
    writer: W,
    points: &[SweepPoint],
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in points {
        wtr.serialize(SweepRecord::from(point))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes full results, one row per calculation, headed by the field names
/// of [`CalculationResult`].
pub fn write_results_csv<W: io::Write>(
    writer: W,
    results: &[CalculationResult],
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use irpef_core::{CalculationInput, EmployerSize, IrpefConfig, NetSalaryCalculator, salary_sweep};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn reference_result() -> CalculationResult {
        let config = IrpefConfig::default();
        let input = CalculationInput::new(dec!(30000), EmployerSize::Small, &config);
        NetSalaryCalculator::new(&config).calculate(&input)
    }

    fn reference_sweep() -> Vec<SweepPoint> {
        let config = IrpefConfig::default();
        let template = CalculationInput::new(dec!(30000), EmployerSize::Small, &config);
        salary_sweep(&config, &template)
    }

    #[test]
    fn format_rate_keeps_two_decimals() {
        assert_eq!(format_rate(dec!(0.0919)), "9.19%");
        assert_eq!(format_rate(dec!(0.09)), "9.00%");
    }

    #[test]
    fn summary_shows_monthly_and_annual_net() {
        let summary = render_summary(&reference_result(), 13);

        assert_eq!(
            summary,
            "Reddito netto per mensilità (13): 1.784,12 €\nReddito netto annuale: 23.193,60 €\n"
        );
    }

    #[test]
    fn detail_lists_every_line() {
        let detail = render_detail(&reference_result(), None);

        let expected = "\
Dettaglio calcolo
  RAL: 30.000 €
  Contributi (9.19%): 2.757 €
  Imponibile IRPEF: 27.243 €
  IRPEF lorda: 6.266 €
  Detrazione totale: 2.979 € (1.979 € detrazione base + 1.000 € ulteriore detrazione)
  Bonus cuneo fiscale: 0 €
  IRPEF netta: 3.287 €
  Addizionale regionale: 545 €
  Addizionale comunale: 218 €
  IRPEF totale: 4.049 €
  Trattenute totali: 6.806 € (22.7% sulla RAL)
  Stipendio annuale netto: 23.194 €
";
        assert_eq!(detail, expected);
    }

    #[test]
    fn detail_echoes_region() {
        let detail = render_detail(&reference_result(), Some(Region::EmiliaRomagna));

        assert!(detail.contains("  Regione: Emilia-Romagna\n"));
    }

    #[test]
    fn composition_annual_and_monthly() {
        let result = reference_result();

        let annual = render_composition(&Composition::from_result(&result, 1), None);
        let monthly = render_composition(&Composition::from_result(&result, 13), Some(13));

        assert_eq!(
            annual,
            "Composizione della RAL (valori annuali)\n  Netto: 23.194 € (77.3%)\n  Contributi: 2.757 € (9.2%)\n  IRPEF: 4.049 € (13.5%)\n"
        );
        assert_eq!(
            monthly,
            "Composizione della RAL (valori mensili, 13 mensilità)\n  Netto: 1.784 € (77.3%)\n  Contributi: 212 € (9.2%)\n  IRPEF: 311 € (13.5%)\n"
        );
    }

    #[test]
    fn sweep_table_has_header_and_one_line_per_point() {
        let table = render_sweep_table(&reference_sweep());

        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 40);
        assert!(lines[0].trim_start().starts_with("RAL"));
        assert!(lines[1].trim_start().starts_with("5.000 €"));
        assert!(lines[39].trim_start().starts_with("100.000 €"));
    }

    #[test]
    fn sweep_csv_has_header_and_rows() {
        let mut buffer = Vec::new();

        write_sweep_csv(&mut buffer, &reference_sweep()).expect("write sweep CSV");

        let text = String::from_utf8(buffer).expect("utf-8");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 40);
        assert_eq!(
            lines[0],
            "gross_salary,net_annual,net_share,contributions,contributions_share,total_irpef,irpef_share"
        );
    }

    #[test]
    fn results_csv_uses_result_field_names() {
        let mut buffer = Vec::new();

        write_results_csv(&mut buffer, &[reference_result()]).expect("write results CSV");

        let text = String::from_utf8(buffer).expect("utf-8");
        let mut lines = text.lines();
        let header = lines.next().expect("header");
        let row = lines.next().expect("row");
        assert!(header.starts_with("gross_salary,net_annual,contributions,contribution_rate"));
        assert!(row.starts_with("30000,23193.60,2757.00,0.0919"));
    }
}
