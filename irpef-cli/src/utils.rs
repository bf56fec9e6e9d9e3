use rust_decimal::{Decimal, RoundingStrategy};

/// Parses a free-text percentage into a fraction.
///
/// Accepts an optional `%` sign and a decimal comma (`"2,5%"` → `0.025`).
/// Returns `None` for empty or whitespace-only input, or when parsing fails
/// (logs a warning on parse failure); callers substitute their default.
pub fn parse_percentage(s: &str) -> Option<Decimal> {
    let normalized = s.replace('%', "").replace(',', ".");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<Decimal>().map_or_else(
        |e| {
            tracing::warn!(input = %s, "invalid percentage, using default: {}", e);
            None
        },
        |value| Some(value / Decimal::ONE_HUNDRED),
    )
}

/// Inserts `.` between groups of three digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Renders a rounded amount with Italian separators and exactly
/// `decimals` fraction digits.
fn italian_number(
    value: Decimal,
    decimals: u32,
) -> String {
    let mut scaled = value.abs();
    scaled.rescale(decimals);
    let text = scaled.to_string();

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };
    let sign = if value.is_sign_negative() && !scaled.is_zero() {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(frac) => format!("{sign}{},{frac}", group_thousands(int_part)),
        None => format!("{sign}{}", group_thousands(int_part)),
    }
}

/// Formats euro with two decimals: `1.234,56 €`.
pub fn format_euro(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{} €", italian_number(rounded, 2))
}

/// Formats whole euro: `1.235 €`. Halves round to even.
pub fn format_euro_int(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    format!("{} €", italian_number(rounded, 0))
}

/// Formats a percentage with one decimal and a point separator: `22.7%`.
pub fn format_percent(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    format!("{rounded}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_percentage_accepts_decimal_comma_and_sign() {
        assert_eq!(parse_percentage("2,5%"), Some(dec!(0.025)));
        assert_eq!(parse_percentage(" 0,8 % "), Some(dec!(0.008)));
    }

    #[test]
    fn parse_percentage_accepts_decimal_point() {
        assert_eq!(parse_percentage("3.0"), Some(dec!(0.03)));
        assert_eq!(parse_percentage("120"), Some(dec!(1.2)));
        assert_eq!(parse_percentage("-5"), Some(dec!(-0.05)));
    }

    #[test]
    fn parse_percentage_empty_is_none() {
        assert_eq!(parse_percentage(""), None);
        assert_eq!(parse_percentage("   "), None);
        assert_eq!(parse_percentage("%"), None);
    }

    #[test]
    fn parse_percentage_invalid_is_none() {
        assert_eq!(parse_percentage("abc"), None);
        assert_eq!(parse_percentage("1,2,3"), None);
    }

    #[test]
    fn format_euro_groups_thousands() {
        assert_eq!(format_euro(dec!(1234.56)), "1.234,56 €");
        assert_eq!(format_euro(dec!(23193.6)), "23.193,60 €");
        assert_eq!(format_euro(dec!(1234567.891)), "1.234.567,89 €");
    }

    #[test]
    fn format_euro_small_and_negative_values() {
        assert_eq!(format_euro(dec!(0)), "0,00 €");
        assert_eq!(format_euro(dec!(999.995)), "1.000,00 €");
        assert_eq!(format_euro(dec!(-1500)), "-1.500,00 €");
        assert_eq!(format_euro(dec!(-0.001)), "0,00 €");
    }

    #[test]
    fn format_euro_int_rounds_to_whole_euro() {
        assert_eq!(format_euro_int(dec!(1234.56)), "1.235 €");
        assert_eq!(format_euro_int(dec!(100000)), "100.000 €");
        assert_eq!(format_euro_int(dec!(544.86)), "545 €");
        assert_eq!(format_euro_int(dec!(2.5)), "2 €");
    }

    #[test]
    fn format_percent_one_decimal() {
        assert_eq!(format_percent(dec!(22.688)), "22.7%");
        assert_eq!(format_percent(dec!(9.19)), "9.2%");
        assert_eq!(format_percent(dec!(13.498)), "13.5%");
        assert_eq!(format_percent(dec!(0)), "0.0%");
        assert_eq!(format_percent(dec!(77.25)), "77.3%");
    }
}
