//! Display formatting for amounts and dates.

use chrono::NaiveDate;

pub const CURRENCY: &str = "UGX";

/// `UGX 1,357,000`, `UGX 1,234.5`: grouped thousands, at most three
/// fraction digits, trailing zeros dropped.
pub fn format_amount(value: f64) -> String {
    format!("{} {}", CURRENCY, group_number(value))
}

pub fn group_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value.abs() * 1000.0).round() as u128;
    let whole = rounded / 1000;
    let frac = rounded % 1000;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac > 0 {
        let fraction = format!("{:03}", frac);
        grouped.push('.');
        grouped.push_str(fraction.trim_end_matches('0'));
    }
    if value < 0.0 && rounded > 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Quantities print without grouping: `2`, `1.5`.
pub fn format_quantity(value: f64) -> String {
    let text = format!("{:.3}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `March 1, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(1_357_000.0), "UGX 1,357,000");
        assert_eq!(format_amount(207_000.0), "UGX 207,000");
        assert_eq!(format_amount(0.0), "UGX 0");
        assert_eq!(format_amount(999.0), "UGX 999");
        assert_eq!(format_amount(1000.0), "UGX 1,000");
    }

    #[test]
    fn keeps_up_to_three_fraction_digits() {
        assert_eq!(group_number(1234.5), "1,234.5");
        assert_eq!(group_number(0.1234), "0.123");
        assert_eq!(group_number(2.0625), "2.063");
        assert_eq!(group_number(-1500.25), "-1,500.25");
    }

    #[test]
    fn quantities_and_dates() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(1.5), "1.5");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(format_date(date), "March 1, 2024");
    }
}
