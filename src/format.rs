//! Number rendering in the Venezuelan locale: `.` groups thousands, `,` separates decimals.

use rust_decimal::{Decimal, RoundingStrategy};

/// Two fixed decimals, e.g. `1234.5` -> `"1.234,50"`.
pub fn format_currency(amount: Decimal) -> String {
    render(amount)
}

/// Inserts `.` every three digits from the right: `"1234567"` -> `"1.234.567"`.
pub fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }

    result.chars().rev().collect()
}

fn render(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if !fraction.is_empty() {
        out.push(',');
        out.push_str(fraction);
    }

    out
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn currency_uses_venezuelan_separators() {
        assert_eq!(format_currency(dec!(36.5)), "36,50");
        assert_eq!(format_currency(dec!(1234.5)), "1.234,50");
        assert_eq!(format_currency(dec!(1234567.891)), "1.234.567,89");
        assert_eq!(format_currency(dec!(0)), "0,00");
        assert_eq!(format_currency(dec!(999.999)), "1.000,00");
    }

    #[test]
    fn currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(0.005)), "0,01");
        assert_eq!(format_currency(dec!(-1234.5)), "-1.234,50");
        assert_eq!(format_currency(dec!(-0.001)), "0,00");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1.234");
        assert_eq!(group_thousands("1234567"), "1.234.567");
    }
}
