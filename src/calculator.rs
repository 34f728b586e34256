use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::{
    exchange_rate::{Card, ExchangeRate},
    format::group_thousands,
};

/// Keys stop registering once the amount holds more than this many digits.
const MAX_DIGITS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    UsdToVes,
    VesToUsd,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::UsdToVes => Direction::VesToUsd,
            Direction::VesToUsd => Direction::UsdToVes,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::UsdToVes => "USD A BOLÍVARES",
            Direction::VesToUsd => "BOLÍVARES A USD",
        }
    }

    pub fn input_symbol(self) -> &'static str {
        match self {
            Direction::UsdToVes => "$",
            Direction::VesToUsd => "Bs",
        }
    }

    pub fn result_symbol(self, card: Card) -> &'static str {
        match self {
            Direction::UsdToVes => "Bs",
            Direction::VesToUsd => card.foreign_symbol(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Comma,
    Del,
    /// Long press on DEL.
    Clear,
}

impl FromStr for Key {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "," => Ok(Key::Comma),
            "DEL" => Ok(Key::Del),
            "CLEAR" => Ok(Key::Clear),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Ok(Key::Digit(c)),
                    _ => Err(anyhow::anyhow!("Unknown key: {}", s)),
                }
            }
        }
    }
}

/// One converted amount per rate card.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub card: Card,
    pub rate: Decimal,
    pub value: Option<Decimal>,
    pub symbol: &'static str,
}

/// The keypad-driven amount and the direction it converts in.
///
/// The amount is kept as typed: digits with an optional `,` decimal separator.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculator {
    amount: String,
    direction: Direction,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            amount: "0".to_string(),
            direction: Direction::default(),
        }
    }
}

impl Calculator {
    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Flips the direction and starts over from zero.
    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
        self.amount = "0".to_string();
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Del => {
                if self.amount.chars().count() > 1 {
                    self.amount.pop();
                } else {
                    self.amount = "0".to_string();
                }
            }
            Key::Clear => self.amount = "0".to_string(),
            Key::Comma | Key::Digit(_) => {
                if key == Key::Comma && self.amount.contains(',') {
                    return;
                }
                let digits = self.amount.chars().filter(char::is_ascii_digit).count();
                if digits > MAX_DIGITS {
                    return;
                }

                let ch = match key {
                    Key::Digit(c) => c,
                    _ => ',',
                };
                if self.amount == "0" && key != Key::Comma {
                    self.amount = ch.to_string();
                } else {
                    self.amount.push(ch);
                }
            }
        }
    }

    /// Types `text` key by key. `.` groups thousands unless it is the only
    /// separator in the text and is not followed by exactly three digits, in
    /// which case it is the decimal point.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        let dot_is_decimal = dot_is_decimal(text);
        for ch in text.chars() {
            let key = match ch {
                '0'..='9' => Key::Digit(ch),
                ',' => Key::Comma,
                '.' if dot_is_decimal => Key::Comma,
                '.' => continue,
                _ => anyhow::bail!("Not a valid amount: {}", text),
            };
            self.press(key);
        }

        Ok(())
    }

    pub fn parse_amount(&self) -> Decimal {
        let normalized = self.amount.replace('.', "").replacen(',', ".", 1);
        let normalized = normalized.strip_suffix('.').unwrap_or(&normalized);
        Decimal::from_str(normalized).unwrap_or_default()
    }

    /// The amount as shown above the keypad, thousands grouped.
    pub fn display(&self) -> String {
        if self.amount.is_empty() {
            return "0".to_string();
        }

        match self.amount.split_once(',') {
            Some((integer, fraction)) => format!("{},{}", group_thousands(integer), fraction),
            None => group_thousands(&self.amount),
        }
    }

    /// `None` when the result does not fit a Decimal.
    pub fn convert(&self, rate: Decimal) -> Option<Decimal> {
        let amount = self.parse_amount();
        if amount.is_zero() || rate.is_zero() {
            return Some(Decimal::ZERO);
        }

        match self.direction {
            Direction::UsdToVes => amount.checked_mul(rate),
            Direction::VesToUsd => amount.checked_div(rate),
        }
    }

    pub fn conversions(&self, rate: &ExchangeRate) -> Vec<Conversion> {
        Card::ALL
            .iter()
            .map(|&card| {
                let card_rate = card.rate(rate);
                Conversion {
                    card,
                    rate: card_rate,
                    value: self.convert(card_rate),
                    symbol: self.direction.result_symbol(card),
                }
            })
            .collect()
    }
}

fn dot_is_decimal(text: &str) -> bool {
    if text.contains(',') {
        return false;
    }

    let mut parts = text.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(fraction), None) => fraction.len() != 3,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn typed(keys: &[&str]) -> Calculator {
        let mut calc = Calculator::default();
        for key in keys {
            calc.press(key.parse().unwrap());
        }
        calc
    }

    #[test]
    fn converts_usd_to_ves_by_multiplying() {
        let calc = typed(&["1", "0"]);
        assert_eq!(calc.convert(dec!(36)), Some(dec!(360)));
    }

    #[test]
    fn converts_ves_to_usd_by_dividing() {
        let mut calc = Calculator::default();
        calc.toggle_direction();
        calc.type_text("360").unwrap();
        assert_eq!(calc.direction(), Direction::VesToUsd);
        assert_eq!(calc.convert(dec!(36)), Some(dec!(10)));
    }

    #[test]
    fn zero_amount_or_rate_converts_to_zero() {
        assert_eq!(Calculator::default().convert(dec!(36)), Some(dec!(0)));
        assert_eq!(typed(&["5"]).convert(dec!(0)), Some(dec!(0)));
    }

    #[test]
    fn leading_zero_is_replaced_except_by_comma() {
        assert_eq!(typed(&["7"]).amount(), "7");
        assert_eq!(typed(&[",", "5"]).amount(), "0,5");
        assert_eq!(typed(&[",", "5"]).parse_amount(), dec!(0.5));
    }

    #[test]
    fn second_comma_is_ignored() {
        assert_eq!(typed(&["1", ",", "2", ",", "3"]).amount(), "1,23");
    }

    #[test]
    fn del_and_clear() {
        assert_eq!(typed(&["1", "2", "DEL"]).amount(), "1");
        assert_eq!(typed(&["1", "DEL"]).amount(), "0");
        assert_eq!(typed(&["1", "2", "3", "CLEAR"]).amount(), "0");
    }

    #[test]
    fn stops_after_twelve_digits() {
        let mut calc = Calculator::default();
        calc.type_text("1234567890123456").unwrap();
        assert_eq!(calc.amount(), "123456789012");
    }

    #[test]
    fn toggling_resets_amount() {
        let mut calc = typed(&["4", "2"]);
        calc.toggle_direction();
        assert_eq!(calc.amount(), "0");
        calc.toggle_direction();
        assert_eq!(calc.direction(), Direction::UsdToVes);
    }

    #[test]
    fn display_groups_integer_part() {
        assert_eq!(typed(&["1", "2", "3", "4", "5"]).display(), "12.345");
        assert_eq!(typed(&["1", "2", "3", "4", ","]).display(), "1.234,");
        assert_eq!(typed(&["1", "2", "3", "4", ",", "5"]).display(), "1.234,5");
    }

    #[test]
    fn type_text_reads_both_decimal_styles() {
        let mut calc = Calculator::default();
        calc.type_text("1.234,5").unwrap();
        assert_eq!(calc.parse_amount(), dec!(1234.5));

        let mut calc = Calculator::default();
        calc.type_text("12.5").unwrap();
        assert_eq!(calc.amount(), "12,5");

        assert!(Calculator::default().type_text("12a").is_err());
    }

    #[test]
    fn dotted_thousands_are_not_decimals() {
        let mut calc = Calculator::default();
        calc.type_text("1.000.000").unwrap();
        assert_eq!(calc.amount(), "1000000");
        assert_eq!(calc.parse_amount(), dec!(1000000));

        let mut calc = Calculator::default();
        calc.type_text("1.500").unwrap();
        assert_eq!(calc.parse_amount(), dec!(1500));

        let mut calc = Calculator::default();
        calc.type_text("1.5").unwrap();
        assert_eq!(calc.parse_amount(), dec!(1.5));
    }

    #[test]
    fn conversion_overflow_is_none() {
        let mut calc = Calculator::default();
        calc.toggle_direction();
        calc.type_text("999999999999").unwrap();
        assert_eq!(calc.convert(dec!(0.0000000000000000000000000001)), None);

        let mut calc = Calculator::default();
        calc.type_text("999999999999").unwrap();
        assert_eq!(calc.convert(Decimal::MAX), None);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!("x".parse::<Key>().is_err());
        assert!("12".parse::<Key>().is_err());
        assert_eq!("DEL".parse::<Key>().unwrap(), Key::Del);
    }

    #[test]
    fn conversions_cover_every_card() {
        let rate = ExchangeRate {
            fecha: String::new(),
            bcv: dec!(36),
            binance: dec!(40),
            euro: dec!(39),
        };
        let mut calc = Calculator::default();
        calc.toggle_direction();
        calc.type_text("720").unwrap();

        let conversions = calc.conversions(&rate);
        assert_eq!(conversions.len(), 4);
        assert_eq!(conversions[0].value, Some(dec!(20)));
        assert_eq!(conversions[1].value, Some(dec!(18)));
        assert_eq!(conversions[1].symbol, "USDT");
        assert_eq!(conversions[2].rate, dec!(38));
        assert_eq!(conversions[3].symbol, "€");
    }
}
