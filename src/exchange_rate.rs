use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use regex::Regex;
use rust_decimal::Decimal;

/// The service stamps `fecha` with a clock eight hours behind Caracas.
const SERVER_CLOCK_LAG_HOURS: i64 = 8;

static FECHA_STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2})/(\d{2})/(\d{2}).*?(\d{1,2}):(\d{2})").expect("fecha pattern compiles")
});

/// One day of published rates, all quoted in bolívares per unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    pub fecha: String,
    pub bcv: Decimal,
    pub binance: Decimal,
    pub euro: Decimal,
}

impl ExchangeRate {
    pub fn promedio(&self) -> Decimal {
        promedio(self.bcv, self.binance)
    }

    pub fn brecha(&self) -> Gap {
        Gap::between(self.bcv, self.binance)
    }
}

/// The four rates shown side by side, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Bcv,
    Binance,
    Promedio,
    Euro,
}

impl Card {
    pub const ALL: [Card; 4] = [Card::Bcv, Card::Binance, Card::Promedio, Card::Euro];

    pub fn title(self) -> &'static str {
        match self {
            Card::Bcv => "BCV (Oficial)",
            Card::Binance => "Binance P2P",
            Card::Promedio => "Promedio",
            Card::Euro => "Euro (BCV)",
        }
    }

    pub fn rate(self, rate: &ExchangeRate) -> Decimal {
        match self {
            Card::Bcv => rate.bcv,
            Card::Binance => rate.binance,
            Card::Promedio => rate.promedio(),
            Card::Euro => rate.euro,
        }
    }

    /// Currency symbol of a converted amount when bolívares go out.
    pub fn foreign_symbol(self) -> &'static str {
        match self {
            Card::Binance => "USDT",
            Card::Euro => "€",
            Card::Bcv | Card::Promedio => "$",
        }
    }
}

/// Distance between the Binance P2P rate and the official one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub amount: Decimal,
    pub percent: Decimal,
}

impl Gap {
    pub fn between(bcv: Decimal, binance: Decimal) -> Self {
        let amount = binance.checked_sub(bcv).unwrap_or_default();
        // Zero when bcv is zero or the ratio does not fit a Decimal.
        let percent = amount
            .checked_div(bcv)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or_default();

        Self { amount, percent }
    }
}

/// Midpoint of the two rates; never leaves their range, so it cannot overflow.
pub fn promedio(bcv: Decimal, binance: Decimal) -> Decimal {
    bcv + (binance - bcv) / Decimal::TWO
}

/// Renders the service's `fecha` stamp in Caracas time.
pub fn display_fecha(fecha: Option<&str>, just_date: bool) -> String {
    let Some(fecha) = fecha.filter(|f| !f.is_empty()) else {
        return "Cargando...".to_string();
    };

    let Some(stamp) = parse_stamp(fecha) else {
        return fecha.to_string();
    };

    let local = stamp + TimeDelta::hours(SERVER_CLOCK_LAG_HOURS);
    if just_date {
        return local.format("%d/%m/%y").to_string();
    }

    let meridiem = if local.hour() < 12 { "a. m." } else { "p. m." };
    format!(
        "{}, {} {}",
        local.format("%d/%m/%y"),
        local.format("%I:%M"),
        meridiem
    )
}

fn parse_stamp(fecha: &str) -> Option<NaiveDateTime> {
    let caps = FECHA_STAMP.captures(fecha)?;
    let field = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };

    let year = 2000 + i32::try_from(field(3)?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, field(2)?, field(1)?)?;
    let time = NaiveTime::from_hms_opt(field(4)?, field(5)?, 0)?;

    Some(date.and_time(time))
}
