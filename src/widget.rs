use std::fmt;

use chrono::{NaiveTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::dolar_ves::Tasas;

pub const BRAND: &str = "Monitor Vzla";

/// What the home-screen widget shows: two rates and a footer.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub bcv: String,
    pub binance: String,
    pub last_update: String,
}

impl WidgetView {
    /// Shown when the service could not be reached.
    pub fn error() -> Self {
        Self {
            bcv: "Error".to_string(),
            binance: "Red".to_string(),
            last_update: "Reintentar".to_string(),
        }
    }

    /// Renders whatever the service sent; a missing rate shows as `--`.
    pub fn from_tasas(tasas: &Tasas, now: NaiveTime) -> Self {
        Self {
            bcv: fixed(tasas.bcv),
            binance: fixed(tasas.binance),
            last_update: format!("{}:{:02}", now.hour(), now.minute()),
        }
    }
}

impl fmt::Display for WidgetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<14}{:>12}", BRAND, self.last_update)?;
        writeln!(f, "{}", "-".repeat(26))?;
        writeln!(f, "{:<14}{:>12}", "BCV", self.bcv)?;
        write!(f, "{:<14}{:>12}", "Binance", self.binance)
    }
}

/// Plain two-decimal rendering; an absent or zero rate means "not published".
fn fixed(value: Option<Decimal>) -> String {
    let Some(value) = value.filter(|v| !v.is_zero()) else {
        return "--".to_string();
    };

    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn tasas(bcv: Option<Decimal>, binance: Option<Decimal>) -> Tasas {
        Tasas {
            fecha: None,
            bcv,
            binance,
            euro: None,
        }
    }

    #[test]
    fn renders_rates_with_two_decimals() {
        let now = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        let view = WidgetView::from_tasas(&tasas(Some(dec!(36.5)), Some(dec!(1041.235))), now);

        assert_eq!(view.bcv, "36.50");
        assert_eq!(view.binance, "1041.24");
        assert_eq!(view.last_update, "9:05");
    }

    #[test]
    fn missing_rates_show_dashes_with_time() {
        let now = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        let body: Tasas = serde_json::from_str(r#"{"binance":40}"#).unwrap();
        let view = WidgetView::from_tasas(&body, now);

        assert_eq!(view.bcv, "--");
        assert_eq!(view.binance, "40.00");
        assert_eq!(view.last_update, "14:30");

        let view = WidgetView::from_tasas(&tasas(Some(dec!(0)), None), now);
        assert_eq!((view.bcv.as_str(), view.binance.as_str()), ("--", "--"));
    }

    #[test]
    fn error_placeholder() {
        let error = WidgetView::error();
        assert_eq!((error.bcv.as_str(), error.binance.as_str()), ("Error", "Red"));
        assert_eq!(error.last_update, "Reintentar");
    }

    #[test]
    fn display_has_brand_and_rows() {
        let text = WidgetView::error().to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with(BRAND));
        assert!(lines[0].ends_with("Reintentar"));
        assert!(lines[2].starts_with("BCV"));
        assert!(lines[3].ends_with("Red"));
    }
}
