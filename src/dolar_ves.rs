use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use crate::exchange_rate::ExchangeRate;

/// Body of `GET /api/dolar/ves`, plain or with `fecha`/`proximo`.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Tasas {
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(default)]
    pub bcv: Option<Decimal>,
    #[serde(default)]
    pub binance: Option<Decimal>,
    #[serde(default)]
    pub euro: Option<Decimal>,
}

impl Tasas {
    /// A body without a non-zero `bcv` carries no rates for the day.
    pub fn into_rate(self) -> Option<ExchangeRate> {
        let bcv = self.bcv.filter(|bcv| !bcv.is_zero())?;

        Some(ExchangeRate {
            fecha: self.fecha.unwrap_or_default(),
            bcv,
            binance: self.binance.unwrap_or_default(),
            euro: self.euro.unwrap_or_default(),
        })
    }
}

/// One element of `GET /api/dolar/historial`. `fecha` is `DD/MM`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Historial {
    pub fecha: String,
    #[serde(default)]
    pub bcv: Decimal,
    #[serde(default)]
    pub binance: Decimal,
    #[serde(default)]
    pub euro: Decimal,
}

/// Body of `GET /api/dolar/ves?modo=calendario`.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Calendario {
    #[serde(default)]
    pub dias: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn tasas_accepts_numbers_and_numeric_strings() {
        let body = r#"{"fecha":"17/10/26 04:30","bcv":"36.50","binance":41.2,"euro":"39.9"}"#;
        let tasas: Tasas = serde_json::from_str(body).unwrap();
        let rate = tasas.into_rate().unwrap();

        assert_eq!(rate.fecha, "17/10/26 04:30");
        assert_eq!(rate.bcv, dec!(36.50));
        assert_eq!(rate.binance, dec!(41.2));
        assert_eq!(rate.euro, dec!(39.9));
    }

    #[test]
    fn tasas_without_bcv_has_no_rate() {
        let empty: Tasas = serde_json::from_str(r#"{"mensaje":"sin datos"}"#).unwrap();
        assert_eq!(empty.into_rate(), None);

        let zero: Tasas = serde_json::from_str(r#"{"bcv":0,"binance":40}"#).unwrap();
        assert_eq!(zero.into_rate(), None);

        let null: Tasas = serde_json::from_str(r#"{"bcv":null}"#).unwrap();
        assert_eq!(null.into_rate(), None);
    }

    #[test]
    fn historial_decodes_array() {
        let body = r#"[{"fecha":"15/10","bcv":"36.1","binance":"40","euro":"39"},
                       {"fecha":"16/10","bcv":36.2,"binance":40.5}]"#;
        let historial: Vec<Historial> = serde_json::from_str(body).unwrap();

        assert_eq!(historial.len(), 2);
        assert_eq!(historial[1].fecha, "16/10");
        assert_eq!(historial[1].euro, dec!(0));
    }

    #[test]
    fn calendario_defaults_to_no_days() {
        let cal: Calendario = serde_json::from_str(r#"{"dias":[1,2,15]}"#).unwrap();
        assert_eq!(cal.dias, vec![1, 2, 15]);

        let cal: Calendario = serde_json::from_str("{}").unwrap();
        assert!(cal.dias.is_empty());
    }
}
