use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::debug;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    dolar_ves::{Calendario, Historial, Tasas},
    exchange_rate::ExchangeRate,
};

const TASAS_PATH: &str = "/api/dolar/ves";
const HISTORIAL_PATH: &str = "/api/dolar/historial";

/// Which day `GET /api/dolar/ves` should answer for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TasasQuery {
    Latest,
    Fecha(NaiveDate),
    /// The rate already announced for the next business day.
    Proximo,
}

#[derive(Debug, Clone)]
pub struct RatesClient {
    base_url: String,
    client: Client,
}

impl RatesClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.api_url.clone(),
            client,
        })
    }

    /// `Ok(None)` when the service has no rates for the requested day.
    pub async fn tasas(&self, query: TasasQuery) -> Result<Option<ExchangeRate>> {
        Ok(self.tasas_body(query).await?.into_rate())
    }

    /// The latest body as sent, missing rates included.
    pub async fn latest(&self) -> Result<Tasas> {
        self.tasas_body(TasasQuery::Latest).await
    }

    async fn tasas_body(&self, query: TasasQuery) -> Result<Tasas> {
        let url = self.tasas_url(query)?;
        self.load_json(url).await
    }

    /// Days of `month` (1-12) that have published rates.
    pub async fn available_days(&self, month: u32, year: i32) -> Result<Vec<u32>> {
        let url = self.calendario_url(month, year)?;
        let calendario: Calendario = self.load_json(url).await?;

        Ok(calendario.dias)
    }

    pub async fn history(&self) -> Result<Vec<Historial>> {
        let url = self.url(HISTORIAL_PATH, &[])?;
        self.load_json(url).await
    }

    fn tasas_url(&self, query: TasasQuery) -> Result<Url> {
        match query {
            TasasQuery::Latest => self.url(TASAS_PATH, &[]),
            TasasQuery::Fecha(date) => {
                self.url(TASAS_PATH, &[("fecha", date.format("%Y-%m-%d").to_string())])
            }
            TasasQuery::Proximo => self.url(TASAS_PATH, &[("proximo", "1".to_string())]),
        }
    }

    fn calendario_url(&self, month: u32, year: i32) -> Result<Url> {
        // The service counts months from zero.
        let mes = month
            .checked_sub(1)
            .ok_or(anyhow::anyhow!("Month must be between 1 and 12, got {}", month))?;

        self.url(
            TASAS_PATH,
            &[
                ("modo", "calendario".to_string()),
                ("mes", mes.to_string()),
                ("anio", year.to_string()),
            ],
        )
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw).with_context(|| format!("Invalid API url: {raw}"))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    async fn load_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Can't reach {url}"))?;
        if !resp.status().is_success() {
            anyhow::bail!("Can't download {}: {}", url, resp.status());
        }

        let text = resp.text().await?;
        let value = serde_json::from_str(&text)
            .with_context(|| format!("Unexpected response from {url}"))?;

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RatesClient {
        let config = Config {
            api_url: "http://localhost:3000".to_string(),
            ..Config::default()
        };
        RatesClient::new(&config).unwrap()
    }

    #[test]
    fn latest_url_has_no_query() {
        let url = client().tasas_url(TasasQuery::Latest).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/dolar/ves");
    }

    #[test]
    fn fecha_url() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let url = client().tasas_url(TasasQuery::Fecha(date)).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/dolar/ves?fecha=2026-03-09"
        );
    }

    #[test]
    fn proximo_url() {
        let url = client().tasas_url(TasasQuery::Proximo).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/dolar/ves?proximo=1");
    }

    #[test]
    fn calendario_url_sends_zero_based_month() {
        let url = client().calendario_url(1, 2026).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/dolar/ves?modo=calendario&mes=0&anio=2026"
        );
        assert!(client().calendario_url(0, 2026).is_err());
    }

    #[test]
    fn historial_url() {
        let url = client().url(HISTORIAL_PATH, &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/dolar/historial");
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        let config = Config {
            api_url: "http://127.0.0.1:9".to_string(),
            timeout: std::time::Duration::from_secs(2),
        };
        let client = RatesClient::new(&config).unwrap();
        assert!(client.latest().await.is_err());
    }
}
