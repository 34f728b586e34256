//! The screens of the app, rendered as text.
//!
//! Each `load_*` function makes the requests a screen needs and returns it as
//! a view; the `show_*` functions print those views. Views implement
//! `Display` and never touch the network.

use std::fmt;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use log::{error, warn};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    api::{RatesClient, TasasQuery},
    calculator::Calculator,
    calendar::{CalendarCell, CalendarMonth, WEEKDAY_HEADER},
    exchange_rate::{Card, ExchangeRate, Gap, display_fecha},
    format::format_currency,
    history::{Chart, build_chart},
    widget::{BRAND, WidgetView},
};

/// A screen that needs rates for one day, or the notice shown when that day
/// has none.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NoData(&'static str),
}

impl<T: fmt::Display> fmt::Display for Lookup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Found(screen) => write!(f, "{}", screen),
            Lookup::NoData(message) => writeln!(f, "{}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatesScreen {
    pub rate: ExchangeRate,
    pub historical: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionScreen {
    pub calculator: Calculator,
    pub rate: ExchangeRate,
}

pub struct ChartScreen<'a>(pub &'a Chart);

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarScreen {
    pub month: CalendarMonth,
    pub available: Vec<u32>,
    cells: Vec<CalendarCell>,
}

impl CalendarScreen {
    pub fn new(month: CalendarMonth, available: Vec<u32>) -> Result<Self> {
        let cells = month.grid(&available)?;

        Ok(Self {
            month,
            available,
            cells,
        })
    }
}

pub async fn show_rates(client: &RatesClient, query: TasasQuery) -> Result<()> {
    print!("{}", load_rates(client, query).await?);
    Ok(())
}

pub async fn convert(
    client: &RatesClient,
    calculator: &Calculator,
    query: TasasQuery,
) -> Result<()> {
    print!("{}", load_conversions(client, calculator, query).await?);
    Ok(())
}

pub async fn show_history(client: &RatesClient, today: NaiveDate) -> Result<()> {
    let chart = load_chart(client, today).await?;
    print!("{}", ChartScreen(&chart));
    Ok(())
}

/// Prints the month; with `day`, also the rates of that day when it has any.
pub async fn show_calendar(
    client: &RatesClient,
    month: CalendarMonth,
    day: Option<u32>,
) -> Result<()> {
    let screen = load_calendar(client, month).await?;
    print!("{}", screen);

    if let Some(day) = day {
        println!();
        print!("{}", load_day(client, &screen, day).await?);
    }

    Ok(())
}

pub async fn show_widget(client: &RatesClient) -> Result<()> {
    println!("{}", load_widget(client, Local::now().time()).await);
    Ok(())
}

pub async fn load_rates(client: &RatesClient, query: TasasQuery) -> Result<Lookup<RatesScreen>> {
    let lookup = match fetch_rate(client, query).await? {
        Some(rate) => Lookup::Found(RatesScreen {
            rate,
            historical: is_historical(query),
        }),
        None => Lookup::NoData(no_data_message(query)),
    };

    Ok(lookup)
}

pub async fn load_conversions(
    client: &RatesClient,
    calculator: &Calculator,
    query: TasasQuery,
) -> Result<Lookup<ConversionScreen>> {
    let lookup = match fetch_rate(client, query).await? {
        Some(rate) => Lookup::Found(ConversionScreen {
            calculator: calculator.clone(),
            rate,
        }),
        None => Lookup::NoData(no_data_message(query)),
    };

    Ok(lookup)
}

/// A failed request plots an all-zero window.
pub async fn load_chart(client: &RatesClient, today: NaiveDate) -> Result<Chart> {
    let records = client.history().await.unwrap_or_else(|e| {
        warn!("Error historial: {:#}", e);
        Vec::new()
    });

    build_chart(&records, today)
}

/// A failed request leaves every day disabled.
pub async fn load_calendar(client: &RatesClient, month: CalendarMonth) -> Result<CalendarScreen> {
    let available = client
        .available_days(month.month(), month.year())
        .await
        .unwrap_or_else(|e| {
            warn!("Error calendario: {:#}", e);
            Vec::new()
        });

    CalendarScreen::new(month, available)
}

/// Rates of a picked day; only days marked available are requested.
pub async fn load_day(
    client: &RatesClient,
    screen: &CalendarScreen,
    day: u32,
) -> Result<Lookup<RatesScreen>> {
    let query = TasasQuery::Fecha(screen.month.date_for(day)?);
    if !screen.available.contains(&day) {
        return Ok(Lookup::NoData(no_data_message(query)));
    }

    load_rates(client, query).await
}

pub async fn load_widget(client: &RatesClient, now: NaiveTime) -> WidgetView {
    match client.latest().await {
        Ok(tasas) => WidgetView::from_tasas(&tasas, now),
        Err(e) => {
            error!("Widget error: {:#}", e);
            WidgetView::error()
        }
    }
}

async fn fetch_rate(client: &RatesClient, query: TasasQuery) -> Result<Option<ExchangeRate>> {
    client.tasas(query).await.map_err(|e| {
        error!("Error conectando con API: {:#}", e);
        anyhow::anyhow!("Error de conexión.")
    })
}

fn is_historical(query: TasasQuery) -> bool {
    matches!(query, TasasQuery::Fecha(_))
}

fn no_data_message(query: TasasQuery) -> &'static str {
    match query {
        TasasQuery::Fecha(_) => "No hay datos para esta fecha.",
        TasasQuery::Proximo => "Aún no hay tasa publicada para el próximo día.",
        TasasQuery::Latest => "No hay datos disponibles.",
    }
}

impl fmt::Display for RatesScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fecha = Some(self.rate.fecha.as_str());
        let (subtitle, section) = if self.historical {
            (format!("Histórico: {}", display_fecha(fecha, true)), "Tasas Históricas")
        } else {
            (display_fecha(fecha, false), "Tasas del Día")
        };

        writeln!(f, "{}", BRAND)?;
        writeln!(f, "{}", subtitle)?;
        writeln!(f)?;
        writeln!(f, "{}", section)?;
        for card in Card::ALL {
            let rate = format_currency(card.rate(&self.rate));
            writeln!(f, "{:<16}Bs {:>12}", card.title(), rate)?;
        }
        writeln!(f, "{:<16}{}", "Brecha", render_gap(self.rate.brecha()))
    }
}

impl fmt::Display for ConversionScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = self.calculator.direction();

        writeln!(f, "{}", direction.label())?;
        writeln!(f, "{} {}", direction.input_symbol(), self.calculator.display())?;
        writeln!(f)?;
        for conversion in self.calculator.conversions(&self.rate) {
            let value = conversion
                .value
                .map(format_currency)
                .unwrap_or_else(|| "--".to_string());
            writeln!(
                f,
                "{:<16}{:>5} {:>14}   (Tasa: {})",
                conversion.card.title(),
                conversion.symbol,
                value,
                format_currency(conversion.rate)
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for ChartScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chart = self.0;
        let Some(current) = chart.current() else {
            return Ok(());
        };

        writeln!(f, "Historial Cambiario")?;
        writeln!(f, "Datos al {}", current.label)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<7}{:>12}{:>12}{:>12}{:>12}",
            "Fecha", "BCV", "Binance", "Promedio", "Euro"
        )?;
        for point in &chart.points {
            let marker = if point.axis_label { "*" } else { " " };
            writeln!(
                f,
                "{}{:<6}{:>12}{:>12}{:>12}{:>12}",
                marker,
                point.label,
                format_currency(point.bcv),
                format_currency(point.binance),
                format_currency(point.promedio),
                format_currency(point.euro)
            )?;
        }

        let stats = &chart.stats;
        writeln!(f)?;
        writeln!(f, "MÉTRICAS DEL PERIODO (30 DÍAS)")?;
        writeln!(
            f,
            "{:<18}{}",
            "BRECHA",
            render_gap(Gap::between(current.bcv, current.binance))
        )?;
        writeln!(
            f,
            "{:<18}{:.2}% promedio ({} Bs)",
            "",
            rounded(stats.avg_gap_percent, 2),
            format_currency(stats.avg_gap_amount)
        )?;
        writeln!(
            f,
            "{:<18}+{} Bolívares / día",
            "PROM. DIARIO",
            format_currency(stats.avg_daily_rise)
        )?;
        writeln!(
            f,
            "{:<18}+{} Total ({:.1}%)",
            "ACUM. MES",
            format_currency(stats.total_rise),
            rounded(stats.total_rise_percent, 1)
        )?;
        writeln!(
            f,
            "{:<18}{} - {}",
            "RANGO (MIN-MAX)",
            format_currency(stats.min_price),
            format_currency(stats.max_price)
        )
    }
}

impl fmt::Display for CalendarScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.month.title())?;
        writeln!(f, "{}", WEEKDAY_HEADER.map(|d| format!("{:>4}", d)).concat())?;

        for week in self.cells.chunks(7) {
            let row: String = week
                .iter()
                .map(|cell| match cell {
                    CalendarCell::Blank => "    ".to_string(),
                    CalendarCell::Day { day, available: true } => format!("{:>3}*", day),
                    CalendarCell::Day { day, available: false } => format!("{:>3} ", day),
                })
                .collect();
            writeln!(f, "{}", row.trim_end())?;
        }
        writeln!(f)?;
        writeln!(f, "* día con tasas publicadas")
    }
}

fn render_gap(gap: Gap) -> String {
    format!(
        "{:.2}% ({} Bs)",
        rounded(gap.percent, 2),
        format_currency(gap.amount)
    )
}

fn rounded(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
