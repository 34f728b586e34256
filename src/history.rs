use std::collections::HashMap;

use anyhow::Result;
use chrono::{Datelike, Days, NaiveDate};
use log::warn;
use rust_decimal::Decimal;

use crate::{
    dolar_ves::Historial,
    exchange_rate::{Gap, promedio},
};

/// Number of days plotted, ending today.
pub const WINDOW_DAYS: u64 = 30;
const AXIS_LABEL_EVERY: u64 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    /// `DD/MM`
    pub label: String,
    pub axis_label: bool,
    pub bcv: Decimal,
    pub binance: Decimal,
    pub euro: Decimal,
    pub promedio: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodStats {
    pub avg_gap_percent: Decimal,
    pub avg_gap_amount: Decimal,
    /// Mean BCV change over the days it actually moved.
    pub avg_daily_rise: Decimal,
    pub total_rise: Decimal,
    pub total_rise_percent: Decimal,
    pub min_price: Decimal,
    pub max_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub points: Vec<ChartPoint>,
    pub stats: PeriodStats,
    /// Floor of 98% of the lowest value of any series.
    pub y_axis_offset: Decimal,
}

impl Chart {
    pub fn current(&self) -> Option<&ChartPoint> {
        self.points.last()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Carried {
    bcv: Decimal,
    binance: Decimal,
    euro: Decimal,
}

impl From<&Historial> for Carried {
    fn from(record: &Historial) -> Self {
        Self {
            bcv: record.bcv,
            binance: record.binance,
            euro: record.euro,
        }
    }
}

/// Lays the sparse history over the 30 days ending `today`, carrying each
/// record forward until the next one.
pub fn build_chart(records: &[Historial], today: NaiveDate) -> Result<Chart> {
    let start = today
        .checked_sub_days(Days::new(WINDOW_DAYS - 1))
        .ok_or(anyhow::anyhow!("Can't get window start for {}", today))?;

    let mut by_date = HashMap::new();
    for record in records {
        match resolve_fecha(&record.fecha, today) {
            Some(date) => {
                by_date.insert(date, record);
            }
            None => warn!("Skipping history record with unreadable fecha {:?}", record.fecha),
        }
    }

    let mut carried = by_date
        .iter()
        .filter(|(date, _)| **date <= start)
        .max_by_key(|(date, _)| **date)
        .map(|(_, record)| Carried::from(*record))
        .or_else(|| records.first().map(Carried::from))
        .unwrap_or_default();

    let mut points = Vec::with_capacity(WINDOW_DAYS as usize);
    for days_back in (0..WINDOW_DAYS).rev() {
        let date = today
            .checked_sub_days(Days::new(days_back))
            .ok_or(anyhow::anyhow!("Can't go back {} days from {}", days_back, today))?;

        if let Some(record) = by_date.get(&date) {
            carried = Carried::from(*record);
        }

        points.push(ChartPoint {
            date,
            label: date.format("%d/%m").to_string(),
            axis_label: days_back % AXIS_LABEL_EVERY == 0,
            bcv: carried.bcv,
            binance: carried.binance,
            euro: carried.euro,
            promedio: promedio(carried.bcv, carried.binance),
        });
    }

    let stats = period_stats(&points);
    let y_axis_offset = y_axis_offset(&points);

    Ok(Chart {
        points,
        stats,
        y_axis_offset,
    })
}

fn period_stats(points: &[ChartPoint]) -> PeriodStats {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return PeriodStats::default();
    };

    let gaps: Vec<Gap> = points
        .iter()
        .map(|point| Gap::between(point.bcv, point.binance))
        .collect();
    let gap_amounts: Vec<Decimal> = gaps.iter().map(|gap| gap.amount).collect();
    let gap_percents: Vec<Decimal> = gaps.iter().map(|gap| gap.percent).collect();

    let moves: Vec<Decimal> = points
        .windows(2)
        .filter_map(|pair| pair[1].bcv.checked_sub(pair[0].bcv))
        .filter(|diff| !diff.is_zero())
        .collect();

    let total_rise = last.bcv.checked_sub(first.bcv).unwrap_or_default();
    let total_rise_percent = total_rise
        .checked_div(first.bcv)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_default();

    let bcv = points.iter().map(|point| point.bcv);

    PeriodStats {
        avg_gap_percent: mean(&gap_percents),
        avg_gap_amount: mean(&gap_amounts),
        avg_daily_rise: mean(&moves),
        total_rise,
        total_rise_percent,
        min_price: bcv.clone().min().unwrap_or_default(),
        max_price: bcv.max().unwrap_or_default(),
    }
}

/// Zero for no values. A sum too large for a Decimal is averaged term by term.
fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let count = Decimal::from(values.len());

    match values
        .iter()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(*value))
    {
        Some(sum) => sum / count,
        None => values
            .iter()
            .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(*value / count))
            .unwrap_or_default(),
    }
}

fn y_axis_offset(points: &[ChartPoint]) -> Decimal {
    points
        .iter()
        .flat_map(|point| [point.bcv, point.binance, point.euro, point.promedio])
        .min()
        .map(|lowest| (lowest * Decimal::new(98, 2)).floor())
        .unwrap_or_default()
}

/// History dates come as `DD/MM`; the year is the latest one that keeps the
/// date on or before `today`. ISO `YYYY-MM-DD` is accepted as well.
fn resolve_fecha(fecha: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(fecha.trim(), "%Y-%m-%d") {
        return Some(date);
    }

    let (day, month) = fecha.trim().split_once('/')?;
    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;

    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if date <= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() - 1, month, day),
    }
}
