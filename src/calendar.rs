use anyhow::Result;
use chrono::{Datelike, NaiveDate};

pub const WEEKDAY_HEADER: [&str; 7] = ["Do", "Lu", "Ma", "Mi", "Ju", "Vi", "Sa"];

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    /// Padding before the first of the month.
    Blank,
    Day { day: u32, available: bool },
}

/// The month shown by the historical-rate picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            anyhow::bail!("Month must be between 1 and 12, got {}", month);
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            anyhow::bail!("Year {} is out of range", year);
        }

        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Moves `delta` months, rolling the year over in either direction.
    pub fn shift(self, delta: i32) -> Result<Self> {
        let index = self
            .year
            .checked_mul(12)
            .and_then(|months| months.checked_add(self.month as i32 - 1))
            .and_then(|index| index.checked_add(delta))
            .ok_or(anyhow::anyhow!("Can't move {} months from {}", delta, self.title()))?;

        Self::new(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
    }

    /// e.g. `OCTUBRE DE 2026`
    pub fn title(&self) -> String {
        let name = MONTH_NAMES[(self.month - 1) as usize];
        format!("{} de {}", name, self.year).to_uppercase()
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or(anyhow::anyhow!("Can't build date for {}/{}", self.month, self.year))
    }

    pub fn days_in_month(&self) -> Result<u32> {
        let next = self.shift(1)?.first_day()?;
        let last = next
            .pred_opt()
            .ok_or(anyhow::anyhow!("Can't get pred date for {}", next))?;

        Ok(last.day())
    }

    /// Leading blanks up to the weekday of the 1st (Sunday first), then every
    /// day of the month, enabled when the service has rates for it.
    pub fn grid(&self, available: &[u32]) -> Result<Vec<CalendarCell>> {
        let leading = self.first_day()?.weekday().num_days_from_sunday();
        let days = self.days_in_month()?;

        let mut cells = vec![CalendarCell::Blank; leading as usize];
        cells.extend((1..=days).map(|day| CalendarCell::Day {
            day,
            available: available.contains(&day),
        }));

        Ok(cells)
    }

    pub fn date_for(&self, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
            .ok_or(anyhow::anyhow!("{} is not a day of {}", day, self.title()))
    }
}
