//! Shared domain types.
//!
//! The indicator API hands back a tree (`Series` → `OBSERVATIONS`). Everything
//! downstream of the client works with the flattened [`IndicatorTable`]
//! instead, one row per observation with the series metadata repeated.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local};
use serde::Serialize;

use crate::error::AppError;

/// Data bank an indicator lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataBank {
    /// Banco de Información Económica (economic indicators).
    Bie,
    /// Banco de Indicadores (socio-demographic indicators).
    Bise,
}

impl DataBank {
    /// Path segment used in the request URL.
    pub fn as_str(self) -> &'static str {
        match self {
            DataBank::Bie => "BIE",
            DataBank::Bise => "BISE",
        }
    }
}

impl fmt::Display for DataBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time period of an observation: a year, optionally narrowed to a month.
///
/// Ordering is chronological. An annual period sorts before every month of
/// the same year (`None < Some(_)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    pub year: i32,
    pub month: Option<u32>,
}

impl Period {
    pub fn monthly(year: i32, month: u32) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::config(format!("Invalid month {month} (expected 1-12).")));
        }
        Ok(Self {
            year,
            month: Some(month),
        })
    }

    pub fn annual(year: i32) -> Self {
        Self { year, month: None }
    }

    /// Last month covered by this period: itself if monthly, December if annual.
    pub fn last_month(self) -> Self {
        Self {
            year: self.year,
            month: Some(self.month.unwrap_or(12)),
        }
    }

    /// The current calendar month in local time.
    pub fn current() -> Self {
        let now = Local::now();
        Self {
            year: now.year(),
            month: Some(now.month()),
        }
    }
}

impl FromStr for Period {
    type Err = AppError;

    /// Accepts `YYYY`, `YYYY/MM`, `YYYY/M` and the dash variants.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || AppError::config(format!("Invalid period '{raw}' (expected YYYY or YYYY/MM)."));

        let mut parts = trimmed.splitn(2, ['/', '-']);
        let year_part = parts.next().unwrap_or_default();
        if year_part.len() != 4 {
            return Err(invalid());
        }
        let year: i32 = year_part.parse().map_err(|_| invalid())?;

        match parts.next() {
            None => Ok(Period::annual(year)),
            Some(month_part) => {
                let month: u32 = month_part.trim().parse().map_err(|_| invalid())?;
                Period::monthly(year, month).map_err(|_| invalid())
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(month) => write!(f, "{}/{:02}", self.year, month),
            None => write!(f, "{}", self.year),
        }
    }
}

/// A single `(period, value)` pair. `value` is `None` when the API reports a
/// missing or non-numeric observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub period: Period,
    pub value: Option<f64>,
}

/// One flattened observation with its series metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub indicator: String,
    pub freq: Option<String>,
    pub topic: Option<String>,
    pub unit: Option<String>,
    pub unit_mult: Option<String>,
    pub note: Option<String>,
    pub source: Option<String>,
    pub last_update: Option<String>,
    pub status: Option<String>,
    pub time_period: Period,
    pub obs_value: Option<f64>,
    pub obs_exception: Option<String>,
    pub obs_status: Option<String>,
    pub obs_source: Option<String>,
    pub obs_note: Option<String>,
    pub cober_geo: Option<String>,
}

impl IndicatorRow {
    pub fn observation(&self) -> Observation {
        Observation {
            period: self.time_period,
            value: self.obs_value,
        }
    }
}

/// Tabular form of an indicator response.
///
/// Rows keep the order the API returned them in (usually newest first).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorTable {
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorTable {
    pub fn new(rows: Vec<IndicatorRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last-update timestamp of the first series, verbatim from the API.
    pub fn last_update(&self) -> Option<&str> {
        self.rows.iter().find_map(|r| r.last_update.as_deref())
    }

    pub fn observations(&self) -> Vec<Observation> {
        self.rows.iter().map(IndicatorRow::observation).collect()
    }

    /// Most recent observation that carries a numeric value.
    pub fn latest(&self) -> Option<Observation> {
        self.rows
            .iter()
            .filter(|r| r.obs_value.is_some())
            .max_by_key(|r| r.time_period)
            .map(IndicatorRow::observation)
    }
}
