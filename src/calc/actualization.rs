//! Basket actualization: inflation-adjusting a peso amount between two months.
//!
//! The inflation series is annual (year-over-year percent) reported monthly.
//! Only observations for the start month are used, one per year from the start
//! year up to the end period, each turned into a factor `1 + pct / 100`.

use serde::Serialize;

use crate::data::{INFLATION_INDICATOR, IndicatorSource};
use crate::domain::{DataBank, Observation, Period};
use crate::error::AppError;

/// How qualifying observations are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Compounding {
    /// Multiply the factors of every qualifying observation.
    #[default]
    AllMatches,
    /// Use only the first qualifying observation in source order (newest first
    /// for the live API). The end period still bounds the search, so when the
    /// newest start-month observation falls after `end` an older one is used.
    FirstMatch,
}

/// Result of adjusting an amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actualization {
    pub base_amount: f64,
    pub amount: f64,
    pub factor: f64,
    pub start: Period,
    /// Inclusive end; an annual end is widened to December.
    pub end: Period,
    pub mode: Compounding,
    /// Observations whose factors were applied, oldest first.
    pub applied: Vec<Observation>,
}

/// Validated start/end pair.
#[derive(Debug, Clone, Copy)]
struct Range {
    start: Period,
    month: u32,
    end: Period,
}

impl Range {
    fn new(start: Period, end: Period) -> Result<Self, AppError> {
        let month = start
            .month
            .ok_or_else(|| AppError::config(format!("Start period {start} needs a month (YYYY/MM).")))?;
        let end = end.last_month();
        if start > end {
            return Err(AppError::config(format!("Start period {start} is after end period {end}.")));
        }
        Ok(Self { start, month, end })
    }

    fn contains(&self, o: &Observation) -> bool {
        o.period.year >= self.start.year && o.period.month == Some(self.month) && o.period <= self.end
    }
}

/// Fetch the full inflation history from `source` and adjust `amount`.
pub fn actualize<S: IndicatorSource + ?Sized>(
    source: &S,
    amount: f64,
    start: Period,
    end: Period,
    mode: Compounding,
) -> Result<Actualization, AppError> {
    check_amount(amount)?;
    let range = Range::new(start, end)?;
    let table = source.fetch(INFLATION_INDICATOR, DataBank::Bie, false)?;
    apply(&table.observations(), amount, range, mode)
}

/// Adjust `amount` using already-fetched inflation observations.
pub fn actualize_amount(
    observations: &[Observation],
    amount: f64,
    start: Period,
    end: Period,
    mode: Compounding,
) -> Result<Actualization, AppError> {
    check_amount(amount)?;
    apply(observations, amount, Range::new(start, end)?, mode)
}

/// Compounded multiplicative factor between `start` and `end`.
///
/// Qualifying observations have `year >= start.year`, `month == start.month`,
/// `period <= end` and a numeric value. An `end` without a month covers the
/// whole year. Errors when none qualify so callers never mistake "no data"
/// for "no inflation".
pub fn compound_factor(
    observations: &[Observation],
    start: Period,
    end: Period,
    mode: Compounding,
) -> Result<(f64, Vec<Observation>), AppError> {
    compound(observations, Range::new(start, end)?, mode)
}

fn apply(observations: &[Observation], amount: f64, range: Range, mode: Compounding) -> Result<Actualization, AppError> {
    let (factor, applied) = compound(observations, range, mode)?;
    let adjusted = amount * factor;
    tracing::debug!(amount, factor, adjusted, n_factors = applied.len(), "actualized amount");

    Ok(Actualization {
        base_amount: amount,
        amount: adjusted,
        factor,
        start: range.start,
        end: range.end,
        mode,
        applied,
    })
}

fn compound(observations: &[Observation], range: Range, mode: Compounding) -> Result<(f64, Vec<Observation>), AppError> {
    let mut qualifying = observations
        .iter()
        .filter(|o| range.contains(o))
        .filter(|o| o.value.is_some());

    let mut applied: Vec<Observation> = match mode {
        Compounding::AllMatches => qualifying.copied().collect(),
        Compounding::FirstMatch => qualifying.next().copied().into_iter().collect(),
    };
    if applied.is_empty() {
        return Err(AppError::data(format!(
            "No inflation observations for month {:02} between {} and {}.",
            range.month, range.start, range.end
        )));
    }
    applied.sort_by_key(|o| o.period);

    let factor = applied
        .iter()
        .filter_map(|o| o.value)
        .fold(1.0, |acc, pct| acc * (1.0 + pct / 100.0));
    if !(factor.is_finite() && factor > 0.0) {
        return Err(AppError::data(format!("Non-finite inflation factor {factor}.")));
    }

    Ok((factor, applied))
}

/// Reject a range `actualize` would refuse, without fetching anything.
pub(crate) fn check_range(start: Period, end: Period) -> Result<(), AppError> {
    Range::new(start, end).map(|_| ())
}

pub(crate) fn check_amount(amount: f64) -> Result<(), AppError> {
    if !(amount.is_finite() && amount > 0.0) {
        return Err(AppError::config(format!("Amount must be a positive number, got {amount}.")));
    }
    Ok(())
}
