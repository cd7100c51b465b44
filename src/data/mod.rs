//! Indicator data access.
//!
//! Calculations depend on [`IndicatorSource`] rather than on the HTTP client,
//! so they can run against recorded payloads.

pub mod inegi;

pub use inegi::{InegiClient, parse_response};

use crate::domain::{DataBank, IndicatorTable};
use crate::error::AppError;

/// Annual inflation rate (monthly observations, percent).
pub const INFLATION_INDICATOR: u64 = 628208;
/// Total population.
pub const POPULATION_INDICATOR: u64 = 1002000001;
/// Employed population earning up to one minimum wage.
pub const MIN_WAGE_POPULATION_INDICATOR: u64 = 6200032080;

/// Anything that can produce a flattened indicator table.
pub trait IndicatorSource {
    fn fetch(&self, indicator: u64, bank: DataBank, latest: bool) -> Result<IndicatorTable, AppError>;
}
