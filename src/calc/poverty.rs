//! Minimum-wage workforce vs. an inflation-adjusted poverty line.

use serde::Serialize;

use crate::calc::actualization::{Actualization, Compounding, actualize, check_amount, check_range};
use crate::data::{IndicatorSource, MIN_WAGE_POPULATION_INDICATOR, POPULATION_INDICATOR};
use crate::domain::{DataBank, Observation, Period};
use crate::error::AppError;

pub const DEFAULT_WORKING_DAYS: u32 = 22;
/// Daily minimum wage in pesos.
pub const DEFAULT_MIN_SALARY: f64 = 172.87;

#[derive(Debug, Clone, PartialEq)]
pub struct PovertyInput {
    /// Poverty line in pesos at `start`.
    pub poverty_line: f64,
    pub start: Period,
    pub end: Period,
    pub working_days: u32,
    /// Daily wage.
    pub min_salary: f64,
    pub compounding: Compounding,
}

impl PovertyInput {
    pub fn new(poverty_line: f64, start: Period, end: Period) -> Self {
        Self {
            poverty_line,
            start,
            end,
            working_days: DEFAULT_WORKING_DAYS,
            min_salary: DEFAULT_MIN_SALARY,
            compounding: Compounding::default(),
        }
    }

    pub fn monthly_income(&self) -> f64 {
        f64::from(self.working_days) * self.min_salary
    }

    fn validate(&self) -> Result<(), AppError> {
        check_amount(self.poverty_line)?;
        check_range(self.start, self.end)?;
        if !(1..=31).contains(&self.working_days) {
            return Err(AppError::config(format!(
                "Working days must be between 1 and 31, got {}.",
                self.working_days
            )));
        }
        if !(self.min_salary.is_finite() && self.min_salary > 0.0) {
            return Err(AppError::config(format!(
                "Minimum salary must be a positive number, got {}.",
                self.min_salary
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PovertyReport {
    /// Last update of the minimum-wage population series.
    pub last_update: Option<String>,
    pub population: Observation,
    pub min_wage_population: Observation,
    /// Share of the population earning minimum wage, in `[0, 100]`.
    pub proportion_pct: f64,
    pub monthly_income: f64,
    pub poverty_line: Actualization,
    pub below_poverty_line: bool,
}

/// Compare a minimum-wage monthly income against the actualized poverty line.
pub fn workforce_poverty<S: IndicatorSource + ?Sized>(
    source: &S,
    input: &PovertyInput,
) -> Result<PovertyReport, AppError> {
    input.validate()?;

    let population_table = source.fetch(POPULATION_INDICATOR, DataBank::Bise, true)?;
    let (population, pop_value) = latest_value(population_table.latest(), POPULATION_INDICATOR)?;

    let min_wage_table = source.fetch(MIN_WAGE_POPULATION_INDICATOR, DataBank::Bise, true)?;
    let (min_wage_population, mw_value) = latest_value(min_wage_table.latest(), MIN_WAGE_POPULATION_INDICATOR)?;
    let last_update = min_wage_table.last_update().map(str::to_string);

    let proportion_pct = workforce_ratio(mw_value, pop_value)?;

    let poverty_line = actualize(source, input.poverty_line, input.start, input.end, input.compounding)?;
    let monthly_income = input.monthly_income();
    let below_poverty_line = monthly_income < poverty_line.amount;

    tracing::info!(
        proportion_pct,
        monthly_income,
        poverty_line = poverty_line.amount,
        below_poverty_line,
        "workforce poverty check"
    );

    Ok(PovertyReport {
        last_update,
        population,
        min_wage_population,
        proportion_pct,
        monthly_income,
        poverty_line,
        below_poverty_line,
    })
}

/// `min_wage_population / population` as a percentage.
pub fn workforce_ratio(min_wage_population: f64, population: f64) -> Result<f64, AppError> {
    if !(population.is_finite() && population > 0.0) {
        return Err(AppError::data(format!("Total population must be positive, got {population}.")));
    }
    let pct = min_wage_population / population * 100.0;
    if !(0.0..=100.0).contains(&pct) {
        return Err(AppError::data(format!(
            "Minimum-wage population {min_wage_population} is not a share of population {population} ({pct:.4}%)."
        )));
    }
    Ok(pct)
}

fn latest_value(latest: Option<Observation>, indicator: u64) -> Result<(Observation, f64), AppError> {
    latest
        .and_then(|obs| obs.value.map(|v| (obs, v)))
        .ok_or_else(|| AppError::data(format!("Indicator {indicator} returned no numeric observations.")))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::*;
    use crate::data::{INFLATION_INDICATOR, parse_response};
    use crate::domain::IndicatorTable;

    const INFLATION: &str = include_str!("../../tests/fixtures/inflation_628208.json");
    const POPULATION: &str = include_str!("../../tests/fixtures/population_1002000001.json");
    const MIN_WAGE: &str = include_str!("../../tests/fixtures/min_wage_population_6200032080.json");

    struct FixtureSource {
        bodies: HashMap<u64, &'static str>,
        calls: Cell<usize>,
    }

    impl FixtureSource {
        fn recorded() -> Self {
            Self {
                bodies: HashMap::from([
                    (INFLATION_INDICATOR, INFLATION),
                    (POPULATION_INDICATOR, POPULATION),
                    (MIN_WAGE_POPULATION_INDICATOR, MIN_WAGE),
                ]),
                calls: Cell::new(0),
            }
        }
    }

    impl IndicatorSource for FixtureSource {
        fn fetch(&self, indicator: u64, _bank: DataBank, _latest: bool) -> Result<IndicatorTable, AppError> {
            self.calls.set(self.calls.get() + 1);
            let body = self
                .bodies
                .get(&indicator)
                .ok_or_else(|| AppError::connection(format!("no fixture for {indicator}")))?;
            parse_response(body)
        }
    }

    fn p(raw: &str) -> Period {
        raw.parse().unwrap()
    }

    #[test]
    fn high_salary_clears_the_line() {
        let mut input = PovertyInput::new(3900.0, p("2021/11"), p("2022/11"));
        input.min_salary = 500.0;

        let report = workforce_poverty(&FixtureSource::recorded(), &input).unwrap();
        assert!((report.proportion_pct - 14.523654129162638).abs() < 1e-6);
        assert!((0.0..=100.0).contains(&report.proportion_pct));
        assert_eq!(report.monthly_income, 11000.0);
        assert!((report.poverty_line.amount - 3900.0 * 1.0737 * 1.078).abs() < 1e-6);
        assert!(!report.below_poverty_line);
        assert_eq!(report.last_update.as_deref(), Some("23/11/2022 12:00:00 a. m."));
        assert_eq!(report.population.value, Some(126014024.0));
    }

    #[test]
    fn default_wage_falls_below_a_high_line() {
        // 22 * 172.87 = 3803.14 < 3900 adjusted upward.
        let input = PovertyInput::new(3900.0, p("2021/11"), p("2022/11"));
        let report = workforce_poverty(&FixtureSource::recorded(), &input).unwrap();
        assert!((report.monthly_income - 3803.14).abs() < 1e-9);
        assert!(report.below_poverty_line);
    }

    #[test]
    fn ratio_must_be_a_percentage() {
        assert!((workforce_ratio(25.0, 100.0).unwrap() - 25.0).abs() < 1e-12);
        assert_eq!(workforce_ratio(0.0, 100.0).unwrap(), 0.0);
        assert_eq!(workforce_ratio(150.0, 100.0).unwrap_err().exit_code(), 4);
        assert_eq!(workforce_ratio(-1.0, 100.0).unwrap_err().exit_code(), 4);
        assert_eq!(workforce_ratio(10.0, 0.0).unwrap_err().exit_code(), 4);
    }

    #[test]
    fn empty_population_series_is_a_data_error() {
        let mut source = FixtureSource::recorded();
        source
            .bodies
            .insert(POPULATION_INDICATOR, r#"{"Series": [{"INDICADOR": "1002000001", "OBSERVATIONS": []}]}"#);
        let input = PovertyInput::new(3900.0, p("2021/11"), p("2022/11"));
        let err = workforce_poverty(&source, &input).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.message().contains("1002000001"));
    }

    #[test]
    fn rejects_bad_wage_inputs() {
        let source = FixtureSource::recorded();
        let mut input = PovertyInput::new(3900.0, p("2021/11"), p("2022/11"));
        input.working_days = 0;
        assert_eq!(workforce_poverty(&source, &input).unwrap_err().exit_code(), 2);

        input.working_days = 22;
        input.min_salary = -1.0;
        assert_eq!(workforce_poverty(&source, &input).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn invalid_poverty_inputs_skip_every_fetch() {
        let source = FixtureSource::recorded();
        let cases = [
            PovertyInput::new(0.0, p("2021/11"), p("2022/11")),
            PovertyInput::new(-3900.0, p("2021/11"), p("2022/11")),
            PovertyInput::new(f64::INFINITY, p("2021/11"), p("2022/11")),
            PovertyInput::new(3900.0, p("2021"), p("2022/11")),
            PovertyInput::new(3900.0, p("2022/11"), p("2021/11")),
        ];
        for input in &cases {
            let err = workforce_poverty(&source, input).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{input:?}");
        }
        assert_eq!(source.calls.get(), 0);
    }
}
