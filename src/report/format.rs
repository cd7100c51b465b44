//! Plain-text formatting of tables and reports.

use crate::calc::{Actualization, Compounding, PovertyReport};
use crate::domain::IndicatorTable;

/// Format a fetched indicator table, newest rows as returned by the API.
pub fn format_indicator_table(table: &IndicatorTable) -> String {
    let mut out = String::new();

    if let Some(first) = table.rows.first() {
        out.push_str(&format!("Indicator: {}\n", first.indicator));
        if let Some(unit) = &first.unit {
            out.push_str(&format!("Unit: {unit}\n"));
        }
    }
    out.push_str(&format!("Last update: {}\n", table.last_update().unwrap_or("n/a")));
    out.push_str(&format!("Observations: {}\n\n", table.len()));

    out.push_str(
        format!("{:<12} {:<10} {:>24} {:<8}\n", "indicator", "period", "value", "geo").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<10} {:-<24} {:-<8}\n", "", "", "", "").trim_end());
    out.push('\n');

    for r in &table.rows {
        out.push_str(
            format!(
                "{:<12} {:<10} {:>24} {:<8}\n",
                truncate(&r.indicator, 12),
                r.time_period.to_string(),
                fmt_value(r.obs_value),
                r.cober_geo.as_deref().unwrap_or(""),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format a basket actualization result.
pub fn format_actualization(result: &Actualization) -> String {
    let mut out = String::new();

    out.push_str(&format!("Amount at {}: {:.2}\n", result.start, result.base_amount));
    out.push_str(&format!("Amount at {}: {:.6}\n", result.end, result.amount));
    out.push_str(&format!(
        "Compounded factor: {:.6} ({})\n",
        result.factor,
        compounding_label(result.mode)
    ));
    out.push_str("Applied inflation:\n");
    for obs in &result.applied {
        out.push_str(&format!("  {} {}%\n", obs.period, fmt_value(obs.value)));
    }

    out
}

/// Format the workforce poverty check.
pub fn format_poverty_report(report: &PovertyReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "The proportion of people earning minimum wage, as of {}, is {}%\n",
        report.last_update.as_deref().unwrap_or("the latest release"),
        report.proportion_pct
    ));
    out.push_str(&format!(
        "Monthly income: {:.2} | actualized poverty line ({}): {:.2}\n",
        report.monthly_income, report.poverty_line.end, report.poverty_line.amount
    ));

    if report.below_poverty_line {
        out.push_str(&format!(
            "The proportion of workers whose minimum-wage salary falls below the selected poverty line is {}%\n",
            report.proportion_pct
        ));
    } else {
        out.push_str("With the specified data, the minimum salary is able to cover necessities in the poverty line\n");
    }

    out
}

fn compounding_label(mode: Compounding) -> &'static str {
    match mode {
        Compounding::AllMatches => "all matching months",
        Compounding::FirstMatch => "first matching month",
    }
}

fn fmt_value(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
