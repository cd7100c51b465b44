//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - builds the INEGI client from flags / environment
//! - runs the requested fetch or calculation
//! - prints reports and writes optional exports

use clap::Parser;
use serde::Serialize;

use crate::calc::{Compounding, PovertyInput, actualize, workforce_poverty};
use crate::cli::{ActualizeArgs, Command, IndicatorArgs, PovertyArgs, RangeArgs};
use crate::data::InegiClient;
use crate::domain::{DataBank, Period};
use crate::error::AppError;

/// Entry point for the `inegi` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init(cli.verbose);

    let client = InegiClient::from_env(cli.token)?
        .with_locale(cli.locale)
        .with_geography(cli.geography);

    match cli.command {
        Command::Economic(args) => handle_indicator(&client, DataBank::Bie, args),
        Command::Socio(args) => handle_indicator(&client, DataBank::Bise, args),
        Command::Actualize(args) => handle_actualize(&client, args),
        Command::Poverty(args) => handle_poverty(&client, args),
    }
}

fn handle_indicator(client: &InegiClient, bank: DataBank, args: IndicatorArgs) -> Result<(), AppError> {
    let table = client.fetch(args.code, bank, !args.history)?;

    if args.json {
        print_json(&table)?;
    } else {
        println!("{}", crate::report::format_indicator_table(&table));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_table_csv(path, &table)?;
    }

    Ok(())
}

fn handle_actualize(client: &InegiClient, args: ActualizeArgs) -> Result<(), AppError> {
    let (end, mode) = resolve_range(&args.range);
    let result = actualize(client, args.amount, args.range.start, end, mode)?;

    if args.range.json {
        print_json(&result)
    } else {
        println!("{}", crate::report::format_actualization(&result));
        Ok(())
    }
}

fn handle_poverty(client: &InegiClient, args: PovertyArgs) -> Result<(), AppError> {
    let input = poverty_input_from_args(&args);
    let report = workforce_poverty(client, &input)?;

    if args.range.json {
        print_json(&report)
    } else {
        println!("{}", crate::report::format_poverty_report(&report));
        Ok(())
    }
}

pub fn poverty_input_from_args(args: &PovertyArgs) -> PovertyInput {
    let (end, compounding) = resolve_range(&args.range);
    PovertyInput {
        poverty_line: args.poverty_line,
        start: args.range.start,
        end,
        working_days: args.working_days,
        min_salary: args.min_salary,
        compounding,
    }
}

fn resolve_range(range: &RangeArgs) -> (Period, Compounding) {
    let end = range.end.unwrap_or_else(Period::current);
    let mode = if range.first_match {
        Compounding::FirstMatch
    } else {
        Compounding::AllMatches
    };
    (end, mode)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::data(format!("Failed to serialize output: {e}")))?;
    println!("{text}");
    Ok(())
}
